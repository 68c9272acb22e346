//! Radial island: central mass, beach taper band, subtle noise.

use orogen_noise::{DomainWarp, NoiseChannel, NoiseField};

use crate::{ShapeFunction, ShapeParams, normalize_signed};

/// Start of the beach band in normalized radial distance.
const BEACH_START: f32 = 0.5;
/// End of the beach band; beyond this the terrain flattens to ocean level.
const BEACH_END: f32 = 0.98;

/// Island profile: a parabolic central mountain with radial falloff, a
/// smooth beach taper toward the map edge, and noise variation on top.
pub struct IslandShape {
    width: usize,
    height: usize,
    warp: Option<DomainWarp>,
    base: NoiseChannel,
}

impl IslandShape {
    /// Build the sampler; derives the base channel from the run seed.
    pub fn new(params: &ShapeParams) -> Self {
        let field = NoiseField::new(params.seed);
        Self {
            width: params.width,
            height: params.height,
            warp: params
                .warp
                .map(|w| DomainWarp::new(&field, w.size, w.strength)),
            base: field.channel(0),
        }
    }
}

impl ShapeFunction for IslandShape {
    fn height(&self, x: usize, y: usize) -> f32 {
        let (nx, ny) = normalize_signed(x, y, self.width, self.height);

        // Geometry uses the undisplaced coordinate; warping only feeds the
        // noise term so the coastline stays anchored to the map center.
        let distance = (nx * nx + ny * ny).sqrt();
        let falloff = 1.0 - distance.clamp(0.25, 1.0);
        let central_mountain = (1.0 - distance * distance) * falloff;

        let beach_falloff =
            ((distance - BEACH_START) / (BEACH_END - BEACH_START)).clamp(0.1, 1.0);
        let beach_taper = (1.0 - beach_falloff) * 0.25;

        let noise = match &self.warp {
            Some(warp) => {
                let (wx, wy) = warp.displace(nx, ny);
                self.base.sample(wx as f64 * 2.0, wy as f64 * 2.0) * 0.4
            }
            None => self.base.sample(nx as f64 * 6.0, ny as f64 * 6.0) * 0.05,
        };

        (central_mountain * (1.0 - beach_falloff) + beach_taper + noise).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(warp: bool) -> IslandShape {
        IslandShape::new(&ShapeParams {
            width: 128,
            height: 128,
            seed: 42,
            warp: warp.then_some(crate::WarpSettings {
                size: 0.25,
                strength: 0.15,
            }),
        })
    }

    #[test]
    fn test_center_higher_than_corners() {
        let island = shape(false);
        let center = island.height(64, 64);
        let corner = island.height(0, 0);
        assert!(
            center > corner,
            "island center ({center}) should exceed corner ({corner})"
        );
    }

    #[test]
    fn test_edges_near_ocean_level() {
        let island = shape(false);
        for x in [0usize, 127] {
            for y in 0..128 {
                let h = island.height(x, y);
                assert!(
                    h < 0.3,
                    "map border should taper to ocean level, got {h} at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn test_warp_changes_noise_only_slightly() {
        let plain = shape(false);
        let warped = shape(true);
        // Warping perturbs the noise term but not the radial geometry, so
        // the two profiles stay broadly similar at the center.
        let a = plain.height(64, 64);
        let b = warped.height(64, 64);
        assert!((a - b).abs() < 0.6, "warp moved center too far: {a} vs {b}");
    }
}
