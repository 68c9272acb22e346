//! Rolling hills: broad low-frequency flats with layered detail.

use orogen_noise::{DomainWarp, NoiseChannel, NoiseField};

use crate::{ShapeFunction, ShapeParams, normalize_unit};

/// Gentle hill profile.
pub struct HillsShape {
    width: usize,
    height: usize,
    warp: Option<DomainWarp>,
    base: NoiseChannel,
    flats: NoiseChannel,
    detail: NoiseChannel,
}

impl HillsShape {
    /// Build the sampler.
    pub fn new(params: &ShapeParams) -> Self {
        let field = NoiseField::new(params.seed);
        Self {
            width: params.width,
            height: params.height,
            warp: params
                .warp
                .map(|w| DomainWarp::new(&field, w.size, w.strength)),
            base: field.channel(0),
            flats: field.channel(1),
            detail: field.channel(2),
        }
    }
}

impl ShapeFunction for HillsShape {
    fn height(&self, x: usize, y: usize) -> f32 {
        let (nx, ny) = normalize_unit(x, y, self.width, self.height);
        let (wx, wy) = match &self.warp {
            Some(warp) => warp.displace(nx, ny),
            None => (nx, ny),
        };

        let base_hills = self.base.sample(wx as f64 * 2.0, wy as f64 * 2.0) * 0.4;

        // Low-frequency magnitude term carves out broad plains between
        // hill clusters; unwarped so the flats stay large-scale.
        let flat_areas = self.flats.sample(nx as f64 * 0.5, ny as f64 * 0.5).abs() * 0.1;

        let detail = self.detail.sample(nx as f64 * 8.0, ny as f64 * 8.0) * 0.1;

        (base_hills + flat_areas + detail).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_in_unit_range() {
        let hills = HillsShape::new(&ShapeParams {
            width: 128,
            height: 128,
            seed: 3,
            warp: None,
        });
        for y in (0..128).step_by(5) {
            for x in (0..128).step_by(5) {
                let h = hills.height(x, y);
                assert!((0.0..=1.0).contains(&h), "height {h} out of range");
            }
        }
    }

    #[test]
    fn test_profile_is_gentle() {
        // Hills stay well below full height; the profile tops out around
        // the sum of its component amplitudes.
        let hills = HillsShape::new(&ShapeParams {
            width: 128,
            height: 128,
            seed: 3,
            warp: None,
        });
        for y in (0..128).step_by(3) {
            for x in (0..128).step_by(3) {
                assert!(hills.height(x, y) <= 0.6 + 1e-6);
            }
        }
    }
}
