//! Sea bed: sinusoidal ripples broken up by distortion noise and jitter.

use orogen_noise::{DomainWarp, NoiseChannel, NoiseField};

use crate::{ShapeFunction, ShapeParams, normalize_unit};

/// Overall depth scale applied to the combined ripple signal.
const DEPTH_SCALE: f32 = 0.4;
/// Ripple cycles across the map along each axis.
const WAVE_FREQUENCY: f32 = 3.0;
/// Ripple amplitude before depth scaling.
const WAVE_AMPLITUDE: f32 = 0.2;
/// Amplitude of the high-frequency jitter channel.
const RANDOM_VARIATION: f32 = 0.05;
const DISTORTION_FREQUENCY: f32 = 4.0;
const DISTORTION_STRENGTH: f32 = 0.3;

/// Rippled sea-floor profile.
pub struct SeaBedShape {
    width: usize,
    height: usize,
    warp: Option<DomainWarp>,
    distortion: NoiseChannel,
    jitter: NoiseChannel,
}

impl SeaBedShape {
    /// Build the sampler.
    pub fn new(params: &ShapeParams) -> Self {
        let field = NoiseField::new(params.seed);
        Self {
            width: params.width,
            height: params.height,
            warp: params
                .warp
                .map(|w| DomainWarp::new(&field, w.size, w.strength)),
            distortion: field.channel(1),
            jitter: field.channel(2),
        }
    }
}

impl ShapeFunction for SeaBedShape {
    fn height(&self, x: usize, y: usize) -> f32 {
        let (nx, ny) = normalize_unit(x, y, self.width, self.height);
        let (wx, wy) = match &self.warp {
            Some(warp) => warp.displace(nx, ny),
            None => (nx, ny),
        };

        let tau = std::f32::consts::TAU;
        let base_ripple = (wx * WAVE_FREQUENCY * tau).sin() * WAVE_AMPLITUDE
            + (wy * WAVE_FREQUENCY * tau).sin() * WAVE_AMPLITUDE;

        let distortion = self.distortion.sample(
            nx as f64 * DISTORTION_FREQUENCY as f64,
            ny as f64 * DISTORTION_FREQUENCY as f64,
        ) * DISTORTION_STRENGTH;

        // High-frequency channel stands in for per-cell random jitter so
        // the variation stays deterministic under the run seed.
        let jitter =
            self.jitter.sample(nx as f64 * 50.0, ny as f64 * 50.0) * RANDOM_VARIATION;

        ((base_ripple + distortion + jitter) * DEPTH_SCALE).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> SeaBedShape {
        SeaBedShape::new(&ShapeParams {
            width: 128,
            height: 128,
            seed: 21,
            warp: None,
        })
    }

    #[test]
    fn test_output_in_unit_range() {
        let sea = shape();
        for y in (0..128).step_by(3) {
            for x in (0..128).step_by(3) {
                let h = sea.height(x, y);
                assert!((0.0..=1.0).contains(&h), "height {h} out of range");
            }
        }
    }

    #[test]
    fn test_ripples_present() {
        let sea = shape();
        // A transect across the map should cross multiple ripple crests.
        let mut sign_changes = 0;
        let mut prev_delta = 0.0f32;
        for x in 1..128 {
            let delta = sea.height(x, 64) - sea.height(x - 1, 64);
            if delta * prev_delta < 0.0 {
                sign_changes += 1;
            }
            if delta != 0.0 {
                prev_delta = delta;
            }
        }
        assert!(
            sign_changes >= 4,
            "expected a rippled transect, saw {sign_changes} direction changes"
        );
    }
}
