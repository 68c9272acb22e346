//! Cratered terrain: a seeded field of impact basins stamped over a
//! gently undulating base.

use orogen_noise::{NoiseChannel, NoiseField};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{ShapeFunction, ShapeParams, normalize_signed};

const CRATER_COUNT: usize = 100;
/// Fraction of craters drawn from the large radius band.
const LARGE_FRACTION: f64 = 0.2;
const LARGE_RADIUS: std::ops::Range<f32> = 0.15..0.3;
const SMALL_RADIUS: std::ops::Range<f32> = 0.05..0.1;
/// Base floor level around which craters are carved.
const BASE_LEVEL: f32 = 0.5;
const BASE_NOISE_STRENGTH: f32 = 0.05;
const PIT_DEPTH: f32 = 0.35;
const RIM_HEIGHT: f32 = 0.1;
/// Width of the raised rim band relative to the crater radius.
const RIM_BAND: f32 = 0.25;
const SLOPE_FALLOFF: f32 = 0.9;

struct Crater {
    x: f32,
    y: f32,
    radius: f32,
}

/// Meteor-crater field.
pub struct CraterFieldShape {
    width: usize,
    height: usize,
    craters: Vec<Crater>,
    base: NoiseChannel,
}

impl CraterFieldShape {
    /// Build the sampler. Crater placement comes from a stream cipher RNG
    /// seeded by the run seed, so the layout is stable per seed.
    pub fn new(params: &ShapeParams) -> Self {
        let field = NoiseField::new(params.seed);
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed as u64);
        let craters = (0..CRATER_COUNT)
            .map(|_| {
                let x = rng.random_range(-1.2..1.2);
                let y = rng.random_range(-1.2..1.2);
                let radius = if rng.random_bool(LARGE_FRACTION) {
                    rng.random_range(LARGE_RADIUS)
                } else {
                    rng.random_range(SMALL_RADIUS)
                };
                Crater { x, y, radius }
            })
            .collect();
        Self {
            width: params.width,
            height: params.height,
            craters,
            base: field.channel(1),
        }
    }
}

impl ShapeFunction for CraterFieldShape {
    fn height(&self, x: usize, y: usize) -> f32 {
        let (nx, ny) = normalize_signed(x, y, self.width, self.height);

        let base_noise = self
            .base
            .sample(nx as f64 * 2.0, ny as f64 * 2.0)
            * BASE_NOISE_STRENGTH;
        let mut height = BASE_LEVEL + base_noise;

        // Later craters stamp over earlier ones rather than blending.
        for crater in &self.craters {
            let dx = nx - crater.x;
            let dy = ny - crater.y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance >= crater.radius {
                continue;
            }
            let t = distance / crater.radius;
            if t < 1.0 - RIM_BAND {
                // Bowl interior: deepest at the center, easing out.
                let pit = 1.0 - (t / (1.0 - RIM_BAND)).powf(2.0);
                height = BASE_LEVEL + base_noise - PIT_DEPTH * pit.powf(SLOPE_FALLOFF);
            } else {
                // Raised rim tapering back to the surrounding surface.
                let rim_t = (1.0 - t) / RIM_BAND;
                height = BASE_LEVEL + base_noise + RIM_HEIGHT * rim_t.powf(SLOPE_FALLOFF);
            }
        }

        height.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(seed: i64) -> CraterFieldShape {
        CraterFieldShape::new(&ShapeParams {
            width: 128,
            height: 128,
            seed,
            warp: None,
        })
    }

    #[test]
    fn test_output_in_unit_range() {
        let craters = shape(77);
        for y in (0..128).step_by(4) {
            for x in (0..128).step_by(4) {
                let h = craters.height(x, y);
                assert!((0.0..=1.0).contains(&h), "height {h} out of range");
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = shape(5);
        let b = shape(5);
        for i in 0..128 {
            assert_eq!(a.height(i, i), b.height(i, i), "mismatch at ({i}, {i})");
        }
    }

    #[test]
    fn test_craters_depress_below_base() {
        let craters = shape(9);
        let mut below = 0usize;
        let mut above = 0usize;
        for y in 0..128 {
            for x in 0..128 {
                let h = craters.height(x, y);
                if h < BASE_LEVEL - 0.1 {
                    below += 1;
                } else if h > BASE_LEVEL + 0.05 {
                    above += 1;
                }
            }
        }
        assert!(below > 0, "expected crater pits below the base level");
        assert!(above > 0, "expected raised rims above the base level");
    }
}
