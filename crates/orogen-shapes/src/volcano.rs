//! Volcano: central crater depression, uneven rim, noisy outer slope.

use orogen_noise::{DomainWarp, NoiseChannel, NoiseField};

use crate::{ShapeFunction, ShapeParams, normalize_signed};

const CRATER_RADIUS: f32 = 0.3;
const RIM_HEIGHT: f32 = 0.25;
const RIM_WIDTH: f32 = 0.1;
const OUTER_SLOPE_STRENGTH: f32 = 0.5;
const INNER_SLOPE_STRENGTH: f32 = 2.0;
const BASE_HEIGHT: f32 = 0.1;
const NOISE_STRENGTH: f32 = 0.02;

/// Volcano profile built from three noise-perturbed radial bands: the
/// crater floor, the rim, and the outer slope.
pub struct VolcanoShape {
    width: usize,
    height: usize,
    warp: Option<DomainWarp>,
    irregularity: NoiseChannel,
    rim_noise: NoiseChannel,
    slope_noise: NoiseChannel,
}

impl VolcanoShape {
    /// Build the sampler.
    pub fn new(params: &ShapeParams) -> Self {
        let field = NoiseField::new(params.seed);
        Self {
            width: params.width,
            height: params.height,
            warp: params
                .warp
                .map(|w| DomainWarp::new(&field, w.size, w.strength)),
            irregularity: field.channel(20),
            rim_noise: field.channel(30),
            slope_noise: field.channel(40),
        }
    }
}

impl ShapeFunction for VolcanoShape {
    fn height(&self, x: usize, y: usize) -> f32 {
        let (nx, ny) = normalize_signed(x, y, self.width, self.height);

        // Radial bands are measured from the undisplaced center; the warp
        // roughens the band boundaries through the noise inputs only.
        let distance = (nx * nx + ny * ny).sqrt();
        let (wx, wy) = match &self.warp {
            Some(warp) => warp.displace(nx, ny),
            None => (nx, ny),
        };
        let (wx, wy) = (wx as f64, wy as f64);

        // Crater radius wobbles with angle so the rim is not a circle.
        let radius =
            CRATER_RADIUS + self.irregularity.sample(wx * 4.0, wy * 4.0) * 0.1;

        let rim_end = radius + RIM_WIDTH;
        let outer_slope = (1.0 - rim_end).max(0.0) * OUTER_SLOPE_STRENGTH;
        let rim_crest = BASE_HEIGHT + outer_slope + RIM_HEIGHT;

        let value = if distance < radius {
            // Inside: climb from the floor at the center to the crest at
            // the rim.
            let t = (distance / radius).clamp(0.0, 1.0);
            BASE_HEIGHT + t.powf(INNER_SLOPE_STRENGTH) * (rim_crest - BASE_HEIGHT)
        } else if distance < rim_end {
            let rim_falloff = (distance - radius) / RIM_WIDTH;
            let rim_noise = self.rim_noise.sample(wx * 8.0, wy * 8.0) * NOISE_STRENGTH;
            let slope_here = (1.0 - distance).max(0.0) * OUTER_SLOPE_STRENGTH;
            BASE_HEIGHT + slope_here + (1.0 - rim_falloff) * RIM_HEIGHT + rim_noise
        } else {
            let slope_noise = self.slope_noise.sample(wx * 4.0, wy * 4.0) * NOISE_STRENGTH;
            BASE_HEIGHT + (1.0 - distance).max(0.0) * OUTER_SLOPE_STRENGTH + slope_noise
        };

        value.max(BASE_HEIGHT).clamp(0.0, 1.0)
    }
}
