//! Plateau: rectangular flat top with noise-perturbed slope edges and
//! crack-style cut-ins across the surface.

use orogen_noise::{DomainWarp, NoiseChannel, NoiseField};

use crate::{ShapeFunction, ShapeParams, normalize_signed};

/// Half-extent of the flat top along x in normalized coordinates.
const HALF_WIDTH: f32 = 0.5;
/// Half-extent of the flat top along y.
const HALF_HEIGHT: f32 = 0.35;
/// Height of the flat top.
const TOP_HEIGHT: f32 = 0.8;
/// Normalized distance over which the slope descends to the base plain.
const SLOPE_WIDTH: f32 = 0.3;
/// Height of the plain surrounding the plateau.
const BASE_HEIGHT: f32 = 0.1;
/// Half-width of the cut-in band in crack-noise space.
const CUT_BAND: f32 = 0.05;
/// Depth of a cut-in at the crack centerline.
const CUT_DEPTH: f32 = 0.25;

/// Plateau profile.
pub struct PlateauShape {
    width: usize,
    height: usize,
    warp: Option<DomainWarp>,
    edge_noise: NoiseChannel,
    crack_noise: NoiseChannel,
    detail: NoiseChannel,
}

impl PlateauShape {
    /// Build the sampler.
    pub fn new(params: &ShapeParams) -> Self {
        let field = NoiseField::new(params.seed);
        Self {
            width: params.width,
            height: params.height,
            warp: params
                .warp
                .map(|w| DomainWarp::new(&field, w.size, w.strength)),
            edge_noise: field.channel(30),
            crack_noise: field.channel(31),
            detail: field.channel(32),
        }
    }
}

impl ShapeFunction for PlateauShape {
    fn height(&self, x: usize, y: usize) -> f32 {
        let (nx, ny) = normalize_signed(x, y, self.width, self.height);
        let (wx, wy) = match &self.warp {
            Some(warp) => warp.displace(nx, ny),
            None => (nx, ny),
        };
        let (sx, sy) = (wx as f64, wy as f64);

        // Chebyshev distance outside the rectangle, roughened so the slope
        // edge meanders instead of tracing a clean box.
        let dx = (nx.abs() - HALF_WIDTH).max(0.0);
        let dy = (ny.abs() - HALF_HEIGHT).max(0.0);
        let mut edge_distance = dx.max(dy);
        if edge_distance > 0.0 {
            edge_distance =
                (edge_distance + self.edge_noise.sample(sx * 3.0, sy * 3.0) * 0.08).max(0.0);
        }

        let mut value = if edge_distance <= 0.0 {
            TOP_HEIGHT
        } else {
            let t = (1.0 - edge_distance / SLOPE_WIDTH).clamp(0.0, 1.0);
            BASE_HEIGHT + t.powf(1.5) * (TOP_HEIGHT - BASE_HEIGHT)
        };

        // Cut-ins: narrow canyons where the crack signal crosses zero,
        // carved only into the elevated part of the profile.
        let crack = self.crack_noise.sample(sx * 2.0, sy * 2.0).abs();
        if crack < CUT_BAND && value > BASE_HEIGHT {
            let cut = (1.0 - crack / CUT_BAND) * CUT_DEPTH;
            value = (value - cut).max(BASE_HEIGHT);
        }

        let detail = self.detail.sample(sx * 10.0, sy * 10.0) * 0.03;
        (value + detail).clamp(0.0, 1.0)
    }
}
