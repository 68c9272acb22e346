//! Shattered-plate terrain built from a jittered cell grid: height follows
//! the gap between the nearest and second-nearest cell centers, with deep
//! cracks along the cell borders.

use orogen_noise::{NoiseChannel, NoiseField};

use crate::{ShapeFunction, ShapeParams, normalize_signed};

/// Cells per axis across the [-1, 1] coordinate square.
const CELLS_PER_AXIS: usize = 5;
/// How far a cell center may be displaced from its lattice point.
const JITTER_STRENGTH: f32 = 0.3;
/// Multiplier turning the nearest/second-nearest gap into height.
const GAP_SCALE: f32 = 10.0;
const DETAIL_STRENGTH: f32 = 0.05;
/// Gap below which a point sits in a crack between plates.
const CRACK_BAND: f32 = 0.03;
const FLOOR: f32 = 0.05;

pub struct ShardsShape {
    width: usize,
    height: usize,
    centers: Vec<(f32, f32)>,
    detail: NoiseChannel,
}

impl ShardsShape {
    /// Build the sampler. Cell centers are lattice points jittered by two
    /// noise channels, so the plate layout is a pure function of the seed.
    pub fn new(params: &ShapeParams) -> Self {
        let field = NoiseField::new(params.seed);
        let jitter_x = field.channel(20);
        let jitter_y = field.channel(21);

        let step = 2.0 / CELLS_PER_AXIS as f32;
        let mut centers = Vec::with_capacity(CELLS_PER_AXIS * CELLS_PER_AXIS);
        for j in 0..CELLS_PER_AXIS {
            for i in 0..CELLS_PER_AXIS {
                let cx = -1.0 + (i as f32 + 0.5) * step;
                let cy = -1.0 + (j as f32 + 0.5) * step;
                let dx = jitter_x.sample(i as f64, j as f64) * JITTER_STRENGTH * step;
                let dy = jitter_y.sample(i as f64, j as f64) * JITTER_STRENGTH * step;
                centers.push((cx + dx, cy + dy));
            }
        }

        Self {
            width: params.width,
            height: params.height,
            centers,
            detail: field.channel(30),
        }
    }

    /// Distances to the nearest and second-nearest cell centers.
    fn nearest_two(&self, x: f32, y: f32) -> (f32, f32) {
        let mut first = f32::INFINITY;
        let mut second = f32::INFINITY;
        for &(cx, cy) in &self.centers {
            let dx = x - cx;
            let dy = y - cy;
            let d = (dx * dx + dy * dy).sqrt();
            if d < first {
                second = first;
                first = d;
            } else if d < second {
                second = d;
            }
        }
        (first, second)
    }
}

impl ShapeFunction for ShardsShape {
    fn height(&self, x: usize, y: usize) -> f32 {
        let (nx, ny) = normalize_signed(x, y, self.width, self.height);
        let (first, second) = self.nearest_two(nx, ny);
        let gap = second - first;

        if gap < CRACK_BAND {
            return 0.0;
        }

        let detail = self
            .detail
            .sample(nx as f64 * 4.0, ny as f64 * 4.0)
            * DETAIL_STRENGTH;
        ((gap * GAP_SCALE + detail).clamp(0.0, 1.0)).max(FLOOR)
    }
}
