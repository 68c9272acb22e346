//! Ridged mountain range: absolute-value noise ridges with distortion and
//! fine detail, falling off toward the map border.

use orogen_noise::{DomainWarp, NoiseChannel, NoiseField};

use crate::{ShapeFunction, ShapeParams, normalize_unit};

/// Floor height so valleys never flatten to exact zero.
const BASELINE: f32 = 0.05;

/// This family keeps its own warp channel pair, distinct from the shared
/// +10/+11 layout, so mountain warping stays decorrelated from the other
/// families under the same seed.
const WARP_X_OFFSET: i64 = 20;
const WARP_Y_OFFSET: i64 = 21;

/// Mountain range profile.
pub struct MountainsShape {
    width: usize,
    height: usize,
    warp: Option<DomainWarp>,
    ridge: NoiseChannel,
    distortion: NoiseChannel,
    detail: NoiseChannel,
}

impl MountainsShape {
    /// Build the sampler; derives ridge/distortion/detail channels.
    pub fn new(params: &ShapeParams) -> Self {
        let field = NoiseField::new(params.seed);
        Self {
            width: params.width,
            height: params.height,
            warp: params.warp.map(|w| {
                DomainWarp::with_offsets(&field, WARP_X_OFFSET, WARP_Y_OFFSET, w.size, w.strength)
            }),
            ridge: field.channel(0),
            distortion: field.channel(2),
            detail: field.channel(1),
        }
    }
}

impl ShapeFunction for MountainsShape {
    fn height(&self, x: usize, y: usize) -> f32 {
        let (nx, ny) = normalize_unit(x, y, self.width, self.height);
        let (wx, wy) = match &self.warp {
            Some(warp) => warp.displace(nx, ny),
            None => (nx, ny),
        };
        let (wx, wy) = (wx as f64, wy as f64);

        // Anisotropic ridge: stretched along y so ranges run as lines,
        // not blobs.
        let mut ridge = self.ridge.sample(wx * 5.0, wy * 0.5).abs() * 0.8;
        ridge += self.distortion.sample(wx * 2.0, wy * 2.0) * 0.3;
        let detail = self.detail.sample(wx * 20.0, wy * 20.0) * 0.2;
        let combined = ridge + detail;

        // Diamond-shaped falloff keeps the border low.
        let edge_falloff = 1.0 - ((nx - 0.5).abs() + (ny - 0.5).abs()).clamp(0.0, 1.0);

        (combined * edge_falloff).max(BASELINE).clamp(0.0, 1.0)
    }
}
