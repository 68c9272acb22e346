//! Base terrain profiles: a closed registry of pure shape functions.
//!
//! Each family maps a grid cell to a height in roughly `[0, 1]`, composing
//! coherent-noise channels with closed-form geometry (radial falloff, edge
//! distance, rim bands). Shapes are built once per generation run with their
//! noise channels precomputed, then sampled per cell with no shared mutable
//! state, so samplers can be shared freely across worker threads.
//!
//! Dispatch is a static enumeration ([`ShapeKind`]) rather than any runtime
//! name lookup; the shape set is enumerable and each sampler is testable in
//! isolation.

use serde::{Deserialize, Serialize};

mod craters;
mod hills;
mod island;
mod mountains;
mod plateau;
mod sea;
mod shards;
mod volcano;

pub use craters::CraterFieldShape;
pub use hills::HillsShape;
pub use island::IslandShape;
pub use mountains::MountainsShape;
pub use plateau::PlateauShape;
pub use sea::SeaBedShape;
pub use shards::ShardsShape;
pub use volcano::VolcanoShape;

/// A pure per-cell height profile in roughly `[0, 1]`.
///
/// Implementations hold only immutable state; `height` may be called from
/// any thread in any order.
pub trait ShapeFunction: Send + Sync {
    /// Height at cell `(x, y)`.
    fn height(&self, x: usize, y: usize) -> f32;
}

/// Domain-warp settings shared by all shape families.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WarpSettings {
    /// Spatial scale of the displacement field, `0.1..=1.0`.
    pub size: f32,
    /// Displacement amplitude in normalized coordinates, `0.1..=1.0`.
    pub strength: f32,
}

/// Inputs every shape sampler is built from.
#[derive(Clone, Copy, Debug)]
pub struct ShapeParams {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Run seed; each family derives its own channels from it.
    pub seed: i64,
    /// Domain warping, or `None` to sample undisplaced coordinates.
    pub warp: Option<WarpSettings>,
}

/// The closed set of terrain shape families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Radial island with a beach taper band.
    Island,
    /// Ridged mountain range with edge falloff.
    Mountains,
    /// Central crater, uneven rim, outer slope.
    Volcano,
    /// Broad rolling hills with flat regions.
    Hills,
    /// Rectangular flat top with perturbed slopes and cut-ins.
    Plateau,
    /// Rippled sea floor.
    SeaBed,
    /// Field of impact craters, later craters drawn on top.
    Craters,
    /// Voronoi shard plates separated by cracks.
    Shards,
}

impl ShapeKind {
    /// Every shape family, for enumeration in tests and CLIs.
    pub const ALL: [ShapeKind; 8] = [
        ShapeKind::Island,
        ShapeKind::Mountains,
        ShapeKind::Volcano,
        ShapeKind::Hills,
        ShapeKind::Plateau,
        ShapeKind::SeaBed,
        ShapeKind::Craters,
        ShapeKind::Shards,
    ];

    /// Stable lowercase name, used in config files and export file names.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Island => "island",
            ShapeKind::Mountains => "mountains",
            ShapeKind::Volcano => "volcano",
            ShapeKind::Hills => "hills",
            ShapeKind::Plateau => "plateau",
            ShapeKind::SeaBed => "sea_bed",
            ShapeKind::Craters => "craters",
            ShapeKind::Shards => "shards",
        }
    }

    /// Build the sampler for this family.
    pub fn build(&self, params: &ShapeParams) -> Box<dyn ShapeFunction> {
        match self {
            ShapeKind::Island => Box::new(IslandShape::new(params)),
            ShapeKind::Mountains => Box::new(MountainsShape::new(params)),
            ShapeKind::Volcano => Box::new(VolcanoShape::new(params)),
            ShapeKind::Hills => Box::new(HillsShape::new(params)),
            ShapeKind::Plateau => Box::new(PlateauShape::new(params)),
            ShapeKind::SeaBed => Box::new(SeaBedShape::new(params)),
            ShapeKind::Craters => Box::new(CraterFieldShape::new(params)),
            ShapeKind::Shards => Box::new(ShardsShape::new(params)),
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error from parsing an unknown shape name.
#[derive(Debug, thiserror::Error)]
#[error("unknown shape '{0}', expected one of: island, mountains, volcano, hills, plateau, sea_bed, craters, shards")]
pub struct UnknownShape(String);

impl std::str::FromStr for ShapeKind {
    type Err = UnknownShape;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownShape(s.to_string()))
    }
}

/// Normalize a cell coordinate to `[-1, 1]` (signed, center at 0).
#[inline]
pub(crate) fn normalize_signed(x: usize, y: usize, width: usize, height: usize) -> (f32, f32) {
    let nx = (x as f32 / width as f32) * 2.0 - 1.0;
    let ny = (y as f32 / height as f32) * 2.0 - 1.0;
    (nx, ny)
}

/// Normalize a cell coordinate to `[0, 1]`.
#[inline]
pub(crate) fn normalize_unit(x: usize, y: usize, width: usize, height: usize) -> (f32, f32) {
    (x as f32 / width as f32, y as f32 / height as f32)
}
