//! The terrain generation pipeline: base heightmap evaluation, smoothing,
//! hydraulic erosion, river carving, staging-area flattening, and splatmap
//! derivation, orchestrated by [`TerrainPipeline`].
//!
//! Every stage is deterministic under the run seed. Cell-independent passes
//! are parallelized over disjoint row blocks; erosion iterations and river
//! path tracing are inherently sequential and stay that way.

mod erosion;
mod error;
mod generator;
mod pipeline;
mod rivers;
mod smooth;
mod splat;
mod staging;

pub use erosion::{ErosionParams, erode};
pub use error::{PipelineError, Stage};
pub use generator::{StackSettings, generate, generate_stacked};
pub use pipeline::{PipelineOutput, PipelineSettings, TerrainPipeline};
pub use rivers::{PathTracerParams, RiverSettings, TurbulenceParams, carve, carve_paths, carve_turbulence};
pub use smooth::smooth;
pub use splat::{SplatPolicy, splatmap};
pub use staging::{StagingParams, flatten};
