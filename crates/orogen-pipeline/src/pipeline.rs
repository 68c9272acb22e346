//! The generation run: base grid, optional erosion / carving / flattening,
//! then splatmap derivation.
//!
//! A run owns its grids exclusively; a failed stage returns its error
//! without producing any output, so a caller holding a previous run's
//! result keeps it untouched.

use std::time::Instant;

use orogen_grid::{HeightGrid, SplatGrid, to_u16};
use orogen_shapes::{ShapeKind, ShapeParams, WarpSettings};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::erosion::{self, ErosionParams};
use crate::error::PipelineError;
use crate::generator::{self, StackSettings};
use crate::rivers::{self, RiverSettings};
use crate::splat::{self, SplatPolicy};
use crate::staging::{self, StagingParams};

/// Everything one generation run consumes. Built once per run, never
/// mutated mid-run; no stage reads ambient state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Run seed; every stochastic step derives from it.
    pub seed: i64,
    /// Base terrain family.
    pub shape: ShapeKind,
    /// Domain warping, or `None` to sample undisplaced coordinates.
    pub warp: Option<WarpSettings>,
    /// Target maximum height after rescaling, `0.1..=1.0`.
    pub max_height: f32,
    /// Box-blur passes applied after generation, `0..=20`.
    pub smoothing_passes: usize,
    /// Octave stacking; `None` evaluates the shape directly.
    pub stacking: Option<StackSettings>,
    /// Hydraulic erosion; `None` skips the stage.
    pub erosion: Option<ErosionParams>,
    /// River carving; `None` skips the stage.
    pub rivers: Option<RiverSettings>,
    /// Staging-area flattening; `None` skips the stage.
    pub staging: Option<StagingParams>,
    /// Ascending splat thresholds in `[0, 1]`.
    pub thresholds: Vec<f32>,
    /// Layer assignment policy.
    pub splat_policy: SplatPolicy,
}

/// The grids a successful run produces.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutput {
    /// Final terrain heights, `[0, max_height]` modulo carving overlays.
    pub heights: HeightGrid,
    /// Material-layer coordinates derived from the final heights.
    pub splat: SplatGrid,
}

impl PipelineOutput {
    /// The final heightmap as 16-bit samples plus dimensions, for a
    /// consuming terrain system to upload into its own storage.
    pub fn heightmap_u16(&self) -> (Vec<u16>, usize, usize) {
        (
            to_u16(&self.heights),
            self.heights.width(),
            self.heights.height(),
        )
    }
}

/// Orchestrates one generation run per [`PipelineSettings`].
pub struct TerrainPipeline {
    settings: PipelineSettings,
}

impl TerrainPipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        Self { settings }
    }

    /// The settings this pipeline runs with.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Run the full pipeline.
    ///
    /// Stages run in a fixed order: generation, erosion, carving,
    /// flattening, splat. The first failing stage aborts the run.
    pub fn run(&self) -> Result<PipelineOutput, PipelineError> {
        let s = &self.settings;
        info!(
            shape = %s.shape,
            width = s.width,
            height = s.height,
            seed = s.seed,
            "starting generation run"
        );

        let run_start = Instant::now();
        let mut heights = self.timed("generation", || self.generate_base())?;

        if let Some(params) = &s.erosion {
            self.timed("erosion", || {
                erosion::erode(&mut heights, params);
                Ok(())
            })?;
        }
        if let Some(settings) = &s.rivers {
            self.timed("carving", || rivers::carve(&mut heights, s.seed, settings))?;
        }
        if let Some(params) = &s.staging {
            self.timed("flattening", || {
                staging::flatten(&mut heights, params);
                Ok(())
            })?;
        }

        let splat = self.timed("splat", || {
            splat::splatmap(&heights, &s.thresholds, s.max_height, s.splat_policy)
        })?;

        info!(
            elapsed_ms = run_start.elapsed().as_millis() as u64,
            "generation run complete"
        );
        Ok(PipelineOutput { heights, splat })
    }

    fn generate_base(&self) -> Result<HeightGrid, PipelineError> {
        let s = &self.settings;
        let shape = s.shape.build(&ShapeParams {
            width: s.width,
            height: s.height,
            seed: s.seed,
            warp: s.warp,
        });
        match &s.stacking {
            Some(stack) => generator::generate_stacked(
                s.width,
                s.height,
                s.seed,
                stack,
                shape.as_ref(),
                s.max_height,
                s.smoothing_passes,
            ),
            None => generator::generate(
                s.width,
                s.height,
                shape.as_ref(),
                s.max_height,
                s.smoothing_passes,
            ),
        }
    }

    /// Run one stage with a timing event.
    fn timed<T>(
        &self,
        stage: &'static str,
        f: impl FnOnce() -> Result<T, PipelineError>,
    ) -> Result<T, PipelineError> {
        let start = Instant::now();
        let result = f();
        match &result {
            Ok(_) => debug!(
                stage,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "stage complete"
            ),
            Err(err) => info!(stage, error = %err, "stage failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> PipelineSettings {
        PipelineSettings {
            width: 64,
            height: 64,
            seed: 1234567890,
            shape: ShapeKind::Island,
            warp: Some(WarpSettings {
                size: 0.25,
                strength: 0.15,
            }),
            max_height: 0.5,
            smoothing_passes: 2,
            stacking: None,
            erosion: None,
            rivers: None,
            staging: None,
            thresholds: vec![0.0, 0.2, 0.4, 0.5, 0.65, 0.8],
            splat_policy: SplatPolicy::Discrete,
        }
    }

    #[test]
    fn test_full_run_produces_matching_grids() {
        let output = TerrainPipeline::new(settings()).run().expect("run");
        assert_eq!(output.heights.width(), 64);
        assert_eq!(output.splat.width(), 64);
        assert!(output.heights.max_value() <= 0.5 + 1e-5);
        assert!(output.heights.min_value() >= 0.0);
    }

    #[test]
    fn test_runs_are_deterministic() {
        let a = TerrainPipeline::new(settings()).run().expect("run");
        let b = TerrainPipeline::new(settings()).run().expect("run");
        assert_eq!(a.heights, b.heights, "height grids diverged across runs");
        assert_eq!(a.splat, b.splat, "splat grids diverged across runs");
    }

    #[test]
    fn test_all_stages_together() {
        let mut s = settings();
        s.erosion = Some(ErosionParams {
            iterations: 10,
            ..ErosionParams::default()
        });
        s.rivers = Some(RiverSettings::Turbulence(Default::default()));
        s.staging = Some(StagingParams {
            size: 8,
            height: 0.2,
            center_x: 0.5,
            center_y: 0.5,
        });
        let output = TerrainPipeline::new(s).run().expect("run");
        assert!(output.heights.min_value() >= 0.0);
    }

    #[test]
    fn test_failed_stage_reports_no_output() {
        let mut s = settings();
        s.thresholds = vec![];
        let err = TerrainPipeline::new(s).run().unwrap_err();
        assert!(
            matches!(err, PipelineError::InvalidThresholds { .. }),
            "expected InvalidThresholds, got {err}"
        );
    }

    #[test]
    fn test_heightmap_u16_surface() {
        let output = TerrainPipeline::new(settings()).run().expect("run");
        let (samples, width, height) = output.heightmap_u16();
        assert_eq!(samples.len(), width * height);
        assert_eq!((width, height), (64, 64));
    }
}
