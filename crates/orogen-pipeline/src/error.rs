//! Failure taxonomy for a generation run.
//!
//! Every variant is fatal to the run that raised it: the pipeline aborts
//! before any export happens and the caller keeps whatever grid it had from
//! the previous successful run. Errors name the stage that failed so a
//! report can say which pass went wrong.

/// Pipeline stage names, carried on errors and in log events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Base heightmap evaluation and rescaling.
    Generation,
    /// Hydraulic erosion.
    Erosion,
    /// River carving (either variant).
    Carving,
    /// Staging-area flattening.
    Flattening,
    /// Splatmap derivation.
    Splat,
}

impl Stage {
    /// Stable lowercase stage name, used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Generation => "generation",
            Stage::Erosion => "erosion",
            Stage::Carving => "carving",
            Stage::Flattening => "flattening",
            Stage::Splat => "splat",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors raised by pipeline stages.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The evaluated field never rose above zero, so rescaling to the target
    /// maximum would divide by a non-positive number.
    #[error("{stage} produced a non-positive maximum ({actual_max}); cannot rescale to target height")]
    DegenerateInput {
        /// Stage that performed the rescale.
        stage: Stage,
        /// The maximum value actually achieved across the grid.
        actual_max: f32,
    },

    /// Width or height was zero.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        width: usize,
        height: usize,
    },

    /// The threshold set cannot support the requested splat policy.
    #[error("invalid splat thresholds: {reason}")]
    InvalidThresholds {
        reason: String,
    },

    /// The river start-point search exhausted its retry budget without
    /// finding a cell above the required elevation.
    #[error(
        "river start search gave up after {attempts} attempts; no cell above {min_height}"
    )]
    UnboundedSearch {
        attempts: usize,
        min_height: f32,
    },
}

impl PipelineError {
    /// The stage this error aborted.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::DegenerateInput { stage, .. } => *stage,
            PipelineError::InvalidDimensions { .. } => Stage::Generation,
            PipelineError::InvalidThresholds { .. } => Stage::Splat,
            PipelineError::UnboundedSearch { .. } => Stage::Carving,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_report_their_stage() {
        let err = PipelineError::DegenerateInput {
            stage: Stage::Generation,
            actual_max: -0.5,
        };
        assert_eq!(err.stage(), Stage::Generation);

        let err = PipelineError::UnboundedSearch {
            attempts: 4096,
            min_height: 0.5,
        };
        assert_eq!(err.stage(), Stage::Carving);
    }

    #[test]
    fn test_messages_name_the_stage() {
        let err = PipelineError::DegenerateInput {
            stage: Stage::Erosion,
            actual_max: 0.0,
        };
        let message = err.to_string();
        assert!(message.contains("erosion"), "message was: {message}");
    }
}
