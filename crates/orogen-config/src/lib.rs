//! Configuration for the orogen terrain tool.
//!
//! Settings persist to disk as RON, carry documented numeric ranges with
//! validation, and accept CLI overrides via clap. One [`Config`] assembles
//! the immutable settings bundle a generation run consumes.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, ErosionConfig, ExportConfig, RiverConfig, SplatConfig, StackingConfig,
    StagingConfig, TerrainConfig, WarpConfig,
};
pub use error::ConfigError;
