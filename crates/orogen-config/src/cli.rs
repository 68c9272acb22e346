//! Command-line argument parsing for the orogen terrain tool.

use std::path::PathBuf;

use clap::Parser;
use orogen_shapes::ShapeKind;

use crate::Config;

/// Orogen command-line arguments.
///
/// CLI values override settings loaded from `orogen.ron`.
#[derive(Parser, Debug)]
#[command(name = "orogen", about = "Procedural terrain heightmap and splatmap generator")]
pub struct CliArgs {
    /// Square grid side length in cells.
    #[arg(long)]
    pub dimension: Option<usize>,

    /// Run seed.
    #[arg(long)]
    pub seed: Option<i64>,

    /// Terrain shape family (island, mountains, volcano, hills, plateau,
    /// sea_bed, craters, shards).
    #[arg(long)]
    pub shape: Option<ShapeKind>,

    /// Target maximum height after rescaling.
    #[arg(long)]
    pub max_height: Option<f32>,

    /// Box-blur passes.
    #[arg(long)]
    pub smoothing: Option<usize>,

    /// Enable or disable domain warping.
    #[arg(long)]
    pub warp: Option<bool>,

    /// Enable or disable octave stacking.
    #[arg(long)]
    pub stacking: Option<bool>,

    /// Enable or disable hydraulic erosion.
    #[arg(long)]
    pub erosion: Option<bool>,

    /// Enable or disable river carving.
    #[arg(long)]
    pub rivers: Option<bool>,

    /// Enable or disable staging-area flattening.
    #[arg(long)]
    pub staging: Option<bool>,

    /// Directory receiving export artifacts.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(dimension) = args.dimension {
            self.terrain.dimension = dimension;
        }
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        if let Some(shape) = args.shape {
            self.terrain.shape = shape;
        }
        if let Some(max_height) = args.max_height {
            self.terrain.max_height = max_height;
        }
        if let Some(smoothing) = args.smoothing {
            self.terrain.smoothing_passes = smoothing;
        }
        if let Some(warp) = args.warp {
            self.warp.enabled = warp;
        }
        if let Some(stacking) = args.stacking {
            self.stacking.enabled = stacking;
        }
        if let Some(erosion) = args.erosion {
            self.erosion.enabled = erosion;
        }
        if let Some(rivers) = args.rivers {
            self.rivers.enabled = rivers;
        }
        if let Some(staging) = args.staging {
            self.staging.enabled = staging;
        }
        if let Some(ref output_dir) = args.output_dir {
            self.export.output_dir = output_dir.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> CliArgs {
        CliArgs {
            dimension: None,
            seed: None,
            shape: None,
            max_height: None,
            smoothing: None,
            warp: None,
            stacking: None,
            erosion: None,
            rivers: None,
            staging: None,
            output_dir: None,
            log_level: None,
            config: None,
        }
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            dimension: Some(1024),
            shape: Some(ShapeKind::Mountains),
            erosion: Some(true),
            ..empty_args()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.terrain.dimension, 1024);
        assert_eq!(config.terrain.shape, ShapeKind::Mountains);
        assert!(config.erosion.enabled);
        // Non-overridden fields retain defaults
        assert_eq!(config.terrain.seed, 1234567890);
        assert_eq!(config.terrain.max_height, 0.5);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&empty_args());
        assert_eq!(config, original);
    }

    #[test]
    fn test_shape_parses_from_cli_string() {
        let args = CliArgs::try_parse_from(["orogen", "--shape", "sea_bed"]).unwrap();
        assert_eq!(args.shape, Some(ShapeKind::SeaBed));
        assert!(CliArgs::try_parse_from(["orogen", "--shape", "ocean"]).is_err());
    }
}
