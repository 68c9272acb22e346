//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use orogen_grid::Orientation;
use orogen_pipeline::{
    ErosionParams, PipelineSettings, RiverSettings, SplatPolicy, StackSettings, StagingParams,
    TurbulenceParams,
};
use orogen_shapes::{ShapeKind, WarpSettings};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base terrain settings.
    pub terrain: TerrainConfig,
    /// Domain warping.
    pub warp: WarpConfig,
    /// Octave stacking.
    pub stacking: StackingConfig,
    /// Hydraulic erosion.
    pub erosion: ErosionConfig,
    /// River carving.
    pub rivers: RiverConfig,
    /// Staging-area flattening.
    pub staging: StagingConfig,
    /// Splatmap derivation.
    pub splat: SplatConfig,
    /// Export artifacts and orientation.
    pub export: ExportConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Base terrain settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Square grid side length in cells. Conventionally one of 512, 1024,
    /// 2048, 4096, 8192; any positive size is accepted.
    pub dimension: usize,
    /// Run seed.
    pub seed: i64,
    /// Terrain shape family.
    pub shape: ShapeKind,
    /// Target maximum height after rescaling (0.1 - 1.0).
    pub max_height: f32,
    /// Box-blur passes (0 - 20).
    pub smoothing_passes: usize,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            dimension: 512,
            seed: 1234567890,
            shape: ShapeKind::Island,
            max_height: 0.5,
            smoothing_passes: 10,
        }
    }
}

/// Domain warping settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WarpConfig {
    /// Whether shape sampling displaces its coordinates.
    pub enabled: bool,
    /// Displacement field scale (0.1 - 1.0).
    pub size: f32,
    /// Displacement amplitude (0.1 - 1.0).
    pub strength: f32,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 0.25,
            strength: 0.15,
        }
    }
}

/// Octave stacking settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StackingConfig {
    /// Whether the octave-stacked generator runs instead of plain shape
    /// evaluation.
    pub enabled: bool,
    /// Octave parameters (layer count 1 - 25).
    pub settings: StackSettings,
}

impl Default for StackingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            settings: StackSettings::default(),
        }
    }
}

/// Hydraulic erosion settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ErosionConfig {
    /// Whether the erosion stage runs.
    pub enabled: bool,
    /// Hydraulic model parameters.
    pub params: ErosionParams,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            params: ErosionParams::default(),
        }
    }
}

/// River carving settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiverConfig {
    /// Whether the carving stage runs.
    pub enabled: bool,
    /// Which carver runs and with what parameters.
    pub settings: RiverSettings,
}

impl Default for RiverConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            settings: RiverSettings::Turbulence(TurbulenceParams::default()),
        }
    }
}

/// Staging-area settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StagingConfig {
    /// Whether the flattening stage runs.
    pub enabled: bool,
    /// Plateau placement and size.
    pub params: StagingParams,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            params: StagingParams::default(),
        }
    }
}

/// Splatmap settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SplatConfig {
    /// Ascending height thresholds, one per material layer.
    pub thresholds: Vec<f32>,
    /// Layer assignment policy.
    pub policy: SplatPolicy,
    /// Preview color per layer (RGBA), bottom layer first.
    pub palette: Vec<[u8; 4]>,
}

impl Default for SplatConfig {
    fn default() -> Self {
        Self {
            thresholds: vec![0.0, 0.2, 0.4, 0.5, 0.65, 0.8],
            policy: SplatPolicy::Discrete,
            palette: vec![
                [0, 255, 255, 255],
                [255, 0, 0, 255],
                [255, 255, 0, 255],
                [0, 255, 0, 255],
                [255, 255, 255, 255],
                [255, 0, 255, 255],
            ],
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory receiving export artifacts.
    pub output_dir: PathBuf,
    /// Write the 16-bit raw heightmap.
    pub raw_heightmap: bool,
    /// Write the grayscale heightmap PNG.
    pub heightmap_png: bool,
    /// Write the palette-mapped splat PNG.
    pub splat_png: bool,
    /// Write the raw f32 splat stream.
    pub raw_splat: bool,
    /// Rotation/mirror applied to every artifact.
    pub orientation: Orientation,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            raw_heightmap: true,
            heightmap_png: true,
            splat_png: true,
            raw_splat: false,
            orientation: Orientation::default(),
        }
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Optional log file path; console-only when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

// --- Load / Save / Validate ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("orogen.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `orogen.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("orogen.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Check every setting against its documented range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(
            ok: bool,
            field: &'static str,
            reason: impl Into<String>,
        ) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange {
                    field,
                    reason: reason.into(),
                })
            }
        }

        let t = &self.terrain;
        check(t.dimension > 0, "terrain.dimension", "must be positive")?;
        check(
            (0.1..=1.0).contains(&t.max_height),
            "terrain.max_height",
            format!("{} outside 0.1..=1.0", t.max_height),
        )?;
        check(
            t.smoothing_passes <= 20,
            "terrain.smoothing_passes",
            format!("{} exceeds 20", t.smoothing_passes),
        )?;
        if self.warp.enabled {
            check(
                (0.1..=1.0).contains(&self.warp.size),
                "warp.size",
                format!("{} outside 0.1..=1.0", self.warp.size),
            )?;
            check(
                (0.1..=1.0).contains(&self.warp.strength),
                "warp.strength",
                format!("{} outside 0.1..=1.0", self.warp.strength),
            )?;
        }
        if self.stacking.enabled {
            check(
                (1..=25).contains(&self.stacking.settings.layers),
                "stacking.settings.layers",
                format!("{} outside 1..=25", self.stacking.settings.layers),
            )?;
        }
        if self.erosion.enabled {
            check(
                (1..=500).contains(&self.erosion.params.iterations),
                "erosion.params.iterations",
                format!("{} outside 1..=500", self.erosion.params.iterations),
            )?;
        }
        check(
            !self.splat.thresholds.is_empty(),
            "splat.thresholds",
            "must not be empty",
        )?;
        check(
            self.splat.thresholds.windows(2).all(|p| p[0] <= p[1]),
            "splat.thresholds",
            "must be ascending",
        )?;
        check(
            self.splat.palette.len() >= self.splat.thresholds.len(),
            "splat.palette",
            format!(
                "{} colors for {} thresholds",
                self.splat.palette.len(),
                self.splat.thresholds.len()
            ),
        )?;
        Ok(())
    }

    /// Assemble the settings bundle one generation run consumes.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            width: self.terrain.dimension,
            height: self.terrain.dimension,
            seed: self.terrain.seed,
            shape: self.terrain.shape,
            warp: self.warp.enabled.then_some(WarpSettings {
                size: self.warp.size,
                strength: self.warp.strength,
            }),
            max_height: self.terrain.max_height,
            smoothing_passes: self.terrain.smoothing_passes,
            stacking: self.stacking.enabled.then_some(self.stacking.settings),
            erosion: self.erosion.enabled.then_some(self.erosion.params),
            rivers: self.rivers.enabled.then_some(self.rivers.settings),
            staging: self.staging.enabled.then_some(self.staging.params),
            thresholds: self.splat.thresholds.clone(),
            splat_policy: self.splat.policy,
        }
    }
}
