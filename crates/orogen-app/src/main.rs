//! The `orogen` binary: parse CLI, load config, run the generation
//! pipeline, export the artifacts.

use std::path::PathBuf;

use clap::Parser;
use orogen_config::{CliArgs, Config, ConfigError};
use orogen_export::{ExportError, ExportSettings, SplatPalette};
use orogen_pipeline::{PipelineError, TerrainPipeline};
use tracing::{error, info};

/// Anything that can end a run early.
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("generation failed during {stage}: {0}", stage = .0.stage())]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
}

fn main() {
    let args = CliArgs::parse();
    if let Err(err) = run(&args) {
        error!("{err}");
        eprintln!("orogen: {err}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    let config_dir = resolve_config_dir(args)?;
    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(args);
    config.validate()?;

    orogen_log::init_logging(Some(&config));

    let pipeline = TerrainPipeline::new(config.pipeline_settings());
    let output = pipeline.run()?;

    let written = orogen_export::export(
        &export_settings(&config),
        &output.heights,
        &output.splat,
    )?;
    for path in &written {
        info!(path = %path.display(), "wrote artifact");
        println!("{}", path.display());
    }
    Ok(())
}

/// Explicit `--config` directory, or the OS config location.
fn resolve_config_dir(args: &CliArgs) -> Result<PathBuf, AppError> {
    if let Some(dir) = &args.config {
        return Ok(dir.clone());
    }
    dirs::config_dir()
        .map(|base| base.join("orogen"))
        .ok_or(AppError::NoConfigDir)
}

/// Map the export section of the config onto exporter settings. The file
/// stem records the shape plus which optional stages ran.
fn export_settings(config: &Config) -> ExportSettings {
    ExportSettings {
        output_dir: config.export.output_dir.clone(),
        base_name: config.terrain.shape.name().to_string(),
        warp_suffix: config.warp.enabled,
        erosion_suffix: config.erosion.enabled,
        orientation: config.export.orientation,
        raw_heightmap: config.export.raw_heightmap,
        heightmap_png: config.export.heightmap_png,
        splat_png: config.export.splat_png,
        raw_splat: config.export.raw_splat,
        palette: SplatPalette::new(config.splat.palette.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orogen_shapes::ShapeKind;

    #[test]
    fn test_export_settings_follow_config() {
        let mut config = Config::default();
        config.terrain.shape = ShapeKind::Volcano;
        config.warp.enabled = true;
        config.erosion.enabled = true;
        let settings = export_settings(&config);
        assert_eq!(settings.file_stem(), "volcano_warp_erosion");
        assert_eq!(settings.palette.len(), 6);
    }

    #[test]
    fn test_explicit_config_dir_wins() {
        let args = CliArgs::try_parse_from(["orogen", "--config", "/tmp/orogen-test"]).unwrap();
        let dir = resolve_config_dir(&args).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/orogen-test"));
    }
}
