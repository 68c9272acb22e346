//! Raster export: the final grids serialized as a 16-bit raw stream and
//! PNG previews.
//!
//! All artifacts share one orientation transform and one file stem, so the
//! raw file, the grayscale preview, and the splat preview always agree on
//! layout and naming. File names follow the
//! `<shape>[_warp][_erosion]_<kind>` scheme.

mod palette;

pub use palette::SplatPalette;

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, Rgba, RgbaImage};
use orogen_grid::{HeightGrid, Orientation, SplatGrid, splat_to_raw_bytes, to_raw_bytes};
use tracing::info;

/// Errors from writing export artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write export file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Which artifacts to write and where.
#[derive(Clone, Debug)]
pub struct ExportSettings {
    /// Directory receiving all artifacts; created if missing.
    pub output_dir: PathBuf,
    /// File stem base, conventionally the shape name.
    pub base_name: String,
    /// Append `_warp` to the stem (domain warping was on).
    pub warp_suffix: bool,
    /// Append `_erosion` to the stem (erosion ran).
    pub erosion_suffix: bool,
    /// Rotation/mirror applied to every artifact before serialization.
    pub orientation: Orientation,
    /// Write the 16-bit little-endian raw heightmap.
    pub raw_heightmap: bool,
    /// Write the grayscale heightmap PNG.
    pub heightmap_png: bool,
    /// Write the palette-mapped splat PNG.
    pub splat_png: bool,
    /// Write the raw little-endian f32 splat stream.
    pub raw_splat: bool,
    /// Layer colors for the splat PNG.
    pub palette: SplatPalette,
}

impl ExportSettings {
    /// Settings that write every artifact for `base_name` into `output_dir`.
    pub fn all_artifacts(output_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_name: base_name.into(),
            warp_suffix: false,
            erosion_suffix: false,
            orientation: Orientation::default(),
            raw_heightmap: true,
            heightmap_png: true,
            splat_png: true,
            raw_splat: true,
            palette: SplatPalette::default(),
        }
    }

    /// The shared file stem, suffixes included.
    pub fn file_stem(&self) -> String {
        let mut stem = self.base_name.clone();
        if self.warp_suffix {
            stem.push_str("_warp");
        }
        if self.erosion_suffix {
            stem.push_str("_erosion");
        }
        stem
    }

    fn artifact_path(&self, kind: &str, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{kind}.{extension}", self.file_stem()))
    }
}

/// Write the selected artifacts. Returns the paths written.
///
/// The orientation transform is applied once to each grid up front; a
/// quarter or three-quarter rotation swaps width and height in every
/// artifact consistently.
pub fn export(
    settings: &ExportSettings,
    heights: &HeightGrid,
    splat: &SplatGrid,
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(&settings.output_dir)?;

    let heights = settings.orientation.apply(heights);
    let splat = settings.orientation.apply(splat);
    let mut written = Vec::new();

    if settings.raw_heightmap {
        let path = settings.artifact_path("heightmap", "raw");
        fs::write(&path, to_raw_bytes(&heights))?;
        written.push(path);
    }
    if settings.heightmap_png {
        let path = settings.artifact_path("heightmap", "png");
        heightmap_image(&heights).save(&path)?;
        written.push(path);
    }
    if settings.splat_png {
        let path = settings.artifact_path("splatmap", "png");
        splat_image(&splat, &settings.palette).save(&path)?;
        written.push(path);
    }
    if settings.raw_splat {
        let path = settings.artifact_path("splatmap", "raw");
        fs::write(&path, splat_to_raw_bytes(&splat))?;
        written.push(path);
    }

    info!(
        stem = %settings.file_stem(),
        artifacts = written.len(),
        "export complete"
    );
    Ok(written)
}

/// Grayscale preview, intensity `clamp(height * 255, 0, 255)`.
pub fn heightmap_image(grid: &HeightGrid) -> GrayImage {
    GrayImage::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
        let value = grid.get(x as usize, y as usize);
        image::Luma([(value * 255.0).clamp(0.0, 255.0) as u8])
    })
}

/// Splat preview with each layer coordinate mapped through the palette.
pub fn splat_image(grid: &SplatGrid, palette: &SplatPalette) -> RgbaImage {
    RgbaImage::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
        Rgba(palette.color_for(grid.get(x as usize, y as usize)))
    })
}

/// Read a raw 16-bit heightmap back as a grid, for round-trip checks.
pub fn read_raw_heightmap(
    path: &Path,
    width: usize,
    height: usize,
) -> Result<HeightGrid, ExportError> {
    let bytes = fs::read(path)?;
    orogen_grid::raw_bytes_to_heights(&bytes, width, height)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use orogen_grid::{Grid, Rotation};

    fn ramp_grids(size: usize) -> (HeightGrid, SplatGrid) {
        let mut heights: HeightGrid = Grid::new(size, size, 0.0);
        for y in 0..size {
            for x in 0..size {
                heights.set(x, y, x as f32 / size as f32);
            }
        }
        let splat: SplatGrid = Grid::new(size, size, 1.0);
        (heights, splat)
    }

    #[test]
    fn test_all_artifacts_written() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = ExportSettings::all_artifacts(dir.path(), "island");
        let (heights, splat) = ramp_grids(16);
        let written = export(&settings, &heights, &splat).expect("export");
        assert_eq!(written.len(), 4);
        for path in &written {
            assert!(path.exists(), "missing artifact {}", path.display());
        }
    }

    #[test]
    fn test_file_stem_suffixes() {
        let mut settings = ExportSettings::all_artifacts("/tmp", "volcano");
        assert_eq!(settings.file_stem(), "volcano");
        settings.warp_suffix = true;
        assert_eq!(settings.file_stem(), "volcano_warp");
        settings.erosion_suffix = true;
        assert_eq!(settings.file_stem(), "volcano_warp_erosion");
    }

    #[test]
    fn test_raw_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut settings = ExportSettings::all_artifacts(dir.path(), "hills");
        settings.heightmap_png = false;
        settings.splat_png = false;
        settings.raw_splat = false;
        let heights: HeightGrid = Grid::new(8, 8, 0.5);
        let splat: SplatGrid = Grid::new(8, 8, 0.0);
        let written = export(&settings, &heights, &splat).expect("export");

        let decoded = read_raw_heightmap(&written[0], 8, 8).expect("decode");
        for (&a, &b) in decoded.as_slice().iter().zip(heights.as_slice()) {
            assert!((a - b).abs() <= 1.0 / 65535.0, "round trip drifted: {a} vs {b}");
        }
    }

    #[test]
    fn test_quarter_rotation_swaps_png_dimensions() {
        let mut heights: HeightGrid = Grid::new(6, 4, 0.2);
        heights.set(0, 0, 1.0);
        let mut settings = ExportSettings::all_artifacts("/tmp", "x");
        settings.orientation = Orientation {
            rotation: Rotation::Quarter,
            mirror_x: false,
            mirror_y: false,
        };
        let rotated = settings.orientation.apply(&heights);
        let img = heightmap_image(&rotated);
        assert_eq!((img.width(), img.height()), (4, 6));
    }

    #[test]
    fn test_grayscale_intensity_clamps() {
        let grid = Grid::from_vec(2, 1, vec![1.5f32, -0.5]);
        let img = heightmap_image(&grid);
        assert_eq!(img.get_pixel(0, 0).0, [255]);
        assert_eq!(img.get_pixel(1, 0).0, [0]);
    }

    #[test]
    fn test_splat_png_uses_palette_colors() {
        let grid: SplatGrid = Grid::new(2, 2, 1.0);
        let img = splat_image(&grid, &SplatPalette::default());
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255], "layer 1 is red");
    }
}
