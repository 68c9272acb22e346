//! Base heightmap evaluation: per-cell shape sampling with rescaling to a
//! target maximum, plus the stacked-octave variant that masks layered noise
//! through the shape.
//!
//! Cell evaluation is embarrassingly parallel, so both variants partition
//! the grid into disjoint row blocks and fill them from scoped worker
//! threads. Each worker tracks its own extrema and the partitions are merged
//! after join, so no per-cell synchronization is needed.

use orogen_grid::{Grid, HeightGrid};
use orogen_noise::NoiseField;
use orogen_shapes::ShapeFunction;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Stage};
use crate::smooth;

/// Exponent applied to the shape mask in the stacked variant. Sharpened
/// slightly past linear so the shape dominates where it is strong.
const SHAPE_EXPONENT: f32 = 1.2;

/// Range of the per-layer sample offsets drawn for octave decorrelation.
const LAYER_OFFSET_RANGE: std::ops::Range<f64> = -1000.0..1000.0;

/// Octave stacking controls for [`generate_stacked`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StackSettings {
    /// Number of octaves summed per cell, `1..=25`.
    pub layers: u32,
    /// Frequency of the first octave.
    pub initial_frequency: f32,
    /// Per-octave frequency multiplier.
    pub frequency_multiplier: f32,
    /// Amplitude of the first octave.
    pub initial_amplitude: f32,
    /// Per-octave amplitude multiplier.
    pub amplitude_multiplier: f32,
    /// Horizontal stretch factor; clamped to `[0.01, 1.0]` before use so a
    /// zero never reaches the frequency divide.
    pub plane_scale: f32,
}

impl Default for StackSettings {
    fn default() -> Self {
        Self {
            layers: 5,
            initial_frequency: 1.5,
            frequency_multiplier: 2.0,
            initial_amplitude: 1.0,
            amplitude_multiplier: 0.5,
            plane_scale: 1.0,
        }
    }
}

/// Evaluate `shape` over every cell, rescale so the achieved maximum lands
/// on `max_height`, then smooth.
///
/// Fails with [`PipelineError::DegenerateInput`] when the shape never
/// produces a positive value, since the rescale would divide by a
/// non-positive maximum.
pub fn generate(
    width: usize,
    height: usize,
    shape: &dyn ShapeFunction,
    max_height: f32,
    smoothing_passes: usize,
) -> Result<HeightGrid, PipelineError> {
    check_dimensions(width, height)?;

    let mut data = vec![0.0f32; width * height];
    let (_, actual_max) = fill_rows(&mut data, width, |x, y| shape.height(x, y));

    rescale(&mut data, actual_max, max_height, Stage::Generation)?;

    let grid = Grid::from_vec(width, height, data);
    Ok(smooth::smooth(&grid, smoothing_passes))
}

/// Stacked-octave variant: sum `settings.layers` noise octaves per cell,
/// min-max normalize the field to `[0, 1]`, mask it by
/// `shape^`[`SHAPE_EXPONENT`], then rescale and smooth as [`generate`] does.
///
/// Per-layer sample offsets come from a ChaCha stream seeded by `seed`, so
/// the octave field is deterministic per run seed.
#[allow(clippy::too_many_arguments)]
pub fn generate_stacked(
    width: usize,
    height: usize,
    seed: i64,
    settings: &StackSettings,
    shape: &dyn ShapeFunction,
    max_height: f32,
    smoothing_passes: usize,
) -> Result<HeightGrid, PipelineError> {
    check_dimensions(width, height)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    let layers = settings.layers.max(1);
    let offsets: Vec<(f64, f64)> = (0..layers)
        .map(|_| {
            (
                rng.random_range(LAYER_OFFSET_RANGE),
                rng.random_range(LAYER_OFFSET_RANGE),
            )
        })
        .collect();

    let plane_scale = settings.plane_scale.clamp(0.01, 1.0);
    let channel = NoiseField::new(seed).channel(0);

    let mut data = vec![0.0f32; width * height];
    let (field_min, field_max) = fill_rows(&mut data, width, |x, y| {
        let nx = x as f64 / width as f64;
        let ny = y as f64 / height as f64;
        let mut sum = 0.0f32;
        for (layer, &(ox, oy)) in offsets.iter().enumerate() {
            let frequency = (settings.initial_frequency
                * settings.frequency_multiplier.powi(layer as i32)
                / plane_scale) as f64;
            let amplitude =
                settings.initial_amplitude * settings.amplitude_multiplier.powi(layer as i32);
            let sample = channel.sample(nx * frequency + ox, ny * frequency + oy);
            sum += sample.clamp(-1.0, 1.0) * amplitude;
        }
        sum
    });

    // Min-max normalize, then mask by the shape. A flat octave field
    // collapses to zero here and fails the rescale below.
    let range = field_max - field_min;
    let (_, masked_max) = map_rows(&mut data, width, |x, y, value| {
        let normalized = if range > f32::EPSILON {
            (value - field_min) / range
        } else {
            0.0
        };
        normalized * shape.height(x, y).powf(SHAPE_EXPONENT)
    });

    rescale(&mut data, masked_max, max_height, Stage::Generation)?;

    let grid = Grid::from_vec(width, height, data);
    Ok(smooth::smooth(&grid, smoothing_passes))
}

/// Reject zero-sized grids up front.
fn check_dimensions(width: usize, height: usize) -> Result<(), PipelineError> {
    if width == 0 || height == 0 {
        return Err(PipelineError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Multiply every cell by `max_height / actual_max`, failing loudly when the
/// achieved maximum is not positive.
fn rescale(
    data: &mut [f32],
    actual_max: f32,
    max_height: f32,
    stage: Stage,
) -> Result<(), PipelineError> {
    if actual_max <= 0.0 {
        return Err(PipelineError::DegenerateInput { stage, actual_max });
    }
    let scale = max_height / actual_max;
    for cell in data.iter_mut() {
        *cell *= scale;
    }
    Ok(())
}

/// Fill `data` (row-major, `width` cells per row) from `f(x, y)` using one
/// scoped worker per disjoint row block. Returns the global (min, max).
pub(crate) fn fill_rows<F>(data: &mut [f32], width: usize, f: F) -> (f32, f32)
where
    F: Fn(usize, usize) -> f32 + Sync,
{
    let rows = data.len() / width;
    let workers = num_cpus::get().clamp(1, rows.max(1));
    let rows_per_block = rows.div_ceil(workers).max(1);
    let f = &f;

    let mut global_min = f32::INFINITY;
    let mut global_max = f32::NEG_INFINITY;
    std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for (block, chunk) in data.chunks_mut(rows_per_block * width).enumerate() {
            let first_row = block * rows_per_block;
            handles.push(scope.spawn(move || {
                let mut local_min = f32::INFINITY;
                let mut local_max = f32::NEG_INFINITY;
                for (dy, row) in chunk.chunks_mut(width).enumerate() {
                    let y = first_row + dy;
                    for (x, cell) in row.iter_mut().enumerate() {
                        let value = f(x, y);
                        *cell = value;
                        local_min = local_min.min(value);
                        local_max = local_max.max(value);
                    }
                }
                (local_min, local_max)
            }));
        }
        for handle in handles {
            let (min, max) = handle.join().expect("row worker panicked");
            global_min = global_min.min(min);
            global_max = global_max.max(max);
        }
    });
    (global_min, global_max)
}

/// Rewrite every cell in place as `f(x, y, current)`, partitioned the same
/// way as [`fill_rows`]. Returns the global (min, max) of the new values.
pub(crate) fn map_rows<F>(data: &mut [f32], width: usize, f: F) -> (f32, f32)
where
    F: Fn(usize, usize, f32) -> f32 + Sync,
{
    let rows = data.len() / width;
    let workers = num_cpus::get().clamp(1, rows.max(1));
    let rows_per_block = rows.div_ceil(workers).max(1);
    let f = &f;

    let mut global_min = f32::INFINITY;
    let mut global_max = f32::NEG_INFINITY;
    std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for (block, chunk) in data.chunks_mut(rows_per_block * width).enumerate() {
            let first_row = block * rows_per_block;
            handles.push(scope.spawn(move || {
                let mut local_min = f32::INFINITY;
                let mut local_max = f32::NEG_INFINITY;
                for (dy, row) in chunk.chunks_mut(width).enumerate() {
                    let y = first_row + dy;
                    for (x, cell) in row.iter_mut().enumerate() {
                        let value = f(x, y, *cell);
                        *cell = value;
                        local_min = local_min.min(value);
                        local_max = local_max.max(value);
                    }
                }
                (local_min, local_max)
            }));
        }
        for handle in handles {
            let (min, max) = handle.join().expect("row worker panicked");
            global_min = global_min.min(min);
            global_max = global_max.max(max);
        }
    });
    (global_min, global_max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orogen_shapes::{ShapeKind, ShapeParams};

    /// Constant-height shape for exercising the rescale path in isolation.
    struct Flat(f32);

    impl ShapeFunction for Flat {
        fn height(&self, _x: usize, _y: usize) -> f32 {
            self.0
        }
    }

    #[test]
    fn test_constant_shape_rescales_exactly() {
        let grid = generate(64, 64, &Flat(1.0), 0.5, 0).expect("generation");
        assert!(
            grid.as_slice().iter().all(|&v| v == 0.5),
            "uniform input with no smoothing must rescale to exactly 0.5"
        );
    }

    #[test]
    fn test_output_max_hits_target() {
        let shape = ShapeKind::Island.build(&ShapeParams {
            width: 64,
            height: 64,
            seed: 99,
            warp: None,
        });
        let grid = generate(64, 64, shape.as_ref(), 0.5, 0).expect("generation");
        assert!(
            (grid.max_value() - 0.5).abs() < 1e-5,
            "max {} should land on the 0.5 target",
            grid.max_value()
        );
        assert!(grid.min_value() >= 0.0, "min {} went negative", grid.min_value());
    }

    #[test]
    fn test_zero_shape_is_degenerate() {
        let err = generate(16, 16, &Flat(0.0), 0.5, 0).unwrap_err();
        assert!(
            matches!(err, PipelineError::DegenerateInput { .. }),
            "expected DegenerateInput, got {err}"
        );
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let err = generate(0, 64, &Flat(1.0), 0.5, 0).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_stacked_is_deterministic() {
        let shape = ShapeKind::Hills.build(&ShapeParams {
            width: 32,
            height: 32,
            seed: 7,
            warp: None,
        });
        let settings = StackSettings::default();
        let a = generate_stacked(32, 32, 7, &settings, shape.as_ref(), 0.5, 0)
            .expect("generation");
        let b = generate_stacked(32, 32, 7, &settings, shape.as_ref(), 0.5, 0)
            .expect("generation");
        assert_eq!(a, b, "identical parameters must produce identical grids");
    }

    #[test]
    fn test_stacked_respects_target_max() {
        let shape = ShapeKind::Mountains.build(&ShapeParams {
            width: 32,
            height: 32,
            seed: 3,
            warp: None,
        });
        let settings = StackSettings::default();
        let grid = generate_stacked(32, 32, 3, &settings, shape.as_ref(), 0.4, 0)
            .expect("generation");
        assert!(
            (grid.max_value() - 0.4).abs() < 1e-5,
            "stacked max {} should land on 0.4",
            grid.max_value()
        );
    }

    #[test]
    fn test_fill_rows_matches_serial_evaluation() {
        let width = 17;
        let rows = 9;
        let mut parallel = vec![0.0f32; width * rows];
        let f = |x: usize, y: usize| (x * 31 + y * 7) as f32 * 0.01;
        let (min, max) = fill_rows(&mut parallel, width, f);

        let serial: Vec<f32> = (0..rows)
            .flat_map(|y| (0..width).map(move |x| f(x, y)))
            .collect();
        assert_eq!(parallel, serial, "partitioned fill diverged from serial");
        assert_eq!(min, 0.0);
        assert_eq!(max, f(width - 1, rows - 1));
    }
}
