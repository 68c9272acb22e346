//! River carving, two independent algorithms.
//!
//! The path tracer walks steepest-descent paths from high ground, carving a
//! radial depression at every step. The turbulence carver lowers every cell
//! whose placement-noise value falls inside a band around zero, producing
//! branching channel networks without any path state.

use orogen_grid::HeightGrid;
use orogen_noise::NoiseField;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Minimum elevation a path-traced river may start from.
const MIN_START_HEIGHT: f32 = 0.5;
/// Depth removed at a carve circle's center per step.
const CARVE_DEPTH: f32 = 0.03;
/// Probability of perturbing the next path cell by one cell.
const JITTER_CHANCE: f64 = 0.3;
/// Gain on the spacing-band ridge that keeps adjacent channels separated.
const SPACING_RIDGE_GAIN: f32 = 0.05;
/// Amplitude of the bed perturbation that breaks up flat carved floors.
const BED_NOISE_STRENGTH: f32 = 0.01;
const BED_NOISE_FREQUENCY: f64 = 30.0;

/// Controls for the steepest-descent path tracer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathTracerParams {
    /// Number of rivers to trace.
    pub frequency: u32,
    /// Carve radius as a fraction of grid width; the pixel radius is floored
    /// at 1.
    pub width_scale: f32,
}

impl Default for PathTracerParams {
    fn default() -> Self {
        Self {
            frequency: 3,
            width_scale: 0.01,
        }
    }
}

/// Controls for the turbulence-field carver.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurbulenceParams {
    /// Spatial frequency of the placement-noise field.
    pub river_frequency: f32,
    /// Half-width of the placement-noise band that becomes river bed.
    pub river_width: f32,
    /// Maximum depth removed at a channel's center line.
    pub river_depth: f32,
    /// Frequency of the turbulence channel that roughens bank profiles.
    pub turbulence_frequency: f32,
    /// Amplitude of the turbulence offset.
    pub turbulence_strength: f32,
    /// Placement-noise band (smaller than `river_width`) whose center line
    /// is slightly raised to keep adjacent channels apart.
    pub min_spacing: f32,
    /// Exponent shaping the bank profile; higher is steeper.
    pub slope_steepness: f32,
}

impl Default for TurbulenceParams {
    fn default() -> Self {
        Self {
            river_frequency: 3.0,
            river_width: 0.08,
            river_depth: 0.1,
            turbulence_frequency: 8.0,
            turbulence_strength: 0.01,
            min_spacing: 0.02,
            slope_steepness: 2.0,
        }
    }
}

/// Which carving algorithm to run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiverSettings {
    /// Steepest-descent path tracer.
    PathTracer(PathTracerParams),
    /// Placement-noise turbulence carver.
    Turbulence(TurbulenceParams),
}

/// Run the selected carver in place over `grid`.
pub fn carve(
    grid: &mut HeightGrid,
    seed: i64,
    settings: &RiverSettings,
) -> Result<(), PipelineError> {
    match settings {
        RiverSettings::PathTracer(params) => carve_paths(grid, seed, params),
        RiverSettings::Turbulence(params) => {
            carve_turbulence(grid, seed, params);
            Ok(())
        }
    }
}

/// Trace `frequency` rivers from random high cells down to local minima,
/// carving a radial depression along each path.
///
/// The start-point search re-rolls until it lands on a cell above
/// [`MIN_START_HEIGHT`], bounded at `width * height` attempts per river;
/// exhausting the budget fails with [`PipelineError::UnboundedSearch`]
/// instead of spinning on terrain that never clears the threshold.
pub fn carve_paths(
    grid: &mut HeightGrid,
    seed: i64,
    params: &PathTracerParams,
) -> Result<(), PipelineError> {
    let width = grid.width();
    let height = grid.height();
    if width == 0 || height == 0 {
        return Err(PipelineError::InvalidDimensions { width, height });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    let radius = (params.width_scale * width as f32).max(1.0);
    let max_attempts = width * height;
    let max_steps = 2 * width;

    for _ in 0..params.frequency {
        let (mut x, mut y) = find_start(grid, &mut rng, max_attempts)?;

        for _ in 0..max_steps {
            carve_circle(grid, x, y, radius);

            let Some((next_x, next_y)) = steepest_descent(grid, x, y) else {
                break;
            };
            x = next_x;
            y = next_y;

            // Occasional one-cell jitter so paths do not run ruler-straight.
            if rng.random_bool(JITTER_CHANCE) {
                let jx = x as i64 + rng.random_range(-1..=1);
                let jy = y as i64 + rng.random_range(-1..=1);
                x = jx.clamp(0, width as i64 - 1) as usize;
                y = jy.clamp(0, height as i64 - 1) as usize;
            }
        }
    }
    Ok(())
}

/// Random start cell above [`MIN_START_HEIGHT`], or `UnboundedSearch` once
/// the retry budget runs out.
fn find_start(
    grid: &HeightGrid,
    rng: &mut ChaCha8Rng,
    max_attempts: usize,
) -> Result<(usize, usize), PipelineError> {
    for _ in 0..max_attempts {
        let x = rng.random_range(0..grid.width());
        let y = rng.random_range(0..grid.height());
        if grid.get(x, y) > MIN_START_HEIGHT {
            return Ok((x, y));
        }
    }
    Err(PipelineError::UnboundedSearch {
        attempts: max_attempts,
        min_height: MIN_START_HEIGHT,
    })
}

/// Lower a radial depression centered at `(cx, cy)`.
fn carve_circle(grid: &mut HeightGrid, cx: usize, cy: usize, radius: f32) {
    let reach = radius.ceil() as i64;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let x = cx as i64 + dx;
            let y = cy as i64 + dy;
            if x < 0 || y < 0 || x >= grid.width() as i64 || y >= grid.height() as i64 {
                continue;
            }
            let distance = ((dx * dx + dy * dy) as f32).sqrt();
            let falloff = (1.0 - distance / radius).clamp(0.0, 1.0);
            if falloff <= 0.0 {
                continue;
            }
            let (x, y) = (x as usize, y as usize);
            grid.set(x, y, (grid.get(x, y) - falloff * CARVE_DEPTH).max(0.0));
        }
    }
}

/// The lowest strictly-downhill 8-connected neighbor, if any.
fn steepest_descent(grid: &HeightGrid, x: usize, y: usize) -> Option<(usize, usize)> {
    let current = grid.get(x, y);
    let mut best: Option<(usize, usize, f32)> = None;
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 || nx >= grid.width() as i64 || ny >= grid.height() as i64 {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            let h = grid.get(nx, ny);
            if h < current && best.map_or(true, |(_, _, bh)| h < bh) {
                best = Some((nx, ny, h));
            }
        }
    }
    best.map(|(nx, ny, _)| (nx, ny))
}

/// Carve a channel network from a placement-noise field.
///
/// Cells whose placement-noise magnitude falls inside `river_width` are
/// lowered with a steepness-shaped profile plus a turbulence offset; the
/// narrower `min_spacing` band is raised slightly so adjacent channels read
/// as separate. A final low-amplitude bed perturbation breaks up perfectly
/// flat floors. Inside the carve band the result never exceeds the cell's
/// pre-carve height.
pub fn carve_turbulence(grid: &mut HeightGrid, seed: i64, params: &TurbulenceParams) {
    let width = grid.width();
    let height = grid.height();
    let field = NoiseField::new(seed);
    let placement = field.channel(0);
    let turbulence = field.channel(1);
    let bed = field.channel(2);

    for y in 0..height {
        for x in 0..width {
            let nx = x as f64 / width as f64;
            let ny = y as f64 / height as f64;
            let p = placement
                .sample(nx * params.river_frequency as f64, ny * params.river_frequency as f64)
                .abs();
            let original = grid.get(x, y);
            let mut carved = original;

            if p < params.river_width {
                let profile = (1.0 - p / params.river_width).powf(params.slope_steepness);
                let offset = turbulence.sample(
                    nx * params.turbulence_frequency as f64,
                    ny * params.turbulence_frequency as f64,
                ) * params.turbulence_strength;
                carved = original - params.river_depth * profile + offset;
            }
            if p < params.min_spacing {
                carved += (params.min_spacing - p) * SPACING_RIDGE_GAIN;
            }
            carved += bed
                .sample(nx * BED_NOISE_FREQUENCY, ny * BED_NOISE_FREQUENCY)
                * BED_NOISE_STRENGTH;

            if p < params.river_width {
                carved = carved.min(original);
            }
            grid.set(x, y, carved.max(0.0));
        }
    }
}
