//! Hydraulic erosion: an iterative rain / flow / erode-deposit / evaporate
//! model that redistributes terrain height as sediment transport.
//!
//! The outermost cell ring is never eroded or flowed into; the 1-cell
//! margin is a known boundary limitation of the 4-neighbour flow step, not
//! something the simulation compensates for.

use orogen_grid::{Grid, HeightGrid};
use serde::{Deserialize, Serialize};

/// Hydraulic model controls.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErosionParams {
    /// Simulation steps, `1..=500`.
    pub iterations: u32,
    /// Water added to every cell per step.
    pub rain_rate: f32,
    /// Water removed from every cell per step, floored at zero.
    pub evaporation_rate: f32,
    /// Suspended sediment per unit of water a cell can carry.
    pub sediment_capacity: f32,
}

impl Default for ErosionParams {
    fn default() -> Self {
        Self {
            iterations: 50,
            rain_rate: 0.01,
            evaporation_rate: 0.02,
            sediment_capacity: 0.1,
        }
    }
}

/// Run the hydraulic model in place over `grid`.
///
/// Water and sediment state lives only for the duration of this call.
pub fn erode(grid: &mut HeightGrid, params: &ErosionParams) {
    let width = grid.width();
    let height = grid.height();
    if width < 3 || height < 3 {
        // No interior cells to flow between.
        return;
    }

    let mut water: HeightGrid = Grid::new(width, height, 0.0);
    let mut sediment: HeightGrid = Grid::new(width, height, 0.0);
    let mut water_delta = vec![0.0f32; width * height];
    let mut sediment_delta = vec![0.0f32; width * height];

    const NEIGHBORS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

    for _ in 0..params.iterations {
        // Rain.
        for cell in water.as_mut_slice() {
            *cell += params.rain_rate;
        }

        // Flow. Deltas accumulate into scratch buffers so every cell's
        // outflow is computed against the same pre-step state.
        water_delta.fill(0.0);
        sediment_delta.fill(0.0);
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let cell_level = grid.get(x, y) + water.get(x, y);
                let cell_water = water.get(x, y);
                if cell_water <= 0.0 {
                    continue;
                }

                let mut diffs = [0.0f32; 4];
                let mut total_diff = 0.0f32;
                for (i, &(dx, dy)) in NEIGHBORS.iter().enumerate() {
                    let nx = (x as i64 + dx) as usize;
                    let ny = (y as i64 + dy) as usize;
                    let diff = cell_level - (grid.get(nx, ny) + water.get(nx, ny));
                    if diff > 0.0 {
                        diffs[i] = diff;
                        total_diff += diff;
                    }
                }
                if total_diff <= 0.0 {
                    continue;
                }

                // Total outflow is capped at the water actually present.
                let outflow = total_diff.min(cell_water);
                let sediment_outflow = sediment.get(x, y) * (outflow / cell_water);
                for (i, &(dx, dy)) in NEIGHBORS.iter().enumerate() {
                    if diffs[i] <= 0.0 {
                        continue;
                    }
                    let share = diffs[i] / total_diff;
                    let nx = (x as i64 + dx) as usize;
                    let ny = (y as i64 + dy) as usize;
                    water_delta[y * width + x] -= outflow * share;
                    water_delta[ny * width + nx] += outflow * share;
                    sediment_delta[y * width + x] -= sediment_outflow * share;
                    sediment_delta[ny * width + nx] += sediment_outflow * share;
                }
            }
        }
        for (cell, delta) in water.as_mut_slice().iter_mut().zip(&water_delta) {
            *cell += delta;
        }
        for (cell, delta) in sediment.as_mut_slice().iter_mut().zip(&sediment_delta) {
            *cell += delta;
        }

        // Erode or deposit against each interior cell's carrying capacity.
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let capacity = water.get(x, y) * params.sediment_capacity;
                let held = sediment.get(x, y);
                if held > capacity {
                    let excess = held - capacity;
                    grid.set(x, y, grid.get(x, y) + excess);
                    sediment.set(x, y, capacity);
                } else {
                    // Erode the shortfall, but never below zero height; the
                    // suspended amount matches what actually came off.
                    let shortfall = (capacity - held).min(grid.get(x, y));
                    grid.set(x, y, grid.get(x, y) - shortfall);
                    sediment.set(x, y, held + shortfall);
                }
            }
        }

        // Evaporate.
        for cell in water.as_mut_slice() {
            *cell = (*cell - params.evaporation_rate).max(0.0);
        }
    }
}
