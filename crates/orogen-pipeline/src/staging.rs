//! Staging-area flattening: a flat square plateau with a ramp blending into
//! the surrounding terrain.

use orogen_grid::HeightGrid;
use serde::{Deserialize, Serialize};

/// Height lost per cell of distance from the plateau edge. Tuned for a
/// gentle, walkable ramp.
const RAMP_SLOPE: f32 = 0.005;

/// Placement and size of the flattened square.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StagingParams {
    /// Side length of the square, in cells.
    pub size: usize,
    /// Flat target height of the plateau.
    pub height: f32,
    /// Horizontal center as a fraction of grid width, `0.0..=1.0`.
    pub center_x: f32,
    /// Vertical center as a fraction of grid height, `0.0..=1.0`.
    pub center_y: f32,
}

impl Default for StagingParams {
    fn default() -> Self {
        Self {
            size: 64,
            height: 0.3,
            center_x: 0.5,
            center_y: 0.5,
        }
    }
}

/// Flatten the staging square to `params.height` and raise surrounding
/// cells onto a descending cone from the plateau edge.
///
/// Outside the square each cell becomes
/// `max(current, height - chebyshev_distance * slope)`, so the flattener
/// only ever raises terrain; valleys far from the plateau are untouched.
pub fn flatten(grid: &mut HeightGrid, params: &StagingParams) {
    let width = grid.width() as i64;
    let height = grid.height() as i64;
    if width == 0 || height == 0 || params.size == 0 {
        return;
    }

    let cx = (params.center_x * width as f32) as i64;
    let cy = (params.center_y * height as f32) as i64;
    let half = (params.size / 2) as i64;
    let min_x = cx - half;
    let max_x = cx + half;
    let min_y = cy - half;
    let max_y = cy + half;

    for y in 0..height {
        for x in 0..width {
            // Chebyshev distance from the square's nearest edge; zero inside.
            let dx = (min_x - x).max(x - max_x).max(0);
            let dy = (min_y - y).max(y - max_y).max(0);
            let distance = dx.max(dy) as f32;

            let (x, y) = (x as usize, y as usize);
            if distance == 0.0 {
                grid.set(x, y, params.height);
            } else {
                let ramp = params.height - distance * RAMP_SLOPE;
                if ramp > grid.get(x, y) {
                    grid.set(x, y, ramp);
                }
            }
        }
    }
}
