//! Orientation transforms applied to grids before export.
//!
//! The consuming renderer may expect the terrain in a different orientation
//! than it was generated; rotation and mirroring happen once, after all
//! generation passes and before serialization, so the raw file and the
//! preview images stay consistent.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Clockwise rotation applied before export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// 90 degrees clockwise. Output dimensions are swapped.
    Quarter,
    /// 180 degrees.
    Half,
    /// 270 degrees clockwise. Output dimensions are swapped.
    ThreeQuarter,
}

/// Combined rotate + mirror transform.
///
/// Rotation is applied first, then mirroring along the output axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orientation {
    /// Clockwise rotation step.
    pub rotation: Rotation,
    /// Mirror horizontally (reverse each row) after rotating.
    pub mirror_x: bool,
    /// Mirror vertically (reverse row order) after rotating.
    pub mirror_y: bool,
}

impl Orientation {
    /// Returns `true` if applying this orientation is a no-op.
    pub fn is_identity(&self) -> bool {
        self.rotation == Rotation::None && !self.mirror_x && !self.mirror_y
    }

    /// Apply the transform, producing a new grid. For `Quarter` and
    /// `ThreeQuarter` rotations the output width and height are swapped.
    pub fn apply<T: Copy>(&self, grid: &Grid<T>) -> Grid<T> {
        let rotated = match self.rotation {
            Rotation::None => grid.clone(),
            Rotation::Quarter => rotate_quarter(grid),
            Rotation::Half => rotate_half(grid),
            Rotation::ThreeQuarter => rotate_three_quarter(grid),
        };
        mirror(rotated, self.mirror_x, self.mirror_y)
    }
}

fn rotate_quarter<T: Copy>(grid: &Grid<T>) -> Grid<T> {
    let (w, h) = (grid.width(), grid.height());
    let mut out = Grid::new(h, w, grid.get(0, 0));
    for y in 0..w {
        for x in 0..h {
            // Output column x came from input row (h - 1 - x).
            out.set(x, y, grid.get(y, h - 1 - x));
        }
    }
    out
}

fn rotate_half<T: Copy>(grid: &Grid<T>) -> Grid<T> {
    let (w, h) = (grid.width(), grid.height());
    let mut out = Grid::new(w, h, grid.get(0, 0));
    for y in 0..h {
        for x in 0..w {
            out.set(x, y, grid.get(w - 1 - x, h - 1 - y));
        }
    }
    out
}

fn rotate_three_quarter<T: Copy>(grid: &Grid<T>) -> Grid<T> {
    let (w, h) = (grid.width(), grid.height());
    let mut out = Grid::new(h, w, grid.get(0, 0));
    for y in 0..w {
        for x in 0..h {
            out.set(x, y, grid.get(w - 1 - y, x));
        }
    }
    out
}

fn mirror<T: Copy>(mut grid: Grid<T>, mirror_x: bool, mirror_y: bool) -> Grid<T> {
    let w = grid.width();
    if mirror_x {
        for row in grid.rows_mut() {
            row.reverse();
        }
    }
    if mirror_y {
        let h = grid.height();
        for y in 0..h / 2 {
            for x in 0..w {
                let a = grid.get(x, y);
                let b = grid.get(x, h - 1 - y);
                grid.set(x, y, b);
                grid.set(x, h - 1 - y, a);
            }
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Grid<u32> {
        // 3 wide, 2 tall:
        // 1 2 3
        // 4 5 6
        Grid::from_vec(3, 2, vec![1, 2, 3, 4, 5, 6])
    }

    #[test]
    fn test_identity_is_noop() {
        let grid = sample();
        let out = Orientation::default().apply(&grid);
        assert_eq!(out, grid);
        assert!(Orientation::default().is_identity());
    }

    #[test]
    fn test_quarter_rotation_swaps_dimensions() {
        let out = Orientation {
            rotation: Rotation::Quarter,
            ..Default::default()
        }
        .apply(&sample());
        // 90 cw:
        // 4 1
        // 5 2
        // 6 3
        assert_eq!(out.width(), 2);
        assert_eq!(out.height(), 3);
        assert_eq!(out.as_slice(), &[4, 1, 5, 2, 6, 3]);
    }

    #[test]
    fn test_half_rotation() {
        let out = Orientation {
            rotation: Rotation::Half,
            ..Default::default()
        }
        .apply(&sample());
        assert_eq!(out.as_slice(), &[6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_three_quarter_rotation() {
        let out = Orientation {
            rotation: Rotation::ThreeQuarter,
            ..Default::default()
        }
        .apply(&sample());
        // 270 cw:
        // 3 6
        // 2 5
        // 1 4
        assert_eq!(out.width(), 2);
        assert_eq!(out.height(), 3);
        assert_eq!(out.as_slice(), &[3, 6, 2, 5, 1, 4]);
    }

    #[test]
    fn test_four_quarter_turns_is_identity() {
        let quarter = Orientation {
            rotation: Rotation::Quarter,
            ..Default::default()
        };
        let mut grid = sample();
        for _ in 0..4 {
            grid = quarter.apply(&grid);
        }
        assert_eq!(grid, sample());
    }

    #[test]
    fn test_mirror_x_reverses_rows() {
        let out = Orientation {
            mirror_x: true,
            ..Default::default()
        }
        .apply(&sample());
        assert_eq!(out.as_slice(), &[3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_mirror_y_reverses_row_order() {
        let out = Orientation {
            mirror_y: true,
            ..Default::default()
        }
        .apply(&sample());
        assert_eq!(out.as_slice(), &[4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_double_mirror_equals_half_rotation() {
        let mirrored = Orientation {
            mirror_x: true,
            mirror_y: true,
            ..Default::default()
        }
        .apply(&sample());
        let rotated = Orientation {
            rotation: Rotation::Half,
            ..Default::default()
        }
        .apply(&sample());
        assert_eq!(mirrored, rotated);
    }
}
