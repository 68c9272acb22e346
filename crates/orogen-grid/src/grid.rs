//! A dense row-major 2D grid indexed `(x, y)` with `x` the fast-varying axis.

/// A dense `width x height` grid stored row-major (`index = y * width + x`).
///
/// Terrain passes treat `x` as the fast-varying axis end-to-end so the raw
/// export and the in-memory layout agree without a transpose.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// Per-cell terrain heights, conventionally in `[0, 1]` after generation.
/// Intermediate passes (erosion, carving) may transiently exceed the range.
pub type HeightGrid = Grid<f32>;

/// Per-cell material-layer coordinate in `[0, layer_count - 1]`.
/// Discrete policy stores whole layer indices; interpolated policy stores
/// fractional blend coordinates.
pub type SplatGrid = Grid<f32>;

impl<T: Copy> Grid<T> {
    /// Create a grid with every cell set to `fill`.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows. Zero dimensions are permitted
    /// here; the pipeline rejects them up front with `InvalidDimensions`.
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        let len = width
            .checked_mul(height)
            .expect("grid dimensions overflow usize");
        Self {
            width,
            height,
            data: vec![fill; len],
        }
    }

    /// Build a grid from an existing row-major buffer.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Self {
        assert_eq!(
            data.len(),
            width * height,
            "buffer length {} does not match {width}x{height}",
            data.len()
        );
        Self {
            width,
            height,
            data,
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if `(x, y)` lies inside the grid.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Read the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        debug_assert!(self.contains(x, y), "({x}, {y}) out of bounds");
        self.data[y * self.width + x]
    }

    /// Write the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        debug_assert!(self.contains(x, y), "({x}, {y}) out of bounds");
        self.data[y * self.width + x] = value;
    }

    /// The underlying row-major buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable access to the underlying row-major buffer.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterate over rows as contiguous slices, top to bottom.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, T> {
        self.data.chunks_exact(self.width)
    }

    /// Iterate over mutable rows. Disjoint row blocks obtained from this
    /// iterator are the unit of parallel work in the pipeline.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, T> {
        self.data.chunks_exact_mut(self.width)
    }
}

impl HeightGrid {
    /// Minimum cell value, or `f32::INFINITY` for an empty grid.
    pub fn min_value(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Maximum cell value, or `f32::NEG_INFINITY` for an empty grid.
    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Arithmetic mean of all cells.
    pub fn mean(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.data.iter().map(|&v| v as f64).sum();
        (sum / self.data.len() as f64) as f32
    }

    /// Population variance of all cells. Used to verify that smoothing
    /// passes never increase local variation.
    pub fn variance(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let mean = self.mean() as f64;
        let sum: f64 = self
            .data
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum();
        (sum / self.data.len() as f64) as f32
    }
}

impl<T: Copy> std::ops::Index<(usize, usize)> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, (x, y): (usize, usize)) -> &T {
        &self.data[y * self.width + x]
    }
}

impl<T: Copy> std::ops::IndexMut<(usize, usize)> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        &mut self.data[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_filled() {
        let grid: HeightGrid = Grid::new(4, 3, 0.25);
        assert_eq!(grid.len(), 12);
        assert!(grid.as_slice().iter().all(|&v| v == 0.25));
    }

    #[test]
    fn test_row_major_layout_x_fast() {
        let mut grid: Grid<u32> = Grid::new(3, 2, 0);
        grid.set(2, 0, 7);
        grid.set(0, 1, 9);
        assert_eq!(grid.as_slice(), &[0, 0, 7, 9, 0, 0]);
    }

    #[test]
    fn test_index_roundtrip() {
        let mut grid: HeightGrid = Grid::new(8, 8, 0.0);
        grid[(3, 5)] = 0.5;
        assert_eq!(grid.get(3, 5), 0.5);
        assert_eq!(grid[(3, 5)], 0.5);
    }

    #[test]
    fn test_rows_are_contiguous() {
        let grid = Grid::from_vec(2, 2, vec![1.0f32, 2.0, 3.0, 4.0]);
        let rows: Vec<&[f32]> = grid.rows().collect();
        assert_eq!(rows, vec![&[1.0, 2.0][..], &[3.0, 4.0][..]]);
    }

    #[test]
    fn test_min_max_mean() {
        let grid = Grid::from_vec(2, 2, vec![0.0f32, 1.0, 0.5, 0.5]);
        assert_eq!(grid.min_value(), 0.0);
        assert_eq!(grid.max_value(), 1.0);
        assert!((grid.mean() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_variance_of_constant_grid_is_zero() {
        let grid: HeightGrid = Grid::new(16, 16, 0.7);
        assert!(grid.variance().abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn test_from_vec_rejects_bad_length() {
        let _ = Grid::from_vec(3, 3, vec![0.0f32; 8]);
    }
}
