//! N-pass 3x3 box blur.

use orogen_grid::HeightGrid;

/// Apply `passes` box-blur passes, each the mean of the up-to-9 cell
/// neighborhood (edge cells average fewer neighbors).
///
/// Each pass reads only the previous pass's buffer, so the blur has no
/// in-place scan-order skew. `passes == 0` returns the input unchanged.
pub fn smooth(grid: &HeightGrid, passes: usize) -> HeightGrid {
    let width = grid.width();
    let height = grid.height();
    let mut current = grid.clone();
    let mut next = grid.clone();

    for _ in 0..passes {
        for y in 0..height {
            for x in 0..width {
                let mut sum = 0.0f32;
                let mut count = 0u32;
                for dy in -1i64..=1 {
                    for dx in -1i64..=1 {
                        let nx = x as i64 + dx;
                        let ny = y as i64 + dy;
                        if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                            continue;
                        }
                        sum += current.get(nx as usize, ny as usize);
                        count += 1;
                    }
                }
                next.set(x, y, sum / count as f32);
            }
        }
        std::mem::swap(&mut current, &mut next);
    }

    current
}
