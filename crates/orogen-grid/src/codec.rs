//! 16-bit raw grid codec.
//!
//! The raw heightmap file consumed by the terrain renderer is a sequence of
//! `width * height` unsigned 16-bit little-endian values, row-major, each
//! `round(clamp(height, 0, 1) * 65535)`. Rounding is round-to-nearest, so a
//! constant 0.5 grid encodes as 32768 exactly.

use crate::grid::{HeightGrid, SplatGrid};

/// Errors from decoding raw grid byte streams.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The byte stream length does not match the expected dimensions.
    #[error("raw stream is {actual} bytes, expected {expected} for {width}x{height}")]
    LengthMismatch {
        /// Expected byte count (`width * height * 2`).
        expected: usize,
        /// Actual byte count received.
        actual: usize,
        /// Grid width the caller asked for.
        width: usize,
        /// Grid height the caller asked for.
        height: usize,
    },
}

/// Quantize a single height to the 16-bit export range.
///
/// Clamps to `[0, 1]` first; out-of-range survivors of intermediate passes
/// saturate rather than wrap.
#[inline]
pub fn quantize_height(height: f32) -> u16 {
    (height.clamp(0.0, 1.0) * 65535.0).round() as u16
}

/// Convert a height grid to a row-major `u16` buffer.
pub fn to_u16(grid: &HeightGrid) -> Vec<u16> {
    grid.as_slice().iter().map(|&h| quantize_height(h)).collect()
}

/// Serialize a height grid as little-endian 16-bit raw bytes.
pub fn to_raw_bytes(grid: &HeightGrid) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(grid.len() * 2);
    for &h in grid.as_slice() {
        bytes.extend_from_slice(&quantize_height(h).to_le_bytes());
    }
    bytes
}

/// Decode a little-endian 16-bit raw stream back to heights in `[0, 1]`.
pub fn raw_bytes_to_heights(
    bytes: &[u8],
    width: usize,
    height: usize,
) -> Result<HeightGrid, CodecError> {
    let expected = width * height * 2;
    if bytes.len() != expected {
        return Err(CodecError::LengthMismatch {
            expected,
            actual: bytes.len(),
            width,
            height,
        });
    }
    let data = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]) as f32 / 65535.0)
        .collect();
    Ok(HeightGrid::from_vec(width, height, data))
}

/// Serialize a splat grid as a little-endian `f32` raw stream, preserving
/// fractional blend coordinates from the interpolated policy.
pub fn splat_to_raw_bytes(grid: &SplatGrid) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(grid.len() * 4);
    for &v in grid.as_slice() {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn test_quantize_bounds() {
        assert_eq!(quantize_height(0.0), 0);
        assert_eq!(quantize_height(1.0), 65535);
        assert_eq!(quantize_height(-0.5), 0, "negative heights saturate to 0");
        assert_eq!(quantize_height(2.0), 65535, "overshoot saturates to max");
    }

    #[test]
    fn test_half_height_rounds_to_32768() {
        // Round-to-nearest: 0.5 * 65535 = 32767.5 rounds up.
        assert_eq!(quantize_height(0.5), 32768);
    }

    #[test]
    fn test_constant_grid_raw_roundtrip() {
        let grid: HeightGrid = Grid::new(8, 8, 0.5);
        let bytes = to_raw_bytes(&grid);
        assert_eq!(bytes.len(), 8 * 8 * 2);

        let decoded = raw_bytes_to_heights(&bytes, 8, 8).expect("roundtrip decode");
        for &h in decoded.as_slice() {
            assert!(
                (h - 0.5).abs() <= 1.0 / 65535.0,
                "decoded {h} not within one quantization step of 0.5"
            );
        }
    }

    #[test]
    fn test_raw_bytes_are_little_endian_row_major() {
        let mut grid: HeightGrid = Grid::new(2, 1, 0.0);
        grid.set(1, 0, 1.0);
        let bytes = to_raw_bytes(&grid);
        assert_eq!(bytes, vec![0x00, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let err = raw_bytes_to_heights(&[0u8; 10], 4, 4).unwrap_err();
        assert!(matches!(
            err,
            CodecError::LengthMismatch {
                expected: 32,
                actual: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_splat_raw_preserves_fractions() {
        let grid: SplatGrid = Grid::from_vec(2, 1, vec![1.2f32, 3.0]);
        let bytes = splat_to_raw_bytes(&grid);
        assert_eq!(&bytes[0..4], &1.2f32.to_le_bytes());
        assert_eq!(&bytes[4..8], &3.0f32.to_le_bytes());
    }
}
