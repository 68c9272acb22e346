//! Dense 2D grids for terrain data, plus the 16-bit export codec and
//! orientation transforms applied before serialization.

mod codec;
mod grid;
mod orient;

pub use codec::{
    CodecError, quantize_height, raw_bytes_to_heights, splat_to_raw_bytes, to_raw_bytes, to_u16,
};
pub use grid::{Grid, HeightGrid, SplatGrid};
pub use orient::{Orientation, Rotation};
