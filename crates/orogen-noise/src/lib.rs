//! Deterministic seeded 2D coherent noise.
//!
//! Wraps the `noise` crate's simplex implementation behind a channel model:
//! a [`NoiseField`] owns the run seed, and every pass that needs an
//! independent noise signal derives a [`NoiseChannel`] from the field by a
//! small integer offset. Channels with different offsets are statistically
//! uncorrelated, so a shape function can use one channel for its base
//! profile, two for domain warping, and more for detail layers without the
//! signals echoing each other.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use noise::{NoiseFn, Simplex};

/// Seed offsets used for domain warping, matching the channel layout the
/// shape functions were tuned against: +10 displaces x, +11 displaces y.
pub const WARP_X_OFFSET: i64 = 10;
/// See [`WARP_X_OFFSET`].
pub const WARP_Y_OFFSET: i64 = 11;

/// A seeded 2D coherent-noise field. Cheap to copy around; sampling state
/// lives in the channels it hands out.
#[derive(Clone, Copy, Debug)]
pub struct NoiseField {
    seed: i64,
}

impl NoiseField {
    /// Create a field for the given 64-bit run seed.
    pub fn new(seed: i64) -> Self {
        Self { seed }
    }

    /// The run seed this field was created with.
    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Derive an independent noise channel at the given seed offset.
    ///
    /// The same `(seed, offset)` pair always yields an identical channel,
    /// regardless of thread or platform.
    pub fn channel(&self, offset: i64) -> NoiseChannel {
        NoiseChannel::new(derive_channel_seed(self.seed, offset))
    }

    /// The two-channel domain-warp pair at the conventional offsets.
    pub fn warp_channels(&self) -> (NoiseChannel, NoiseChannel) {
        (self.channel(WARP_X_OFFSET), self.channel(WARP_Y_OFFSET))
    }
}

/// Combine the run seed and channel offset into a well-distributed u32.
///
/// Uses SipHash (std's `DefaultHasher`) so nearby offsets land far apart in
/// the simplex permutation space.
fn derive_channel_seed(seed: i64, offset: i64) -> u32 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    offset.hash(&mut hasher);
    hasher.finish() as u32
}

/// One independent 2D noise signal.
///
/// Output is continuous in its inputs and bounded to `[-1, 1]`.
pub struct NoiseChannel {
    simplex: Simplex,
}

impl NoiseChannel {
    fn new(seed: u32) -> Self {
        Self {
            simplex: Simplex::new(seed),
        }
    }

    /// Sample the channel at `(x, y)`.
    #[inline]
    pub fn sample(&self, x: f64, y: f64) -> f32 {
        (self.simplex.get([x, y]) as f32).clamp(-1.0, 1.0)
    }
}

/// Coordinate displacement driven by two noise channels.
///
/// Displaces a normalized coordinate by `noise(x * size, y * size) *
/// strength` along each axis, using distinct channels per axis so the
/// displacement field is not diagonal.
pub struct DomainWarp {
    x_channel: NoiseChannel,
    y_channel: NoiseChannel,
    size: f32,
    strength: f32,
}

impl DomainWarp {
    /// Build a warp from the field's conventional warp channels.
    pub fn new(field: &NoiseField, size: f32, strength: f32) -> Self {
        Self::with_offsets(field, WARP_X_OFFSET, WARP_Y_OFFSET, size, strength)
    }

    /// Build a warp from channels at explicit offsets, for passes that keep
    /// their own channel layout.
    pub fn with_offsets(
        field: &NoiseField,
        x_offset: i64,
        y_offset: i64,
        size: f32,
        strength: f32,
    ) -> Self {
        Self {
            x_channel: field.channel(x_offset),
            y_channel: field.channel(y_offset),
            size,
            strength,
        }
    }

    /// Displace a normalized coordinate pair.
    #[inline]
    pub fn displace(&self, nx: f32, ny: f32) -> (f32, f32) {
        let sx = (nx * self.size) as f64;
        let sy = (ny * self.size) as f64;
        let dx = self.x_channel.sample(sx, sy) * self.strength;
        let dy = self.y_channel.sample(sx, sy) * self.strength;
        (nx + dx, ny + dy)
    }
}
