//! Splat layer colors for preview images.

/// One RGBA color per material layer.
#[derive(Clone, Debug, PartialEq)]
pub struct SplatPalette {
    colors: Vec<[u8; 4]>,
}

impl SplatPalette {
    /// Build a palette from explicit layer colors.
    pub fn new(colors: Vec<[u8; 4]>) -> Self {
        Self { colors }
    }

    /// Number of layer colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns `true` if the palette has no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for a (possibly fractional) layer coordinate. The coordinate
    /// is truncated to an index and clamped to the palette range, so splat
    /// values past the last layer render as the last color.
    pub fn color_for(&self, layer: f32) -> [u8; 4] {
        let index = (layer.max(0.0) as usize).min(self.colors.len().saturating_sub(1));
        self.colors.get(index).copied().unwrap_or([0, 0, 0, 255])
    }
}

impl Default for SplatPalette {
    /// The six-layer preview palette: cyan, red, yellow, green, white,
    /// magenta, bottom layer first.
    fn default() -> Self {
        Self::new(vec![
            [0, 255, 255, 255],
            [255, 0, 0, 255],
            [255, 255, 0, 255],
            [0, 255, 0, 255],
            [255, 255, 255, 255],
            [255, 0, 255, 255],
        ])
    }
}
