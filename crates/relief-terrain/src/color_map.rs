//! Colour buffers derived from height fields.

use crate::noise_field::HeightField;
use crate::region::{RegionBand, Rgba, StylisedRule, classify_height};

/// One colour per height-field cell, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorBuffer {
    width: usize,
    height: usize,
    colors: Vec<Rgba>,
}

impl ColorBuffer {
    /// Buffer width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Buffer height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major colours. Length = `width * height`.
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Colour at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get(&self, x: usize, y: usize) -> Rgba {
        self.colors[y * self.width + x]
    }

    /// Pack into 8-bit RGBA bytes for texture upload. Length = `width * height * 4`.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|c| c.to_rgba8()).collect()
    }

    fn from_fn(field: &HeightField, mut f: impl FnMut(usize, f32) -> Rgba) -> Self {
        let (width, height) = (field.width(), field.height());
        let mut colors = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                colors.push(f(y, field.get(x, y)));
            }
        }
        Self {
            width,
            height,
            colors,
        }
    }
}

/// Classify every cell against ordered terrain bands.
pub fn color_map_for_terrain(field: &HeightField, bands: &[RegionBand]) -> ColorBuffer {
    ColorBuffer::from_fn(field, |_, h| classify_height(h, bands))
}

/// Colour every cell with a stylised rule.
pub fn color_map_for_stylised(field: &HeightField, rule: &StylisedRule) -> ColorBuffer {
    ColorBuffer::from_fn(field, |row, h| rule.classify(row, h))
}
