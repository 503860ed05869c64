//! Multi-octave coherent-noise height fields.
//!
//! Composites octaves of Perlin noise over a 2D grid. Each octave samples from
//! its own seeded origin so octaves do not alias, and the result is either
//! min/max normalized to `[0, 1]` or passed through a response curve.

use glam::DVec2;
use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::params::{NoiseParams, NoiseVariant};

/// Half-width of the range octave origins are drawn from.
const OCTAVE_OFFSET_RANGE: i32 = 100_000;

/// A row-major 2D grid of height samples.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl HeightField {
    /// Create a zero-filled field.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
        }
    }

    /// Wrap existing row-major values. Returns `None` if the length does not
    /// match `width * height`.
    pub fn from_values(width: usize, height: usize, values: Vec<f32>) -> Option<Self> {
        (values.len() == width * height).then_some(Self {
            width,
            height,
            values,
        })
    }

    /// Grid width (number of columns).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (number of rows).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major sample storage.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Sample at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.width + x]
    }

    /// Overwrite the sample at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.values[y * self.width + x] = value;
    }

    /// Smallest and largest sample, or `None` for an empty field.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut iter = self.values.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Generates height fields from layered Perlin noise.
pub struct NoiseField {
    noise: Perlin,
    params: NoiseParams,
    octave_offsets: Vec<DVec2>,
}

impl NoiseField {
    /// Create a generator. Parameters are clamped and the per-octave origins
    /// are drawn from a generator seeded with `params.seed`.
    pub fn new(params: NoiseParams) -> Self {
        let params = params.clamped();
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed as u64);
        let octave_offsets = (0..params.effective_octaves())
            .map(|_| {
                let x = rng.random_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f64;
                let y = rng.random_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f64;
                DVec2::new(x, y) + params.offset
            })
            .collect();

        Self {
            noise: Perlin::new(params.seed as u32),
            params,
            octave_offsets,
        }
    }

    /// The clamped parameters in use.
    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// Sampling origin of every octave, caller offset included.
    pub fn octave_offsets(&self) -> &[DVec2] {
        &self.octave_offsets
    }

    /// Fill a `width × height` field.
    pub fn generate(&self, width: usize, height: usize) -> HeightField {
        let half_width = width as f64 / 2.0;
        let half_height = height as f64 / 2.0;

        // Accumulate and normalize in f64; large amplitudes overflow f32.
        let mut raw = Vec::with_capacity(width * height);
        let mut min = f64::MAX;
        let mut max = f64::MIN;

        for y in 0..height {
            for x in 0..width {
                let v = self.accumulate(x as f64 - half_width, y as f64 - half_height);
                min = min.min(v);
                max = max.max(v);
                raw.push(v);
            }
        }

        let values = match self.params.variant {
            NoiseVariant::Standard => {
                let range = max - min;
                raw.iter()
                    .map(|&v| {
                        let t = if range > 0.0 { (v - min) / range } else { 0.0 };
                        // An overflowing range leaves nothing to normalize.
                        if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) as f32 }
                    })
                    .collect()
            }
            NoiseVariant::Stylised => raw
                .iter()
                .map(|&v| self.params.curve.evaluate(v) as f32)
                .collect(),
        };

        HeightField {
            width,
            height,
            values,
        }
    }

    /// Sum all octaves at a grid position already centered on the midpoint.
    fn accumulate(&self, cx: f64, cy: f64) -> f64 {
        let scale = self.params.scale;
        let persistence = self.params.persistence;
        let lacunarity = self.params.lacunarity;

        let (mut amplitude, mut frequency) = match self.params.variant {
            NoiseVariant::Standard => (1.0, 1.0),
            NoiseVariant::Stylised => (persistence, lacunarity),
        };

        let mut total = 0.0;
        for offset in &self.octave_offsets {
            let sx = cx / scale * frequency + offset.x;
            let sy = cy / scale * frequency + offset.y;
            let value = self.noise.get([sx, sy]).clamp(-1.0, 1.0);
            total += value * amplitude;

            amplitude *= persistence;
            frequency *= lacunarity;
        }
        total
    }
}

/// Convenience wrapper: build a [`NoiseField`] and fill one field.
pub fn generate_height_field(params: &NoiseParams, width: usize, height: usize) -> HeightField {
    NoiseField::new(params.clone()).generate(width, height)
}
