//! Noise generation parameters and their clamping rules.

use glam::DVec2;

use crate::curve::ResponseCurve;

/// Smallest scale used when a non-positive scale is requested.
pub const MIN_SCALE: f64 = 0.0001;

/// Smallest lacunarity used when a non-positive lacunarity is requested.
pub const MIN_LACUNARITY: f64 = 0.001;

/// How octaves are composed and post-processed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NoiseVariant {
    /// Amplitude and frequency start at 1; the field is min/max normalized to `[0, 1]`.
    #[default]
    Standard,
    /// Amplitude and frequency start at `persistence` / `lacunarity`; the raw
    /// sum is passed through the response curve without normalization.
    Stylised,
}

/// Parameters for one noise-field generation.
///
/// Out-of-range values are never rejected. They are clamped when the field
/// is generated (see [`NoiseParams::clamped`]).
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParams {
    /// Seed for the octave offsets and the noise permutation.
    pub seed: i32,
    /// Spatial scale: larger values zoom in. Clamped to [`MIN_SCALE`].
    pub scale: f64,
    /// Number of octaves. Negative counts are treated as zero.
    pub octaves: i32,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Frequency growth per octave. Clamped to [`MIN_LACUNARITY`].
    pub lacunarity: f64,
    /// Planar offset added to every octave origin.
    pub offset: DVec2,
    /// Octave composition mode.
    pub variant: NoiseVariant,
    /// Response applied to raw values in [`NoiseVariant::Stylised`] mode.
    pub curve: ResponseCurve,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 25.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: DVec2::ZERO,
            variant: NoiseVariant::Standard,
            curve: ResponseCurve::identity(),
        }
    }
}

impl NoiseParams {
    /// Create default parameters with the given seed.
    pub fn with_seed(seed: i32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Scale actually used for sampling.
    pub fn effective_scale(&self) -> f64 {
        if self.scale > 0.0 && self.scale.is_finite() {
            self.scale
        } else {
            MIN_SCALE
        }
    }

    /// Lacunarity actually used for sampling.
    pub fn effective_lacunarity(&self) -> f64 {
        if self.lacunarity > 0.0 && self.lacunarity.is_finite() {
            self.lacunarity
        } else {
            MIN_LACUNARITY
        }
    }

    /// Octave count actually used for sampling.
    pub fn effective_octaves(&self) -> u32 {
        self.octaves.max(0) as u32
    }

    /// Return a copy with every clamp applied.
    pub fn clamped(&self) -> Self {
        Self {
            scale: self.effective_scale(),
            lacunarity: self.effective_lacunarity(),
            octaves: self.effective_octaves() as i32,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_scale_clamped() {
        for scale in [0.0, -4.0, f64::NAN] {
            let params = NoiseParams {
                scale,
                ..Default::default()
            };
            assert_eq!(params.effective_scale(), MIN_SCALE);
        }
    }

    #[test]
    fn test_non_positive_lacunarity_clamped() {
        let params = NoiseParams {
            lacunarity: -1.0,
            ..Default::default()
        };
        assert_eq!(params.effective_lacunarity(), MIN_LACUNARITY);

        // Values between 0 and 1 are kept.
        let params = NoiseParams {
            lacunarity: 0.5,
            ..Default::default()
        };
        assert_eq!(params.effective_lacunarity(), 0.5);
    }

    #[test]
    fn test_negative_octaves_clamped() {
        let params = NoiseParams {
            octaves: -3,
            ..Default::default()
        };
        assert_eq!(params.effective_octaves(), 0);
        assert_eq!(params.clamped().octaves, 0);
    }

    #[test]
    fn test_clamped_keeps_valid_values() {
        let params = NoiseParams::with_seed(9);
        assert_eq!(params.clamped(), params);
    }
}
