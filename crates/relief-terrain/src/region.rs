//! Height-to-colour classification: terrain region bands and stylised rules.

/// A linear RGBA colour with channels in `[0, 1]`.
///
/// # Examples
///
/// ```
/// use relief_terrain::Rgba;
///
/// assert_eq!(Rgba::from_hex("#FFFFFF"), Some(Rgba::WHITE));
/// assert_eq!(Rgba::WHITE.lerp(Rgba::CLEAR, 1.0), Rgba::CLEAR);
/// assert_eq!(Rgba::BLACK.to_rgba8(), [0, 0, 0, 255]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha (0 is transparent).
    pub a: f32,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Fully transparent black.
    pub const CLEAR: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a colour from raw channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    /// Six-digit colours are fully opaque.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() || !matches!(digits.len(), 6 | 8) {
            return None;
        }
        let channel = |i: usize| -> Option<f32> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        let a = if digits.len() == 8 { channel(6)? } else { 1.0 };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Quantize to 8-bit channels.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Linear interpolation; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

/// One terrain zone: every height up to `threshold` (inclusive) not claimed
/// by an earlier band gets `color`.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionBand {
    /// Display label, e.g. "Water Deep".
    pub name: String,
    /// Inclusive upper height bound.
    pub threshold: f32,
    /// Colour for heights in this band.
    pub color: Rgba,
}

impl RegionBand {
    /// Create a band.
    pub fn new(name: impl Into<String>, threshold: f32, color: Rgba) -> Self {
        Self {
            name: name.into(),
            threshold,
            color,
        }
    }
}

/// The eight built-in terrain bands, water to snow.
pub fn default_regions() -> Vec<RegionBand> {
    const BANDS: [(&str, f32, &str); 8] = [
        ("Water Deep", 0.3, "#3263C300"),
        ("Water Shallow", 0.4, "#3666C600"),
        ("Sand", 0.45, "#D2CF7D00"),
        ("Grass", 0.55, "#56971700"),
        ("Grass 2", 0.6, "#3D6A1200"),
        ("Rock", 0.7, "#59453C00"),
        ("Rock 2", 0.9, "#4A3B3500"),
        ("Snow", 1.0, "#FFFFFF00"),
    ];

    BANDS
        .iter()
        .map(|&(name, threshold, hex)| {
            RegionBand::new(name, threshold, Rgba::from_hex(hex).unwrap_or(Rgba::CLEAR))
        })
        .collect()
}

/// Colour of the first band whose threshold is `>= height`.
///
/// Heights above every threshold take the last band's colour. An empty band
/// list yields [`Rgba::CLEAR`].
pub fn classify_height(height: f32, bands: &[RegionBand]) -> Rgba {
    bands
        .iter()
        .find(|band| height <= band.threshold)
        .or(bands.last())
        .map_or(Rgba::CLEAR, |band| band.color)
}

/// Colouring rules for the stylised (line-art) variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StylisedRule {
    /// Every `period`-th row is `line`, all other rows are `gap`.
    /// The height field is ignored.
    Stripes { period: u32, line: Rgba, gap: Rgba },
    /// Non-negative heights are white; negative heights fade toward clear
    /// by `-height`.
    Fade,
}

impl Default for StylisedRule {
    fn default() -> Self {
        Self::Stripes {
            period: 4,
            line: Rgba::WHITE,
            gap: Rgba::BLACK,
        }
    }
}

impl StylisedRule {
    /// Colour of the cell in `row` with the given height.
    pub fn classify(&self, row: usize, height: f32) -> Rgba {
        match *self {
            Self::Stripes { period, line, gap } => {
                let period = period.max(1) as usize;
                if row % period == 0 { line } else { gap }
            }
            Self::Fade => {
                if height < 0.0 {
                    Rgba::WHITE.lerp(Rgba::CLEAR, -height)
                } else {
                    Rgba::WHITE
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Rgba = Rgba::new(1.0, 0.0, 0.0, 1.0);
    const B: Rgba = Rgba::new(0.0, 1.0, 0.0, 1.0);
    const C: Rgba = Rgba::new(0.0, 0.0, 1.0, 1.0);

    fn three_bands() -> Vec<RegionBand> {
        vec![
            RegionBand::new("a", 0.3, A),
            RegionBand::new("b", 0.6, B),
            RegionBand::new("c", 1.0, C),
        ]
    }

    #[test]
    fn test_first_matching_band_wins() {
        let bands = three_bands();
        assert_eq!(classify_height(0.25, &bands), A);
        assert_eq!(classify_height(0.45, &bands), B);
        assert_eq!(classify_height(0.6, &bands), B, "boundary is inclusive");
        assert_eq!(classify_height(0.95, &bands), C);
    }

    #[test]
    fn test_height_above_all_bands_clamps_to_last() {
        let bands = vec![RegionBand::new("a", 0.3, A), RegionBand::new("b", 0.8, B)];
        assert_eq!(classify_height(0.9, &bands), B);
    }

    #[test]
    fn test_empty_bands_are_clear() {
        assert_eq!(classify_height(0.5, &[]), Rgba::CLEAR);
    }

    #[test]
    fn test_default_regions() {
        let regions = default_regions();
        let thresholds: Vec<f32> = regions.iter().map(|r| r.threshold).collect();
        assert_eq!(thresholds, vec![0.3, 0.4, 0.45, 0.55, 0.6, 0.7, 0.9, 1.0]);
        assert_eq!(regions[0].name, "Water Deep");
        assert_eq!(regions[7].name, "Snow");
        assert_eq!(regions[0].color.to_rgba8(), [0x32, 0x63, 0xC3, 0x00]);
        assert_eq!(regions[7].color.to_rgba8(), [0xFF, 0xFF, 0xFF, 0x00]);
        assert!(thresholds.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgba::from_hex("#FFFFFF"), Some(Rgba::WHITE));
        assert_eq!(Rgba::from_hex("00000000"), Some(Rgba::CLEAR));
        assert_eq!(Rgba::from_hex("#12345"), None);
        assert_eq!(Rgba::from_hex("#GG0000"), None);
        assert_eq!(Rgba::from_hex("#ÿÿÿ"), None);
    }

    #[test]
    fn test_stripes_ignore_height() {
        let rule = StylisedRule::Stripes {
            period: 3,
            line: A,
            gap: B,
        };
        assert_eq!(rule.classify(0, 0.9), A);
        assert_eq!(rule.classify(1, 0.9), B);
        assert_eq!(rule.classify(2, -0.3), B);
        assert_eq!(rule.classify(3, -0.3), A);
    }

    #[test]
    fn test_stripes_period_clamped_to_one() {
        let rule = StylisedRule::Stripes {
            period: 0,
            line: A,
            gap: B,
        };
        for row in 0..5 {
            assert_eq!(rule.classify(row, 0.0), A);
        }
    }

    #[test]
    fn test_fade_rule() {
        let rule = StylisedRule::Fade;
        assert_eq!(rule.classify(0, 0.4), Rgba::WHITE);
        assert_eq!(rule.classify(0, -1.5), Rgba::CLEAR);
        let half = rule.classify(0, -0.5);
        assert!((half.a - 0.5).abs() < 1e-6);
    }
}
