//! Procedural terrain fields: multi-octave noise synthesis, response curves,
//! and height-to-colour classification.

mod color_map;
mod curve;
mod noise_field;
mod params;
mod region;

pub use color_map::{ColorBuffer, color_map_for_stylised, color_map_for_terrain};
pub use curve::{CurveKey, ResponseCurve};
pub use noise_field::{HeightField, NoiseField, generate_height_field};
pub use params::{MIN_LACUNARITY, MIN_SCALE, NoiseParams, NoiseVariant};
pub use region::{RegionBand, Rgba, StylisedRule, classify_height, default_regions};
