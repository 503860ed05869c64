//! Level-of-detail strides and chunk sizing.
//!
//! A chunk's interior has `size` samples per side. Every LOD in `0..=MAX_LOD`
//! must divide `size - 1` so simplified meshes share the full-detail corners.

use crate::builder::Shading;

/// Highest supported level of detail.
pub const MAX_LOD: u32 = 6;

/// Interior samples per side for smooth-shaded chunks. 240 = lcm(1, 2, 4, .., 12) * 2.
pub const SMOOTH_CHUNK_SIZE: usize = 241;

/// Interior samples per side for flat-shaded chunks, which triple their
/// vertex count and so use a smaller chunk.
pub const FLAT_CHUNK_SIZE: usize = 121;

/// Sample stride for a level of detail: 1 at LOD 0, `2 * lod` otherwise.
pub fn simplification_stride(lod: u32) -> usize {
    if lod == 0 { 1 } else { 2 * lod as usize }
}

/// Interior samples per side for the given shading mode.
pub fn chunk_size(shading: Shading) -> usize {
    match shading {
        Shading::Smooth => SMOOTH_CHUNK_SIZE,
        Shading::Flat => FLAT_CHUNK_SIZE,
    }
}

/// Side length of the height field to request so that a chunk with the given
/// shading and border can be meshed at any LOD up to [`MAX_LOD`].
pub fn field_size(shading: Shading, border: usize) -> usize {
    chunk_size(shading) + 2 * border
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_per_lod() {
        assert_eq!(simplification_stride(0), 1);
        assert_eq!(simplification_stride(1), 2);
        assert_eq!(simplification_stride(2), 4);
        assert_eq!(simplification_stride(6), 12);
    }

    #[test]
    fn test_chunk_sizes_support_every_lod() {
        for shading in [Shading::Smooth, Shading::Flat] {
            let size = chunk_size(shading);
            for lod in 0..=MAX_LOD {
                let stride = simplification_stride(lod);
                assert_eq!(
                    (size - 1) % stride,
                    0,
                    "{shading:?} chunk of {size} does not support LOD {lod}"
                );
            }
        }
    }

    #[test]
    fn test_field_size_adds_border() {
        assert_eq!(field_size(Shading::Smooth, 0), 241);
        assert_eq!(field_size(Shading::Smooth, 1), 243);
        assert_eq!(field_size(Shading::Flat, 2), 125);
    }
}
