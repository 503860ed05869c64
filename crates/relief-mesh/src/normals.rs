//! Face and vertex normals.

use glam::Vec3;

/// Unit normal of triangle `(a, b, c)`: `normalize((b - a) × (c - a))`.
/// Degenerate triangles yield zero.
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

/// Averaged per-vertex normals: every triangle adds its unit face normal to
/// its three vertices, then each sum is normalized. Vertices whose sum
/// vanishes (unused or only in degenerate faces) point up.
pub fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut sums = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let n = face_normal(positions[a], positions[b], positions[c]);
        sums[a] += n;
        sums[b] += n;
        sums[c] += n;
    }
    sums.into_iter()
        .map(|n| {
            let n = n.normalize_or_zero();
            if n == Vec3::ZERO { Vec3::Y } else { n }
        })
        .collect()
}

/// One normal per vertex for an unshared (flat-expanded) triangle list, where
/// vertex `i` belongs to triangle `i / 3`.
pub fn flat_normals(positions: &[Vec3]) -> Vec<Vec3> {
    positions
        .chunks_exact(3)
        .flat_map(|tri| {
            let n = face_normal(tri[0], tri[1], tri[2]);
            let n = if n == Vec3::ZERO { Vec3::Y } else { n };
            [n; 3]
        })
        .collect()
}
