//! Mesh buffers produced by the builder.

/// How the index buffer is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    /// Three indices per triangle.
    Triangles,
    /// Two indices per line segment.
    Lines,
}

/// Separate position, UV, index and (optional) normal buffers ready for upload.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    /// Vertex positions, centred on the origin in the XZ plane with Y up.
    pub positions: Vec<[f32; 3]>,
    /// Texture coordinates in `[0, 1]` across the chunk interior.
    pub uvs: Vec<[f32; 2]>,
    /// Index buffer, interpreted according to `primitive`.
    pub indices: Vec<u32>,
    /// Per-vertex normals. `None` for line meshes.
    pub normals: Option<Vec<[f32; 3]>>,
    /// Index topology.
    pub primitive: Primitive,
}

impl MeshData {
    /// Creates an empty mesh of the given topology.
    pub fn new(primitive: Primitive) -> Self {
        Self {
            positions: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            normals: None,
            primitive,
        }
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, position: [f32; 3], uv: [f32; 2]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.uvs.push(uv);
        index
    }

    /// Appends one triangle.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Appends one line segment.
    pub fn push_line(&mut self, a: u32, b: u32) {
        self.indices.extend_from_slice(&[a, b]);
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles, or 0 for line meshes.
    pub fn triangle_count(&self) -> usize {
        match self.primitive {
            Primitive::Triangles => self.indices.len() / 3,
            Primitive::Lines => 0,
        }
    }

    /// Number of line segments, or 0 for triangle meshes.
    pub fn line_count(&self) -> usize {
        match self.primitive {
            Primitive::Lines => self.indices.len() / 2,
            Primitive::Triangles => 0,
        }
    }

    /// Returns `true` if every index is in bounds, the index count matches
    /// the primitive, and the per-vertex buffers agree in length.
    pub fn validate_indices(&self) -> bool {
        let per_primitive = match self.primitive {
            Primitive::Triangles => 3,
            Primitive::Lines => 2,
        };
        let vertex_count = self.positions.len();
        self.indices.len() % per_primitive == 0
            && self.uvs.len() == vertex_count
            && self
                .normals
                .as_ref()
                .is_none_or(|n| n.len() == vertex_count)
            && self.indices.iter().all(|&i| (i as usize) < vertex_count)
    }

    /// Positions as a byte slice for GPU upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Indices as a byte slice for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mesh() {
        let mesh = MeshData::new(Primitive::Triangles);
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.validate_indices());
    }

    #[test]
    fn test_push_triangle() {
        let mut mesh = MeshData::new(Primitive::Triangles);
        let a = mesh.push_vertex([0.0, 0.0, 0.0], [0.0, 0.0]);
        let b = mesh.push_vertex([1.0, 0.0, 0.0], [1.0, 0.0]);
        let c = mesh.push_vertex([0.0, 0.0, 1.0], [0.0, 1.0]);
        mesh.push_triangle(a, b, c);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.line_count(), 0);
        assert!(mesh.validate_indices());
        assert_eq!(mesh.position_bytes().len(), 3 * 12);
        assert_eq!(mesh.index_bytes().len(), 3 * 4);
    }

    #[test]
    fn test_out_of_bounds_index_detected() {
        let mut mesh = MeshData::new(Primitive::Lines);
        let a = mesh.push_vertex([0.0; 3], [0.0; 2]);
        mesh.push_line(a, 5);
        assert_eq!(mesh.line_count(), 1);
        assert!(!mesh.validate_indices());
    }

    #[test]
    fn test_normal_length_mismatch_detected() {
        let mut mesh = MeshData::new(Primitive::Triangles);
        mesh.push_vertex([0.0; 3], [0.0; 2]);
        mesh.normals = Some(Vec::new());
        assert!(!mesh.validate_indices());
    }
}
