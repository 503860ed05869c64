//! Height-field meshing: LOD-strided vertex grids, triangle/line/ribbon
//! topologies, and smooth or flat normals.

pub mod builder;
pub mod error;
pub mod lod;
pub mod mesh_data;
pub mod normals;

pub use builder::{MeshSettings, Shading, Topology, build_mesh};
pub use error::MeshError;
pub use lod::{
    FLAT_CHUNK_SIZE, MAX_LOD, SMOOTH_CHUNK_SIZE, chunk_size, field_size, simplification_stride,
};
pub use mesh_data::{MeshData, Primitive};
pub use normals::{face_normal, flat_normals, smooth_normals};
