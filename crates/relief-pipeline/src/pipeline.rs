//! Synchronous generation steps shared by the worker pool and callers that
//! want results inline.

use relief_mesh::{MeshData, MeshSettings, build_mesh};
use relief_terrain::{
    ColorBuffer, HeightField, color_map_for_stylised, color_map_for_terrain, generate_height_field,
};

use crate::error::GenerationError;
use crate::request::{Coloring, MapRequest};

/// A generated height field and its colour buffer (same dimensions).
#[derive(Clone, Debug, PartialEq)]
pub struct MapData {
    pub field: HeightField,
    pub colors: ColorBuffer,
}

/// Generate the height field for `request` and colour it.
pub fn generate_map_data(request: &MapRequest) -> MapData {
    let field = generate_height_field(&request.noise, request.size, request.size);
    let colors = match &request.coloring {
        Coloring::Regions(bands) => color_map_for_terrain(&field, bands),
        Coloring::Stylised(rule) => color_map_for_stylised(&field, rule),
    };
    MapData { field, colors }
}

/// Mesh a height field.
pub fn generate_mesh_data(
    field: &HeightField,
    settings: &MeshSettings,
) -> Result<MeshData, GenerationError> {
    Ok(build_mesh(field, settings)?)
}
