//! Height field to mesh conversion.
//!
//! The field is sampled on an LOD-strided lattice inside an optional border.
//! When a border is present, one skirt sample per side is taken from the
//! border so that smooth normals along the chunk edge account for the
//! neighbouring terrain. Skirt samples are never emitted.

use glam::Vec3;
use relief_terrain::{HeightField, ResponseCurve};

use crate::error::MeshError;
use crate::lod::simplification_stride;
use crate::mesh_data::{MeshData, Primitive};
use crate::normals::{flat_normals, smooth_normals};

/// Normal generation mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Shading {
    /// Shared vertices with normals averaged over adjacent faces.
    #[default]
    Smooth,
    /// Every triangle owns three vertices carrying its face normal.
    Flat,
}

/// Index topology emitted for the sampled lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Topology {
    /// A filled surface: two triangles per lattice quad.
    #[default]
    Triangles,
    /// One polyline per lattice row.
    Lines,
    /// One strip of quads per lattice row; each sample is doubled at
    /// `z ± half_width`.
    Ribbons { half_width: f32 },
}

/// Mesh building options.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshSettings {
    /// Multiplier applied to curved heights.
    pub height_scale: f32,
    /// Response applied to each height sample before scaling.
    pub height_curve: ResponseCurve,
    /// Level of detail; see [`simplification_stride`].
    pub lod: u32,
    /// Normal mode. Ignored for [`Topology::Lines`].
    pub shading: Shading,
    /// Index topology.
    pub topology: Topology,
    /// Margin in samples on every side of the field that is not meshed.
    pub border: usize,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            height_scale: 1.0,
            height_curve: ResponseCurve::identity(),
            lod: 0,
            shading: Shading::Smooth,
            topology: Topology::Triangles,
            border: 0,
        }
    }
}

/// Sampled vertex lattice, skirt included.
struct VertexGrid {
    /// Per-axis samples: `true` for lattice samples, `false` for skirt samples.
    axis: Vec<bool>,
    /// Row-major positions, `axis.len()²` entries.
    positions: Vec<Vec3>,
    /// Row-major UVs matching `positions`.
    uvs: Vec<[f32; 2]>,
}

impl VertexGrid {
    fn side(&self) -> usize {
        self.axis.len()
    }

    fn index(&self, col: usize, row: usize) -> usize {
        row * self.side() + col
    }

    fn is_emitted(&self, col: usize, row: usize) -> bool {
        self.axis[col] && self.axis[row]
    }

    /// Lattice sample indices along either axis, skirt excluded.
    fn lattice(&self) -> impl Iterator<Item = usize> + '_ {
        self.axis.iter().enumerate().filter(|(_, e)| **e).map(|(i, _)| i)
    }
}

/// Convert a height field into a mesh.
///
/// The field must be square. Its interior (`side - 2 * border` samples) must
/// satisfy `(interior - 1) % stride == 0` for the requested LOD.
pub fn build_mesh(field: &HeightField, settings: &MeshSettings) -> Result<MeshData, MeshError> {
    let grid = sample_grid(field, settings)?;

    let mut mesh = match settings.topology {
        Topology::Triangles => triangulate_surface(&grid, settings.shading),
        Topology::Lines => return Ok(line_rows(&grid)),
        Topology::Ribbons { half_width } => ribbon_rows(&grid, half_width, settings.shading),
    };

    if settings.shading == Shading::Flat {
        mesh = expand_flat(&mesh);
    }
    Ok(mesh)
}

fn sample_grid(field: &HeightField, settings: &MeshSettings) -> Result<VertexGrid, MeshError> {
    let (width, height) = (field.width(), field.height());
    if width != height {
        return Err(MeshError::NotSquare { width, height });
    }
    let size = width;
    let border = settings.border;
    if size < 2 * border + 2 {
        return Err(MeshError::FieldTooSmall {
            width,
            height,
            border,
        });
    }

    let interior = size - 2 * border;
    let stride = simplification_stride(settings.lod);
    if (interior - 1) % stride != 0 {
        return Err(MeshError::StrideMismatch { interior, stride });
    }

    // (field cell, emitted)
    let mut samples: Vec<(usize, bool)> = Vec::with_capacity((interior - 1) / stride + 3);
    if border > 0 {
        samples.push((border - 1, false));
    }
    samples.extend((0..interior).step_by(stride).map(|k| (border + k, true)));
    if border > 0 {
        samples.push((size - border, false));
    }

    let extent = (interior - 1) as f32;
    let half = extent / 2.0;
    let side = samples.len();
    let mut positions = Vec::with_capacity(side * side);
    let mut uvs = Vec::with_capacity(side * side);

    for &(row, _) in &samples {
        for &(col, _) in &samples {
            let local_x = col as f32 - border as f32;
            let local_y = row as f32 - border as f32;
            let h = settings.height_curve.evaluate(field.get(col, row) as f64) as f32
                * settings.height_scale;
            positions.push(Vec3::new(local_x - half, h, half - local_y));
            uvs.push([local_x / extent, local_y / extent]);
        }
    }

    Ok(VertexGrid {
        axis: samples.into_iter().map(|(_, emitted)| emitted).collect(),
        positions,
        uvs,
    })
}

/// Two triangles per quad, `(a, d, c)` and `(d, a, b)` with `a` top-left,
/// `b` top-right, `c` bottom-left, `d` bottom-right.
fn triangulate_surface(grid: &VertexGrid, shading: Shading) -> MeshData {
    let side = grid.side();

    let mut grid_indices = Vec::with_capacity((side - 1) * (side - 1) * 6);
    for row in 0..side - 1 {
        for col in 0..side - 1 {
            let a = grid.index(col, row) as u32;
            let b = grid.index(col + 1, row) as u32;
            let c = grid.index(col, row + 1) as u32;
            let d = grid.index(col + 1, row + 1) as u32;
            grid_indices.extend_from_slice(&[a, d, c, d, a, b]);
        }
    }

    let mut mesh = MeshData::new(Primitive::Triangles);
    let mut remap = vec![None; side * side];
    for row in 0..side {
        for col in 0..side {
            if grid.is_emitted(col, row) {
                let i = grid.index(col, row);
                remap[i] = Some(mesh.push_vertex(grid.positions[i].to_array(), grid.uvs[i]));
            }
        }
    }

    for tri in grid_indices.chunks_exact(3) {
        if let (Some(a), Some(b), Some(c)) = (
            remap[tri[0] as usize],
            remap[tri[1] as usize],
            remap[tri[2] as usize],
        ) {
            mesh.push_triangle(a, b, c);
        }
    }

    if shading == Shading::Smooth {
        // Skirt triangles contribute here even though they are not emitted.
        let normals = smooth_normals(&grid.positions, &grid_indices);
        mesh.normals = Some(
            normals
                .iter()
                .zip(&remap)
                .filter(|(_, r)| r.is_some())
                .map(|(n, _)| n.to_array())
                .collect(),
        );
    }

    mesh
}

fn line_rows(grid: &VertexGrid) -> MeshData {
    let mut mesh = MeshData::new(Primitive::Lines);
    for row in grid.lattice() {
        let mut previous = None;
        for col in grid.lattice() {
            let i = grid.index(col, row);
            let v = mesh.push_vertex(grid.positions[i].to_array(), grid.uvs[i]);
            if let Some(p) = previous {
                mesh.push_line(p, v);
            }
            previous = Some(v);
        }
    }
    mesh
}

fn ribbon_rows(grid: &VertexGrid, half_width: f32, shading: Shading) -> MeshData {
    let mut mesh = MeshData::new(Primitive::Triangles);
    let offset = Vec3::new(0.0, 0.0, half_width);

    for row in grid.lattice() {
        // (upper, lower) per column
        let mut previous: Option<(u32, u32)> = None;
        for col in grid.lattice() {
            let i = grid.index(col, row);
            let p = grid.positions[i];
            let upper = mesh.push_vertex((p + offset).to_array(), grid.uvs[i]);
            let lower = mesh.push_vertex((p - offset).to_array(), grid.uvs[i]);
            if let Some((a, c)) = previous {
                let (b, d) = (upper, lower);
                mesh.push_triangle(a, d, c);
                mesh.push_triangle(d, a, b);
            }
            previous = Some((upper, lower));
        }
    }

    if shading == Shading::Smooth {
        let positions: Vec<Vec3> = mesh.positions.iter().copied().map(Vec3::from).collect();
        mesh.normals = Some(
            smooth_normals(&positions, &mesh.indices)
                .into_iter()
                .map(|n| n.to_array())
                .collect(),
        );
    }

    mesh
}

/// Give every triangle three private vertices and renumber indices `0..3n`.
fn expand_flat(mesh: &MeshData) -> MeshData {
    let positions: Vec<[f32; 3]> = mesh.indices.iter().map(|&i| mesh.positions[i as usize]).collect();
    let uvs: Vec<[f32; 2]> = mesh.indices.iter().map(|&i| mesh.uvs[i as usize]).collect();
    let points: Vec<Vec3> = positions.iter().copied().map(Vec3::from).collect();
    let normals = flat_normals(&points).into_iter().map(|n| n.to_array()).collect();

    MeshData {
        indices: (0..positions.len() as u32).collect(),
        positions,
        uvs,
        normals: Some(normals),
        primitive: mesh.primitive,
    }
}
