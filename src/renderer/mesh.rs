use crate::renderer::vertex::TerrainVertex;

/// Geometry produced for one chunk at one detail level.
///
/// Positions are relative to the chunk center. Triangles are flat index
/// triples into `vertices`; `uvs` runs parallel to `vertices`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainMesh {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<u32>,
    pub uvs: Vec<[f32; 2]>,
}

impl TerrainMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preallocated for a `verts_x` by `verts_z` vertex grid
    pub fn with_grid_capacity(verts_x: usize, verts_z: usize) -> Self {
        let vertex_count = verts_x * verts_z;
        let quad_count = verts_x.saturating_sub(1) * verts_z.saturating_sub(1);
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(quad_count * 6),
            uvs: Vec::with_capacity(vertex_count),
        }
    }

    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.triangles.extend_from_slice(&[a, b, c]);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Triangles as index triples
    pub fn triangle_iter(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Position and uv interleaved for upload
    pub fn interleaved(&self) -> Vec<TerrainVertex> {
        self.vertices
            .iter()
            .zip(&self.uvs)
            .map(|(&position, &uv)| TerrainVertex::new(position, uv))
            .collect()
    }
}
