use bytemuck::{Pod, Zeroable};

/// Interleaved terrain vertex, ready for a vertex buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl TerrainVertex {
    pub fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }

    /// Byte stride of one vertex
    pub const STRIDE: usize = std::mem::size_of::<TerrainVertex>();
}
