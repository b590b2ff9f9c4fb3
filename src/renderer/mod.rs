//! Geometry side of the pipeline: the mesh builder, its output types and the
//! trait through which finished chunks are handed to a renderer.

pub mod display;
pub mod mesh;
pub mod mesh_builder;
pub mod vertex;

pub use display::{ChunkDisplay, NullDisplay};
pub use mesh::TerrainMesh;
pub use mesh_builder::{build_terrain_mesh, detail_step, vertices_per_line};
pub use vertex::TerrainVertex;
