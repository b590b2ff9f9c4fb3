//! Outbound seam to the rendering collaborator
//!
//! The streamer never draws anything itself. It reports finished geometry and
//! visibility transitions through [`ChunkDisplay`]; the host turns those into
//! GPU buffers, scene nodes or whatever its renderer uses.

use cgmath::Point2;

use crate::error::TerrainError;
use crate::renderer::mesh::TerrainMesh;
use crate::world::{ChunkCoord, Color32};

/// Receives chunk geometry and visibility changes from the streamer.
///
/// All calls happen on the tick thread.
pub trait ChunkDisplay {
    /// A mesh finished for `coord`. `origin` is the chunk center in world x/z;
    /// mesh positions are relative to it. Called again whenever the chunk
    /// switches to a mesh of another detail level.
    fn mesh_ready(&mut self, coord: ChunkCoord, origin: Point2<f32>, mesh: &TerrainMesh, colors: &[Color32]);

    /// The chunk entered or left the view window
    fn visibility_changed(&mut self, coord: ChunkCoord, visible: bool);

    /// Generation for the chunk failed; it will never become ready
    fn chunk_failed(&mut self, coord: ChunkCoord, error: &TerrainError) {
        let _ = (coord, error);
    }
}

/// Display that discards everything, for headless sessions
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl ChunkDisplay for NullDisplay {
    fn mesh_ready(&mut self, _coord: ChunkCoord, _origin: Point2<f32>, _mesh: &TerrainMesh, _colors: &[Color32]) {}

    fn visibility_changed(&mut self, _coord: ChunkCoord, _visible: bool) {}
}
