use std::sync::Arc;

use cgmath::Point2;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::renderer::TerrainMesh;
use crate::world::{ChunkBounds, ChunkCoord, Color32, MapData};

/// Lifecycle of a streamed chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    /// Waiting for height data or its first mesh
    Pending,
    /// At least one mesh has been handed to the display
    Ready,
    /// A job for this chunk failed; it will not be retried
    Failed,
}

/// One cell of the endless terrain grid
#[derive(Debug)]
pub struct TerrainChunk {
    coord: ChunkCoord,
    center: Point2<f32>,
    bounds: ChunkBounds,
    visible: bool,
    state: ChunkState,
    /// Level this chunk should currently be shown at
    detail_level: u32,
    /// Level of the mesh last handed to the display
    displayed_level: Option<u32>,
    colors: Vec<Color32>,
    /// Kept while further detail levels may still be requested
    map_data: Option<Arc<MapData>>,
    meshes: FxHashMap<u32, TerrainMesh>,
    requested_levels: FxHashSet<u32>,
    /// Levels whose mesh job failed; never requested again
    abandoned_levels: FxHashSet<u32>,
}

impl TerrainChunk {
    pub(crate) fn new(coord: ChunkCoord, chunk_size: f32, detail_level: u32) -> Self {
        let center = coord.to_world_pos(chunk_size);
        Self {
            coord,
            center,
            bounds: ChunkBounds::square(center, chunk_size),
            visible: false,
            state: ChunkState::Pending,
            detail_level,
            displayed_level: None,
            colors: Vec::new(),
            map_data: None,
            meshes: FxHashMap::default(),
            requested_levels: FxHashSet::default(),
            abandoned_levels: FxHashSet::default(),
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// World x/z of the chunk center
    pub fn center(&self) -> Point2<f32> {
        self.center
    }

    pub fn bounds(&self) -> &ChunkBounds {
        &self.bounds
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn state(&self) -> ChunkState {
        self.state
    }

    pub fn detail_level(&self) -> u32 {
        self.detail_level
    }

    pub fn displayed_level(&self) -> Option<u32> {
        self.displayed_level
    }

    /// Band colors, empty until height data arrives
    pub fn colors(&self) -> &[Color32] {
        &self.colors
    }

    pub fn has_map_data(&self) -> bool {
        self.map_data.is_some()
    }

    pub fn mesh(&self, detail_level: u32) -> Option<&TerrainMesh> {
        self.meshes.get(&detail_level)
    }

    /// Mesh last handed to the display
    pub fn displayed_mesh(&self) -> Option<&TerrainMesh> {
        self.displayed_level.and_then(|level| self.meshes.get(&level))
    }

    pub fn mesh_levels(&self) -> impl Iterator<Item = u32> + '_ {
        self.meshes.keys().copied()
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_detail_level(&mut self, detail_level: u32) {
        self.detail_level = detail_level;
    }

    pub(crate) fn set_displayed_level(&mut self, detail_level: u32) {
        self.displayed_level = Some(detail_level);
        self.state = ChunkState::Ready;
    }

    pub(crate) fn mark_failed(&mut self) {
        self.state = ChunkState::Failed;
        self.requested_levels.clear();
        self.map_data = None;
    }

    /// Store height results; returns the shared data for the mesh request
    pub(crate) fn attach_map_data(&mut self, map_data: MapData) -> Arc<MapData> {
        self.colors = map_data.color_map.clone();
        let map_data = Arc::new(map_data);
        self.map_data = Some(Arc::clone(&map_data));
        map_data
    }

    pub(crate) fn map_data(&self) -> Option<&Arc<MapData>> {
        self.map_data.as_ref()
    }

    pub(crate) fn release_map_data(&mut self) {
        self.map_data = None;
    }

    /// Record a mesh request; false if one is already outstanding, done or
    /// abandoned
    pub(crate) fn begin_mesh_request(&mut self, detail_level: u32) -> bool {
        if self.meshes.contains_key(&detail_level) || self.abandoned_levels.contains(&detail_level) {
            return false;
        }
        self.requested_levels.insert(detail_level)
    }

    pub(crate) fn attach_mesh(&mut self, detail_level: u32, mesh: TerrainMesh) {
        self.requested_levels.remove(&detail_level);
        self.meshes.insert(detail_level, mesh);
    }

    pub(crate) fn abandon_mesh_level(&mut self, detail_level: u32) {
        self.requested_levels.remove(&detail_level);
        self.abandoned_levels.insert(detail_level);
    }

    pub(crate) fn has_outstanding_requests(&self) -> bool {
        !self.requested_levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::HeightField;

    #[test]
    fn test_new_chunk_is_pending_and_hidden() {
        let chunk = TerrainChunk::new(ChunkCoord::new(1, -1), 240.0, 0);
        assert_eq!(chunk.state(), ChunkState::Pending);
        assert!(!chunk.is_visible());
        assert_eq!(chunk.center(), Point2::new(240.0, -240.0));
        assert_eq!(chunk.bounds().min(), Point2::new(120.0, -360.0));
        assert!(chunk.displayed_mesh().is_none());
    }

    #[test]
    fn test_mesh_requests_are_deduplicated() {
        let mut chunk = TerrainChunk::new(ChunkCoord::new(0, 0), 240.0, 0);
        assert!(chunk.begin_mesh_request(2));
        assert!(!chunk.begin_mesh_request(2));
        chunk.attach_mesh(2, TerrainMesh::new());
        assert!(!chunk.begin_mesh_request(2));
        assert!(!chunk.has_outstanding_requests());

        assert!(chunk.begin_mesh_request(0));
        chunk.abandon_mesh_level(0);
        assert!(!chunk.has_outstanding_requests());
        assert!(!chunk.begin_mesh_request(0));
    }

    #[test]
    fn test_map_data_is_shared_and_releasable() {
        let mut chunk = TerrainChunk::new(ChunkCoord::new(0, 0), 240.0, 0);
        let data = MapData {
            height_map: HeightField::new(2, 2),
            color_map: vec![Color32::rgb(1, 2, 3); 4],
        };
        let shared = chunk.attach_map_data(data);
        assert_eq!(Arc::strong_count(&shared), 2);
        assert_eq!(chunk.colors().len(), 4);

        chunk.release_map_data();
        assert!(!chunk.has_map_data());
        assert_eq!(chunk.colors().len(), 4);
    }
}
