//! Chunk streamer
//!
//! Owns the sparse chunk registry around the viewer. Each update sweeps the
//! square of cells that can reach the view distance, creates pending chunks
//! for unseen cells and toggles visibility of the known ones. Only net
//! visibility transitions reach the display.
//!
//! Chunks are never evicted. Memory grows with the area the viewer has
//! covered during a session.

use std::sync::Arc;

use cgmath::Point2;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::{DetailLevelInfo, TerrainConfig};
use crate::constants::streaming::VERBOSE_UPDATE_COUNT;
use crate::error::{TerrainError, TerrainResult};
use crate::renderer::{ChunkDisplay, TerrainMesh};
use crate::streaming::stream_pipeline::{PipelineEvent, TerrainDataPipeline};
use crate::streaming::terrain_chunk::{ChunkState, TerrainChunk};
use crate::world::{ChunkBounds, ChunkCoord, MapData};

/// Streamer statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamerStats {
    pub updates: u64,
    pub chunk_count: usize,
    pub visible_count: usize,
    pub pending: usize,
    pub ready: usize,
    pub failed: usize,
}

/// Result of one visibility update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityUpdate {
    pub viewer_coord: ChunkCoord,
    pub created: usize,
    pub shown: Vec<ChunkCoord>,
    pub hidden: Vec<ChunkCoord>,
}

/// Detail level for a chunk whose nearest edge is `distance` from the viewer
pub fn select_detail_level(levels: &[DetailLevelInfo], distance: f32) -> u32 {
    levels
        .iter()
        .find(|info| distance <= info.visible_distance_threshold)
        .or_else(|| levels.last())
        .map(|info| info.detail_level)
        .unwrap_or(0)
}

/// Streams terrain chunks around a moving viewer
pub struct ChunkStreamer<D: ChunkDisplay> {
    config: Arc<TerrainConfig>,
    pipeline: Arc<TerrainDataPipeline>,
    display: D,
    chunks: FxHashMap<ChunkCoord, TerrainChunk>,
    visible_last_update: Vec<ChunkCoord>,
    viewer_position: Point2<f32>,
    updates: u64,
}

impl<D: ChunkDisplay> ChunkStreamer<D> {
    pub fn new(config: Arc<TerrainConfig>, pipeline: Arc<TerrainDataPipeline>, display: D) -> Self {
        Self {
            config,
            pipeline,
            display,
            chunks: FxHashMap::default(),
            visible_last_update: Vec::new(),
            viewer_position: Point2::new(0.0, 0.0),
            updates: 0,
        }
    }

    /// Recompute the view window around `viewer` (world x/z)
    pub fn update_visible_chunks(&mut self, viewer: Point2<f32>) -> VisibilityUpdate {
        self.updates += 1;
        self.viewer_position = viewer;

        let chunk_size = self.config.chunk_size();
        let view_distance = self.config.streaming.view_distance;
        let sqr_view_distance = view_distance * view_distance;
        let radius = (view_distance / chunk_size).ceil() as i32;
        let viewer_coord = ChunkCoord::from_world_pos(viewer, chunk_size);

        let previously_visible = std::mem::take(&mut self.visible_last_update);
        for coord in &previously_visible {
            if let Some(chunk) = self.chunks.get_mut(coord) {
                chunk.set_visible(false);
            }
        }

        let mut visible = Vec::new();
        let mut created = 0;

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                // Cells past the edge of the grid do not exist
                let Some(coord) = viewer_coord.checked_offset(dx, dy) else {
                    continue;
                };

                if self.chunks.contains_key(&coord) {
                    if let Some(level) = self.refresh_chunk(coord, viewer, sqr_view_distance) {
                        visible.push(coord);
                        self.show_detail_level(coord, level);
                    }
                } else {
                    // Not evaluated for visibility until the next update
                    let center = coord.to_world_pos(chunk_size);
                    let distance = ChunkBounds::square(center, chunk_size).distance(viewer);
                    let level = select_detail_level(&self.config.streaming.detail_levels, distance);
                    self.chunks.insert(coord, TerrainChunk::new(coord, chunk_size, level));
                    self.pipeline.request_height_data(coord, center);
                    created += 1;
                }
            }
        }

        let before: FxHashSet<ChunkCoord> = previously_visible.iter().copied().collect();
        let after: FxHashSet<ChunkCoord> = visible.iter().copied().collect();

        let hidden: Vec<ChunkCoord> = previously_visible
            .iter()
            .copied()
            .filter(|coord| !after.contains(coord))
            .collect();
        let shown: Vec<ChunkCoord> = visible.iter().copied().filter(|coord| !before.contains(coord)).collect();

        for &coord in &hidden {
            self.display.visibility_changed(coord, false);
        }
        for &coord in &shown {
            self.display.visibility_changed(coord, true);
        }

        self.visible_last_update = visible;

        if self.updates <= VERBOSE_UPDATE_COUNT {
            log::info!(
                "[ChunkStreamer::update_visible_chunks] Update {}: viewer {} created {} shown {} hidden {} ({} chunks total)",
                self.updates,
                viewer_coord,
                created,
                shown.len(),
                hidden.len(),
                self.chunks.len()
            );
        } else if created > 0 || !shown.is_empty() || !hidden.is_empty() {
            log::debug!(
                "[ChunkStreamer::update_visible_chunks] viewer {} created {} shown {} hidden {}",
                viewer_coord,
                created,
                shown.len(),
                hidden.len()
            );
        }

        VisibilityUpdate {
            viewer_coord,
            created,
            shown,
            hidden,
        }
    }

    /// Visibility and detail level of an existing chunk. Returns the level
    /// when the chunk is visible.
    fn refresh_chunk(&mut self, coord: ChunkCoord, viewer: Point2<f32>, sqr_view_distance: f32) -> Option<u32> {
        let levels = &self.config.streaming.detail_levels;
        let chunk = self.chunks.get_mut(&coord)?;

        let sqr_distance = chunk.bounds().sqr_distance(viewer);
        let visible = sqr_distance <= sqr_view_distance;
        chunk.set_visible(visible);
        if !visible {
            return None;
        }

        let level = select_detail_level(levels, sqr_distance.sqrt());
        chunk.set_detail_level(level);
        Some(level)
    }

    /// Show an existing mesh at `level` or request it from retained height data
    fn show_detail_level(&mut self, coord: ChunkCoord, level: u32) {
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return;
        };
        if chunk.state() == ChunkState::Failed || chunk.displayed_level() == Some(level) {
            return;
        }

        if let Some(mesh) = chunk.mesh(level) {
            self.display.mesh_ready(coord, chunk.center(), mesh, chunk.colors());
            chunk.set_displayed_level(level);
            log::debug!(
                "[ChunkStreamer::show_detail_level] chunk {} switched to detail {}",
                coord,
                level
            );
            return;
        }

        if let Some(map_data) = chunk.map_data().cloned() {
            if chunk.begin_mesh_request(level) {
                self.pipeline.request_mesh_data(coord, map_data, level);
            }
        }
    }

    /// Drain the pipeline and apply every completed job. Returns the number
    /// of events handled.
    pub fn process_pipeline_events(&mut self) -> usize {
        let pipeline = Arc::clone(&self.pipeline);
        pipeline.drain(|event| self.on_event(event))
    }

    fn on_event(&mut self, event: PipelineEvent) {
        log::trace!(
            "[ChunkStreamer::on_event] {} finished for chunk {}",
            event.stage(),
            event.chunk()
        );
        match event {
            PipelineEvent::HeightReady { chunk, result } => self.on_height_ready(chunk, result),
            PipelineEvent::MeshReady {
                chunk,
                detail_level,
                result,
            } => self.on_mesh_ready(chunk, detail_level, result),
        }
    }

    fn on_height_ready(&mut self, coord: ChunkCoord, result: TerrainResult<MapData>) {
        let map_data = match result {
            Ok(map_data) => map_data,
            Err(e) => return self.fail_chunk(coord, e),
        };
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            log::warn!("[ChunkStreamer::on_height_ready] No chunk registered at {}", coord);
            return;
        };

        let level = chunk.detail_level();
        let shared = chunk.attach_map_data(map_data);
        if chunk.begin_mesh_request(level) {
            self.pipeline.request_mesh_data(coord, shared, level);
        }
    }

    fn on_mesh_ready(&mut self, coord: ChunkCoord, detail_level: u32, result: TerrainResult<TerrainMesh>) {
        let mesh = match result {
            Ok(mesh) => mesh,
            Err(e) => return self.on_mesh_failed(coord, detail_level, e),
        };
        let keep_height_data = self.config.uses_lod_switching();
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            log::warn!("[ChunkStreamer::on_mesh_ready] No chunk registered at {}", coord);
            return;
        };
        if chunk.state() == ChunkState::Failed {
            return;
        }

        chunk.attach_mesh(detail_level, mesh);

        // The first mesh is always shown; later ones only if still wanted
        let wanted = chunk.displayed_level().is_none() || chunk.detail_level() == detail_level;
        if wanted {
            if let Some(mesh) = chunk.mesh(detail_level) {
                self.display.mesh_ready(coord, chunk.center(), mesh, chunk.colors());
            }
            chunk.set_displayed_level(detail_level);
        }

        if !keep_height_data && !chunk.has_outstanding_requests() {
            chunk.release_map_data();
        }

        log::trace!(
            "[ChunkStreamer::on_mesh_ready] chunk {} ready at detail {}",
            coord,
            detail_level
        );
    }

    /// A chunk already on screen keeps its mesh; only the failed level is
    /// given up. A chunk with nothing to show fails as a whole.
    fn on_mesh_failed(&mut self, coord: ChunkCoord, detail_level: u32, error: TerrainError) {
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return self.fail_chunk(coord, error);
        };
        if chunk.displayed_level().is_none() {
            return self.fail_chunk(coord, error);
        }

        chunk.abandon_mesh_level(detail_level);
        log::warn!(
            "[ChunkStreamer::on_mesh_failed] chunk {} keeps detail {:?}, detail {} abandoned: {}",
            coord,
            chunk.displayed_level(),
            detail_level,
            error
        );
        if !self.config.uses_lod_switching() && !chunk.has_outstanding_requests() {
            chunk.release_map_data();
        }
    }

    fn fail_chunk(&mut self, coord: ChunkCoord, error: TerrainError) {
        log::error!("[ChunkStreamer::fail_chunk] chunk {}: {}", coord, error);
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.mark_failed();
        }
        self.display.chunk_failed(coord, &error);
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&TerrainChunk> {
        self.chunks.get(&coord)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &TerrainChunk> {
        self.chunks.values()
    }

    /// Chunks made visible by the last update, in sweep order
    pub fn visible_chunks(&self) -> &[ChunkCoord] {
        &self.visible_last_update
    }

    pub fn viewer_position(&self) -> Point2<f32> {
        self.viewer_position
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn stats(&self) -> StreamerStats {
        let mut stats = StreamerStats {
            updates: self.updates,
            chunk_count: self.chunks.len(),
            visible_count: self.visible_last_update.len(),
            ..StreamerStats::default()
        };
        for chunk in self.chunks.values() {
            match chunk.state() {
                ChunkState::Pending => stats.pending += 1,
                ChunkState::Ready => stats.ready += 1,
                ChunkState::Failed => stats.failed += 1,
            }
        }
        stats
    }
}
