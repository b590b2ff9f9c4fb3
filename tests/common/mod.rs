#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use cgmath::Point2;
use endless_terrain::{ChunkCoord, ChunkDisplay, Color32, TerrainConfig, TerrainError, TerrainMesh};

/// Display notification as seen by the host
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    MeshReady(ChunkCoord),
    Visibility(ChunkCoord, bool),
    Failed(ChunkCoord),
}

/// Display that records every call
#[derive(Default)]
pub struct RecordingDisplay {
    pub events: Vec<DisplayEvent>,
    pub visible: HashSet<ChunkCoord>,
    pub meshes: HashMap<ChunkCoord, (Point2<f32>, TerrainMesh, usize)>,
    pub failures: HashMap<ChunkCoord, String>,
}

impl RecordingDisplay {
    pub fn visibility_events(&self) -> Vec<(ChunkCoord, bool)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DisplayEvent::Visibility(coord, visible) => Some((*coord, *visible)),
                _ => None,
            })
            .collect()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl ChunkDisplay for RecordingDisplay {
    fn mesh_ready(&mut self, coord: ChunkCoord, origin: Point2<f32>, mesh: &TerrainMesh, colors: &[Color32]) {
        self.events.push(DisplayEvent::MeshReady(coord));
        self.meshes.insert(coord, (origin, mesh.clone(), colors.len()));
    }

    fn visibility_changed(&mut self, coord: ChunkCoord, visible: bool) {
        self.events.push(DisplayEvent::Visibility(coord, visible));
        if visible {
            self.visible.insert(coord);
        } else {
            self.visible.remove(&coord);
        }
    }

    fn chunk_failed(&mut self, coord: ChunkCoord, error: &TerrainError) {
        self.events.push(DisplayEvent::Failed(coord));
        self.failures.insert(coord, error.to_string());
    }
}

pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(60);

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Small chunks and a matching view distance for fast session tests
pub fn small_config() -> TerrainConfig {
    let mut config = TerrainConfig::default();
    config.mesh.chunk_resolution = 17;
    config.streaming.view_distance = 30.0;
    config.streaming.detail_levels[0].visible_distance_threshold = 30.0;
    config.workers.threads = 2;
    config
}

/// Default chunk layout: 241 samples per side, 450 view distance
pub fn standard_config() -> TerrainConfig {
    let mut config = TerrainConfig::default();
    config.noise.seed = 42;
    config.workers.threads = 2;
    config
}
