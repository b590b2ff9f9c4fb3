//! Terrain session
//!
//! The context object a host owns for the lifetime of one endless-terrain
//! view. Holds the configuration, the data pipeline and the streamer; there
//! is no process-wide state, so several sessions can run side by side.

use std::sync::Arc;
use std::time::{Duration, Instant};

use cgmath::Point2;

use crate::config::TerrainConfig;
use crate::error::TerrainResult;
use crate::renderer::ChunkDisplay;
use crate::streaming::{
    ChunkStreamer, HeightGenerator, PipelineStats, StreamerStats, TerrainChunk, TerrainDataPipeline,
};
use crate::world::ChunkCoord;

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub events_processed: usize,
    pub chunks_created: usize,
    pub chunks_shown: usize,
    pub chunks_hidden: usize,
    pub visible: usize,
}

/// Combined session statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub ticks: u64,
    pub streamer: StreamerStats,
    pub pipeline: PipelineStats,
}

pub struct TerrainSession<D: ChunkDisplay> {
    config: Arc<TerrainConfig>,
    pipeline: Arc<TerrainDataPipeline>,
    streamer: ChunkStreamer<D>,
    ticks: u64,
}

impl<D: ChunkDisplay> TerrainSession<D> {
    /// Validate `config` and start the worker pool
    pub fn new(config: TerrainConfig, display: D) -> TerrainResult<Self> {
        let config = Arc::new(Self::prepare(config)?);
        let pipeline = Arc::new(TerrainDataPipeline::new(Arc::clone(&config))?);
        Ok(Self::assemble(config, pipeline, display))
    }

    /// Session whose height jobs run `height_generator` instead of the noise sampler
    pub fn with_height_generator(
        config: TerrainConfig,
        height_generator: Arc<HeightGenerator>,
        display: D,
    ) -> TerrainResult<Self> {
        let config = Arc::new(Self::prepare(config)?);
        let pipeline = Arc::new(TerrainDataPipeline::with_height_generator(
            Arc::clone(&config),
            height_generator,
        )?);
        Ok(Self::assemble(config, pipeline, display))
    }

    fn prepare(config: TerrainConfig) -> TerrainResult<TerrainConfig> {
        let config = config.sanitized();
        config.validate()?;
        Ok(config)
    }

    fn assemble(config: Arc<TerrainConfig>, pipeline: Arc<TerrainDataPipeline>, display: D) -> Self {
        log::info!(
            "[TerrainSession::new] chunk size {}, view distance {}, {} detail level(s)",
            config.chunk_size(),
            config.streaming.view_distance,
            config.streaming.detail_levels.len()
        );
        let streamer = ChunkStreamer::new(Arc::clone(&config), Arc::clone(&pipeline), display);
        Self {
            config,
            pipeline,
            streamer,
            ticks: 0,
        }
    }

    /// Apply finished jobs, then update visibility around `viewer` (world x/z)
    pub fn tick(&mut self, viewer: Point2<f32>) -> TickReport {
        self.ticks += 1;
        let events_processed = self.streamer.process_pipeline_events();
        let update = self.streamer.update_visible_chunks(viewer);

        TickReport {
            events_processed,
            chunks_created: update.created,
            chunks_shown: update.shown.len(),
            chunks_hidden: update.hidden.len(),
            visible: self.streamer.visible_chunks().len(),
        }
    }

    /// Tick at a fixed viewer until every chunk around it has settled or
    /// `timeout` passes. For hosts that want terrain before the first frame.
    /// Returns whether the session settled.
    pub fn pregenerate(&mut self, viewer: Point2<f32>, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let report = self.tick(viewer);
            let settled = report.chunks_created == 0
                && report.events_processed == 0
                && self.pipeline.is_idle()
                && self.streamer.stats().pending == 0;
            if settled {
                return true;
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !self.pipeline.wait_until_idle(remaining) {
                log::warn!(
                    "[TerrainSession::pregenerate] Timed out with {} jobs in flight",
                    self.pipeline.in_flight()
                );
                return false;
            }
        }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &TerrainDataPipeline {
        &self.pipeline
    }

    pub fn streamer(&self) -> &ChunkStreamer<D> {
        &self.streamer
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&TerrainChunk> {
        self.streamer.chunk(coord)
    }

    pub fn visible_chunks(&self) -> &[ChunkCoord] {
        self.streamer.visible_chunks()
    }

    pub fn display(&self) -> &D {
        self.streamer.display()
    }

    pub fn display_mut(&mut self) -> &mut D {
        self.streamer.display_mut()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            ticks: self.ticks,
            streamer: self.streamer.stats(),
            pipeline: self.pipeline.stats(),
        }
    }
}
