//! Terrain data pipeline
//!
//! Runs height and mesh generation on the worker pool and hands the results
//! back to the tick thread. Each stage has its own completion queue; workers
//! push to the back and the owner swaps the whole queue out once per tick, so
//! the lock is only ever held for a push or a swap.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cgmath::Point2;
use parking_lot::{Condvar, Mutex};

use crate::config::TerrainConfig;
use crate::error::{JobStage, TerrainResult};
use crate::renderer::{build_terrain_mesh, TerrainMesh};
use crate::streaming::error::JobErrorContext;
use crate::thread_pool::{WorkerPool, WorkerPoolStats};
use crate::world::{generate_map_data, ChunkCoord, MapData};

/// Height job body. Receives the session config and the chunk's sample center.
pub type HeightGenerator = dyn Fn(&TerrainConfig, Point2<f32>) -> TerrainResult<MapData> + Send + Sync;

/// Result delivered to the pipeline owner
#[derive(Debug)]
pub enum PipelineEvent {
    HeightReady {
        chunk: ChunkCoord,
        result: TerrainResult<MapData>,
    },
    MeshReady {
        chunk: ChunkCoord,
        detail_level: u32,
        result: TerrainResult<TerrainMesh>,
    },
}

impl PipelineEvent {
    pub fn chunk(&self) -> ChunkCoord {
        match self {
            PipelineEvent::HeightReady { chunk, .. } | PipelineEvent::MeshReady { chunk, .. } => *chunk,
        }
    }

    pub fn stage(&self) -> JobStage {
        match self {
            PipelineEvent::HeightReady { .. } => JobStage::Height,
            PipelineEvent::MeshReady { .. } => JobStage::Mesh,
        }
    }
}

/// Finished job waiting in a completion queue
#[derive(Debug)]
struct CompletedJob<T> {
    chunk: ChunkCoord,
    detail_level: Option<u32>,
    elapsed: Duration,
    result: TerrainResult<T>,
}

type CompletionQueue<T> = Arc<Mutex<VecDeque<CompletedJob<T>>>>;

/// Count of submitted jobs not yet queued, with a wakeup when it reaches zero
#[derive(Debug, Default)]
struct InFlightJobs {
    count: AtomicUsize,
    lock: Mutex<()>,
    idle: Condvar,
}

impl InFlightJobs {
    fn begin(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
    }

    fn finish(&self) {
        if self.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            // Waiters check the count under the same lock
            let _guard = self.lock.lock();
            self.idle.notify_all();
        }
    }

    fn get(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    fn wait_until_zero(&self, deadline: Instant) -> bool {
        let mut guard = self.lock.lock();
        while self.get() > 0 {
            if self.idle.wait_until(&mut guard, deadline).timed_out() {
                return self.get() == 0;
            }
        }
        true
    }
}

/// Pipeline statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub in_flight: usize,
    pub queued_events: usize,
    pub events_delivered: u64,
    pub failed_jobs: u64,
    pub workers: WorkerPoolStats,
}

/// Off-thread height and mesh generation with per-tick delivery
pub struct TerrainDataPipeline {
    config: Arc<TerrainConfig>,
    workers: WorkerPool,
    height_generator: Arc<HeightGenerator>,
    height_queue: CompletionQueue<MapData>,
    mesh_queue: CompletionQueue<TerrainMesh>,
    in_flight: Arc<InFlightJobs>,
    events_delivered: AtomicUsize,
    failed_jobs: AtomicUsize,
}

impl TerrainDataPipeline {
    /// Pipeline with the standard noise height generator
    pub fn new(config: Arc<TerrainConfig>) -> TerrainResult<Self> {
        Self::with_height_generator(
            config,
            Arc::new(|config: &TerrainConfig, center: Point2<f32>| -> TerrainResult<MapData> {
                Ok(generate_map_data(config, center))
            }),
        )
    }

    /// Pipeline running a custom height generator on its workers
    pub fn with_height_generator(
        config: Arc<TerrainConfig>,
        height_generator: Arc<HeightGenerator>,
    ) -> TerrainResult<Self> {
        let workers = WorkerPool::new(&config.workers)?;
        Ok(Self {
            config,
            workers,
            height_generator,
            height_queue: Arc::new(Mutex::new(VecDeque::new())),
            mesh_queue: Arc::new(Mutex::new(VecDeque::new())),
            in_flight: Arc::new(InFlightJobs::default()),
            events_delivered: AtomicUsize::new(0),
            failed_jobs: AtomicUsize::new(0),
        })
    }

    pub fn config(&self) -> &Arc<TerrainConfig> {
        &self.config
    }

    /// Schedule height and color generation for `chunk`, sampled around
    /// `sample_center` (world x/z). Never blocks.
    pub fn request_height_data(&self, chunk: ChunkCoord, sample_center: Point2<f32>) {
        let config = Arc::clone(&self.config);
        let generator = Arc::clone(&self.height_generator);
        let queue = Arc::clone(&self.height_queue);
        let in_flight = Arc::clone(&self.in_flight);

        in_flight.begin();
        log::trace!(
            "[TerrainDataPipeline::request_height_data] chunk {} at ({}, {})",
            chunk,
            sample_center.x,
            sample_center.y
        );

        self.workers.spawn(JobStage::Height, move || {
            let start = Instant::now();
            let result = catch_unwind(AssertUnwindSafe(|| generator(config.as_ref(), sample_center)))
                .job_context(chunk, JobStage::Height);

            queue.lock().push_back(CompletedJob {
                chunk,
                detail_level: None,
                elapsed: start.elapsed(),
                result,
            });
            in_flight.finish();
        });
    }

    /// Schedule mesh generation for `chunk` at `detail_level`. Never blocks.
    pub fn request_mesh_data(&self, chunk: ChunkCoord, map_data: Arc<MapData>, detail_level: u32) {
        let config = Arc::clone(&self.config);
        let queue = Arc::clone(&self.mesh_queue);
        let in_flight = Arc::clone(&self.in_flight);

        in_flight.begin();
        log::trace!(
            "[TerrainDataPipeline::request_mesh_data] chunk {} at detail {}",
            chunk,
            detail_level
        );

        self.workers.spawn(JobStage::Mesh, move || {
            let start = Instant::now();
            let result = catch_unwind(AssertUnwindSafe(|| {
                build_terrain_mesh(
                    &map_data.height_map,
                    &config.mesh.height_curve,
                    config.mesh.height_multiplier,
                    detail_level,
                )
            }))
            .job_context(chunk, JobStage::Mesh);

            queue.lock().push_back(CompletedJob {
                chunk,
                detail_level: Some(detail_level),
                elapsed: start.elapsed(),
                result,
            });
            in_flight.finish();
        });
    }

    /// Deliver every completed job to `dispatch`, height results first, each
    /// queue in completion order. `dispatch` may request more work; those
    /// results arrive on a later drain. Returns the number of events delivered.
    pub fn drain<F>(&self, mut dispatch: F) -> usize
    where
        F: FnMut(PipelineEvent),
    {
        let heights = std::mem::take(&mut *self.height_queue.lock());
        let meshes = std::mem::take(&mut *self.mesh_queue.lock());
        let delivered = heights.len() + meshes.len();

        for job in heights {
            self.record(&job);
            dispatch(PipelineEvent::HeightReady {
                chunk: job.chunk,
                result: job.result,
            });
        }

        for job in meshes {
            self.record(&job);
            dispatch(PipelineEvent::MeshReady {
                chunk: job.chunk,
                detail_level: job.detail_level.unwrap_or_default(),
                result: job.result,
            });
        }

        self.events_delivered.fetch_add(delivered, Ordering::Relaxed);
        delivered
    }

    fn record<T>(&self, job: &CompletedJob<T>) {
        match &job.result {
            Ok(_) => log::trace!(
                "[TerrainDataPipeline::drain] chunk {} finished in {:.2}ms",
                job.chunk,
                job.elapsed.as_secs_f64() * 1000.0
            ),
            Err(e) => {
                self.failed_jobs.fetch_add(1, Ordering::Relaxed);
                log::error!("[TerrainDataPipeline::drain] {}", e);
            }
        }
    }

    /// Jobs submitted but not yet pushed to a completion queue
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    /// Completed jobs waiting for the next drain
    pub fn queued_events(&self) -> usize {
        self.height_queue.lock().len() + self.mesh_queue.lock().len()
    }

    /// No job is running or queued for delivery
    pub fn is_idle(&self) -> bool {
        self.in_flight() == 0 && self.queued_events() == 0
    }

    /// Block until no job is in flight or `timeout` passes. Completed events
    /// stay queued until the next drain. Returns whether the workers went idle.
    pub fn wait_until_idle(&self, timeout: Duration) -> bool {
        self.in_flight.wait_until_zero(Instant::now() + timeout)
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            in_flight: self.in_flight(),
            queued_events: self.queued_events(),
            events_delivered: self.events_delivered.load(Ordering::Relaxed) as u64,
            failed_jobs: self.failed_jobs.load(Ordering::Relaxed) as u64,
            workers: self.workers.stats(),
        }
    }
}

impl std::fmt::Debug for TerrainDataPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainDataPipeline")
            .field("workers", &self.workers)
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}
