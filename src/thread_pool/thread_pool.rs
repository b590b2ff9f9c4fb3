/// Terrain Worker Pool
///
/// Bounded rayon pool shared by every generation job of a session:
/// - Named worker threads with a configurable stack size
/// - Lock-free per-stage statistics counters
/// - Fire-and-forget submission; results travel back through the pipeline queues

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::WorkerSettings;
use crate::error::{JobStage, TerrainError, TerrainResult};

/// Lock-free statistics counters for one job stage
#[derive(Debug, Default)]
pub struct PoolCounters {
    pub tasks_submitted: AtomicU64,
    pub tasks_completed: AtomicU64,
    pub total_execution_time_ns: AtomicU64,
    pub active_tasks: AtomicUsize,
}

impl PoolCounters {
    fn snapshot(&self) -> StageStats {
        let completed = self.tasks_completed.load(Ordering::Relaxed);
        let total_ns = self.total_execution_time_ns.load(Ordering::Relaxed);
        StageStats {
            tasks_submitted: self.tasks_submitted.load(Ordering::Relaxed),
            tasks_completed: completed,
            active_tasks: self.active_tasks.load(Ordering::Relaxed),
            total_execution_time: Duration::from_nanos(total_ns),
            average_task_time_ms: if completed > 0 {
                total_ns as f64 / completed as f64 / 1_000_000.0
            } else {
                0.0
            },
        }
    }
}

/// Snapshot of one stage's counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageStats {
    pub tasks_submitted: u64,
    pub tasks_completed: u64,
    pub active_tasks: usize,
    pub total_execution_time: Duration,
    pub average_task_time_ms: f64,
}

/// Worker pool usage statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerPoolStats {
    pub thread_count: usize,
    pub height: StageStats,
    pub mesh: StageStats,
}

impl WorkerPoolStats {
    pub fn stage(&self, stage: JobStage) -> &StageStats {
        match stage {
            JobStage::Height => &self.height,
            JobStage::Mesh => &self.mesh,
        }
    }
}

/// Pool of worker threads running height and mesh jobs
pub struct WorkerPool {
    pool: ThreadPool,
    thread_count: usize,
    height_counters: Arc<PoolCounters>,
    mesh_counters: Arc<PoolCounters>,
}

impl WorkerPool {
    /// Build the pool described by `settings`
    pub fn new(settings: &WorkerSettings) -> TerrainResult<Self> {
        let thread_count = settings.thread_count();
        let prefix = settings.thread_name_prefix.clone();

        let mut builder = ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .thread_name(move |idx| format!("{}-{}", prefix, idx))
            .panic_handler(|_| {
                log::error!("[WorkerPool] Worker task panicked outside job isolation");
            });

        if let Some(stack_size) = settings.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let pool = builder.build().map_err(|e| TerrainError::WorkerPool {
            message: e.to_string(),
        })?;

        log::info!(
            "[WorkerPool::new] Started {} worker threads ({})",
            thread_count,
            settings.thread_name_prefix
        );

        Ok(Self {
            pool,
            thread_count,
            height_counters: Arc::new(PoolCounters::default()),
            mesh_counters: Arc::new(PoolCounters::default()),
        })
    }

    fn counters(&self, stage: JobStage) -> &Arc<PoolCounters> {
        match stage {
            JobStage::Height => &self.height_counters,
            JobStage::Mesh => &self.mesh_counters,
        }
    }

    /// Queue a task for `stage`. Returns immediately.
    pub fn spawn<F>(&self, stage: JobStage, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let counters = Arc::clone(self.counters(stage));
        counters.tasks_submitted.fetch_add(1, Ordering::Relaxed);

        self.pool.spawn(move || {
            counters.active_tasks.fetch_add(1, Ordering::Relaxed);
            let start = Instant::now();

            task();

            let elapsed_ns = start.elapsed().as_nanos() as u64;
            counters.tasks_completed.fetch_add(1, Ordering::Relaxed);
            counters.total_execution_time_ns.fetch_add(elapsed_ns, Ordering::Relaxed);
            counters.active_tasks.fetch_sub(1, Ordering::Relaxed);
        });
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    pub fn stats(&self) -> WorkerPoolStats {
        WorkerPoolStats {
            thread_count: self.thread_count,
            height: self.height_counters.snapshot(),
            mesh: self.mesh_counters.snapshot(),
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("thread_count", &self.thread_count)
            .finish_non_exhaustive()
    }
}
