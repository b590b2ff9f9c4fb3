// Bounded worker pool for terrain generation jobs
pub mod thread_pool;

pub use thread_pool::{PoolCounters, StageStats, WorkerPool, WorkerPoolStats};
