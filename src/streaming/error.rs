/// Streaming Error Handling
///
/// Turns worker outcomes into the tagged job failures carried by the
/// pipeline completion queues.

use std::any::Any;

use crate::error::{JobStage, TerrainError, TerrainResult};
use crate::world::ChunkCoord;

/// Attach chunk and stage context to a worker outcome
pub trait JobErrorContext<T> {
    fn job_context(self, chunk: ChunkCoord, stage: JobStage) -> TerrainResult<T>;
}

impl<T> JobErrorContext<T> for TerrainResult<T> {
    fn job_context(self, chunk: ChunkCoord, stage: JobStage) -> TerrainResult<T> {
        self.map_err(|e| match e {
            already @ TerrainError::JobFailed { .. } => already,
            other => TerrainError::JobFailed {
                chunk,
                stage,
                message: other.to_string(),
            },
        })
    }
}

/// Output of `catch_unwind` around a fallible job
impl<T> JobErrorContext<T> for Result<TerrainResult<T>, Box<dyn Any + Send>> {
    fn job_context(self, chunk: ChunkCoord, stage: JobStage) -> TerrainResult<T> {
        match self {
            Ok(result) => result.job_context(chunk, stage),
            Err(payload) => Err(TerrainError::JobFailed {
                chunk,
                stage,
                message: format!("worker panicked: {}", panic_message(payload.as_ref())),
            }),
        }
    }
}

/// Best-effort text of a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
