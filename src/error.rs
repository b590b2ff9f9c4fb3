//! Crate-wide error type
//!
//! Every fallible operation in the terrain pipeline returns [`TerrainResult`].
//! Worker failures travel through the pipeline completion queues as
//! [`TerrainError::JobFailed`] so the streamer can mark the chunk as failed.

use std::fmt;
use std::path::PathBuf;

use crate::world::ChunkCoord;

/// Pipeline stage a worker job belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStage {
    /// Noise sampling and color classification
    Height,
    /// Height field to geometry conversion
    Mesh,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStage::Height => write!(f, "height generation"),
            JobStage::Mesh => write!(f, "mesh generation"),
        }
    }
}

/// Terrain pipeline errors
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {field}: {message}")]
    InvalidConfig { field: String, message: String },

    #[error("Invalid height curve: {message}")]
    InvalidHeightCurve { message: String },

    #[error("Height field is empty ({width}x{height})")]
    EmptyHeightField { width: usize, height: usize },

    #[error("Height field {width}x{height} needs {expected} samples, got {actual}")]
    HeightFieldSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Job for chunk {chunk} failed during {stage}: {message}")]
    JobFailed {
        chunk: ChunkCoord,
        stage: JobStage,
        message: String,
    },

    #[error("Worker pool initialization failed: {message}")]
    WorkerPool { message: String },
}

/// Result alias used throughout the crate
pub type TerrainResult<T> = Result<T, TerrainError>;

/// Create an invalid configuration error
pub fn invalid_config(field: &str, message: impl fmt::Display) -> TerrainError {
    TerrainError::InvalidConfig {
        field: field.to_string(),
        message: message.to_string(),
    }
}
