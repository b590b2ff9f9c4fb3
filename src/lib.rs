//! Endless procedural terrain
//!
//! Streams a seamless, effectively unbounded heightmap terrain around a
//! moving viewer. Chunks are generated off the tick thread by a bounded
//! worker pool (noise height field, band colors, then a mesh at the chosen
//! detail level) and handed to the host through [`ChunkDisplay`].
//!
//! ```no_run
//! use cgmath::Point2;
//! use endless_terrain::{NullDisplay, TerrainConfig, TerrainSession};
//!
//! let mut session = TerrainSession::new(TerrainConfig::default(), NullDisplay)?;
//! loop {
//!     let viewer = Point2::new(0.0, 0.0);
//!     session.tick(viewer);
//! #   break;
//! }
//! # Ok::<(), endless_terrain::TerrainError>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod renderer;
pub mod session;
pub mod streaming;
pub mod thread_pool;
pub mod world;

pub use config::{DetailLevelInfo, MeshSettings, NoiseSettings, StreamingSettings, TerrainConfig, WorkerSettings};
pub use error::{JobStage, TerrainError, TerrainResult};
pub use renderer::{build_terrain_mesh, ChunkDisplay, NullDisplay, TerrainMesh, TerrainVertex};
pub use session::{SessionStats, TerrainSession, TickReport};
pub use streaming::{
    ChunkState, ChunkStreamer, HeightGenerator, PipelineEvent, PipelineStats, StreamerStats, TerrainChunk,
    TerrainDataPipeline,
};
pub use thread_pool::{WorkerPool, WorkerPoolStats};
pub use world::{
    classify_height, generate_color_map, generate_map_data, generate_noise_map, generate_noise_map_with,
    ChunkBounds, ChunkCoord, Color32, CurveKey, HeightCurve, HeightField, MapData, NoiseParams, NormalizeMode,
    TerrainRegion,
};
