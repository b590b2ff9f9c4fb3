// Chunk streaming around a moving viewer
// Registry and visibility on the tick thread, generation on the worker pool

pub mod chunk_streamer;
pub mod error;
pub mod stream_pipeline;
pub mod terrain_chunk;

pub use chunk_streamer::{select_detail_level, ChunkStreamer, StreamerStats, VisibilityUpdate};
pub use error::{panic_message, JobErrorContext};
pub use stream_pipeline::{HeightGenerator, PipelineEvent, PipelineStats, TerrainDataPipeline};
pub use terrain_chunk::{ChunkState, TerrainChunk};
