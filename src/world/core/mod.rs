//! Fundamental grid and bounds types shared by generation and streaming

pub mod position;

pub use position::{ChunkBounds, ChunkCoord};
