//! World Module - terrain data and its generation
//!
//! # Architecture Overview
//!
//! - **Core**: Chunk grid coordinates and world-space bounds
//! - **Generation**: Pure, thread-safe height and color synthesis
//!   (noise field, height curve, color bands)
//!
//! Nothing in here holds mutable shared state; every generator call allocates
//! its own output so worker threads can call into it freely.

pub mod core;
pub mod generation;

// Re-export core types for convenience
pub use self::core::{ChunkBounds, ChunkCoord};

// Re-export generation systems
pub use generation::{
    classify_height, generate_color_map, generate_map_data, generate_noise_map,
    generate_noise_map_with, Color32, CurveKey, HeightCurve, HeightField, MapData, NoiseParams,
    NormalizeMode, TerrainRegion,
};
