// Endless Terrain Constants - SINGLE SOURCE OF TRUTH
//
// Every tunable default and hard limit of the terrain pipeline lives here.
// Configuration defaults in src/config.rs are built from these values.

/// Height map and mesh generation constants
pub mod terrain {
    /// Samples per chunk side. One less than this is the chunk size in world
    /// units so neighbouring chunks share their edge row.
    pub const MAP_CHUNK_RESOLUTION: u32 = 241;

    /// Smallest scale the noise sampler will divide by
    pub const MIN_NOISE_SCALE: f32 = 0.0001;

    /// Per-octave offsets are drawn from [-RANGE, RANGE)
    pub const OCTAVE_OFFSET_RANGE: i32 = 100_000;

    /// Highest detail level the mesh builder is tuned for (step 12)
    pub const MAX_DETAIL_LEVEL: u32 = 6;

    pub const DEFAULT_NOISE_SCALE: f32 = 50.0;
    pub const DEFAULT_OCTAVES: u32 = 4;
    pub const DEFAULT_PERSISTENCE: f32 = 0.5;
    pub const DEFAULT_LACUNARITY: f32 = 2.0;
    pub const DEFAULT_HEIGHT_MULTIPLIER: f32 = 6.0;
}

/// Chunk streaming constants
pub mod streaming {
    /// Maximum distance from the viewer to a chunk edge for the chunk to be shown
    pub const MAX_VIEW_DISTANCE: f32 = 450.0;

    /// Streamer updates logged in full at startup
    pub const VERBOSE_UPDATE_COUNT: u64 = 5;
}

/// Worker pool constants
pub mod workers {
    /// Cores left free for the tick thread and the host
    pub const RESERVED_CORES: usize = 2;
    pub const MIN_WORKER_THREADS: usize = 2;
    pub const DEFAULT_STACK_SIZE: usize = 2 * 1024 * 1024;
    pub const THREAD_NAME_PREFIX: &str = "terrain-worker";
}
