//! Terrain configuration
//!
//! Supplied once by the host when a session starts. Loaded from TOML; every
//! section is optional and falls back to the defaults in `constants.rs`.
//!
//! ```toml
//! [noise]
//! seed = 42
//! scale = 50.0
//! octaves = 4
//!
//! [mesh]
//! height_multiplier = 6.0
//! height_curve = [{ time = 0.0, value = 0.0 }, { time = 1.0, value = 1.0 }]
//!
//! [streaming]
//! view_distance = 450.0
//! detail_levels = [{ detail_level = 0, visible_distance_threshold = 450.0 }]
//! ```

use std::path::Path;

use cgmath::Vector2;
use serde::{Deserialize, Serialize};

use crate::constants::{streaming, terrain, workers};
use crate::error::{invalid_config, TerrainError, TerrainResult};
use crate::world::{Color32, HeightCurve, NoiseParams, NormalizeMode, TerrainRegion};

/// Noise sampling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    pub seed: u32,
    pub scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub offset: [f32; 2],
    pub normalize_mode: NormalizeMode,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: terrain::DEFAULT_NOISE_SCALE,
            octaves: terrain::DEFAULT_OCTAVES,
            persistence: terrain::DEFAULT_PERSISTENCE,
            lacunarity: terrain::DEFAULT_LACUNARITY,
            offset: [0.0, 0.0],
            normalize_mode: NormalizeMode::Local,
        }
    }
}

impl NoiseSettings {
    /// Clamp values into their usable ranges instead of rejecting them
    pub fn sanitized(mut self) -> Self {
        if self.scale < 1.0 || !self.scale.is_finite() {
            log::warn!("[NoiseSettings::sanitized] noise scale {} clamped to 1", self.scale);
            self.scale = 1.0;
        }
        if self.octaves < 1 {
            log::warn!("[NoiseSettings::sanitized] octave count 0 clamped to 1");
            self.octaves = 1;
        }
        if self.lacunarity < 1.0 || !self.lacunarity.is_finite() {
            log::warn!("[NoiseSettings::sanitized] lacunarity {} clamped to 1", self.lacunarity);
            self.lacunarity = 1.0;
        }
        if !(0.0..=1.0).contains(&self.persistence) {
            let clamped = if self.persistence.is_nan() { 0.0 } else { self.persistence.clamp(0.0, 1.0) };
            log::warn!("[NoiseSettings::sanitized] persistence {} clamped to {}", self.persistence, clamped);
            self.persistence = clamped;
        }
        self
    }

    pub fn params(&self) -> NoiseParams {
        NoiseParams {
            seed: self.seed,
            scale: self.scale,
            octaves: self.octaves,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
            offset: Vector2::new(self.offset[0], self.offset[1]),
            normalize_mode: self.normalize_mode,
        }
    }
}

/// Height field to geometry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// Height samples per chunk side
    pub chunk_resolution: u32,
    pub height_multiplier: f32,
    pub height_curve: HeightCurve,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            chunk_resolution: terrain::MAP_CHUNK_RESOLUTION,
            height_multiplier: terrain::DEFAULT_HEIGHT_MULTIPLIER,
            height_curve: HeightCurve::linear(),
        }
    }
}

/// One row of the level-of-detail table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetailLevelInfo {
    pub detail_level: u32,
    /// Chunks whose edge is at most this far from the viewer use this level
    pub visible_distance_threshold: f32,
}

/// Chunk streaming settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingSettings {
    pub view_distance: f32,
    /// Ascending by threshold
    pub detail_levels: Vec<DetailLevelInfo>,
}

impl Default for StreamingSettings {
    fn default() -> Self {
        Self {
            view_distance: streaming::MAX_VIEW_DISTANCE,
            detail_levels: vec![DetailLevelInfo {
                detail_level: 0,
                visible_distance_threshold: streaming::MAX_VIEW_DISTANCE,
            }],
        }
    }
}

/// Worker pool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerSettings {
    /// 0 picks a count from the available cores
    pub threads: usize,
    pub stack_size: Option<usize>,
    pub thread_name_prefix: String,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            threads: 0,
            stack_size: Some(workers::DEFAULT_STACK_SIZE),
            thread_name_prefix: workers::THREAD_NAME_PREFIX.to_string(),
        }
    }
}

impl WorkerSettings {
    /// Effective worker count
    pub fn thread_count(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        num_cpus::get()
            .saturating_sub(workers::RESERVED_CORES)
            .max(workers::MIN_WORKER_THREADS)
    }
}

/// Complete terrain configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub noise: NoiseSettings,
    pub mesh: MeshSettings,
    /// Height bands for the color map, ascending by height
    pub regions: Vec<TerrainRegion>,
    pub streaming: StreamingSettings,
    pub workers: WorkerSettings,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            noise: NoiseSettings::default(),
            mesh: MeshSettings::default(),
            regions: default_regions(),
            streaming: StreamingSettings::default(),
            workers: WorkerSettings::default(),
        }
    }
}

impl TerrainConfig {
    /// Parse, sanitize and validate a TOML document
    pub fn from_toml_str(source: &str) -> TerrainResult<Self> {
        let config: TerrainConfig = toml::from_str(source)?;
        let config = config.sanitized();
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> TerrainResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| TerrainError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        log::info!("[TerrainConfig::load] Loaded terrain config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> TerrainResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn sanitized(mut self) -> Self {
        self.noise = self.noise.sanitized();
        self
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> TerrainResult<()> {
        if self.mesh.chunk_resolution < 2 {
            return Err(invalid_config(
                "mesh.chunk_resolution",
                format!("must be at least 2, got {}", self.mesh.chunk_resolution),
            ));
        }
        if !self.mesh.height_multiplier.is_finite() {
            return Err(invalid_config("mesh.height_multiplier", "must be finite"));
        }
        if !(self.streaming.view_distance > 0.0 && self.streaming.view_distance.is_finite()) {
            return Err(invalid_config(
                "streaming.view_distance",
                format!("must be positive, got {}", self.streaming.view_distance),
            ));
        }
        if self.streaming.detail_levels.is_empty() {
            return Err(invalid_config("streaming.detail_levels", "at least one level is required"));
        }
        let ascending = self
            .streaming
            .detail_levels
            .windows(2)
            .all(|pair| pair[0].visible_distance_threshold <= pair[1].visible_distance_threshold);
        if !ascending {
            return Err(invalid_config(
                "streaming.detail_levels",
                "thresholds must be in ascending order",
            ));
        }
        for level in &self.streaming.detail_levels {
            if level.detail_level > terrain::MAX_DETAIL_LEVEL {
                log::warn!(
                    "[TerrainConfig::validate] detail level {} exceeds {}, meshes will be very coarse",
                    level.detail_level,
                    terrain::MAX_DETAIL_LEVEL
                );
            }
        }
        if self.workers.stack_size == Some(0) {
            return Err(invalid_config("workers.stack_size", "must be non-zero when set"));
        }
        Ok(())
    }

    /// Chunk side length in world units. Neighbouring chunks share one row of
    /// samples, hence one less than the resolution.
    pub fn chunk_size(&self) -> f32 {
        (self.mesh.chunk_resolution - 1) as f32
    }

    /// Whether the LOD table has more than one level, in which case chunks
    /// keep their height data to build further meshes on demand
    pub fn uses_lod_switching(&self) -> bool {
        self.streaming.detail_levels.len() > 1
    }
}

fn default_regions() -> Vec<TerrainRegion> {
    vec![
        TerrainRegion::new("Deep Water", 0.3, Color32::rgb(50, 99, 195)),
        TerrainRegion::new("Shallow Water", 0.4, Color32::rgb(54, 103, 199)),
        TerrainRegion::new("Sand", 0.45, Color32::rgb(210, 208, 125)),
        TerrainRegion::new("Grass", 0.55, Color32::rgb(86, 152, 23)),
        TerrainRegion::new("Grass 2", 0.6, Color32::rgb(62, 107, 18)),
        TerrainRegion::new("Rock", 0.7, Color32::rgb(90, 69, 60)),
        TerrainRegion::new("Rock 2", 0.9, Color32::rgb(75, 60, 53)),
        TerrainRegion::new("Snow", 1.0, Color32::rgb(255, 255, 255)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chunk_layout() {
        let config = TerrainConfig::default();
        assert_eq!(config.mesh.chunk_resolution, 241);
        assert_eq!(config.chunk_size(), 240.0);
        assert_eq!(config.streaming.view_distance, 450.0);
        assert!(!config.uses_lod_switching());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = TerrainConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, TerrainConfig::default());
    }

    #[test]
    fn test_sanitize_clamps_instead_of_rejecting() {
        let noise = NoiseSettings {
            scale: 0.0,
            octaves: 0,
            lacunarity: 0.5,
            persistence: 1.5,
            ..NoiseSettings::default()
        }
        .sanitized();
        assert_eq!(noise.scale, 1.0);
        assert_eq!(noise.octaves, 1);
        assert_eq!(noise.lacunarity, 1.0);
        assert_eq!(noise.persistence, 1.0);
    }

    #[test]
    fn test_validate_rejects_unusable_values() {
        let mut config = TerrainConfig::default();
        config.mesh.chunk_resolution = 1;
        assert!(matches!(config.validate(), Err(TerrainError::InvalidConfig { .. })));

        let mut config = TerrainConfig::default();
        config.streaming.view_distance = 0.0;
        assert!(config.validate().is_err());

        let mut config = TerrainConfig::default();
        config.streaming.detail_levels.clear();
        assert!(config.validate().is_err());

        let mut config = TerrainConfig::default();
        config.streaming.detail_levels = vec![
            DetailLevelInfo { detail_level: 0, visible_distance_threshold: 300.0 },
            DetailLevelInfo { detail_level: 1, visible_distance_threshold: 200.0 },
        ];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_worker_count_is_never_zero() {
        let settings = WorkerSettings::default();
        assert!(settings.thread_count() >= workers::MIN_WORKER_THREADS);
        let fixed = WorkerSettings { threads: 3, ..WorkerSettings::default() };
        assert_eq!(fixed.thread_count(), 3);
    }
}
