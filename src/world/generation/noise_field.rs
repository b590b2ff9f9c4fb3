//! Multi-octave coherent noise height synthesis
//!
//! Pure functions only. Every call builds its own PRNG, Perlin source and
//! output buffer, so worker threads may call in concurrently.

use cgmath::{Point2, Vector2};
use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::HeightField;
use crate::constants::terrain::{MIN_NOISE_SCALE, OCTAVE_OFFSET_RANGE};

/// How raw octave sums are remapped into [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeMode {
    /// Stretch the field's own min/max onto [0, 1]
    #[default]
    Local,
    /// Use the theoretical octave range so neighbouring chunks share one scale
    Global,
}

/// Noise sampling parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParams {
    pub seed: u32,
    pub scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub offset: Vector2<f32>,
    pub normalize_mode: NormalizeMode,
}

/// Generate a normalized height field sampled around the origin.
#[allow(clippy::too_many_arguments)]
pub fn generate_noise_map(
    width: usize,
    height: usize,
    seed: u32,
    scale: f32,
    octaves: u32,
    persistence: f32,
    lacunarity: f32,
    offset: Vector2<f32>,
) -> HeightField {
    let params = NoiseParams {
        seed,
        scale,
        octaves,
        persistence,
        lacunarity,
        offset,
        normalize_mode: NormalizeMode::Local,
    };
    generate_noise_map_with(width, height, &params, Point2::new(0.0, 0.0))
}

/// Generate a normalized height field whose center samples noise space at
/// `origin` (world units, before scaling).
pub fn generate_noise_map_with(
    width: usize,
    height: usize,
    params: &NoiseParams,
    origin: Point2<f32>,
) -> HeightField {
    if width == 0 || height == 0 {
        return HeightField::new(width, height);
    }

    // Scale is a divisor
    let scale = if params.scale <= 0.0 { MIN_NOISE_SCALE } else { params.scale } as f64;
    let persistence = params.persistence as f64;
    let lacunarity = params.lacunarity as f64;

    let octave_offsets = octave_offsets(params.seed, params.octaves, params.offset);
    let perlin = Perlin::new(params.seed);

    // Zoom into the middle of the field rather than its corner
    let half_width = width as f64 / 2.0;
    let half_height = height as f64 / 2.0;
    let origin_x = origin.x as f64;
    let origin_y = origin.y as f64;

    let mut raw = Vec::with_capacity(width * height);
    let mut min_height = f64::MAX;
    let mut max_height = f64::MIN;

    for y in 0..height {
        for x in 0..width {
            let mut amplitude = 1.0;
            let mut frequency = 1.0;
            let mut noise_height = 0.0;

            for &[offset_x, offset_y] in &octave_offsets {
                let sample_x = (x as f64 - half_width + origin_x) / scale * frequency + offset_x;
                let sample_y = (y as f64 - half_height + origin_y) / scale * frequency + offset_y;

                noise_height += perlin.get([sample_x, sample_y]) * amplitude;

                amplitude *= persistence;
                frequency *= lacunarity;
            }

            min_height = min_height.min(noise_height);
            max_height = max_height.max(noise_height);
            raw.push(noise_height);
        }
    }

    let values = match params.normalize_mode {
        NormalizeMode::Local => normalize_local(&raw, min_height, max_height),
        NormalizeMode::Global => {
            normalize_global(&raw, max_possible_height(params.octaves, persistence))
        }
    };

    log::trace!(
        "[noise_field::generate_noise_map_with] {}x{} field at ({:.1}, {:.1}), raw range [{:.3}, {:.3}]",
        width, height, origin.x, origin.y, min_height, max_height
    );

    HeightField::from_values(width, height, values)
        .unwrap_or_else(|_| HeightField::new(width, height))
}

/// Per-octave sample offsets, deterministic for a given seed
fn octave_offsets(seed: u32, octaves: u32, offset: Vector2<f32>) -> Vec<[f64; 2]> {
    let mut prng = StdRng::seed_from_u64(seed as u64);
    (0..octaves)
        .map(|_| {
            let offset_x = prng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f64 + offset.x as f64;
            let offset_y = prng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f64 + offset.y as f64;
            [offset_x, offset_y]
        })
        .collect()
}

/// Inverse lerp of every sample between the field's min and max.
/// A flat field maps to 0.
fn normalize_local(raw: &[f64], min: f64, max: f64) -> Vec<f32> {
    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return vec![0.0; raw.len()];
    }
    raw.iter().map(|&v| ((v - min) / range) as f32).collect()
}

fn normalize_global(raw: &[f64], max_possible: f64) -> Vec<f32> {
    if max_possible <= 0.0 {
        return vec![0.0; raw.len()];
    }
    raw.iter()
        .map(|&v| ((v + max_possible) / (2.0 * max_possible)).clamp(0.0, 1.0) as f32)
        .collect()
}

/// Sum of octave amplitudes, the bound on |raw height| for unit-range noise
fn max_possible_height(octaves: u32, persistence: f64) -> f64 {
    let mut amplitude = 1.0;
    let mut total = 0.0;
    for _ in 0..octaves {
        total += amplitude;
        amplitude *= persistence;
    }
    total.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(seed: u32) -> NoiseParams {
        NoiseParams {
            seed,
            scale: 27.6,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            offset: Vector2::new(0.0, 0.0),
            normalize_mode: NormalizeMode::Local,
        }
    }

    #[test]
    fn test_octave_offsets_are_seeded() {
        let a = octave_offsets(7, 5, Vector2::new(0.0, 0.0));
        let b = octave_offsets(7, 5, Vector2::new(0.0, 0.0));
        let c = octave_offsets(8, 5, Vector2::new(0.0, 0.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 5);

        let range = OCTAVE_OFFSET_RANGE as f64;
        assert!(a.iter().flatten().all(|v| *v >= -range && *v < range));
    }

    #[test]
    fn test_caller_offset_shifts_every_octave() {
        let base = octave_offsets(3, 3, Vector2::new(0.0, 0.0));
        let shifted = octave_offsets(3, 3, Vector2::new(10.0, -4.0));
        for (b, s) in base.iter().zip(&shifted) {
            assert_eq!(s[0] - b[0], 10.0);
            assert_eq!(s[1] - b[1], -4.0);
        }
    }

    #[test]
    fn test_non_positive_scale_does_not_produce_nan() {
        let mut p = params(1);
        p.scale = 0.0;
        let field = generate_noise_map_with(16, 16, &p, Point2::new(0.0, 0.0));
        assert!(field.values().iter().all(|v| v.is_finite()));

        p.scale = -3.0;
        let field = generate_noise_map_with(16, 16, &p, Point2::new(0.0, 0.0));
        assert!(field.values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_zero_octaves_is_flat() {
        let mut p = params(1);
        p.octaves = 0;
        let field = generate_noise_map_with(8, 8, &p, Point2::new(0.0, 0.0));
        assert!(field.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_global_mode_stays_in_unit_range() {
        let mut p = params(99);
        p.normalize_mode = NormalizeMode::Global;
        let field = generate_noise_map_with(32, 32, &p, Point2::new(240.0, -480.0));
        assert!(field.values().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_origin_continues_the_neighbouring_field() {
        // The last column of one field and the first column of the field one
        // chunk to the right sample the same noise positions.
        let mut p = params(5);
        p.normalize_mode = NormalizeMode::Global;
        let size = 9;
        let left = generate_noise_map_with(size, size, &p, Point2::new(0.0, 0.0));
        let right = generate_noise_map_with(size, size, &p, Point2::new((size - 1) as f32, 0.0));
        for y in 0..size {
            assert!((left.get(size - 1, y) - right.get(0, y)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_max_possible_height() {
        assert_eq!(max_possible_height(3, 0.5), 1.75);
        assert_eq!(max_possible_height(0, 0.5), 0.0);
    }
}
