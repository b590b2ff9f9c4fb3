use cgmath::{Point2, Vector2};
use endless_terrain::{generate_noise_map, generate_noise_map_with, NoiseParams, NormalizeMode};

fn params(seed: u32) -> NoiseParams {
    NoiseParams {
        seed,
        scale: 50.0,
        octaves: 4,
        persistence: 0.5,
        lacunarity: 2.0,
        offset: Vector2::new(0.0, 0.0),
        normalize_mode: NormalizeMode::Local,
    }
}

#[test]
fn test_identical_parameters_are_bit_identical() {
    for seed in [0, 1, 42, 9_999, u32::MAX] {
        let a = generate_noise_map(64, 48, seed, 27.5, 5, 0.45, 2.1, Vector2::new(3.0, -7.0));
        let b = generate_noise_map(64, 48, seed, 27.5, 5, 0.45, 2.1, Vector2::new(3.0, -7.0));
        let a_bits: Vec<u32> = a.values().iter().map(|v| v.to_bits()).collect();
        let b_bits: Vec<u32> = b.values().iter().map(|v| v.to_bits()).collect();
        assert_eq!(a_bits, b_bits, "seed {} is not deterministic", seed);
    }
}

#[test]
fn test_local_normalization_spans_unit_range() {
    for seed in [3, 17, 42] {
        let field = generate_noise_map_with(96, 96, &params(seed), Point2::new(0.0, 0.0));
        assert!(field.values().iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(field.values().iter().any(|&v| v == 0.0), "seed {} has no 0", seed);
        assert!(field.values().iter().any(|&v| v == 1.0), "seed {} has no 1", seed);
    }
}

#[test]
fn test_degenerate_field_is_constant() {
    // No octaves, no signal
    let field = generate_noise_map(8, 8, 5, 10.0, 0, 0.5, 2.0, Vector2::new(0.0, 0.0));
    let first = field.values()[0];
    assert!(field.values().iter().all(|&v| v == first));
    assert_eq!(field.min_max(), Some((0.0, 0.0)));
}

#[test]
fn test_seeds_produce_different_terrain() {
    let a = generate_noise_map_with(32, 32, &params(1), Point2::new(0.0, 0.0));
    let b = generate_noise_map_with(32, 32, &params(2), Point2::new(0.0, 0.0));
    assert_ne!(a, b);
}

#[test]
fn test_global_normalization_stays_in_range() {
    let mut global = params(42);
    global.normalize_mode = NormalizeMode::Global;
    let field = generate_noise_map_with(64, 64, &global, Point2::new(1000.0, -250.0));
    assert!(field.values().iter().all(|v| (0.0..=1.0).contains(v)));
}
