use std::collections::HashSet;

use endless_terrain::{build_terrain_mesh, generate_noise_map, CurveKey, HeightCurve, HeightField, TerrainMesh};
use cgmath::Vector2;

fn noise_field(width: usize, height: usize) -> HeightField {
    generate_noise_map(width, height, 42, 25.0, 4, 0.5, 2.0, Vector2::new(0.0, 0.0))
}

fn flat_field(width: usize, height: usize) -> HeightField {
    HeightField::new(width, height)
}

/// y component of the triangle normal (b - a) x (c - a)
fn normal_y(mesh: &TerrainMesh, [a, b, c]: [u32; 3]) -> f32 {
    let a = mesh.vertices[a as usize];
    let b = mesh.vertices[b as usize];
    let c = mesh.vertices[c as usize];
    let e1 = [b[0] - a[0], b[2] - a[2]];
    let e2 = [c[0] - a[0], c[2] - a[2]];
    e1[1] * e2[0] - e1[0] * e2[1]
}

#[test]
fn test_full_detail_counts() {
    for (width, height) in [(2, 2), (3, 7), (16, 16), (241, 241)] {
        let mesh = build_terrain_mesh(&flat_field(width, height), &HeightCurve::linear(), 1.0, 0)
            .expect("non-empty field");
        assert_eq!(mesh.vertex_count(), width * height);
        assert_eq!(mesh.uvs.len(), width * height);
        assert_eq!(mesh.triangle_count(), 2 * (width - 1) * (height - 1));
        assert!(mesh.triangles.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }
}

#[test]
fn test_winding_is_consistent() {
    let mesh = build_terrain_mesh(&flat_field(9, 6), &HeightCurve::linear(), 1.0, 0).expect("non-empty field");
    assert!(mesh.triangle_iter().all(|triangle| normal_y(&mesh, triangle) > 0.0));

    let coarse = build_terrain_mesh(&flat_field(241, 241), &HeightCurve::linear(), 1.0, 3).expect("non-empty field");
    assert!(coarse.triangle_iter().all(|triangle| normal_y(&coarse, triangle) > 0.0));
}

#[test]
fn test_coarser_levels_shrink_and_reuse_positions() {
    let field = noise_field(241, 241);
    let curve = HeightCurve::linear();
    let full = build_terrain_mesh(&field, &curve, 6.0, 0).expect("non-empty field");
    let full_positions: HashSet<[u32; 3]> = full
        .vertices
        .iter()
        .map(|v| [v[0].to_bits(), v[1].to_bits(), v[2].to_bits()])
        .collect();

    let mut previous = (full.vertex_count(), full.triangle_count());
    for level in 1..=6 {
        let mesh = build_terrain_mesh(&field, &curve, 6.0, level).expect("non-empty field");
        assert!(mesh.vertex_count() < previous.0, "level {} did not shrink vertices", level);
        assert!(mesh.triangle_count() < previous.1, "level {} did not shrink triangles", level);
        previous = (mesh.vertex_count(), mesh.triangle_count());

        for v in &mesh.vertices {
            assert!(
                full_positions.contains(&[v[0].to_bits(), v[1].to_bits(), v[2].to_bits()]),
                "level {} vertex {:?} is not a full-detail vertex",
                level,
                v
            );
        }
    }
}

#[test]
fn test_step_that_does_not_divide_the_field() {
    // 10 samples at step 4 keeps samples 0, 4 and 8
    let mesh = build_terrain_mesh(&noise_field(10, 10), &HeightCurve::linear(), 1.0, 2).expect("non-empty field");
    assert_eq!(mesh.vertex_count(), 9);
    assert_eq!(mesh.triangle_count(), 8);
    assert!(mesh.triangles.iter().all(|&i| (i as usize) < mesh.vertex_count()));
}

#[test]
fn test_height_curve_shapes_vertices() {
    let values: Vec<f32> = (0..4).map(|i| i as f32 / 3.0).collect();
    let field = HeightField::from_values(4, 1, values).expect("sized field");
    let curve = HeightCurve::new(vec![CurveKey::new(0.0, 0.0), CurveKey::new(0.5, 0.0), CurveKey::new(1.0, 1.0)])
        .expect("valid curve");

    let mesh = build_terrain_mesh(&field, &curve, 10.0, 0).expect("non-empty field");
    let heights: Vec<f32> = mesh.vertices.iter().map(|v| v[1]).collect();
    assert_eq!(heights[0], 0.0);
    assert_eq!(heights[1], 0.0);
    assert!((heights[2] - curve.evaluate(2.0 / 3.0) * 10.0).abs() < 1e-5);
    assert!((heights[3] - 10.0).abs() < 1e-5);
}

#[test]
fn test_interleaved_matches_parallel_arrays() {
    let mesh = build_terrain_mesh(&noise_field(5, 5), &HeightCurve::linear(), 2.0, 0).expect("non-empty field");
    let interleaved = mesh.interleaved();
    assert_eq!(interleaved.len(), mesh.vertex_count());
    for (i, vertex) in interleaved.iter().enumerate() {
        assert_eq!(vertex.position, mesh.vertices[i]);
        assert_eq!(vertex.uv, mesh.uvs[i]);
    }
}
