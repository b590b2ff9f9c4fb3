//! Height field to terrain geometry
//!
//! Pure and deterministic. Distant chunks use a coarser detail level, which
//! skips samples: level 0 keeps every sample, level `n > 0` keeps every
//! `2n`-th one.

use crate::error::{TerrainError, TerrainResult};
use crate::renderer::mesh::TerrainMesh;
use crate::world::{HeightCurve, HeightField};

/// Sample step for a detail level
#[inline]
pub fn detail_step(detail_level: u32) -> usize {
    if detail_level == 0 {
        1
    } else {
        detail_level as usize * 2
    }
}

/// Vertices along an axis of `samples` samples at `detail_level`
#[inline]
pub fn vertices_per_line(samples: usize, detail_level: u32) -> usize {
    (samples.max(1) - 1) / detail_step(detail_level) + 1
}

/// Build the mesh of one chunk, centered on the chunk origin.
pub fn build_terrain_mesh(
    height_map: &HeightField,
    height_curve: &HeightCurve,
    height_multiplier: f32,
    detail_level: u32,
) -> TerrainResult<TerrainMesh> {
    let width = height_map.width();
    let height = height_map.height();
    if height_map.is_empty() {
        return Err(TerrainError::EmptyHeightField { width, height });
    }

    let step = detail_step(detail_level);
    let verts_x = vertices_per_line(width, detail_level);
    let verts_z = vertices_per_line(height, detail_level);

    // Keeps the center of the chunk at (0, 0)
    let top_left_x = (width - 1) as f32 / -2.0;
    let top_left_z = (height - 1) as f32 / 2.0;

    let mut mesh = TerrainMesh::with_grid_capacity(verts_x, verts_z);
    let row = verts_x as u32;
    let mut vertex_index: u32 = 0;

    for vz in 0..verts_z {
        let y = vz * step;
        for vx in 0..verts_x {
            let x = vx * step;

            let vertex_height = height_curve.evaluate(height_map.get(x, y)) * height_multiplier;
            mesh.vertices.push([top_left_x + x as f32, vertex_height, top_left_z - y as f32]);
            mesh.uvs.push([x as f32 / width as f32, y as f32 / height as f32]);

            // No quads start on the last vertex column or row
            //   i ----- i+1
            //   |  \     |
            //   |    \   |
            //  i+w --- i+w+1
            if vx + 1 < verts_x && vz + 1 < verts_z {
                mesh.add_triangle(vertex_index, vertex_index + row + 1, vertex_index + row);
                mesh.add_triangle(vertex_index + row + 1, vertex_index, vertex_index + 1);
            }
            vertex_index += 1;
        }
    }

    log::trace!(
        "[mesh_builder::build_terrain_mesh] {}x{} samples at detail {} -> {} vertices, {} triangles",
        width,
        height,
        detail_level,
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> HeightField {
        let values = (0..width * height)
            .map(|i| (i % width) as f32 / (width - 1) as f32)
            .collect();
        HeightField::from_values(width, height, values).expect("sized ramp")
    }

    #[test]
    fn test_detail_steps() {
        assert_eq!(detail_step(0), 1);
        assert_eq!(detail_step(1), 2);
        assert_eq!(detail_step(6), 12);
        assert_eq!(vertices_per_line(241, 0), 241);
        assert_eq!(vertices_per_line(241, 1), 121);
        assert_eq!(vertices_per_line(241, 6), 21);
    }

    #[test]
    fn test_chunk_is_centered() {
        let mesh = build_terrain_mesh(&ramp(5, 5), &HeightCurve::linear(), 1.0, 0)
            .expect("non-empty field");
        assert_eq!(mesh.vertices[0][0], -2.0);
        assert_eq!(mesh.vertices[0][2], 2.0);
        assert_eq!(mesh.vertices[24][0], 2.0);
        assert_eq!(mesh.vertices[24][2], -2.0);
    }

    #[test]
    fn test_heights_go_through_curve_and_multiplier() {
        let field = ramp(3, 2);
        let mesh = build_terrain_mesh(&field, &HeightCurve::linear(), 10.0, 0).expect("non-empty field");
        assert_eq!(mesh.vertices[0][1], 0.0);
        assert_eq!(mesh.vertices[1][1], 5.0);
        assert_eq!(mesh.vertices[2][1], 10.0);
    }

    #[test]
    fn test_uvs_are_normalized_sample_positions() {
        let mesh = build_terrain_mesh(&ramp(4, 4), &HeightCurve::linear(), 1.0, 0).expect("non-empty field");
        assert_eq!(mesh.uvs[0], [0.0, 0.0]);
        assert_eq!(mesh.uvs[1], [0.25, 0.0]);
        assert_eq!(mesh.uvs[4], [0.0, 0.25]);
    }

    #[test]
    fn test_triangles_share_the_quad_diagonal() {
        let mesh = build_terrain_mesh(&ramp(3, 3), &HeightCurve::linear(), 1.0, 0).expect("non-empty field");
        let triangles: Vec<[u32; 3]> = mesh.triangle_iter().collect();
        assert_eq!(triangles[0], [0, 4, 3]);
        assert_eq!(triangles[1], [4, 0, 1]);
        assert_eq!(triangles.len(), 8);
    }

    #[test]
    fn test_empty_field_is_an_error() {
        let field = HeightField::new(0, 5);
        let result = build_terrain_mesh(&field, &HeightCurve::linear(), 1.0, 0);
        assert!(matches!(result, Err(TerrainError::EmptyHeightField { width: 0, height: 5 })));
    }

    #[test]
    fn test_single_sample_has_no_triangles() {
        let field = HeightField::new(1, 1);
        let mesh = build_terrain_mesh(&field, &HeightCurve::linear(), 1.0, 0).expect("1x1 field");
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.triangle_count(), 0);
    }
}
