use cgmath::Point2;

use super::{generate_color_map, generate_noise_map_with, Color32, HeightField};
use crate::config::TerrainConfig;

/// Output of a height job: normalized heights plus their band colors
#[derive(Debug, Clone, PartialEq)]
pub struct MapData {
    pub height_map: HeightField,
    pub color_map: Vec<Color32>,
}

/// Sample the height field and color map of the chunk centered at
/// `chunk_center` (world x/z).
pub fn generate_map_data(config: &TerrainConfig, chunk_center: Point2<f32>) -> MapData {
    let resolution = config.mesh.chunk_resolution as usize;

    // Mesh rows run towards -z, so noise rows follow world -z as well
    let origin = Point2::new(chunk_center.x, -chunk_center.y);
    let height_map = generate_noise_map_with(resolution, resolution, &config.noise.params(), origin);
    let color_map = generate_color_map(&height_map, &config.regions);

    MapData { height_map, color_map }
}
