use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::HeightField;

/// 8-bit RGBA color, laid out for direct texture upload
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color32 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// A height band: samples at or below `height` take `color`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainRegion {
    pub name: String,
    pub height: f32,
    pub color: Color32,
}

impl TerrainRegion {
    pub fn new(name: impl Into<String>, height: f32, color: Color32) -> Self {
        Self {
            name: name.into(),
            height,
            color,
        }
    }
}

/// Color of the first region whose threshold is at or above `height`.
///
/// Regions must be in ascending threshold order. A height above every
/// threshold gets the default (transparent black) color.
#[inline]
pub fn classify_height(height: f32, regions: &[TerrainRegion]) -> Color32 {
    regions
        .iter()
        .find(|region| height <= region.height)
        .map(|region| region.color)
        .unwrap_or_default()
}

/// One color per height sample, in the same row-major layout
pub fn generate_color_map(height_map: &HeightField, regions: &[TerrainRegion]) -> Vec<Color32> {
    height_map
        .values()
        .iter()
        .map(|&height| classify_height(height, regions))
        .collect()
}
