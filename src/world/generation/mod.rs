//! Height and color synthesis
//!
//! All generators here are pure and allocate their own output, so the
//! pipeline workers call them without any synchronization.

mod color_map;
mod height_curve;
mod height_field;
mod map_data;
mod noise_field;

pub use color_map::{classify_height, generate_color_map, Color32, TerrainRegion};
pub use height_curve::{CurveKey, HeightCurve};
pub use height_field::HeightField;
pub use map_data::{generate_map_data, MapData};
pub use noise_field::{generate_noise_map, generate_noise_map_with, NoiseParams, NormalizeMode};
