use crate::error::{TerrainError, TerrainResult};

/// Normalized 2-D height samples of one chunk.
///
/// Samples are stored row-major (`index = y * width + x`) and addressed as
/// `[x, y]`. Produced once per chunk and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl HeightField {
    /// Zero-filled field
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
        }
    }

    /// Wrap existing row-major samples
    pub fn from_values(width: usize, height: usize, values: Vec<f32>) -> TerrainResult<Self> {
        let expected = width * height;
        if values.len() != expected {
            return Err(TerrainError::HeightFieldSize {
                width,
                height,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { width, height, values })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Sample at `(x, y)`. Panics when out of range, like slice indexing.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[self.index(x, y)]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Smallest and largest sample, `None` for an empty field
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.values.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
    }
}
