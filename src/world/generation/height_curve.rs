use serde::{Deserialize, Serialize};

use crate::error::{TerrainError, TerrainResult};

/// One key of a [`HeightCurve`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Remaps normalized heights before they are scaled into vertex heights.
///
/// Piecewise linear between keys, clamped to the first and last key outside
/// the key range. Keys are kept sorted by time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct HeightCurve {
    keys: Vec<CurveKey>,
}

impl HeightCurve {
    pub fn new(mut keys: Vec<CurveKey>) -> TerrainResult<Self> {
        if keys.is_empty() {
            return Err(TerrainError::InvalidHeightCurve {
                message: "at least one key is required".to_string(),
            });
        }
        if let Some(key) = keys.iter().find(|k| !k.time.is_finite() || !k.value.is_finite()) {
            return Err(TerrainError::InvalidHeightCurve {
                message: format!("non-finite key ({}, {})", key.time, key.value),
            });
        }
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self { keys })
    }

    /// Identity mapping over [0, 1]
    pub fn linear() -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, 0.0), CurveKey::new(1.0, 1.0)],
        }
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn evaluate(&self, t: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];
        if t.is_nan() || t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First key strictly after t; never 0 because t > first.time
        let next = self.keys.partition_point(|k| k.time <= t);
        let a = self.keys[next - 1];
        let b = self.keys[next];
        let span = b.time - a.time;
        if span <= 0.0 {
            return b.value;
        }
        a.value + (b.value - a.value) * ((t - a.time) / span)
    }
}

impl Default for HeightCurve {
    fn default() -> Self {
        Self::linear()
    }
}

impl TryFrom<Vec<CurveKey>> for HeightCurve {
    type Error = TerrainError;

    fn try_from(keys: Vec<CurveKey>) -> Result<Self, Self::Error> {
        Self::new(keys)
    }
}

impl From<HeightCurve> for Vec<CurveKey> {
    fn from(curve: HeightCurve) -> Self {
        curve.keys
    }
}
