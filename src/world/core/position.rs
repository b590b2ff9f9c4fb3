use std::fmt;

use cgmath::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Position of a chunk on the chunk grid (chunk-size units, not world units)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell containing a world-space viewer position.
    ///
    /// Rounds to the nearest cell rather than flooring: chunks are centered on
    /// their grid position, so cell `n` covers `[n - 0.5, n + 0.5) * chunk_size`.
    pub fn from_world_pos(world: Point2<f32>, chunk_size: f32) -> Self {
        Self::new(
            (world.x / chunk_size).round() as i32,
            (world.y / chunk_size).round() as i32,
        )
    }

    /// World-space center of this chunk
    pub fn to_world_pos(&self, chunk_size: f32) -> Point2<f32> {
        Point2::new(self.x as f32 * chunk_size, self.y as f32 * chunk_size)
    }

    /// Coordinate offset by the given amounts, `None` past the edge of the grid
    pub fn checked_offset(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned 2-D bounds of a chunk in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkBounds {
    pub center: Point2<f32>,
    pub half_extent: Vector2<f32>,
}

impl ChunkBounds {
    /// Square bounds of side `size` centered on `center`
    pub fn square(center: Point2<f32>, size: f32) -> Self {
        Self {
            center,
            half_extent: Vector2::new(size * 0.5, size * 0.5),
        }
    }

    pub fn min(&self) -> Point2<f32> {
        self.center - self.half_extent
    }

    pub fn max(&self) -> Point2<f32> {
        self.center + self.half_extent
    }

    /// Squared distance from `point` to the nearest point of the bounds.
    /// Zero when the point lies inside.
    pub fn sqr_distance(&self, point: Point2<f32>) -> f32 {
        let dx = ((point.x - self.center.x).abs() - self.half_extent.x).max(0.0);
        let dy = ((point.y - self.center.y).abs() - self.half_extent.y).max(0.0);
        dx * dx + dy * dy
    }

    pub fn distance(&self, point: Point2<f32>) -> f32 {
        self.sqr_distance(point).sqrt()
    }
}
