//! Axis-aligned boxes for the collision engine
//!
//! Every box in the sim is center-based: `center` is the box midpoint and
//! `half` holds the half-extents. Level tooling that thinks in top-left
//! rectangles converts at the boundary via [`Aabb::from_min_size`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A center-based axis-aligned bounding box
///
/// Half-extents are never negative; constructors take a full size and halve
/// it, so a zero-size box is legal but an inverted one is not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        debug_assert!(size.x >= 0.0 && size.y >= 0.0);
        Self {
            center,
            half: size * 0.5,
        }
    }

    /// Build from a top-left corner and a size (tile-map convention)
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self::new(min + size * 0.5, size)
    }

    /// Top-left corner
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    /// Minkowski expansion: grow this box by another box's half-extents,
    /// so the other box can be swept as a single point.
    #[inline]
    pub fn expand(&self, half: Vec2) -> Self {
        Self {
            center: self.center,
            half: self.half + half,
        }
    }

    /// Point containment, inclusive of edges
    pub fn contains(&self, p: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }

    /// Move the box so its center tracks `pos`
    #[inline]
    pub fn recenter(&mut self, pos: Vec2) {
        self.center = pos;
    }
}
