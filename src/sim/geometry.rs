//! Axis-aligned rectangle geometry for entities
//!
//! Everything is integer pixels. A rectangle covers `[pos, pos + size)` for
//! intersection purposes, so rectangles that only share an edge do not
//! intersect; they are *adjacent* instead.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// An axis-aligned rectangle in arena pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: IVec2,
    /// Width and height
    pub size: IVec2,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            pos: IVec2::new(x, y),
            size: IVec2::new(width, height),
        }
    }

    /// One past the right/bottom edge
    #[inline]
    pub fn far(&self) -> IVec2 {
        self.pos + self.size
    }

    /// Strict interior overlap. Edge contact does not count.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_far = self.far();
        let b_far = other.far();
        a_far.x > other.pos.x && a_far.y > other.pos.y && b_far.x > self.pos.x && b_far.y > self.pos.y
    }

    /// Touching along a vertical edge with strictly overlapping y-extents
    pub fn adjacent_x(&self, other: &Rect) -> bool {
        (other.far().x == self.pos.x || self.far().x == other.pos.x)
            && self.pos.y < other.far().y
            && other.pos.y < self.far().y
    }

    /// Touching along a horizontal edge with strictly overlapping x-extents
    pub fn adjacent_y(&self, other: &Rect) -> bool {
        (other.far().y == self.pos.y || self.far().y == other.pos.y)
            && self.pos.x < other.far().x
            && other.pos.x < self.far().x
    }

    #[inline]
    pub fn adjacent(&self, other: &Rect) -> bool {
        self.adjacent_x(other) || self.adjacent_y(other)
    }

    /// Inclusive point test on all four edges (used by projectile sampling)
    #[inline]
    pub fn contains_inclusive(&self, point: IVec2) -> bool {
        let far = self.far();
        point.x >= self.pos.x && point.x <= far.x && point.y >= self.pos.y && point.y <= far.y
    }

    /// Integer center (floor division of the extent)
    #[inline]
    pub fn center(&self) -> IVec2 {
        self.pos + self.size / 2
    }
}

/// Largest legal top-left corner for an extent inside the arena
#[inline]
pub fn max_position(size: IVec2) -> IVec2 {
    IVec2::new(ARENA_WIDTH - size.x, ARENA_HEIGHT - size.y)
}

/// Clamp a top-left corner into `[0, max]` on each axis independently
#[inline]
pub fn clip_to_arena(pos: IVec2, size: IVec2) -> IVec2 {
    pos.clamp(IVec2::ZERO, max_position(size))
}

/// True when the corner lies within the legal range for its extent
#[inline]
pub fn within_arena(pos: IVec2, size: IVec2) -> bool {
    let max = max_position(size);
    pos.x >= 0 && pos.y >= 0 && pos.x <= max.x && pos.y <= max.y
}
