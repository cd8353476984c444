//! Line-segment projectiles
//!
//! A projectile is a fixed-length segment travelling along a constant angle.
//! Endpoints are tracked in f64 so long flights don't accumulate rounding;
//! the integer near point is re-derived after every move and is what hit
//! sampling walks from.

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};

use super::entity::Body;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, PROJECTILE_LENGTH, PROJECTILE_SPEED};
use crate::{direction_vector, round_half_up};

/// A projectile fired by the player or by a ranged enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Rounded near endpoint
    pub pos: IVec2,
    /// Near endpoint (leading edge of the previous step)
    pub near: DVec2,
    /// Far endpoint, always `near + dir * LENGTH`
    pub far: DVec2,
    /// Travel angle in radians
    pub direction: f64,
    /// Fired by an enemy; such shots only hurt the player
    pub enemy_fired: bool,
    pub damage: i32,
}

impl Projectile {
    pub fn new(origin: IVec2, direction: f64, enemy_fired: bool, damage: i32) -> Self {
        let near = origin.as_dvec2();
        Self {
            pos: origin,
            near,
            far: near + direction_vector(direction) * PROJECTILE_LENGTH as f64,
            direction,
            enemy_fired,
            damage,
        }
    }

    /// Advance one tick along the travel direction
    pub fn advance(&mut self) {
        let dir = direction_vector(self.direction);
        self.near += dir * PROJECTILE_SPEED;
        self.far = self.near + dir * PROJECTILE_LENGTH as f64;
        self.pos = IVec2::new(round_half_up(self.near.x), round_half_up(self.near.y));
        debug_assert!((dir.length() - 1.0).abs() < 1e-9, "unnormalized projectile direction");
    }

    /// Far endpoint left the arena (right/bottom edges are exclusive)
    pub fn hits_wall(&self) -> bool {
        self.far.x >= ARENA_WIDTH as f64
            || self.far.x < 0.0
            || self.far.y >= ARENA_HEIGHT as f64
            || self.far.y < 0.0
    }

    /// Integer sample points along the segment, one per unit of length
    pub fn samples(&self) -> impl Iterator<Item = IVec2> + '_ {
        let dir = direction_vector(self.direction);
        (0..=PROJECTILE_LENGTH).map(move |i| {
            let step = dir * i as f64;
            self.pos + IVec2::new(round_half_up(step.x), round_half_up(step.y))
        })
    }

    /// Segment touches an initialized body (edges inclusive)
    pub fn hits(&self, target: &Body) -> bool {
        if !target.initialized {
            return false;
        }
        let rect = target.rect();
        self.samples().any(|p| rect.contains_inclusive(p))
    }
}
