//! Demo controller for headless sessions
//!
//! Reads the arena through its render views and answers with the same
//! input events a player would produce.

use glam::IVec2;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::sim::{Arena, EntityKind, EntityView, InputEvent, Key};

/// Ticks between autopilot shots
pub const FIRE_INTERVAL: u64 = 6;
/// Melee enemies closer than this (center to center) trigger a strafe
pub const EVADE_RADIUS: i32 = 60;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Movement key currently held down
    held: Option<Key>,
    /// Tick count at the last shot
    last_shot: Option<u64>,
}

fn center(view: &EntityView) -> IVec2 {
    IVec2::new(view.x + view.width / 2, view.y + view.height / 2)
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> Option<Key> {
        self.held
    }

    /// Decide this tick's inputs
    pub fn plan(&mut self, arena: &Arena) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let views = arena.entity_views();
        let Some(player) = views.iter().find(|v| v.kind == EntityKind::Player) else {
            return events;
        };
        let me = center(player);
        let enemies = || views.iter().filter(|v| v.kind != EntityKind::Player);

        // Evade
        let threat = enemies()
            .filter(|v| v.kind == EntityKind::Melee)
            .map(center)
            .filter(|c| c.distance_squared(me) <= EVADE_RADIUS * EVADE_RADIUS)
            .min_by_key(|c| c.distance_squared(me));
        let wanted = threat.map(|c| evade_key(player, me - c));
        if wanted != self.held {
            if let Some(old) = self.held {
                events.push(InputEvent::KeyUp(old));
            }
            if let Some(new) = wanted {
                events.push(InputEvent::KeyDown(new));
            }
            self.held = wanted;
        }

        // Aim and fire
        let ready = self
            .last_shot
            .is_none_or(|t| arena.ticks.saturating_sub(t) >= FIRE_INTERVAL);
        if ready && arena.active {
            let target = enemies()
                .filter(|v| v.initialized)
                .map(center)
                .min_by_key(|c| c.distance_squared(me));
            if let Some(t) = target {
                events.push(InputEvent::MousePress { x: t.x, y: t.y });
                self.last_shot = Some(arena.ticks);
            }
        }

        events
    }
}

/// Key that moves along `away`'s dominant axis, sliding along the wall
/// when the player is already pinned on that axis
fn evade_key(player: &EntityView, away: IVec2) -> Key {
    let max = IVec2::new(ARENA_WIDTH - player.width, ARENA_HEIGHT - player.height);
    let horizontal = if away.x >= 0 {
        (Key::D, player.x < max.x)
    } else {
        (Key::A, player.x > 0)
    };
    let vertical = if away.y >= 0 {
        (Key::S, player.y < max.y)
    } else {
        (Key::W, player.y > 0)
    };
    let (primary, secondary) = if away.x.abs() >= away.y.abs() {
        (horizontal, vertical)
    } else {
        (vertical, horizontal)
    };
    match (primary, secondary) {
        ((key, true), _) | (_, (key, true)) => key,
        // Cornered
        ((key, false), _) => key,
    }
}
