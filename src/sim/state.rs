//! Arena state and core simulation types
//!
//! The arena exclusively owns the player, the enemies and the projectiles.
//! Entities never hold a pointer back to it; the tick code passes them the
//! pieces of arena state they need.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Enemy, EnemyKind, Player};
use super::projectile::Projectile;
use super::tick::new_wave;
use crate::consts::*;

/// Random spawn attempts before a crowded arena is reported
pub const SPAWN_ATTEMPTS_WARN: u32 = 10_000;

/// Errors the simulation reports to its caller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("another entity already occupies ({x}, {y})")]
    PlacementOccupied { x: i32, y: i32 },
}

/// Notifications for the outer shell, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// State changed; the renderer should redraw
    Repaint,
    WaveStarted { wave: u32, level: u32 },
    EnemyKilled { kind: EnemyKind, reward: u64 },
    /// Every enemy died before the wave timer ran out
    WaveCleared { time_bonus: u64 },
    PlayerHit { damage: i32, hp: i32 },
    GameOver { score: u64, level: u32 },
}

/// Addresses one entity inside the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Player,
    /// Index into `Arena::enemies`
    Enemy(usize),
}

/// The playfield and everything in it
#[derive(Debug, Clone)]
pub struct Arena {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Single source of randomness: spawns and ranged AI
    pub(crate) rng: Pcg32,
    pub player: Player,
    /// Enemies in spawn order
    pub enemies: Vec<Enemy>,
    /// Projectiles in firing order
    pub projectiles: Vec<Projectile>,
    pub score: u64,
    /// Ticks and the wave timer only run while active
    pub active: bool,
    /// Wave within the current level (1..=WAVES_PER_LEVEL, 0 before the first)
    pub wave_number: u32,
    /// Level counter; enemy damage equals the level they spawned on
    pub level: u32,
    /// Seconds until the next wave arrives
    pub time_left: i32,
    /// Releasing any movement key stops both axes
    pub release_stops_both_axes: bool,
    /// Active ticks simulated
    pub ticks: u64,
    pub shots_fired: u64,
    pub kills: u64,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl Arena {
    /// Create an inactive arena with the first wave already spawned
    pub fn new(seed: u64) -> Self {
        let mut arena = Self::empty(seed);
        new_wave(&mut arena);
        arena
    }

    /// Arena with a centered player, no enemies and no wave entered yet
    pub fn empty(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            score: 0,
            active: false,
            wave_number: 0,
            level: 1,
            time_left: WAVE_INTERVAL,
            release_stops_both_axes: true,
            ticks: 0,
            shots_fired: 0,
            kills: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new enemy ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Pause/resume
    pub fn toggle_active(&mut self) {
        self.active = !self.active;
        log::debug!("arena active = {}", self.active);
    }

    pub fn is_game_over(&self) -> bool {
        self.player.body.is_dead()
    }

    /// Damage dealt by enemies spawned right now
    pub fn enemy_damage(&self) -> i32 {
        self.level as i32
    }

    pub fn body(&self, slot: Slot) -> &Body {
        match slot {
            Slot::Player => &self.player.body,
            Slot::Enemy(i) => &self.enemies[i].body,
        }
    }

    pub fn body_mut(&mut self, slot: Slot) -> &mut Body {
        match slot {
            Slot::Player => &mut self.player.body,
            Slot::Enemy(i) => &mut self.enemies[i].body,
        }
    }

    /// Spawn an uninitialized enemy at a random free spot
    pub fn spawn_enemy(&mut self, kind: EnemyKind) -> usize {
        let id = self.next_entity_id();
        let damage = self.enemy_damage();
        let mut enemy = Enemy::new(id, kind, damage, &mut self.rng);
        let max = enemy.body.max_pos();

        let mut attempts = 0u32;
        loop {
            attempts += 1;
            // Half-open: the last column/row is never chosen
            enemy.body.pos = IVec2::new(self.rng.random_range(0..max.x), self.rng.random_range(0..max.y));
            if self.is_free(&enemy.body) {
                break;
            }
            if attempts == SPAWN_ATTEMPTS_WARN {
                log::warn!(
                    "no free spot for {:?} #{} after {} attempts ({} enemies in the arena), still trying",
                    kind,
                    id,
                    attempts,
                    self.enemies.len()
                );
            }
        }

        log::debug!(
            "spawned {:?} #{} at ({}, {}) after {} attempt(s)",
            kind,
            id,
            enemy.body.pos.x,
            enemy.body.pos.y,
            attempts
        );
        self.enemies.push(enemy);
        self.enemies.len() - 1
    }

    /// Spawn an uninitialized enemy at an exact spot, failing if it is taken
    pub fn spawn_enemy_at(&mut self, kind: EnemyKind, damage: i32, x: i32, y: i32) -> Result<usize, SimError> {
        let id = self.next_entity_id();
        let mut enemy = Enemy::new(id, kind, damage, &mut self.rng);
        enemy.body.pos = IVec2::new(x, y);
        if !self.is_free(&enemy.body) {
            return Err(SimError::PlacementOccupied { x, y });
        }
        self.enemies.push(enemy);
        Ok(self.enemies.len() - 1)
    }

    /// No enemy or player overlaps this body
    fn is_free(&self, body: &Body) -> bool {
        !body.intersects(&self.player.body) && self.enemies.iter().all(|e| !body.intersects(&e.body))
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
