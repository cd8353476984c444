//! Player and enemy entities
//!
//! Every entity shares a [`Body`]: integer position, velocity, extent and
//! hit points. The player and the two enemy kinds differ only in how they
//! pick a velocity and how they attack, which is dispatched on
//! [`EnemyKind`] rather than through a trait object.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, clip_to_arena, max_position};
use super::projectile::Projectile;
use crate::consts::*;
use crate::{angle_between, direction_vector};

/// Which kind of entity a body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Melee,
    Ranged,
}

/// Shared kinematic state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub pos: IVec2,
    pub vel: IVec2,
    pub size: IVec2,
    pub hp: i32,
    /// Only initialized bodies move, attack and can be shot
    pub initialized: bool,
}

impl Body {
    pub fn new(pos: IVec2, size: IVec2, hp: i32, initialized: bool) -> Self {
        Self {
            pos,
            vel: IVec2::ZERO,
            size,
            hp,
            initialized,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn intersects(&self, other: &Body) -> bool {
        self.rect().intersects(&other.rect())
    }

    #[inline]
    pub fn adjacent(&self, other: &Body) -> bool {
        self.rect().adjacent(&other.rect())
    }

    /// Largest legal top-left corner
    #[inline]
    pub fn max_pos(&self) -> IVec2 {
        max_position(self.size)
    }

    /// Clamp back inside the arena walls
    #[inline]
    pub fn clip(&mut self) {
        self.pos = clip_to_arena(self.pos, self.size);
    }

    /// Subtract damage, flooring at zero. Returns the new hit points.
    pub fn take_damage(&mut self, damage: i32) -> i32 {
        self.hp = (self.hp - damage).max(0);
        self.hp
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }
}

/// Step two overlapping bodies apart one pixel per axis per iteration.
///
/// On each axis the mover backs off against its own velocity; if it is not
/// moving on that axis the partner is backed off against its velocity
/// instead. Returns `false` if the overlap survived `limit` iterations
/// (neither body moving on the axis that still overlaps).
pub fn unstick(this: &mut Body, that: &mut Body, limit: u32) -> bool {
    let mut steps = 0;
    while this.intersects(that) {
        if steps >= limit {
            return false;
        }
        steps += 1;

        if this.vel.x != 0 {
            this.pos.x -= this.vel.x.signum();
        } else {
            that.pos.x -= that.vel.x.signum();
        }
        if this.vel.y != 0 {
            this.pos.y -= this.vel.y.signum();
        } else {
            that.pos.y -= that.vel.y.signum();
        }
    }
    true
}

/// Iteration cap for [`unstick`] between two bodies
#[inline]
pub fn unstick_limit(a: &Body, b: &Body) -> u32 {
    (a.size + b.size).element_sum().max(1) as u32
}

/// The player-controlled square
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Last click target in arena coordinates
    pub target: IVec2,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Player centered in the arena, initialized and at full health
    pub fn new() -> Self {
        let size = IVec2::splat(PLAYER_SIZE);
        let pos = IVec2::new((ARENA_WIDTH - size.x) / 2, (ARENA_HEIGHT - size.y) / 2);
        Self {
            body: Body::new(pos, size, PLAYER_HP, true),
            target: IVec2::ZERO,
        }
    }

    pub fn set_target(&mut self, x: i32, y: i32) {
        self.target = IVec2::new(x, y);
    }

    /// Fire a projectile from the body center toward the stored target
    pub fn attack(&self) -> Projectile {
        let center = self.body.rect().center();
        let theta = angle_between(center.as_dvec2(), self.target.as_dvec2());
        Projectile::new(center, theta, false, PLAYER_DAMAGE)
    }
}

/// Enemy behaviour variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Chases the player and strikes when adjacent
    Melee,
    /// Wanders randomly and shoots at the player
    Ranged,
}

impl EnemyKind {
    pub fn speed(&self) -> i32 {
        match self {
            EnemyKind::Melee => MELEE_SPEED,
            EnemyKind::Ranged => RANGED_SPEED,
        }
    }

    pub fn entity_kind(&self) -> EntityKind {
        match self {
            EnemyKind::Melee => EntityKind::Melee,
            EnemyKind::Ranged => EntityKind::Ranged,
        }
    }
}

/// Outcome of an enemy's attack cadence firing
#[derive(Debug, Clone)]
pub enum Attack {
    /// Melee strike landed on the adjacent player
    Strike { damage: i32 },
    /// Ranged shot aimed at the player's center
    Shot(Projectile),
}

/// A melee or ranged enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub body: Body,
    /// Damage per hit (the level the enemy was spawned on)
    pub damage: i32,
    /// Ticks since the last attack
    pub attack_stage: u32,
    /// Ticks of fade-in completed
    pub init_stage: u32,
}

impl Enemy {
    /// A fresh, uninitialized enemy at the origin. Ranged enemies pick their
    /// first random velocity immediately.
    pub fn new<R: Rng + ?Sized>(id: u32, kind: EnemyKind, damage: i32, rng: &mut R) -> Self {
        let mut enemy = Self {
            id,
            kind,
            body: Body::new(IVec2::ZERO, IVec2::splat(ENEMY_SIZE), ENEMY_HP, false),
            damage,
            attack_stage: 0,
            init_stage: 0,
        };
        if kind == EnemyKind::Ranged {
            enemy.body.vel.x = random_axis_speed(rng);
            enemy.body.vel.y = random_axis_speed(rng);
        }
        enemy
    }

    /// Advance the fade-in. Returns true on the tick the enemy becomes live.
    pub fn initialize(&mut self) -> bool {
        self.init_stage += 1;
        if self.init_stage >= TICKS_TO_INITIALIZE && !self.body.initialized {
            self.body.initialized = true;
            return true;
        }
        false
    }

    /// AI hook run before the enemy moves
    pub fn update_velocity<R: Rng + ?Sized>(&mut self, player: &Body, rng: &mut R) {
        match self.kind {
            EnemyKind::Melee => {
                // Aim corner to corner; truncation keeps diagonal speed under 10
                let theta = angle_between(self.body.pos.as_dvec2(), player.pos.as_dvec2());
                let v = direction_vector(theta) * MELEE_SPEED as f64;
                self.body.vel = IVec2::new(v.x as i32, v.y as i32);

                if self.body.adjacent(player) {
                    self.body.vel = IVec2::ZERO;
                }
            }
            EnemyKind::Ranged => {
                if rng.random_bool(RANGED_VELOCITY_CHANGE) {
                    self.body.vel.x = random_axis_speed(rng);
                }
                if rng.random_bool(RANGED_VELOCITY_CHANGE) {
                    self.body.vel.y = random_axis_speed(rng);
                }
            }
        }
    }

    /// Advance the attack cadence; every `TICKS_PER_ATTACK` ticks the enemy
    /// strikes (melee, only when adjacent) or fires (ranged).
    pub fn attack(&mut self, player: &Body) -> Option<Attack> {
        self.attack_stage += 1;
        if self.attack_stage < TICKS_PER_ATTACK {
            return None;
        }
        self.attack_stage = 0;

        match self.kind {
            EnemyKind::Melee => self
                .body
                .adjacent(player)
                .then_some(Attack::Strike { damage: self.damage }),
            EnemyKind::Ranged => {
                let from = self.body.rect().center();
                let to = player.rect().center();
                let theta = angle_between(from.as_dvec2(), to.as_dvec2());
                Some(Attack::Shot(Projectile::new(from, theta, true, self.damage)))
            }
        }
    }
}

/// One of -speed, 0, +speed with equal probability
fn random_axis_speed<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    RANGED_SPEED * rng.random_range(-1..=1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn body_at(x: i32, y: i32, vx: i32, vy: i32) -> Body {
        let mut b = Body::new(IVec2::new(x, y), IVec2::splat(20), 1, true);
        b.vel = IVec2::new(vx, vy);
        b
    }

    #[test]
    fn test_player_spawns_centered() {
        let player = Player::new();
        assert_eq!(player.body.pos, IVec2::new(190, 190));
        assert_eq!(player.body.hp, 100);
        assert!(player.body.initialized);
    }

    #[test]
    fn test_take_damage_floors_at_zero() {
        let mut b = body_at(0, 0, 0, 0);
        b.hp = 3;
        assert_eq!(b.take_damage(2), 1);
        assert_eq!(b.take_damage(5), 0);
        assert!(b.is_dead());
    }

    #[test]
    fn test_unstick_backs_off_mover() {
        // Mover stepped right by 8 into a stationary body
        let mut this = body_at(188, 100, 8, 0);
        let mut that = body_at(200, 100, 0, 0);
        assert!(unstick(&mut this, &mut that, 80));
        assert_eq!(this.pos.x, 180);
        assert_eq!(that.pos, IVec2::new(200, 100));
        assert!(this.rect().adjacent_x(&that.rect()));
    }

    #[test]
    fn test_unstick_nudges_partner_when_mover_idle_on_axis() {
        let mut this = body_at(100, 100, 0, 0);
        // Partner walked left into the idle mover
        let mut that = body_at(115, 100, -3, 0);
        assert!(unstick(&mut this, &mut that, 80));
        assert_eq!(this.pos, IVec2::new(100, 100));
        assert_eq!(that.pos.x, 120);
    }

    #[test]
    fn test_unstick_gives_up_without_motion() {
        let mut this = body_at(100, 100, 0, 0);
        let mut that = body_at(110, 110, 0, 0);
        assert!(!unstick(&mut this, &mut that, 40));
        assert_eq!(this.pos, IVec2::new(100, 100));
        assert_eq!(that.pos, IVec2::new(110, 110));
    }

    #[test]
    fn test_enemy_initializes_after_twenty_ticks() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e = Enemy::new(1, EnemyKind::Melee, 1, &mut rng);
        for _ in 0..19 {
            assert!(!e.initialize());
        }
        assert!(!e.body.initialized);
        assert!(e.initialize());
        assert!(e.body.initialized);
        // Flips exactly once
        assert!(!e.initialize());
    }

    #[test]
    fn test_ranged_velocity_is_axis_multiple() {
        let mut rng = Pcg32::seed_from_u64(42);
        for id in 0..50 {
            let e = Enemy::new(id, EnemyKind::Ranged, 1, &mut rng);
            assert!([-3, 0, 3].contains(&e.body.vel.x));
            assert!([-3, 0, 3].contains(&e.body.vel.y));
        }
    }

    #[test]
    fn test_melee_pursuit_truncates_toward_zero() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut e = Enemy::new(1, EnemyKind::Melee, 1, &mut rng);
        e.body.pos = IVec2::new(0, 0);
        let player = body_at(100, 100, 0, 0);
        e.update_velocity(&player, &mut rng);
        // cos(pi/4) * 10 = 7.07...
        assert_eq!(e.body.vel, IVec2::new(7, 7));

        e.body.pos = IVec2::new(300, 100);
        e.update_velocity(&player, &mut rng);
        assert_eq!(e.body.vel, IVec2::new(-10, 0));
    }

    #[test]
    fn test_melee_stops_when_adjacent() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut e = Enemy::new(1, EnemyKind::Melee, 1, &mut rng);
        e.body.pos = IVec2::new(210, 190);
        let player = body_at(190, 190, 0, 0);
        e.update_velocity(&player, &mut rng);
        assert_eq!(e.body.vel, IVec2::ZERO);
    }

    #[test]
    fn test_melee_strikes_every_tenth_tick_when_adjacent() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut e = Enemy::new(1, EnemyKind::Melee, 2, &mut rng);
        e.body.pos = IVec2::new(190, 170);
        let player = body_at(190, 190, 0, 0);

        for _ in 0..9 {
            assert!(e.attack(&player).is_none());
        }
        assert!(matches!(e.attack(&player), Some(Attack::Strike { damage: 2 })));
        assert_eq!(e.attack_stage, 0);

        // Not adjacent: the cadence still resets, but nothing lands
        e.body.pos = IVec2::new(0, 0);
        for _ in 0..10 {
            assert!(e.attack(&player).is_none());
        }
        assert_eq!(e.attack_stage, 0);
    }

    #[test]
    fn test_ranged_shot_aims_at_player_center() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut e = Enemy::new(1, EnemyKind::Ranged, 1, &mut rng);
        e.body.pos = IVec2::new(90, 190);
        let player = body_at(190, 190, 0, 0);
        e.attack_stage = TICKS_PER_ATTACK - 1;

        match e.attack(&player) {
            Some(Attack::Shot(p)) => {
                assert!(p.enemy_fired);
                assert_eq!(p.pos, IVec2::new(100, 200));
                assert!(p.direction.abs() < 1e-12);
            }
            other => panic!("expected a shot, got {:?}", other),
        }
    }

    #[test]
    fn test_player_attack_direction() {
        let mut player = Player::new();
        player.set_target(210, 210);
        let p = player.attack();
        assert!(!p.enemy_fired);
        assert_eq!(p.damage, 1);
        assert_eq!(p.pos, IVec2::new(200, 200));
        assert!((p.direction - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }
}
