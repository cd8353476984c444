//! Fixed timestep simulation tick
//!
//! Core game loop that advances the arena one step at a time. Two handlers
//! drive it: [`tick`] every 35 ms and [`second`] every 1000 ms. Both are
//! no-ops while the arena is inactive.

use std::iter;

use super::entity::{Attack, EnemyKind, unstick, unstick_limit};
use super::input::InputEvent;
use super::projectile::Projectile;
use super::state::{Arena, GameEvent, Slot};
use crate::consts::*;

/// Advance the arena by one tick
pub fn tick(arena: &mut Arena) {
    if !arena.active {
        return;
    }
    arena.ticks += 1;

    // Collision partners for this tick: the player plus every enemy present
    // now. Removal is deferred until after the enemy pass, so indices below
    // `enemy_count` stay valid throughout.
    let enemy_count = arena.enemies.len();

    step_projectiles(arena);

    move_entity(arena, Slot::Player, enemy_count);
    if arena.player.body.is_dead() {
        game_over(arena);
    }

    step_enemies(arena, enemy_count);

    if arena.enemies.is_empty() {
        let time_bonus = arena.time_left.max(0) as u64;
        arena.score += time_bonus;
        arena.time_left = WAVE_INTERVAL;
        log::info!("wave {} cleared, +{} time bonus", arena.wave_number, time_bonus);
        arena.emit(GameEvent::WaveCleared { time_bonus });
        new_wave(arena);
    }

    log::trace!(
        "tick {}: {} enemies, {} projectiles, score {}",
        arena.ticks,
        arena.enemies.len(),
        arena.projectiles.len(),
        arena.score
    );
    arena.emit(GameEvent::Repaint);
}

/// Wave timer handler: count down and force the next wave at zero
pub fn second(arena: &mut Arena) {
    if !arena.active {
        return;
    }
    arena.time_left -= 1;
    if arena.time_left <= 0 {
        arena.time_left = WAVE_INTERVAL;
        new_wave(arena);
    }
}

/// Start the next wave: `wave_number` melee and `wave_number` ranged enemies
pub fn new_wave(arena: &mut Arena) {
    if arena.wave_number == WAVES_PER_LEVEL {
        arena.wave_number = 1;
        arena.level += 1;
        log::info!("level {} reached", arena.level);
    } else {
        arena.wave_number += 1;
    }

    for _ in 0..arena.wave_number {
        arena.spawn_enemy(EnemyKind::Melee);
        arena.spawn_enemy(EnemyKind::Ranged);
    }

    log::info!(
        "wave {} of level {}: {} enemies",
        arena.wave_number,
        arena.level,
        arena.wave_number * 2
    );
    arena.emit(GameEvent::WaveStarted {
        wave: arena.wave_number,
        level: arena.level,
    });
}

/// Apply one input event from the shell
pub fn apply_input(arena: &mut Arena, event: InputEvent) {
    match event {
        InputEvent::KeyDown(key) => {
            let v = key.direction() * PLAYER_SPEED;
            let vel = &mut arena.player.body.vel;
            if key.is_horizontal() {
                vel.x = v.x;
            } else {
                vel.y = v.y;
            }
        }
        InputEvent::KeyUp(key) => {
            let vel = &mut arena.player.body.vel;
            if arena.release_stops_both_axes {
                *vel = glam::IVec2::ZERO;
            } else if key.is_horizontal() {
                vel.x = 0;
            } else {
                vel.y = 0;
            }
        }
        // Accepted while paused too; the shot waits for the next tick
        InputEvent::MousePress { x, y } => {
            arena.player.set_target(x, y);
            let shot = arena.player.attack();
            fire(arena, shot);
            arena.shots_fired += 1;
        }
        InputEvent::ToggleActive => arena.toggle_active(),
    }
}

fn fire(arena: &mut Arena, projectile: Projectile) {
    log::trace!(
        "projectile from ({}, {}) at {:.3} rad (enemy: {})",
        projectile.pos.x,
        projectile.pos.y,
        projectile.direction,
        projectile.enemy_fired
    );
    arena.projectiles.push(projectile);
}

/// Advance every projectile once and resolve wall and entity hits
fn step_projectiles(arena: &mut Arena) {
    let mut projectiles = std::mem::take(&mut arena.projectiles);
    projectiles.retain_mut(|p| {
        p.advance();
        !resolve_projectile(arena, p)
    });
    // Nothing fires during this pass, so the arena's list is still empty
    debug_assert!(arena.projectiles.is_empty());
    arena.projectiles = projectiles;
}

/// Apply a moved projectile's hits. Returns true if it is spent.
fn resolve_projectile(arena: &mut Arena, p: &Projectile) -> bool {
    let mut spent = p.hits_wall();

    if p.enemy_fired {
        // Enemy shots pass through other enemies
        if p.hits(&arena.player.body) {
            let hp = arena.player.body.take_damage(p.damage);
            arena.emit(GameEvent::PlayerHit { damage: p.damage, hp });
            spent = true;
        }
    } else {
        for enemy in arena.enemies.iter_mut() {
            if p.hits(&enemy.body) {
                enemy.body.take_damage(p.damage);
                spent = true;
            }
        }
    }
    spent
}

/// Move or initialize each enemy present at the start of the tick, then
/// drop the dead ones
fn step_enemies(arena: &mut Arena, enemy_count: usize) {
    for i in 0..enemy_count {
        if !arena.enemies[i].body.initialized {
            if arena.enemies[i].initialize() {
                log::debug!("enemy #{} initialized", arena.enemies[i].id);
            }
            continue;
        }

        move_entity(arena, Slot::Enemy(i), enemy_count);

        if arena.enemies[i].body.is_dead() {
            let reward = arena.level as u64;
            arena.score += reward;
            arena.kills += 1;
            let kind = arena.enemies[i].kind;
            log::debug!("{:?} #{} killed, +{}", kind, arena.enemies[i].id, reward);
            arena.emit(GameEvent::EnemyKilled { kind, reward });
            continue;
        }

        let player = arena.player.body;
        match arena.enemies[i].attack(&player) {
            Some(Attack::Strike { damage }) => {
                let hp = arena.player.body.take_damage(damage);
                arena.emit(GameEvent::PlayerHit { damage, hp });
            }
            Some(Attack::Shot(projectile)) => fire(arena, projectile),
            None => {}
        }
    }

    // Every initialized enemy at zero HP was rewarded above; fading-in
    // enemies can't be shot, so HP alone identifies the dead.
    arena.enemies.retain(|e| !e.body.is_dead());
}

/// Move one entity by its velocity, stopping it against the first partner
/// it runs into and against the walls.
///
/// If the resolved pair would still overlap any body (the mover wedged into
/// a second partner, or the nudged partner pushed into a third), the move
/// is abandoned and the mover keeps its pre-move position.
fn move_entity(arena: &mut Arena, slot: Slot, enemy_count: usize) {
    if !arena.body(slot).initialized {
        return;
    }
    if let Slot::Enemy(i) = slot {
        let player = arena.player.body;
        arena.enemies[i].update_velocity(&player, &mut arena.rng);
    }

    let start = *arena.body(slot);
    let mut this = start;
    this.pos += this.vel;

    let partners = || {
        iter::once(Slot::Player)
            .chain((0..enemy_count).map(Slot::Enemy))
            .filter(move |&other| other != slot)
    };
    let blocker = partners().find(|&other| this.intersects(arena.body(other)));

    let mut nudged = None;
    match blocker {
        Some(other) => {
            let mut that = *arena.body(other);
            this.clip();
            let limit = unstick_limit(&this, &that);
            if !unstick(&mut this, &mut that, limit) {
                log::warn!(
                    "could not separate {:?} at ({}, {}) from {:?} at ({}, {})",
                    slot,
                    this.pos.x,
                    this.pos.y,
                    other,
                    that.pos.x,
                    that.pos.y
                );
            }
            this.clip();
            that.clip();
            nudged = Some((other, that));
        }
        None => this.clip(),
    }

    let body_at = |other: Slot| match nudged {
        Some((n, that)) if n == other => that,
        _ => *arena.body(other),
    };
    let clear = partners().all(|other| !this.intersects(&body_at(other)))
        && nudged.is_none_or(|(n, that)| {
            partners()
                .filter(|&other| other != n)
                .all(|other| !that.intersects(arena.body(other)))
        });
    if !clear {
        log::debug!("{:?} held at ({}, {}): no free spot this tick", slot, start.pos.x, start.pos.y);
        this = start;
        nudged = None;
    }

    if let Some((other, that)) = nudged {
        *arena.body_mut(other) = that;
    }
    debug_assert!(this.pos.x >= 0 && this.pos.x <= this.max_pos().x);
    debug_assert!(this.pos.y >= 0 && this.pos.y <= this.max_pos().y);
    *arena.body_mut(slot) = this;
}

fn game_over(arena: &mut Arena) {
    arena.active = false;
    log::info!("game over: score {}, level {}", arena.score, arena.level);
    arena.emit(GameEvent::GameOver {
        score: arena.score,
        level: arena.level,
    });
}
