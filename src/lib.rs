//! Square Siege - a top-down arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, waves, game state)
//! - `clock`: Two-timer scheduler driving the simulation
//! - `autopilot`: Demo controller that plays through ordinary input events
//! - `leaderboard`: Persistent top 10 scores
//! - `settings`: Shell configuration

pub mod autopilot;
pub mod clock;
pub mod leaderboard;
pub mod settings;
pub mod sim;

pub use leaderboard::Leaderboard;
pub use settings::Settings;

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: i32 = 400;
    pub const ARENA_HEIGHT: i32 = 400;

    /// Milliseconds per simulation tick
    pub const TICK_INTERVAL_MS: u64 = 35;
    /// Milliseconds per wave-timer step
    pub const SECOND_INTERVAL_MS: u64 = 1000;
    /// Maximum ticks replayed per scheduler advance to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Seconds between waves
    pub const WAVE_INTERVAL: i32 = 10;
    /// Waves before the level counter rolls over
    pub const WAVES_PER_LEVEL: u32 = 3;

    /// Player defaults
    pub const PLAYER_SIZE: i32 = 20;
    pub const PLAYER_HP: i32 = 100;
    pub const PLAYER_DAMAGE: i32 = 1;
    pub const PLAYER_SPEED: i32 = 8;

    /// Enemy defaults (both kinds)
    pub const ENEMY_SIZE: i32 = 20;
    pub const ENEMY_HP: i32 = 1;
    pub const TICKS_TO_INITIALIZE: u32 = 20;
    pub const TICKS_PER_ATTACK: u32 = 10;

    pub const MELEE_SPEED: i32 = 10;
    pub const RANGED_SPEED: i32 = 3;
    /// Per-axis, per-tick chance a ranged enemy rerolls its velocity
    pub const RANGED_VELOCITY_CHANGE: f64 = 0.1;

    /// Projectile segment
    pub const PROJECTILE_LENGTH: i32 = 30;
    pub const PROJECTILE_SPEED: f64 = 15.0;
}

/// Round to nearest integer, halves toward positive infinity.
///
/// Matches the rounding the game's geometry was tuned with: `-2.5` becomes
/// `-2`, not `-3` as `f64::round` would give.
#[inline]
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction_vector(theta: f64) -> DVec2 {
    DVec2::new(theta.cos(), theta.sin())
}

/// Angle from `from` to `to` (atan2 of the difference), in radians
#[inline]
pub fn angle_between(from: DVec2, to: DVec2) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
        assert_eq!(round_half_up(0.0), 0);
    }

    #[test]
    fn test_angle_between() {
        let a = angle_between(DVec2::new(200.0, 200.0), DVec2::new(210.0, 210.0));
        assert!((a - std::f64::consts::FRAC_PI_4).abs() < 1e-12);

        // Degenerate target resolves to zero like atan2(0, 0)
        let z = angle_between(DVec2::splat(5.0), DVec2::splat(5.0));
        assert_eq!(z, 0.0);
    }

    #[test]
    fn test_direction_vector_is_unit() {
        for i in 0..16 {
            let v = direction_vector(i as f64 * 0.4);
            assert!((v.length() - 1.0).abs() < 1e-12);
        }
    }
}
