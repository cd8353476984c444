//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order for enemies, firing order for projectiles)
//! - No rendering or platform dependencies

pub mod entity;
pub mod geometry;
pub mod input;
pub mod projectile;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use entity::{Attack, Body, Enemy, EnemyKind, EntityKind, Player};
pub use geometry::{Rect, clip_to_arena};
pub use input::{InputEvent, Key};
pub use projectile::Projectile;
pub use snapshot::{EntityView, HpBand, HudView, ProjectileView};
pub use state::{Arena, GameEvent, SimError, Slot};
pub use tick::{apply_input, new_wave, second, tick};
