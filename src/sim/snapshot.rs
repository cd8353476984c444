//! Read-only views of the arena for the HUD and renderer

use serde::Serialize;

use super::entity::{Body, EntityKind};
use super::state::Arena;
use crate::consts::{PLAYER_HP, TICKS_TO_INITIALIZE};

/// Health bar color band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HpBand {
    /// Above half
    Healthy,
    /// 26..=50
    Wounded,
    /// 25 or less
    Critical,
}

/// Numbers shown around the playfield
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HudView {
    pub score: u64,
    pub level: u32,
    pub wave: u32,
    pub time_left: i32,
    pub player_hp: i32,
    pub active: bool,
}

impl HudView {
    pub fn hp_band(&self) -> HpBand {
        match self.player_hp {
            hp if hp > 50 => HpBand::Healthy,
            hp if hp > 25 => HpBand::Wounded,
            _ => HpBand::Critical,
        }
    }

    /// Filled fraction of the health bar
    pub fn hp_fraction(&self) -> f32 {
        self.player_hp as f32 / PLAYER_HP as f32
    }
}

/// One entity as the renderer sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityView {
    pub kind: EntityKind,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub initialized: bool,
    pub init_stage: u32,
}

impl EntityView {
    fn new(kind: EntityKind, body: &Body, init_stage: u32) -> Self {
        Self {
            kind,
            x: body.pos.x,
            y: body.pos.y,
            width: body.size.x,
            height: body.size.y,
            initialized: body.initialized,
            init_stage,
        }
    }

    /// Fade-in opacity while the enemy initializes
    pub fn alpha(&self) -> u8 {
        if self.initialized {
            return u8::MAX;
        }
        let t = (self.init_stage as f32 / TICKS_TO_INITIALIZE as f32).min(1.0);
        (t * 255.0) as u8
    }
}

/// One projectile as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub x: i32,
    pub y: i32,
    pub end_x: f64,
    pub end_y: f64,
    pub enemy_fired: bool,
}

impl Arena {
    pub fn hud(&self) -> HudView {
        HudView {
            score: self.score,
            level: self.level,
            wave: self.wave_number,
            time_left: self.time_left,
            player_hp: self.player.body.hp,
            active: self.active,
        }
    }

    /// Enemies in spawn order, then the player (draw order)
    pub fn entity_views(&self) -> Vec<EntityView> {
        self.enemies
            .iter()
            .map(|e| EntityView::new(e.kind.entity_kind(), &e.body, e.init_stage))
            .chain(std::iter::once(EntityView::new(EntityKind::Player, &self.player.body, 0)))
            .collect()
    }

    pub fn projectile_views(&self) -> Vec<ProjectileView> {
        self.projectiles
            .iter()
            .map(|p| ProjectileView {
                x: p.pos.x,
                y: p.pos.y,
                end_x: p.far.x,
                end_y: p.far.y,
                enemy_fired: p.enemy_fired,
            })
            .collect()
    }
}
