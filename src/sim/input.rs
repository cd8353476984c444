//! Input events delivered by the outer shell

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Movement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
}

impl Key {
    /// Unit direction the key pushes the player (screen y grows downward)
    pub fn direction(&self) -> IVec2 {
        match self {
            Key::W => IVec2::NEG_Y,
            Key::A => IVec2::NEG_X,
            Key::S => IVec2::Y,
            Key::D => IVec2::X,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Key::A | Key::D)
    }
}

/// One discrete input from the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Mouse press at arena coordinates: aim there and fire once
    MousePress { x: i32, y: i32 },
    /// Pause/resume
    ToggleActive,
}
