//! Game action definitions

use macroquad::prelude::KeyCode;

/// Everything the player can ask the game to do.
///
/// Key mappings:
/// - A / Left = Turn left
/// - D / Right = Turn right
/// - W / Up / Space = Jump
/// - P = Pause
/// - S = Slow motion
/// - C = Collision boxes
/// - R = Restart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    TurnLeft,
    TurnRight,
    Jump,

    // Time
    TogglePause,
    ToggleSlowMotion,

    // Debug
    ToggleCollisionBoxes,

    // System
    Restart,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::TurnLeft,
        Action::TurnRight,
        Action::Jump,
        Action::TogglePause,
        Action::ToggleSlowMotion,
        Action::ToggleCollisionBoxes,
        Action::Restart,
    ];

    /// Keys that trigger this action.
    pub fn keys(self) -> &'static [KeyCode] {
        match self {
            Action::TurnLeft => &[KeyCode::A, KeyCode::Left],
            Action::TurnRight => &[KeyCode::D, KeyCode::Right],
            Action::Jump => &[KeyCode::W, KeyCode::Up, KeyCode::Space],
            Action::TogglePause => &[KeyCode::P],
            Action::ToggleSlowMotion => &[KeyCode::S],
            Action::ToggleCollisionBoxes => &[KeyCode::C],
            Action::Restart => &[KeyCode::R],
        }
    }
}
