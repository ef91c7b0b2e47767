//! Input state management
//!
//! Polls the keyboard through macroquad once per frame and reports which
//! actions fired.

use macroquad::prelude::*;
use super::Action;

pub struct InputState {
    pressed: Vec<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self { pressed: Vec::with_capacity(Action::ALL.len()) }
    }

    /// Call once per frame before checking actions
    pub fn poll(&mut self) {
        self.pressed.clear();
        for action in Action::ALL {
            if action.keys().iter().any(|&key| is_key_pressed(key)) {
                self.pressed.push(action);
            }
        }
    }

    /// Actions pressed this frame, in `Action::ALL` order
    pub fn pressed(&self) -> &[Action] {
        &self.pressed
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
