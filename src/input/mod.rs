//! Input handling
//!
//! Keyboard input mapped onto game actions. The world never sees keys,
//! only the actions the app dispatches.

mod actions;
mod state;

pub use actions::*;
pub use state::*;
