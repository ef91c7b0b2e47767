//! Game Core
//!
//! Sprite simulation for a side-scrolling runner, independent of any window
//! or graphics backend.
//!
//! Key concepts:
//! - Sprite: a rectangle with an artist and a list of behaviors
//! - Behavior: per-frame logic (run, jump, fall, bounce, pulse, shoot...)
//! - World: owns the sprites, the frame clock and the scroll offsets
//! - Event: what happened this frame, drained by the app
//!
//! Time is passed in as milliseconds; the core never reads a clock itself.

pub mod behavior;
pub mod collision;
pub mod entity;
pub mod event;
pub mod renderer;
pub mod runtime;
pub mod sprite;
pub mod timer;
pub mod world;

// Re-export main types
pub use behavior::Behavior;
pub use collision::{CollisionRect, Margins};
pub use entity::SpriteId;
pub use event::Events;
pub use renderer::{Renderer, SpriteView};
pub use runtime::FrameClock;
pub use sprite::{Artist, Cell, Sprite, SpriteKind};
pub use timer::{AnimationTimer, Easing, Stopwatch, TimerError};
pub use world::{ArcadeRules, CollisionResolver, Resolution, World};
