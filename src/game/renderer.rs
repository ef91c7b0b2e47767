//! Render Sink
//!
//! The core never draws. Each frame the world hands a `Renderer` the
//! background offset and one `SpriteView` per visible, in-view sprite,
//! already translated into screen space.

use super::collision::CollisionRect;
use super::sprite::{Cell, SpriteKind};

/// Screen-space snapshot of a sprite for one draw call.
#[derive(Debug, Clone, Copy)]
pub struct SpriteView<'a> {
    pub kind: SpriteKind,
    /// Screen x (world left minus scroll offset)
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub opacity: f32,
    /// Sprite-sheet frame, for sheet-animated sprites
    pub cell: Option<&'a Cell>,
    /// Fill color, for solid sprites
    pub color: Option<[u8; 3]>,
}

pub trait Renderer {
    /// Draw the scrolling background at `offset` pixels.
    fn draw_background(&mut self, offset: f32);

    fn draw_sprite(&mut self, sprite: &SpriteView<'_>);

    /// Debug overlay, only called when collision boxes are toggled on.
    fn draw_collision_box(&mut self, _rect: &CollisionRect) {}
}
