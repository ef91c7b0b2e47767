//! Collision detection for sprites that care about contact (the runner)
//!
//! The behavior marks a sprite as a collider. `World::detect_collisions`
//! calls `detect` for every marked sprite after all sprites have moved, so
//! the per-frame `execute` is empty.

use super::FrameContext;
use crate::game::collision::overlaps;
use crate::game::entity::SpriteId;
use crate::game::sprite::Sprite;

#[derive(Debug, Clone, Default)]
pub struct CollideBehavior;

impl CollideBehavior {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&mut self, _sprite: &mut Sprite, _ctx: &mut FrameContext<'_>) {}

    /// Ids of candidates whose hitbox overlaps `sprite`'s.
    ///
    /// The caller passes only visible, in-view sprites; `sprite` itself is
    /// skipped if present.
    pub fn detect<'a>(sprite: &Sprite, candidates: impl IntoIterator<Item = &'a Sprite>) -> Vec<SpriteId> {
        let rect = sprite.collision_rect();
        candidates
            .into_iter()
            .filter(|other| other.id != sprite.id)
            .filter(|other| overlaps(&rect, &other.collision_rect()))
            .map(|other| other.id)
            .collect()
    }
}
