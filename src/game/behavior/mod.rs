//! Sprite Behaviors
//!
//! Behaviors are small state machines attached to a sprite. Each frame the
//! world calls `execute` on every behavior of every visible, in-view sprite.
//!
//! Behaviors never reach into the world directly. What they need arrives
//! through `FrameContext`:
//! - `scene`: read-only queries (platforms, track baselines, playfield size)
//! - `spawns`: sprites to add after the update pass (projectiles)
//! - `signals`: notable state changes for the world to act on

mod bounce;
mod collide;
mod cycle;
mod fall;
mod jump;
mod pulse;
mod shoot;

pub use bounce::BounceBehavior;
pub use collide::CollideBehavior;
pub use cycle::{CycleBehavior, RunBehavior};
pub use fall::FallBehavior;
pub use jump::{JumpBehavior, JUMP_EASING_STRENGTH};
pub use pulse::PulseBehavior;
pub use shoot::{DriftBehavior, ProjectileTemplate, ShootBehavior};

use super::entity::SpriteId;
use super::sprite::Sprite;

// =============================================================================
// Frame Context
// =============================================================================

/// Read-only view of the world used by behaviors.
pub trait Scene {
    /// Platform on `track` whose collision box spans the sprite's horizontally.
    fn platform_underneath(&self, sprite: &Sprite, track: u8) -> Option<SpriteId>;

    /// Walking-surface y of a track. `None` below the lowest track.
    fn track_baseline(&self, track: u8) -> Option<f32>;

    /// Sprites whose top passes this are out of play.
    fn playfield_height(&self) -> f32;
}

/// Notable per-sprite state changes raised during the update pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    FallStarted(SpriteId),
    Landed(SpriteId),
    /// Fell out of the playfield
    LifeLost(SpriteId),
    /// Left the play area for good; remove at end of frame
    Expired(SpriteId),
}

/// Everything a behavior may touch besides its own sprite.
pub struct FrameContext<'a> {
    /// Simulation time in milliseconds
    pub now: f64,
    /// Simulation time of the previous frame
    pub last_frame_time: f64,
    pub frame_rate: f64,
    pub scene: &'a dyn Scene,
    pub spawns: &'a mut Vec<Sprite>,
    pub signals: &'a mut Vec<Signal>,
}

impl FrameContext<'_> {
    /// Seconds since the previous frame.
    pub fn delta_seconds(&self) -> f64 {
        (self.now - self.last_frame_time) / 1000.0
    }
}

// =============================================================================
// Behavior
// =============================================================================

#[derive(Debug, Clone)]
pub enum Behavior {
    Cycle(CycleBehavior),
    Run(RunBehavior),
    Jump(JumpBehavior),
    Fall(FallBehavior),
    Bounce(BounceBehavior),
    Pulse(PulseBehavior),
    Shoot(ShootBehavior),
    Drift(DriftBehavior),
    Collide(CollideBehavior),
}

impl Behavior {
    pub fn execute(&mut self, sprite: &mut Sprite, ctx: &mut FrameContext<'_>) {
        match self {
            Behavior::Cycle(b) => b.execute(sprite, ctx),
            Behavior::Run(b) => b.execute(sprite, ctx),
            Behavior::Jump(b) => b.execute(sprite, ctx),
            Behavior::Fall(b) => b.execute(sprite, ctx),
            Behavior::Bounce(b) => b.execute(sprite, ctx),
            Behavior::Pulse(b) => b.execute(sprite, ctx),
            Behavior::Shoot(b) => b.execute(sprite, ctx),
            Behavior::Drift(b) => b.execute(sprite, ctx),
            Behavior::Collide(b) => b.execute(sprite, ctx),
        }
    }

    /// Freeze any running timers. No-op for frame-driven behaviors.
    pub fn pause(&mut self, now: f64) {
        match self {
            Behavior::Jump(b) => b.pause(now),
            Behavior::Fall(b) => b.pause(now),
            Behavior::Bounce(b) => b.pause(now),
            Behavior::Pulse(b) => b.pause(now),
            Behavior::Cycle(_)
            | Behavior::Run(_)
            | Behavior::Shoot(_)
            | Behavior::Drift(_)
            | Behavior::Collide(_) => {}
        }
    }

    pub fn unpause(&mut self, now: f64) {
        match self {
            Behavior::Jump(b) => b.unpause(now),
            Behavior::Fall(b) => b.unpause(now),
            Behavior::Bounce(b) => b.unpause(now),
            Behavior::Pulse(b) => b.unpause(now),
            Behavior::Cycle(_)
            | Behavior::Run(_)
            | Behavior::Shoot(_)
            | Behavior::Drift(_)
            | Behavior::Collide(_) => {}
        }
    }
}

// =============================================================================
// Test Support
// =============================================================================
