//! Sprite-sheet frame cycling

use super::FrameContext;
use crate::game::sprite::Sprite;

/// Fixed-interval gate. The first tick only records the reference time.
#[derive(Debug, Clone)]
struct IntervalGate {
    interval: f64,
    last: Option<f64>,
}

impl IntervalGate {
    fn new(interval: f64) -> Self {
        Self { interval, last: None }
    }

    /// True when more than `interval` ms passed since the last firing.
    fn tick(&mut self, now: f64) -> bool {
        match self.last {
            None => {
                self.last = Some(now);
                false
            }
            Some(last) if now - last > self.interval => {
                self.last = Some(now);
                true
            }
            Some(_) => false,
        }
    }
}

/// Advances the sprite's artist every `interval` milliseconds.
#[derive(Debug, Clone)]
pub struct CycleBehavior {
    gate: IntervalGate,
}

impl CycleBehavior {
    pub fn new(interval: f64) -> Self {
        Self { gate: IntervalGate::new(interval) }
    }

    pub fn execute(&mut self, sprite: &mut Sprite, ctx: &mut FrameContext<'_>) {
        if self.gate.tick(ctx.now) {
            sprite.artist.advance();
        }
    }
}

/// Run cycle for the runner: only animates while on the ground and moving.
#[derive(Debug, Clone)]
pub struct RunBehavior {
    gate: IntervalGate,
}

impl RunBehavior {
    pub fn new(interval: f64) -> Self {
        Self { gate: IntervalGate::new(interval) }
    }

    pub fn execute(&mut self, sprite: &mut Sprite, ctx: &mut FrameContext<'_>) {
        if sprite.run_animation_rate == 0.0 || !sprite.motion.is_grounded() {
            return;
        }
        if self.gate.tick(ctx.now) {
            sprite.artist.advance();
        }
    }
}
