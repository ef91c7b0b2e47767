//! Bouncing in place (coins, sapphires)

use super::FrameContext;
use crate::game::sprite::Sprite;
use crate::game::timer::{AnimationTimer, Easing, TimerError};

#[derive(Debug, Clone)]
pub struct BounceBehavior {
    duration: f64,
    /// Total travel per cycle: up `height`, then back down
    distance: f32,
    timer: AnimationTimer,
    /// Resting top, recorded on the first frame
    baseline: Option<f32>,
}

impl BounceBehavior {
    pub fn new(duration: f64, height: f32) -> Result<Self, TimerError> {
        Ok(Self {
            duration,
            distance: height * 2.0,
            timer: AnimationTimer::new(duration, Some(Easing::EaseOutIn))?,
            baseline: None,
        })
    }

    pub fn execute(&mut self, sprite: &mut Sprite, ctx: &mut FrameContext<'_>) {
        let now = ctx.now;

        let Some(baseline) = self.baseline else {
            self.baseline = Some(sprite.top);
            self.timer.start(now);
            return;
        };

        if self.timer.is_expired(now) {
            self.timer.restart(now);
            return;
        }

        let elapsed = self.timer.elapsed(now);
        let dy = (elapsed / self.duration) as f32 * self.distance;

        if elapsed < self.duration / 2.0 {
            sprite.top = baseline - dy;
        } else {
            sprite.top = baseline - self.distance + dy;
        }
    }

    pub fn pause(&mut self, now: f64) {
        self.timer.pause(now);
    }

    pub fn unpause(&mut self, now: f64) {
        self.timer.unpause(now);
    }
}
