//! Opacity pulsing (rubies)

use super::FrameContext;
use crate::game::sprite::Sprite;
use crate::game::timer::{AnimationTimer, Easing, TimerError};

#[derive(Debug, Clone)]
pub struct PulseBehavior {
    duration: f64,
    /// Lowest opacity reached at mid-pulse
    threshold: f32,
    timer: AnimationTimer,
    started: bool,
}

impl PulseBehavior {
    pub fn new(duration: f64, threshold: f32) -> Result<Self, TimerError> {
        Ok(Self {
            duration,
            threshold: threshold.clamp(0.0, 1.0),
            timer: AnimationTimer::new(duration, Some(Easing::EaseInOut))?,
            started: false,
        })
    }

    pub fn execute(&mut self, sprite: &mut Sprite, ctx: &mut FrameContext<'_>) {
        let now = ctx.now;

        if !self.started {
            self.started = true;
            self.timer.start(now);
            return;
        }

        if self.timer.is_expired(now) {
            self.timer.restart(now);
            return;
        }

        let half = self.duration / 2.0;
        let elapsed = self.timer.raw_elapsed(now);
        let swing = 1.0 - self.threshold;

        let opacity = if elapsed < half {
            1.0 - swing * (elapsed / half) as f32
        } else {
            self.threshold + swing * ((elapsed - half) / half) as f32
        };
        sprite.opacity = opacity.clamp(self.threshold, 1.0);
    }

    pub fn pause(&mut self, now: f64) {
        self.timer.pause(now);
    }

    pub fn unpause(&mut self, now: f64) {
        self.timer.unpause(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::behavior::testing::{Sinks, TestScene};
    use crate::game::sprite::{Artist, SpriteKind};

    #[test]
    fn test_pulse_dims_to_threshold_and_back() {
        let scene = TestScene::new();
        let mut sinks = Sinks::default();
        let mut ruby = Sprite::new(SpriteKind::Ruby, Artist::sheet(Vec::new()));
        let mut pulse = PulseBehavior::new(800.0, 0.1).unwrap();

        pulse.execute(&mut ruby, &mut sinks.ctx(&scene, 0.0, 0.0));
        assert_eq!(ruby.opacity, 1.0);

        pulse.execute(&mut ruby, &mut sinks.ctx(&scene, 200.0, 0.0));
        assert!((ruby.opacity - 0.55).abs() < 1e-5);

        pulse.execute(&mut ruby, &mut sinks.ctx(&scene, 400.0, 200.0));
        assert!((ruby.opacity - 0.1).abs() < 1e-5);

        pulse.execute(&mut ruby, &mut sinks.ctx(&scene, 600.0, 400.0));
        assert!((ruby.opacity - 0.55).abs() < 1e-5);

        pulse.execute(&mut ruby, &mut sinks.ctx(&scene, 800.0, 600.0));
        assert!((ruby.opacity - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_paused_pulse_holds_opacity() {
        let scene = TestScene::new();
        let mut sinks = Sinks::default();
        let mut ruby = Sprite::new(SpriteKind::Ruby, Artist::sheet(Vec::new()));
        let mut pulse = PulseBehavior::new(800.0, 0.1).unwrap();

        pulse.execute(&mut ruby, &mut sinks.ctx(&scene, 0.0, 0.0));
        pulse.execute(&mut ruby, &mut sinks.ctx(&scene, 200.0, 0.0));
        pulse.pause(200.0);
        pulse.unpause(3200.0);
        pulse.execute(&mut ruby, &mut sinks.ctx(&scene, 3200.0, 3200.0));
        assert!((ruby.opacity - 0.55).abs() < 1e-5);
    }
}
