//! Jumping
//!
//! A jump is two eased halves: ease-out on the way up (fast launch, slow
//! apex), ease-in on the way down. If the launch platform is gone when the
//! descent ends, the sprite hands over to falling with the speed it had.

use log::debug;

use super::FrameContext;
use crate::game::sprite::{Motion, Sprite};
use crate::game::timer::{AnimationTimer, Easing, TimerError};

/// Strength of the ascent/descent easing curves.
pub const JUMP_EASING_STRENGTH: f64 = 1.15;

#[derive(Debug, Clone)]
pub struct JumpBehavior {
    /// Pixels from launch to apex
    height: f32,
    /// Milliseconds for the whole jump
    duration: f64,
    /// Pixels per second squared, used for the hand-off to falling
    gravity: f64,
    ascend: AnimationTimer,
    descend: AnimationTimer,
}

impl JumpBehavior {
    pub fn new(height: f32, duration: f64, gravity: f64) -> Result<Self, TimerError> {
        let half = duration / 2.0;
        Ok(Self {
            height,
            duration,
            gravity,
            ascend: AnimationTimer::new(half, Some(Easing::ease_out(JUMP_EASING_STRENGTH)))?,
            descend: AnimationTimer::new(half, Some(Easing::ease_in(JUMP_EASING_STRENGTH)))?,
        })
    }

    fn half(&self) -> f64 {
        self.duration / 2.0
    }

    /// Launch a jump. Ignored unless the sprite is standing on something.
    pub fn jump(&mut self, sprite: &mut Sprite, now: f64) -> bool {
        if !sprite.motion.is_grounded() {
            return false;
        }
        sprite.motion = Motion::Ascending { launch_top: sprite.top };
        sprite.run_animation_rate = 0.0;
        self.ascend.start(now);
        debug!("{} jumps from top {}", sprite.kind.label(), sprite.top);
        true
    }

    pub fn execute(&mut self, sprite: &mut Sprite, ctx: &mut FrameContext<'_>) {
        let now = ctx.now;
        let half = self.half();

        match sprite.motion {
            Motion::Ascending { launch_top } => {
                // Launches stamped after this frame's time read as zero
                let elapsed = self.ascend.elapsed(now).max(0.0);
                if elapsed <= half {
                    sprite.top = launch_top - (elapsed / half) as f32 * self.height;
                } else {
                    let apex = launch_top - self.height;
                    sprite.top = apex;
                    sprite.motion = Motion::Descending { launch_top, apex };
                    self.ascend.stop(now);
                    self.descend.start(now);
                }
            }
            Motion::Descending { launch_top, apex } => {
                let elapsed = self.descend.elapsed(now).max(0.0);
                if elapsed <= half {
                    sprite.top = apex + (elapsed / half) as f32 * self.height;
                } else {
                    self.finish(sprite, launch_top, ctx);
                }
            }
            Motion::Grounded | Motion::Falling { .. } => {}
        }
    }

    fn finish(&mut self, sprite: &mut Sprite, launch_top: f32, ctx: &mut FrameContext<'_>) {
        let descent_seconds = self.descend.raw_elapsed(ctx.now) / 1000.0;

        self.ascend.stop(ctx.now);
        self.descend.stop(ctx.now);
        sprite.run_animation_rate = 1.0;

        if ctx.scene.platform_underneath(sprite, sprite.track).is_some() {
            sprite.top = launch_top;
            sprite.motion = Motion::Grounded;
        } else {
            let initial_velocity = (self.gravity * descent_seconds) as f32;
            sprite.motion = Motion::Falling { initial_velocity };
            debug!("{} lands on nothing, falling at {initial_velocity} px/s", sprite.kind.label());
        }
    }

    pub fn pause(&mut self, now: f64) {
        self.ascend.pause(now);
        self.descend.pause(now);
    }

    pub fn unpause(&mut self, now: f64) {
        self.ascend.unpause(now);
        self.descend.unpause(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::behavior::testing::{Sinks, TestScene};
    use crate::game::sprite::{Artist, SpriteKind};

    const GRAVITY: f64 = 3.0 * 800.0 / 13.0;

    fn runner(top: f32) -> Sprite {
        Sprite::new(SpriteKind::Runner, Artist::sheet(Vec::new()))
            .with_position(50.0, top)
            .with_size(50.0, 54.0)
            .with_track(1)
    }

    #[test]
    fn test_jump_symmetry() {
        let scene = TestScene::new().with_platform(1, 0.0, 200.0);
        let mut sinks = Sinks::default();
        let mut sprite = runner(200.0);
        let mut jump = JumpBehavior::new(120.0, 1000.0, GRAVITY).unwrap();

        assert!(jump.jump(&mut sprite, 0.0));

        // Quarter of the way: strictly rising from 200
        jump.execute(&mut sprite, &mut sinks.ctx(&scene, 125.0, 0.0));
        let early = sprite.top;
        jump.execute(&mut sprite, &mut sinks.ctx(&scene, 250.0, 125.0));
        let quarter = sprite.top;
        assert!(early < 200.0);
        assert!(quarter < early);
        assert!(matches!(sprite.motion, Motion::Ascending { .. }));

        // Ascent complete: apex recorded, descent started
        jump.execute(&mut sprite, &mut sinks.ctx(&scene, 501.0, 250.0));
        assert_eq!(sprite.motion, Motion::Descending { launch_top: 200.0, apex: 80.0 });
        assert_eq!(sprite.top, 80.0);

        jump.execute(&mut sprite, &mut sinks.ctx(&scene, 750.0, 501.0));
        assert!(sprite.top > 80.0 && sprite.top < 200.0);

        // Descent complete over a platform: back where it started
        jump.execute(&mut sprite, &mut sinks.ctx(&scene, 1002.0, 750.0));
        assert_eq!(sprite.top, 200.0);
        assert_eq!(sprite.motion, Motion::Grounded);
        assert_eq!(sprite.run_animation_rate, 1.0);
    }

    #[test]
    fn test_cannot_jump_while_airborne() {
        let mut sprite = runner(200.0);
        let mut jump = JumpBehavior::new(120.0, 1000.0, GRAVITY).unwrap();

        assert!(jump.jump(&mut sprite, 0.0));
        assert!(!jump.jump(&mut sprite, 10.0));

        sprite.motion = Motion::Falling { initial_velocity: 0.0 };
        assert!(!jump.jump(&mut sprite, 20.0));
    }

    #[test]
    fn test_launch_after_frame_time_holds_launch_top() {
        let scene = TestScene::new().with_platform(1, 0.0, 200.0);
        let mut sinks = Sinks::default();
        let mut sprite = runner(200.0);
        let mut jump = JumpBehavior::new(120.0, 1000.0, GRAVITY).unwrap();

        // Launched at 40 ms, but the frame is simulated at 16 ms
        assert!(jump.jump(&mut sprite, 40.0));
        jump.execute(&mut sprite, &mut sinks.ctx(&scene, 16.0, 0.0));
        assert_eq!(sprite.top, 200.0);
        assert!(matches!(sprite.motion, Motion::Ascending { .. }));

        jump.execute(&mut sprite, &mut sinks.ctx(&scene, 140.0, 16.0));
        assert!(sprite.top < 200.0);
    }

    #[test]
    fn test_jump_off_ledge_hands_over_to_falling() {
        let scene = TestScene::new();
        let mut sinks = Sinks::default();
        let mut sprite = runner(269.0);
        let mut jump = JumpBehavior::new(120.0, 1000.0, GRAVITY).unwrap();

        jump.jump(&mut sprite, 0.0);
        jump.execute(&mut sprite, &mut sinks.ctx(&scene, 501.0, 0.0));
        jump.execute(&mut sprite, &mut sinks.ctx(&scene, 1002.0, 501.0));

        match sprite.motion {
            Motion::Falling { initial_velocity } => {
                let expected = (GRAVITY * 0.501) as f32;
                assert!((initial_velocity - expected).abs() < 1e-3);
            }
            other => panic!("expected falling, got {other:?}"),
        }
    }

    #[test]
    fn test_paused_jump_holds_position() {
        let scene = TestScene::new().with_platform(1, 0.0, 200.0);
        let mut sinks = Sinks::default();
        let mut sprite = runner(200.0);
        let mut jump = JumpBehavior::new(120.0, 1000.0, GRAVITY).unwrap();

        jump.jump(&mut sprite, 0.0);
        jump.execute(&mut sprite, &mut sinks.ctx(&scene, 200.0, 0.0));
        let before = sprite.top;

        jump.pause(200.0);
        jump.unpause(5200.0);
        jump.execute(&mut sprite, &mut sinks.ctx(&scene, 5200.0, 5200.0));
        assert!((sprite.top - before).abs() < 1e-3);
    }

    #[test]
    fn test_zero_duration_rejected() {
        assert!(JumpBehavior::new(120.0, 0.0, GRAVITY).is_err());
    }
}
