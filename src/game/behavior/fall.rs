//! Falling under gravity
//!
//! Tracks are stacked baselines. A falling sprite that crosses its track's
//! baseline either lands (platform underneath) or drops to the next track
//! down and keeps testing the same frame's drop against that one, so a long
//! frame can pass through several tracks but never tunnels through a
//! platform.

use log::debug;

use super::{FrameContext, Signal};
use crate::game::sprite::{Motion, Sprite};
use crate::game::timer::AnimationTimer;

#[derive(Debug, Clone)]
pub struct FallBehavior {
    /// Pixels per second squared
    gravity: f64,
    timer: AnimationTimer,
}

impl FallBehavior {
    pub fn new(gravity: f64) -> Self {
        Self {
            gravity,
            timer: AnimationTimer::with_default_duration(),
        }
    }

    pub fn execute(&mut self, sprite: &mut Sprite, ctx: &mut FrameContext<'_>) {
        match sprite.motion {
            Motion::Falling { initial_velocity } => {
                if !self.timer.is_running() {
                    self.begin(sprite, initial_velocity, ctx);
                }

                if sprite.top > ctx.scene.playfield_height() {
                    self.stop_falling(sprite, ctx.now);
                    sprite.visible = false;
                    ctx.signals.push(Signal::LifeLost(sprite.id));
                    debug!("{} fell out of play", sprite.kind.label());
                    return;
                }

                self.move_down(sprite, initial_velocity, ctx);
            }
            Motion::Grounded => {
                if ctx.scene.platform_underneath(sprite, sprite.track).is_none() {
                    sprite.motion = Motion::Falling { initial_velocity: 0.0 };
                    self.begin(sprite, 0.0, ctx);
                }
            }
            Motion::Ascending { .. } | Motion::Descending { .. } => {}
        }
    }

    fn begin(&mut self, sprite: &mut Sprite, initial_velocity: f32, ctx: &mut FrameContext<'_>) {
        self.timer.start(ctx.now);
        sprite.velocity_y = initial_velocity;
        ctx.signals.push(Signal::FallStarted(sprite.id));
        debug!("{} starts falling from track {}", sprite.kind.label(), sprite.track);
    }

    fn move_down(&mut self, sprite: &mut Sprite, initial_velocity: f32, ctx: &mut FrameContext<'_>) {
        let fall_seconds = self.timer.elapsed(ctx.now) / 1000.0;
        sprite.velocity_y = initial_velocity + (self.gravity * fall_seconds) as f32;
        let drop = sprite.velocity_y * ctx.delta_seconds() as f32;

        loop {
            let Some(baseline) = ctx.scene.track_baseline(sprite.track) else {
                sprite.top += drop;
                return;
            };

            if sprite.bottom() + drop <= baseline {
                sprite.top += drop;
                return;
            }

            if ctx.scene.platform_underneath(sprite, sprite.track).is_some() {
                sprite.top = baseline - sprite.height;
                self.stop_falling(sprite, ctx.now);
                ctx.signals.push(Signal::Landed(sprite.id));
                debug!("{} lands on track {}", sprite.kind.label(), sprite.track);
                return;
            }

            sprite.track -= 1;
            debug!("{} falls through to track {}", sprite.kind.label(), sprite.track);
        }
    }

    fn stop_falling(&mut self, sprite: &mut Sprite, now: f64) {
        self.timer.stop(now);
        sprite.motion = Motion::Grounded;
        sprite.velocity_y = 0.0;
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

    const GRAVITY: f64 = 3.0 * 800.0 / 13.0;

    fn runner_on(track: u8, baseline: f32) -> Sprite {
        Sprite::new(SpriteKind::Runner, Artist::sheet(Vec::new()))
            .with_position(50.0, baseline - 54.0)
            .with_size(50.0, 54.0)
            .with_track(track)
    }

    #[test]
    fn test_grounded_over_platform_stays_put() {
        let scene = TestScene::new().with_platform(1, 0.0, 300.0);
        let mut sinks = Sinks::default();
        let mut sprite = runner_on(1, 323.0);
        let mut fall = FallBehavior::new(GRAVITY);

        fall.execute(&mut sprite, &mut sinks.ctx(&scene, 16.0, 0.0));
        assert_eq!(sprite.motion, Motion::Grounded);
        assert!(sinks.signals.is_empty());
    }

    #[test]
    fn test_walking_off_edge_starts_fall() {
        let scene = TestScene::new();
        let mut sinks = Sinks::default();
        let mut sprite = runner_on(2, 223.0);
        let mut fall = FallBehavior::new(GRAVITY);

        fall.execute(&mut sprite, &mut sinks.ctx(&scene, 16.0, 0.0));
        assert!(sprite.motion.is_falling());
        assert_eq!(sinks.signals, vec![Signal::FallStarted(sprite.id)]);
    }

    #[test]
    fn test_lands_on_lower_track_platform() {
        let scene = TestScene::new().with_platform(1, 0.0, 300.0);
        let mut sinks = Sinks::default();
        let mut sprite = runner_on(2, 223.0);
        let mut fall = FallBehavior::new(GRAVITY);

        let mut last = 0.0;
        let mut now = 16.0;
        while !matches!(sinks.signals.last(), Some(Signal::Landed(_))) {
            fall.execute(&mut sprite, &mut sinks.ctx(&scene, now, last));
            last = now;
            now += 16.0;
            assert!(now < 10_000.0, "never landed");
        }

        assert_eq!(sprite.track, 1);
        assert_eq!(sprite.bottom(), 323.0);
        assert_eq!(sprite.motion, Motion::Grounded);
        assert_eq!(sprite.velocity_y, 0.0);
    }

    #[test]
    fn test_long_frame_steps_through_several_tracks() {
        // Platform only on track 1; runner starts on track 3 and one huge
        // frame carries it past both lower baselines.
        let scene = TestScene::new().with_platform(1, 0.0, 300.0);
        let mut sinks = Sinks::default();
        let mut sprite = runner_on(3, 123.0);
        sprite.motion = Motion::Falling { initial_velocity: 600.0 };
        let mut fall = FallBehavior::new(GRAVITY);

        fall.execute(&mut sprite, &mut sinks.ctx(&scene, 1000.0, 0.0));

        assert_eq!(sprite.track, 1);
        assert_eq!(sprite.bottom(), 323.0);
        assert_eq!(sprite.motion, Motion::Grounded);
    }

    #[test]
    fn test_no_platforms_falls_out_of_play() {
        let scene = TestScene::new();
        let mut sinks = Sinks::default();
        let mut sprite = runner_on(1, 323.0);
        let mut fall = FallBehavior::new(GRAVITY);

        let mut last = 0.0;
        let mut now = 16.0;
        while sprite.visible {
            fall.execute(&mut sprite, &mut sinks.ctx(&scene, now, last));
            last = now;
            now += 16.0;
            assert!(now < 20_000.0, "never left the playfield");
        }

        assert_eq!(sprite.track, 0);
        assert_eq!(sprite.motion, Motion::Grounded);
        assert_eq!(sinks.signals.last(), Some(&Signal::LifeLost(sprite.id)));
    }

    #[test]
    fn test_velocity_grows_with_fall_time() {
        let scene = TestScene::new();
        let mut sinks = Sinks::default();
        let mut sprite = runner_on(3, 123.0);
        sprite.motion = Motion::Falling { initial_velocity: 0.0 };
        let mut fall = FallBehavior::new(GRAVITY);

        fall.execute(&mut sprite, &mut sinks.ctx(&scene, 0.0, 0.0));
        fall.execute(&mut sprite, &mut sinks.ctx(&scene, 100.0, 0.0));
        let v1 = sprite.velocity_y;
        fall.execute(&mut sprite, &mut sinks.ctx(&scene, 200.0, 100.0));
        assert!(sprite.velocity_y > v1);
        assert!((v1 as f64 - GRAVITY * 0.1).abs() < 1e-3);
    }
}
