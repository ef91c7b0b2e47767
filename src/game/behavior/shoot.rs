//! Shooting (snails) and projectile drift (snail bombs)

use log::debug;

use super::{Behavior, CycleBehavior, FrameContext, Signal};
use crate::game::collision::Margins;
use crate::game::sprite::{Artist, Cell, Sprite, SpriteKind};

/// Blueprint for the sprites a shooter fires.
#[derive(Debug, Clone)]
pub struct ProjectileTemplate {
    pub kind: SpriteKind,
    pub width: f32,
    pub height: f32,
    /// Pixels per second (negative = leftwards)
    pub velocity_x: f32,
    pub cells: Vec<Cell>,
    pub cycle_interval: f64,
    pub margins: Margins,
}

impl ProjectileTemplate {
    /// Build a projectile at the shooter's left edge, vertically centered.
    pub fn launch_from(&self, shooter: &Sprite) -> Sprite {
        let mut projectile = Sprite::new(self.kind, Artist::sheet(self.cells.clone()))
            .with_position(shooter.left, shooter.top + shooter.height / 2.0)
            .with_size(self.width, self.height)
            .with_velocity_x(self.velocity_x)
            .with_margins(self.margins)
            .with_track(shooter.track)
            .with_behavior(Behavior::Cycle(CycleBehavior::new(self.cycle_interval)))
            .with_behavior(Behavior::Drift(DriftBehavior::new()));
        projectile.h_offset = shooter.h_offset;
        projectile
    }
}

/// Fires a projectile every `interval` milliseconds.
#[derive(Debug, Clone)]
pub struct ShootBehavior {
    interval: f64,
    last_shot: Option<f64>,
    projectile: ProjectileTemplate,
}

impl ShootBehavior {
    pub fn new(interval: f64, projectile: ProjectileTemplate) -> Self {
        Self {
            interval,
            last_shot: None,
            projectile,
        }
    }

    pub fn execute(&mut self, sprite: &mut Sprite, ctx: &mut FrameContext<'_>) {
        let now = ctx.now;
        match self.last_shot {
            None => self.last_shot = Some(now),
            Some(last) if now - last > self.interval => {
                self.last_shot = Some(now);
                ctx.spawns.push(self.projectile.launch_from(sprite));
                debug!("{} fires a {}", sprite.kind.label(), self.projectile.kind.label());
            }
            Some(_) => {}
        }
    }
}

/// Moves a sprite horizontally at its own velocity until it scrolls off
/// the left edge of the view.
#[derive(Debug, Clone, Default)]
pub struct DriftBehavior;

impl DriftBehavior {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&mut self, sprite: &mut Sprite, ctx: &mut FrameContext<'_>) {
        sprite.left += sprite.velocity_x * ctx.delta_seconds() as f32;

        if sprite.left + sprite.width <= sprite.h_offset {
            sprite.visible = false;
            ctx.signals.push(Signal::Expired(sprite.id));
        }
    }
}
