//! Game World
//!
//! The World owns every sprite and runs the frame loop:
//! - frame clock (pause, slow motion, fps)
//! - scroll offsets for the background and the sprite layer
//! - behavior updates for visible, in-view sprites
//! - deferred spawn and despawn (no mutation of the sprite list mid-pass)
//! - collision detection and resolution
//!
//! Sprites live in arena slots addressed by generational `SpriteId`s and
//! are updated in a fixed order (insertion order).

use log::{debug, info};

use super::behavior::{
    Behavior, BounceBehavior, CollideBehavior, CycleBehavior, FallBehavior, FrameContext, JumpBehavior,
    ProjectileTemplate, PulseBehavior, RunBehavior, Scene, ShootBehavior, Signal,
};
use super::entity::{SpriteAllocator, SpriteId};
use super::event::{
    CollisionEvent, CountdownEvent, Events, GameOverEvent, ItemCollectedEvent, LifeLostEvent,
};
use super::renderer::{Renderer, SpriteView};
use super::runtime::{FrameClock, FrameStep, NORMAL_TIME_RATE};
use super::sprite::{Artist, Motion, Sprite, SpriteKind};
use crate::config::{ActorDef, ConfigError, GameConfig, Placement, PlatformDef, DEFAULT_ITEM_VALUE};

/// Seconds counted down before play resumes after regaining focus.
pub const COUNTDOWN_SECONDS: u32 = 3;

// =============================================================================
// Collision Resolution
// =============================================================================

/// What the world should do about one overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Ignore,
    /// Hide the other sprite and add to the score
    Collect { value: u32 },
    /// End the round
    GameOver,
    /// Remove the other sprite
    Despawn,
}

/// Game rules for collisions. The world detects, the resolver decides.
pub trait CollisionResolver {
    fn resolve(&mut self, collider: &Sprite, other: &Sprite) -> Resolution;
}

/// Coins and jewels score, anything with teeth ends the game.
#[derive(Debug, Clone)]
pub struct ArcadeRules {
    pub default_value: u32,
}

impl Default for ArcadeRules {
    fn default() -> Self {
        Self { default_value: DEFAULT_ITEM_VALUE }
    }
}

impl CollisionResolver for ArcadeRules {
    fn resolve(&mut self, _collider: &Sprite, other: &Sprite) -> Resolution {
        if other.kind.is_collectible() {
            Resolution::Collect { value: other.value.unwrap_or(self.default_value) }
        } else if other.kind.is_enemy() {
            Resolution::GameOver
        } else {
            Resolution::Ignore
        }
    }
}

// =============================================================================
// Scene view handed to behaviors
// =============================================================================

fn slot(slots: &[Option<Sprite>], id: SpriteId) -> Option<&Sprite> {
    slots
        .get(id.index() as usize)
        .and_then(Option::as_ref)
        .filter(|sprite| sprite.id == id)
}

struct SceneView<'a> {
    slots: &'a [Option<Sprite>],
    platforms: &'a [SpriteId],
    tracks: &'a [f32],
    playfield_height: f32,
}

impl Scene for SceneView<'_> {
    fn platform_underneath(&self, sprite: &Sprite, track: u8) -> Option<SpriteId> {
        let rect = sprite.collision_rect();
        self.platforms
            .iter()
            .filter_map(|&id| slot(self.slots, id))
            .find(|platform| platform.track == track && rect.spans_horizontally(&platform.collision_rect()))
            .map(|platform| platform.id)
    }

    fn track_baseline(&self, track: u8) -> Option<f32> {
        if track == 0 {
            return None;
        }
        self.tracks.get(track as usize - 1).copied()
    }

    fn playfield_height(&self) -> f32 {
        self.playfield_height
    }
}

#[derive(Debug, Clone, Copy)]
struct Countdown {
    /// Wall time the countdown began
    started: f64,
    /// Last number announced
    announced: u32,
}

// =============================================================================
// World
// =============================================================================

pub struct World {
    config: GameConfig,

    sprites: SpriteAllocator,
    slots: Vec<Option<Sprite>>,
    /// Update and draw order
    order: Vec<SpriteId>,
    /// Platform ids, for "what is underneath" queries
    platforms: Vec<SpriteId>,
    /// Spawned this frame, merged after the update pass
    pending: Vec<Sprite>,
    /// Sprites queued for removal at end of frame
    despawn_queue: Vec<SpriteId>,

    runner: SpriteId,

    clock: FrameClock,
    background_offset: f32,
    sprite_offset: f32,
    background_velocity: f32,
    platform_velocity: f32,

    score: u32,
    lives: u32,
    game_over: bool,
    show_collision_boxes: bool,
    countdown: Option<Countdown>,

    resolver: Box<dyn CollisionResolver>,

    /// Drained by the app after each frame
    pub events: Events,
}

impl World {
    /// Build a world from a validated config with the given rules.
    pub fn new(config: GameConfig, resolver: Box<dyn CollisionResolver>) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = Self {
            sprites: SpriteAllocator::new(),
            slots: Vec::new(),
            order: Vec::new(),
            platforms: Vec::new(),
            pending: Vec::new(),
            despawn_queue: Vec::new(),
            runner: SpriteId::DETACHED,
            clock: FrameClock::new(),
            background_offset: 0.0,
            sprite_offset: 0.0,
            background_velocity: 0.0,
            platform_velocity: 0.0,
            score: 0,
            lives: config.runner.lives,
            game_over: false,
            show_collision_boxes: config.debug.show_collision_boxes,
            countdown: None,
            resolver,
            events: Events::new(),
            config,
        };

        let platforms = world.config.platforms.clone();
        for def in &platforms {
            world.spawn_platform(def)?;
        }

        let actors = world.config.actors.clone();
        for def in &actors {
            world.spawn_actor(def)?;
        }

        world.spawn_runner()?;

        info!(
            "world built: {} sprites ({} platforms, {} actors)",
            world.sprite_count(),
            platforms.len(),
            actors.len()
        );
        Ok(world)
    }

    /// World with the default game rules.
    pub fn with_arcade_rules(config: GameConfig) -> Result<Self, ConfigError> {
        Self::new(config, Box::new(ArcadeRules::default()))
    }

    // =========================================================================
    // Sprite management
    // =========================================================================

    /// Add a sprite and return its id. It takes part from the next frame on.
    pub fn spawn(&mut self, mut sprite: Sprite) -> SpriteId {
        let id = self.sprites.allocate();
        sprite.id = id;

        let index = id.index() as usize;
        if index == self.slots.len() {
            self.slots.push(None);
        }
        if sprite.kind == SpriteKind::Platform {
            self.platforms.push(id);
        }
        debug!("spawned {} as {:?}", sprite.kind.label(), id);

        self.slots[index] = Some(sprite);
        self.order.push(id);
        id
    }

    /// Queue a sprite for removal at the end of the frame.
    pub fn despawn(&mut self, id: SpriteId) {
        if self.sprites.is_alive(id) && !self.despawn_queue.contains(&id) {
            self.despawn_queue.push(id);
        }
    }

    fn flush_despawns(&mut self) {
        for id in std::mem::take(&mut self.despawn_queue) {
            if !self.sprites.free(id) {
                continue;
            }
            self.slots[id.index() as usize] = None;
            self.order.retain(|&other| other != id);
            self.platforms.retain(|&other| other != id);
            debug!("despawned {:?}", id);
        }
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        slot(&self.slots, id)
    }

    pub fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.slots
            .get_mut(id.index() as usize)
            .and_then(Option::as_mut)
            .filter(|sprite| sprite.id == id)
    }

    /// All sprites in update order.
    pub fn sprites(&self) -> impl Iterator<Item = &Sprite> {
        self.order.iter().filter_map(|&id| slot(&self.slots, id))
    }

    pub fn sprite_count(&self) -> usize {
        self.order.len()
    }

    pub fn runner_id(&self) -> SpriteId {
        self.runner
    }

    pub fn runner(&self) -> Option<&Sprite> {
        self.get(self.runner)
    }

    // =========================================================================
    // Convenience spawners
    // =========================================================================

    fn spawn_platform(&mut self, def: &PlatformDef) -> Result<SpriteId, ConfigError> {
        let top = self.baseline(def.track)?;
        let mut platform = Sprite::new(SpriteKind::Platform, Artist::Fill { color: def.color })
            .with_position(def.left, top)
            .with_size(def.width, def.height)
            .with_track(def.track)
            .with_margins(self.config.margins_for(SpriteKind::Platform));
        if let Some(pulse) = def.pulse {
            platform = platform.with_behavior(Behavior::Pulse(PulseBehavior::new(pulse.duration, pulse.threshold)?));
        }
        Ok(self.spawn(platform))
    }

    fn spawn_actor(&mut self, def: &ActorDef) -> Result<SpriteId, ConfigError> {
        let (left, top, track) = match def.placement {
            Placement::At { left, top } => (left, top, 0),
            Placement::OnPlatform(index) => {
                let platform = self
                    .config
                    .platforms
                    .get(index)
                    .ok_or_else(|| ConfigError::Validation(format!("no platform {}", index)))?;
                let baseline = self.baseline(platform.track)?;
                (platform.left, baseline - def.height, platform.track)
            }
        };

        let mut actor = Sprite::new(def.kind, Artist::sheet(self.config.cells(&def.cells)?.to_vec()))
            .with_position(left, top)
            .with_size(def.width, def.height)
            .with_track(track)
            .with_margins(self.config.margins_for(def.kind));
        if let Some(value) = def.value {
            actor = actor.with_value(value);
        }

        if let Some(interval) = def.cycle_interval {
            actor = actor.with_behavior(Behavior::Cycle(CycleBehavior::new(interval)));
        }
        if let Some(bounce) = def.bounce {
            actor = actor.with_behavior(Behavior::Bounce(BounceBehavior::new(bounce.duration, bounce.height)?));
        }
        if let Some(pulse) = def.pulse {
            actor = actor.with_behavior(Behavior::Pulse(PulseBehavior::new(pulse.duration, pulse.threshold)?));
        }
        if let Some(shoot) = &def.shoot {
            let p = &shoot.projectile;
            let template = ProjectileTemplate {
                kind: p.kind,
                width: p.width,
                height: p.height,
                velocity_x: p.velocity_x,
                cells: self.config.cells(&p.cells)?.to_vec(),
                cycle_interval: p.cycle_interval,
                margins: self.config.margins_for(p.kind),
            };
            actor = actor.with_behavior(Behavior::Shoot(ShootBehavior::new(shoot.interval, template)));
        }

        Ok(self.spawn(actor))
    }

    fn spawn_runner(&mut self) -> Result<SpriteId, ConfigError> {
        let cfg = &self.config.runner;
        let gravity = self.config.gravity_px();
        let physics = &self.config.physics;
        let top = self.baseline(cfg.starting_track)? - cfg.height;

        let runner = Sprite::new(SpriteKind::Runner, Artist::sheet(self.config.cells(&cfg.cells_right)?.to_vec()))
            .with_position(cfg.left, top)
            .with_size(cfg.width, cfg.height)
            .with_track(cfg.starting_track)
            .with_margins(self.config.margins_for(SpriteKind::Runner))
            .with_behavior(Behavior::Run(RunBehavior::new(cfg.run_interval)))
            .with_behavior(Behavior::Jump(JumpBehavior::new(physics.jump_height, physics.jump_duration, gravity)?))
            .with_behavior(Behavior::Collide(CollideBehavior::new()))
            .with_behavior(Behavior::Fall(FallBehavior::new(gravity)));

        self.runner = self.spawn(runner);
        Ok(self.runner)
    }

    fn baseline(&self, track: u8) -> Result<f32, ConfigError> {
        self.config
            .track_baseline(track)
            .ok_or_else(|| ConfigError::Validation(format!("no track {}", track)))
    }

    // =========================================================================
    // Frame loop
    // =========================================================================

    /// Update and render one frame. `now` is wall-clock milliseconds.
    pub fn draw(&mut self, now: f64, renderer: &mut dyn Renderer) {
        self.tick(now);
        self.render(renderer);
    }

    /// Advance the simulation to wall time `now`. Does nothing while paused
    /// apart from running the resume countdown.
    pub fn tick(&mut self, now: f64) {
        if self.countdown.is_some() {
            self.update_countdown(now);
        }

        let Some(step) = self.clock.advance(now) else {
            return;
        };

        self.platform_velocity = self.background_velocity * self.config.scroll.platform_velocity_multiplier;
        self.advance_offsets(step.delta_seconds() as f32);
        self.expire_projectiles();

        let mut signals = Vec::new();
        self.update_sprites(&step, &mut signals);
        self.merge_pending();
        self.detect_collisions(now);
        self.apply_signals(signals, now);
        self.flush_despawns();
    }

    fn advance_offsets(&mut self, delta_seconds: f32) {
        self.background_offset += self.background_velocity * delta_seconds;
        if self.background_offset < 0.0 || self.background_offset > self.config.playfield.background_width {
            self.background_offset = 0.0;
        }

        self.sprite_offset += self.platform_velocity * delta_seconds;
        for sprite in self.slots.iter_mut().flatten() {
            if sprite.kind != SpriteKind::Runner {
                sprite.h_offset = self.sprite_offset;
            }
        }
    }

    /// Retire projectiles the scroll has left behind. Culled sprites never run
    /// their own drift, so this cannot wait for the update pass.
    fn expire_projectiles(&mut self) {
        let expired: Vec<SpriteId> = self
            .sprites()
            .filter(|sprite| sprite.left + sprite.width <= sprite.h_offset)
            .filter(|sprite| sprite.behaviors.iter().any(|b| matches!(b, Behavior::Drift(_))))
            .map(|sprite| sprite.id)
            .collect();

        for id in expired {
            if let Some(sprite) = self.get_mut(id) {
                sprite.visible = false;
            }
            self.despawn(id);
        }
    }

    fn update_sprites(&mut self, step: &FrameStep, signals: &mut Vec<Signal>) {
        let canvas_width = self.config.playfield.canvas_width;

        for i in 0..self.order.len() {
            let id = self.order[i];
            let index = id.index() as usize;

            // Out of the arena while its behaviors run so they can query the rest
            let Some(mut sprite) = self.slots[index].take() else {
                continue;
            };

            if sprite.visible && sprite.is_in_view(canvas_width) {
                let scene = SceneView {
                    slots: &self.slots,
                    platforms: &self.platforms,
                    tracks: &self.config.tracks,
                    playfield_height: self.config.playfield.canvas_height,
                };
                let mut ctx = FrameContext {
                    now: step.now,
                    last_frame_time: step.last_frame_time,
                    frame_rate: step.fps,
                    scene: &scene,
                    spawns: &mut self.pending,
                    signals: &mut *signals,
                };
                sprite.update(&mut ctx);
            }

            self.slots[index] = Some(sprite);
        }
    }

    fn merge_pending(&mut self) {
        for sprite in std::mem::take(&mut self.pending) {
            self.spawn(sprite);
        }
    }

    /// Runs after every sprite has moved.
    fn detect_collisions(&mut self, now: f64) {
        let canvas_width = self.config.playfield.canvas_width;
        let is_live = |sprite: &&Sprite| sprite.visible && sprite.is_in_view(canvas_width);

        let colliders: Vec<SpriteId> = self
            .sprites()
            .filter(is_live)
            .filter(|sprite| sprite.has_collide_behavior())
            .map(|sprite| sprite.id)
            .collect();

        for collider_id in colliders {
            let Some(collider) = slot(&self.slots, collider_id) else {
                continue;
            };
            if !collider.visible {
                continue;
            }

            // Standing on platforms is the fall behavior's business
            let candidates = self
                .order
                .iter()
                .filter_map(|&id| slot(&self.slots, id))
                .filter(is_live)
                .filter(|sprite| sprite.kind != SpriteKind::Platform);
            let hits = CollideBehavior::detect(collider, candidates);

            for other_id in hits {
                let (Some(collider), Some(other)) = (slot(&self.slots, collider_id), slot(&self.slots, other_id)) else {
                    continue;
                };
                if !other.visible {
                    continue;
                }
                let other_kind = other.kind;
                let resolution = self.resolver.resolve(collider, other);

                self.events.collision.send(CollisionEvent {
                    collider: collider_id,
                    other: other_id,
                    other_kind,
                });

                self.apply_resolution(other_id, other_kind, resolution, now);
                if self.game_over {
                    return;
                }
            }
        }
    }

    fn apply_resolution(&mut self, other: SpriteId, kind: SpriteKind, resolution: Resolution, now: f64) {
        match resolution {
            Resolution::Ignore => {}
            Resolution::Collect { value } => {
                if let Some(item) = self.get_mut(other) {
                    item.visible = false;
                }
                self.score += value;
                self.events.item_collected.send(ItemCollectedEvent {
                    item: other,
                    kind,
                    value,
                    score: self.score,
                });
                debug!("collected {} for {} points", kind.label(), value);
            }
            Resolution::GameOver => {
                info!("game over: runner hit a {} (score {})", kind.label(), self.score);
                self.end_game(kind, now);
            }
            Resolution::Despawn => {
                if let Some(sprite) = self.get_mut(other) {
                    sprite.visible = false;
                }
                self.despawn(other);
            }
        }
    }

    fn apply_signals(&mut self, signals: Vec<Signal>, now: f64) {
        for signal in signals {
            match signal {
                Signal::FallStarted(id) if id == self.runner => {
                    self.clock.set_time_rate(self.config.scroll.slow_motion_rate);
                }
                Signal::Landed(id) if id == self.runner => {
                    self.clock.set_time_rate(NORMAL_TIME_RATE);
                }
                Signal::LifeLost(id) if id == self.runner => self.lose_life(now),
                Signal::Expired(id) => self.despawn(id),
                Signal::FallStarted(_) | Signal::Landed(_) | Signal::LifeLost(_) => {}
            }
        }
    }

    fn lose_life(&mut self, now: f64) {
        if self.game_over {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        self.clock.set_time_rate(NORMAL_TIME_RATE);
        self.events.life_lost.send(LifeLostEvent { lives_left: self.lives });
        info!("life lost, {} left", self.lives);

        if self.lives == 0 {
            self.end_game(SpriteKind::Runner, now);
            return;
        }
        self.respawn_runner();
    }

    /// Put the runner back at the start of the level.
    fn respawn_runner(&mut self) {
        let track = self.config.runner.starting_track;
        let Some(baseline) = self.config.track_baseline(track) else {
            return;
        };
        let cells = self.config.cells(&self.config.runner.cells_right).map(<[_]>::to_vec).ok();
        let left = self.config.runner.left;

        self.background_velocity = 0.0;
        self.platform_velocity = 0.0;
        self.background_offset = 0.0;
        self.sprite_offset = 0.0;

        let runner = self.runner;
        if let Some(sprite) = self.get_mut(runner) {
            sprite.left = left;
            sprite.top = baseline - sprite.height;
            sprite.track = track;
            sprite.visible = true;
            sprite.motion = Motion::Grounded;
            sprite.velocity_y = 0.0;
            sprite.run_animation_rate = 0.0;
            if let (Artist::Sheet(sheet), Some(cells)) = (&mut sprite.artist, cells) {
                sheet.set_cells(cells);
            }
        }
    }

    fn end_game(&mut self, culprit: SpriteKind, wall_now: f64) {
        self.game_over = true;
        self.events.game_over.send(GameOverEvent { score: self.score, culprit });
        self.pause(wall_now);
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Draw the current state. Works while paused (frozen frame).
    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.draw_background(self.background_offset);

        let canvas_width = self.config.playfield.canvas_width;
        let drawn = || self.sprites().filter(move |s| s.visible && s.is_in_view(canvas_width));

        for sprite in drawn() {
            let color = match sprite.artist {
                Artist::Fill { color } => Some(color),
                Artist::Sheet(_) => None,
            };
            renderer.draw_sprite(&SpriteView {
                kind: sprite.kind,
                left: sprite.screen_left(),
                top: sprite.top,
                width: sprite.width,
                height: sprite.height,
                opacity: sprite.opacity,
                cell: sprite.artist.current_cell(),
                color,
            });
        }

        if self.show_collision_boxes {
            for sprite in drawn() {
                renderer.draw_collision_box(&sprite.collision_rect());
            }
        }
    }

    // =========================================================================
    // Input entry points
    // =========================================================================

    pub fn turn_left(&mut self) {
        self.turn(-self.config.scroll.background_velocity, self.config.runner.cells_left.clone());
    }

    pub fn turn_right(&mut self) {
        self.turn(self.config.scroll.background_velocity, self.config.runner.cells_right.clone());
    }

    fn turn(&mut self, velocity: f32, cell_set: String) {
        if self.game_over {
            return;
        }
        self.background_velocity = velocity;
        let cells = self.config.cells(&cell_set).map(<[_]>::to_vec).ok();

        let runner = self.runner;
        if let Some(sprite) = self.get_mut(runner) {
            sprite.run_animation_rate = 1.0;
            if let (Artist::Sheet(sheet), Some(cells)) = (&mut sprite.artist, cells) {
                sheet.set_cells(cells);
            }
        }
    }

    /// Make the runner jump. Ignored while paused or airborne.
    pub fn jump(&mut self, now: f64) -> bool {
        if self.clock.is_paused() {
            return false;
        }
        let sim_now = self.clock.sim_time_at(now);
        let runner = self.runner;
        let Some(sprite) = self.get_mut(runner) else {
            return false;
        };

        let mut behaviors = std::mem::take(&mut sprite.behaviors);
        let launched = behaviors.iter_mut().any(|behavior| match behavior {
            Behavior::Jump(jump) => jump.jump(sprite, sim_now),
            _ => false,
        });
        sprite.behaviors = behaviors;
        launched
    }

    pub fn toggle_pause(&mut self, now: f64) {
        self.countdown = None;
        if self.clock.is_paused() {
            if self.game_over {
                return;
            }
            self.resume(now);
        } else {
            self.pause(now);
        }
    }

    fn pause(&mut self, now: f64) {
        if self.clock.is_paused() {
            return;
        }
        let sim_now = self.clock.sim_time_at(now);
        self.clock.pause(now);
        for sprite in self.slots.iter_mut().flatten() {
            sprite.pause_behaviors(sim_now);
        }
        info!("paused");
    }

    fn resume(&mut self, now: f64) {
        if !self.clock.is_paused() {
            return;
        }
        self.clock.resume(now);
        let sim_now = self.clock.sim_time_at(now);
        for sprite in self.slots.iter_mut().flatten() {
            sprite.unpause_behaviors(sim_now);
        }
        info!("resumed");
    }

    pub fn set_time_rate(&mut self, rate: f64) {
        self.clock.set_time_rate(rate);
    }

    pub fn toggle_slow_motion(&mut self) {
        let slow = self.config.scroll.slow_motion_rate;
        if self.clock.time_rate() == NORMAL_TIME_RATE {
            self.clock.set_time_rate(slow);
        } else {
            self.clock.set_time_rate(NORMAL_TIME_RATE);
        }
        debug!("time rate now {}", self.clock.time_rate());
    }

    pub fn toggle_collision_boxes(&mut self) {
        self.show_collision_boxes = !self.show_collision_boxes;
    }

    /// Window lost focus: pause and forget any pending resume.
    pub fn focus_lost(&mut self, now: f64) {
        self.countdown = None;
        self.pause(now);
    }

    /// Window regained focus: count down, then resume.
    pub fn focus_gained(&mut self, now: f64) {
        if !self.clock.is_paused() || self.game_over || self.countdown.is_some() {
            return;
        }
        self.countdown = Some(Countdown { started: now, announced: COUNTDOWN_SECONDS });
        self.events.countdown.send(CountdownEvent { remaining: COUNTDOWN_SECONDS });
    }

    fn update_countdown(&mut self, now: f64) {
        let Some(mut countdown) = self.countdown else {
            return;
        };

        let whole_seconds = ((now - countdown.started) / 1000.0).max(0.0) as u32;
        let remaining = COUNTDOWN_SECONDS.saturating_sub(whole_seconds);

        if remaining == 0 {
            self.countdown = None;
            self.resume(now);
            return;
        }
        if remaining < countdown.announced {
            countdown.announced = remaining;
            self.events.countdown.send(CountdownEvent { remaining });
        }
        self.countdown = Some(countdown);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_counting_down(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn fps(&self) -> f64 {
        self.clock.fps()
    }

    pub fn time_rate(&self) -> f64 {
        self.clock.time_rate()
    }

    pub fn background_offset(&self) -> f32 {
        self.background_offset
    }

    pub fn sprite_offset(&self) -> f32 {
        self.sprite_offset
    }

    pub fn background_velocity(&self) -> f32 {
        self.background_velocity
    }

    pub fn platform_velocity(&self) -> f32 {
        self.platform_velocity
    }

    pub fn show_collision_boxes(&self) -> bool {
        self.show_collision_boxes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::behavior::DriftBehavior;
    use crate::game::renderer::testing::RecordingRenderer;
    use crate::game::sprite::Cell;

    fn floor() -> PlatformDef {
        PlatformDef {
            left: 0.0,
            width: 100_000.0,
            height: 8.0,
            track: 1,
            color: [150, 190, 255],
            pulse: None,
        }
    }

    fn actor(kind: SpriteKind, left: f32, top: f32) -> ActorDef {
        ActorDef {
            kind,
            placement: Placement::At { left, top },
            width: 30.0,
            height: 30.0,
            cells: "three".to_string(),
            value: None,
            cycle_interval: None,
            bounce: None,
            pulse: None,
            shoot: None,
        }
    }

    fn config() -> GameConfig {
        let mut config = GameConfig::default();
        config.cell_sets.insert(
            "three".to_string(),
            vec![
                Cell::new(0.0, 0.0, 30.0, 30.0),
                Cell::new(30.0, 0.0, 30.0, 30.0),
                Cell::new(60.0, 0.0, 30.0, 30.0),
            ],
        );
        config.platforms.push(floor());
        config
    }

    fn find(world: &World, kind: SpriteKind) -> SpriteId {
        world.sprites().find(|s| s.kind == kind).map(|s| s.id).unwrap()
    }

    fn run_frames(world: &mut World, from: f64, to: f64) {
        let mut now = from;
        while now <= to {
            world.tick(now);
            now += 16.0;
        }
    }

    #[test]
    fn test_runner_starts_on_its_track() {
        let world = World::with_arcade_rules(config()).unwrap();
        let runner = world.runner().unwrap();
        assert_eq!(runner.top, 269.0);
        assert_eq!(runner.track, 1);
        assert_eq!(world.lives(), 3);
        assert_eq!(world.sprite_count(), 2);
    }

    #[test]
    fn test_pause_is_time_neutral() {
        let mut world = World::with_arcade_rules(config()).unwrap();
        world.turn_right();
        run_frames(&mut world, 0.0, 160.0);

        let sprite_before = world.sprite_offset();
        let background_before = world.background_offset();

        world.toggle_pause(160.0);
        world.tick(1000.0);
        world.tick(3000.0);
        assert_eq!(world.sprite_offset(), sprite_before);

        world.toggle_pause(5160.0);
        world.tick(5176.0);

        let platform_velocity = 42.0 * 4.35;
        assert!((world.sprite_offset() - (sprite_before + platform_velocity * 0.016)).abs() < 1e-3);
        assert!((world.background_offset() - (background_before + 42.0 * 0.016)).abs() < 1e-3);
    }

    #[test]
    fn test_platform_velocity_follows_background() {
        let mut world = World::with_arcade_rules(config()).unwrap();
        world.turn_right();
        world.tick(0.0);
        assert!((world.platform_velocity() - world.background_velocity() * 4.35).abs() < 1e-4);
    }

    #[test]
    fn test_out_of_view_sprites_are_not_updated() {
        let mut config = config();
        // Long enough that the cycle never wraps during the run
        config.cell_sets.insert(
            "long".to_string(),
            (0..32).map(|i| Cell::new(i as f32 * 30.0, 0.0, 30.0, 30.0)).collect(),
        );
        let mut far = actor(SpriteKind::Bee, 5000.0, 0.0);
        far.cells = "long".to_string();
        far.cycle_interval = Some(10.0);
        let mut near = actor(SpriteKind::Bee, 300.0, 0.0);
        near.cells = "long".to_string();
        near.cycle_interval = Some(10.0);
        config.actors = vec![far, near];

        let mut world = World::with_arcade_rules(config).unwrap();
        run_frames(&mut world, 0.0, 100.0);

        let cells: Vec<usize> = world
            .sprites()
            .filter(|s| s.kind == SpriteKind::Bee)
            .map(|s| s.artist.cell_index())
            .collect();
        // Reference at 0 ms, then one advance per 16 ms frame up to 96 ms
        assert_eq!(cells[0], 0);
        assert_eq!(cells[1], 6);
    }

    #[test]
    fn test_projectiles_join_after_the_update_pass() {
        let mut config = config();
        config.cell_sets.insert("bomb".to_string(), vec![Cell::new(40.0, 512.0, 30.0, 20.0)]);
        let mut snail = actor(SpriteKind::Snail, 600.0, 0.0);
        snail.shoot = Some(crate::config::ShootDef {
            interval: 100.0,
            projectile: crate::config::ProjectileDef {
                kind: SpriteKind::SnailBomb,
                width: 20.0,
                height: 20.0,
                velocity_x: -150.0,
                cells: "bomb".to_string(),
                cycle_interval: 100.0,
            },
        });
        config.actors = vec![snail];

        let mut world = World::with_arcade_rules(config).unwrap();
        let before = world.sprite_count();

        world.tick(0.0);
        world.tick(96.0);
        assert_eq!(world.sprite_count(), before);

        world.tick(112.0);
        assert_eq!(world.sprite_count(), before + 1);

        let bomb = world.get(find(&world, SpriteKind::SnailBomb)).unwrap();
        assert_eq!(bomb.left, 600.0);
        assert_eq!(bomb.top, 15.0);

        world.tick(128.0);
        let bomb = world.get(find(&world, SpriteKind::SnailBomb)).unwrap();
        assert!(bomb.left < 600.0);
    }

    #[test]
    fn test_expired_projectile_is_despawned() {
        let mut world = World::with_arcade_rules(config()).unwrap();
        let bomb = Sprite::new(SpriteKind::SnailBomb, Artist::sheet(Vec::new()))
            .with_position(100.0, 0.0)
            .with_size(20.0, 20.0)
            .with_velocity_x(-1000.0)
            .with_behavior(Behavior::Drift(DriftBehavior::new()));
        let id = world.spawn(bomb);
        let count = world.sprite_count();

        world.tick(0.0);
        assert!(world.get(id).is_some());
        world.tick(200.0);
        assert!(world.get(id).is_none());
        assert_eq!(world.sprite_count(), count - 1);
    }

    #[test]
    fn test_projectiles_behind_the_scroll_are_despawned() {
        let mut config = config();
        config.cell_sets.insert("bomb".to_string(), vec![Cell::new(40.0, 512.0, 30.0, 20.0)]);
        let mut snail = actor(SpriteKind::Snail, 900.0, 0.0);
        snail.shoot = Some(crate::config::ShootDef {
            interval: 100.0,
            projectile: crate::config::ProjectileDef {
                kind: SpriteKind::SnailBomb,
                width: 20.0,
                height: 20.0,
                velocity_x: -150.0,
                cells: "bomb".to_string(),
                cycle_interval: 100.0,
            },
        });
        config.actors = vec![snail];

        let mut world = World::with_arcade_rules(config).unwrap();
        world.turn_right();

        let mut fired = 0;
        let mut now = 0.0;
        while now <= 20_000.0 {
            world.tick(now);
            let offset = world.sprite_offset();
            let bombs: Vec<&Sprite> = world.sprites().filter(|s| s.kind == SpriteKind::SnailBomb).collect();
            fired = fired.max(bombs.len());
            assert!(bombs.iter().all(|b| b.left + b.width > offset), "stale bomb at {now} ms");
            now += 16.0;
        }

        assert!(!world.is_game_over());
        assert!(fired > 0);
        assert_eq!(world.sprites().filter(|s| s.kind == SpriteKind::SnailBomb).count(), 0);
    }

    #[test]
    fn test_no_life_lost_after_game_over() {
        let mut config = config();
        config.platforms.clear();
        let mut world = World::with_arcade_rules(config).unwrap();

        // A second collider runs into a bee in the same frame the runner drops out
        let bat = Sprite::new(SpriteKind::Bat, Artist::sheet(Vec::new()))
            .with_position(300.0, 0.0)
            .with_size(30.0, 30.0)
            .with_behavior(Behavior::Collide(CollideBehavior::new()));
        let bee = Sprite::new(SpriteKind::Bee, Artist::sheet(Vec::new()))
            .with_position(310.0, 0.0)
            .with_size(30.0, 30.0);
        world.spawn(bat);
        world.spawn(bee);

        let runner_id = world.runner_id();
        let runner = world.get_mut(runner_id).unwrap();
        runner.top = 500.0;
        runner.motion = Motion::Falling { initial_velocity: 0.0 };

        world.tick(0.0);

        assert!(world.is_game_over());
        assert_eq!(world.lives(), 3);
        assert!(world.events.life_lost.is_empty());
        assert_eq!(world.events.game_over.len(), 1);
        assert!(!world.runner().unwrap().visible);
    }

    #[test]
    fn test_collecting_items_scores_once() {
        let mut config = config();
        let coin = actor(SpriteKind::Coin, 60.0, 280.0);
        let mut ruby = actor(SpriteKind::Ruby, 70.0, 280.0);
        ruby.value = Some(200);
        config.actors = vec![coin, ruby];

        let mut world = World::with_arcade_rules(config).unwrap();
        world.tick(0.0);
        assert_eq!(world.score(), 250);
        assert_eq!(world.events.item_collected.len(), 2);
        assert!(!world.get(find(&world, SpriteKind::Coin)).unwrap().visible);

        world.tick(16.0);
        assert_eq!(world.score(), 250);
        assert!(!world.is_game_over());
    }

    #[test]
    fn test_enemy_contact_ends_game() {
        let mut config = config();
        config.actors = vec![actor(SpriteKind::Bee, 60.0, 280.0)];

        let mut world = World::with_arcade_rules(config).unwrap();
        world.tick(0.0);

        assert!(world.is_game_over());
        assert!(world.is_paused());
        let event = world.events.game_over.drain().next().unwrap();
        assert_eq!(event.culprit, SpriteKind::Bee);

        // No resuming a finished game
        world.toggle_pause(100.0);
        assert!(world.is_paused());
    }

    #[test]
    fn test_custom_resolver() {
        struct Vacuum;
        impl CollisionResolver for Vacuum {
            fn resolve(&mut self, _collider: &Sprite, _other: &Sprite) -> Resolution {
                Resolution::Despawn
            }
        }

        let mut config = config();
        config.actors = vec![actor(SpriteKind::Bee, 60.0, 280.0)];
        let mut world = World::new(config, Box::new(Vacuum)).unwrap();
        let bee = find(&world, SpriteKind::Bee);

        world.tick(0.0);
        assert!(world.get(bee).is_none());
        assert!(!world.is_game_over());
        assert_eq!(world.events.collision.len(), 1);
    }

    #[test]
    fn test_background_offset_wraps() {
        let mut world = World::with_arcade_rules(config()).unwrap();
        world.turn_left();
        world.tick(0.0);
        world.tick(16.0);
        assert_eq!(world.background_offset(), 0.0);
        assert!(world.sprite_offset() < 0.0);

        let mut world = World::with_arcade_rules(config()).unwrap();
        world.turn_right();
        world.tick(0.0);
        world.tick(27_000.0);
        assert_eq!(world.background_offset(), 0.0);
    }

    #[test]
    fn test_turning_swaps_runner_cells() {
        let mut config = config();
        config.cell_sets.insert(
            "runner_left".to_string(),
            vec![Cell::new(1.0, 1.0, 50.0, 54.0), Cell::new(2.0, 2.0, 50.0, 54.0)],
        );
        let mut world = World::with_arcade_rules(config).unwrap();

        world.turn_left();
        let runner = world.runner().unwrap();
        assert_eq!(runner.run_animation_rate, 1.0);
        assert_eq!(runner.artist.current_cell().map(|c| c.left), Some(1.0));
        assert_eq!(world.background_velocity(), -42.0);
    }

    #[test]
    fn test_countdown_resumes_after_three_seconds() {
        let mut world = World::with_arcade_rules(config()).unwrap();
        world.tick(0.0);

        world.focus_lost(100.0);
        assert!(world.is_paused());

        world.focus_gained(200.0);
        world.tick(1200.0);
        world.tick(2200.0);
        assert!(world.is_paused());
        world.tick(3200.0);
        assert!(!world.is_paused());

        let counts: Vec<u32> = world.events.countdown.drain().map(|e| e.remaining).collect();
        assert_eq!(counts, vec![3, 2, 1]);
    }

    #[test]
    fn test_losing_focus_cancels_countdown() {
        let mut world = World::with_arcade_rules(config()).unwrap();
        world.tick(0.0);
        world.focus_lost(100.0);
        world.focus_gained(200.0);
        world.focus_lost(1500.0);
        world.tick(5000.0);
        assert!(world.is_paused());
        assert!(!world.is_counting_down());
    }

    #[test]
    fn test_falling_off_the_world_costs_a_life() {
        // No platforms at all: the runner drops straight away
        let mut config = config();
        config.platforms.clear();
        let mut world = World::with_arcade_rules(config).unwrap();

        world.tick(0.0);
        assert_eq!(world.time_rate(), 0.3);

        let mut now = 16.0;
        while world.events.life_lost.is_empty() {
            world.tick(now);
            now += 16.0;
            assert!(now < 30_000.0, "runner never fell out");
        }

        assert_eq!(world.lives(), 2);
        assert_eq!(world.time_rate(), 1.0);
        let runner = world.runner().unwrap();
        assert!(runner.visible);
        assert_eq!(runner.top, 269.0);
        assert_eq!(runner.track, 1);
        assert!(runner.motion.is_grounded());
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut config = config();
        config.platforms.clear();
        config.runner.lives = 1;
        let mut world = World::with_arcade_rules(config).unwrap();

        let mut now = 0.0;
        while !world.is_game_over() {
            world.tick(now);
            now += 16.0;
            assert!(now < 30_000.0, "game never ended");
        }
        assert_eq!(world.lives(), 0);
        assert!(world.is_paused());
    }

    #[test]
    fn test_jump_and_land() {
        let mut world = World::with_arcade_rules(config()).unwrap();
        world.tick(0.0);

        assert!(world.jump(10.0));
        assert!(!world.jump(12.0));

        let mut highest = 269.0_f32;
        let mut now = 16.0;
        while now < 1200.0 {
            world.tick(now);
            highest = highest.min(world.runner().unwrap().top);
            now += 16.0;
        }

        let runner = world.runner().unwrap();
        assert!(highest < 269.0 - 100.0);
        assert_eq!(runner.top, 269.0);
        assert!(runner.motion.is_grounded());
    }

    #[test]
    fn test_no_jumping_while_paused() {
        let mut world = World::with_arcade_rules(config()).unwrap();
        world.tick(0.0);
        world.toggle_pause(10.0);
        assert!(!world.jump(20.0));
    }

    #[test]
    fn test_slow_motion_toggle() {
        let mut world = World::with_arcade_rules(config()).unwrap();
        world.toggle_slow_motion();
        assert_eq!(world.time_rate(), 0.3);
        world.toggle_slow_motion();
        assert_eq!(world.time_rate(), 1.0);

        world.set_time_rate(0.5);
        assert_eq!(world.time_rate(), 0.5);
    }

    #[test]
    fn test_render_uses_screen_space() {
        let mut config = config();
        config.actors = vec![actor(SpriteKind::Coin, 700.0, 0.0), actor(SpriteKind::Coin, 9000.0, 0.0)];
        let mut world = World::with_arcade_rules(config).unwrap();
        world.turn_right();

        let mut renderer = RecordingRenderer::default();
        world.draw(0.0, &mut renderer);
        world.draw(100.0, &mut renderer);

        let offset = world.sprite_offset();
        let coins: Vec<f32> = renderer
            .sprites
            .iter()
            .filter(|(kind, _, _)| *kind == SpriteKind::Coin)
            .map(|(_, left, _)| *left)
            .collect();
        assert_eq!(coins.len(), 2);
        assert!((coins[1] - (700.0 - offset)).abs() < 1e-3);
        assert!(renderer.sprites.iter().any(|(kind, left, top)| *kind == SpriteKind::Runner && *left == 50.0 && *top == 269.0));
        assert_eq!(renderer.background_offsets.len(), 2);
        assert!(renderer.boxes.is_empty());

        world.toggle_collision_boxes();
        let mut renderer = RecordingRenderer::default();
        world.render(&mut renderer);
        assert_eq!(renderer.boxes.len(), renderer.sprites.len());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = config();
        config.physics.jump_duration = -1.0;
        assert!(World::with_arcade_rules(config).is_err());
    }
}
