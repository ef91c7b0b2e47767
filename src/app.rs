//! Application state
//!
//! Glue between macroquad and the game core: polls input, feeds wall-clock
//! time into the world, draws through `ScreenRenderer` and turns drained
//! events into HUD messages.

use log::{error, info};
use macroquad::miniquad;
use macroquad::input::utils::{register_input_subscriber, repeat_all_miniquad_input};
use macroquad::prelude::*;

use snail_bait::config::GameConfig;
use snail_bait::game::collision::CollisionRect;
use snail_bait::game::{Renderer, SpriteKind, SpriteView, World};
use snail_bait::input::{Action, InputState};

/// Height of the status bar under the playfield
pub const HUD_HEIGHT: f32 = 40.0;

/// How long a status message stays up (seconds)
const MESSAGE_SECONDS: f64 = 2.0;

// =============================================================================
// Renderer
// =============================================================================

/// Draws sprites with macroquad. Sheet cells are drawn from the sprite sheet
/// when one was loaded, otherwise every sprite is a colored rectangle.
pub struct ScreenRenderer {
    sheet: Option<Texture2D>,
    background_width: f32,
    canvas_width: f32,
    canvas_height: f32,
}

impl ScreenRenderer {
    pub fn new(config: &GameConfig, sheet: Option<Texture2D>) -> Self {
        Self {
            sheet,
            background_width: config.playfield.background_width,
            canvas_width: config.playfield.canvas_width,
            canvas_height: config.playfield.canvas_height,
        }
    }
}

fn kind_color(kind: SpriteKind) -> Color {
    match kind {
        SpriteKind::Runner => Color::from_rgba(230, 90, 40, 255),
        SpriteKind::Platform => Color::from_rgba(150, 190, 255, 255),
        SpriteKind::Bat => Color::from_rgba(60, 40, 80, 255),
        SpriteKind::Bee => Color::from_rgba(240, 200, 30, 255),
        SpriteKind::Button => Color::from_rgba(40, 80, 220, 255),
        SpriteKind::Coin => Color::from_rgba(255, 215, 0, 255),
        SpriteKind::Ruby => Color::from_rgba(200, 20, 60, 255),
        SpriteKind::Sapphire => Color::from_rgba(30, 60, 200, 255),
        SpriteKind::Snail => Color::from_rgba(120, 160, 60, 255),
        SpriteKind::SnailBomb => Color::from_rgba(30, 30, 30, 255),
    }
}

impl Renderer for ScreenRenderer {
    fn draw_background(&mut self, offset: f32) {
        draw_rectangle(0.0, 0.0, self.canvas_width, self.canvas_height, Color::from_rgba(120, 170, 220, 255));

        // Two passes of a hill band so the wrap point never shows a gap
        let hill = Color::from_rgba(90, 150, 90, 255);
        let spacing = self.background_width / 6.0;
        for pass in 0..2 {
            let base = pass as f32 * self.background_width - offset;
            for i in 0..6 {
                let x = base + i as f32 * spacing;
                if x + spacing < 0.0 || x > self.canvas_width {
                    continue;
                }
                let height = 60.0 + (i % 3) as f32 * 25.0;
                draw_triangle(
                    vec2(x, self.canvas_height),
                    vec2(x + spacing / 2.0, self.canvas_height - height),
                    vec2(x + spacing, self.canvas_height),
                    hill,
                );
            }
        }
    }

    fn draw_sprite(&mut self, sprite: &SpriteView<'_>) {
        let alpha = sprite.opacity.clamp(0.0, 1.0);

        if let (Some(sheet), Some(cell)) = (&self.sheet, sprite.cell) {
            draw_texture_ex(
                sheet,
                sprite.left,
                sprite.top,
                Color::new(1.0, 1.0, 1.0, alpha),
                DrawTextureParams {
                    source: Some(Rect::new(cell.left, cell.top, cell.width, cell.height)),
                    dest_size: Some(vec2(sprite.width, sprite.height)),
                    ..Default::default()
                },
            );
            return;
        }

        let mut color = match sprite.color {
            Some([r, g, b]) => Color::from_rgba(r, g, b, 255),
            None => kind_color(sprite.kind),
        };
        color.a = alpha;
        draw_rectangle(sprite.left, sprite.top, sprite.width, sprite.height, color);
    }

    fn draw_collision_box(&mut self, rect: &CollisionRect) {
        draw_rectangle_lines(rect.left, rect.top, rect.width(), rect.height(), 1.0, RED);
    }
}

// =============================================================================
// Focus tracking
// =============================================================================

/// Collects window minimize/restore events from miniquad.
#[derive(Default)]
struct FocusEvents {
    lost: bool,
    gained: bool,
}

impl miniquad::EventHandler for FocusEvents {
    fn update(&mut self) {}

    fn draw(&mut self) {}

    fn window_minimized_event(&mut self) {
        self.lost = true;
    }

    fn window_restored_event(&mut self) {
        self.gained = true;
    }
}

// =============================================================================
// App
// =============================================================================

pub struct App {
    config: GameConfig,
    world: World,
    input: InputState,
    renderer: ScreenRenderer,
    focus: FocusEvents,
    focus_subscriber: usize,
    /// (message, expiry in wall seconds)
    message: Option<(String, f64)>,
}

impl App {
    pub fn new(config: GameConfig, world: World, sheet: Option<Texture2D>) -> Self {
        Self {
            renderer: ScreenRenderer::new(&config, sheet),
            config,
            world,
            input: InputState::new(),
            focus: FocusEvents::default(),
            focus_subscriber: register_input_subscriber(),
            message: None,
        }
    }

    /// One frame: input, simulation, drawing. `now` is wall time in seconds.
    pub fn frame(&mut self, now: f64) {
        let now_ms = now * 1000.0;

        repeat_all_miniquad_input(&mut self.focus, self.focus_subscriber);
        if std::mem::take(&mut self.focus.lost) {
            self.world.focus_lost(now_ms);
        }
        if std::mem::take(&mut self.focus.gained) {
            self.world.focus_gained(now_ms);
        }

        self.input.poll();
        for action in self.input.pressed().to_vec() {
            self.dispatch(action, now_ms);
        }

        clear_background(BLACK);
        self.world.draw(now_ms, &mut self.renderer);
        self.drain_events(now);
        self.draw_hud(now);
    }

    fn dispatch(&mut self, action: Action, now_ms: f64) {
        match action {
            Action::TurnLeft => self.world.turn_left(),
            Action::TurnRight => self.world.turn_right(),
            Action::Jump => {
                self.world.jump(now_ms);
            }
            Action::TogglePause => self.world.toggle_pause(now_ms),
            Action::ToggleSlowMotion => self.world.toggle_slow_motion(),
            Action::ToggleCollisionBoxes => self.world.toggle_collision_boxes(),
            Action::Restart => self.restart(),
        }
    }

    fn restart(&mut self) {
        match World::with_arcade_rules(self.config.clone()) {
            Ok(world) => {
                info!("restarting");
                self.world = world;
                self.message = None;
            }
            Err(e) => error!("restart failed: {}", e),
        }
    }

    fn set_message(&mut self, message: String, now: f64) {
        self.message = Some((message, now + MESSAGE_SECONDS));
    }

    fn drain_events(&mut self, now: f64) {
        let events = &mut self.world.events;
        events.collision.clear();

        let mut latest = None;
        for event in events.item_collected.drain() {
            latest = Some(format!("+{} {}", event.value, event.kind.label()));
        }
        for event in events.life_lost.drain() {
            latest = Some(format!("Ouch! {} lives left", event.lives_left));
        }
        for event in events.countdown.drain() {
            latest = Some(format!("{}...", event.remaining));
        }
        for event in events.game_over.drain() {
            latest = Some(format!(
                "Game over ({}), score {}. Press R",
                event.culprit.label(),
                event.score
            ));
        }

        if let Some(message) = latest {
            self.set_message(message, now);
        }
    }

    fn draw_hud(&mut self, now: f64) {
        let top = self.config.playfield.canvas_height;
        let width = self.config.playfield.canvas_width;
        draw_rectangle(0.0, top, width, HUD_HEIGHT, Color::from_rgba(20, 20, 30, 255));

        let status = format!(
            "Score {}   Lives {}   {:.0} fps{}",
            self.world.score(),
            self.world.lives(),
            self.world.fps(),
            if self.world.time_rate() < 1.0 { "   slow-mo" } else { "" },
        );
        draw_text(&status, 10.0, top + 26.0, 22.0, WHITE);

        if self.message.as_ref().is_some_and(|(_, expiry)| now > *expiry) {
            self.message = None;
        }
        let paused_text = if self.world.is_game_over() {
            None
        } else if self.world.is_paused() && !self.world.is_counting_down() {
            Some("Paused")
        } else {
            None
        };

        let text = self.message.as_ref().map(|(msg, _)| msg.as_str()).or(paused_text);
        if let Some(text) = text {
            let size = measure_text(text, None, 32, 1.0);
            draw_text(text, (width - size.width) / 2.0, top / 2.0, 32.0, WHITE);
        }
    }
}
