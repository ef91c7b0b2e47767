//! SNAIL BAIT: a side-scrolling runner
//!
//! Run left and right across the platforms, jump over bees and bats, grab
//! coins and jewels, and keep away from the snail's bombs.
//!
//! Usage: `snail-bait [level.ron]` (defaults to the built-in level)

mod app;

use log::{error, info, warn};
use macroquad::prelude::*;

use app::{App, HUD_HEIGHT};
use snail_bait::config::{load_config, GameConfig};
use snail_bait::game::World;
use snail_bait::VERSION;

fn window_conf() -> Conf {
    let playfield = GameConfig::default().playfield;
    Conf {
        window_title: format!("Snail Bait v{}", VERSION),
        window_width: playfield.canvas_width as i32,
        window_height: (playfield.canvas_height + HUD_HEIGHT) as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn load_level() -> GameConfig {
    if let Some(path) = std::env::args().nth(1) {
        match load_config(&path) {
            Ok(config) => {
                info!("loaded level {}", path);
                return config;
            }
            Err(e) => error!("could not load {}: {}, using the built-in level", path, e),
        }
    }

    GameConfig::embedded().unwrap_or_else(|e| {
        error!("built-in level is broken: {}", e);
        GameConfig::default()
    })
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_level();

    let sheet = match &config.sprite_sheet {
        Some(path) => match load_texture(path).await {
            Ok(tex) => {
                tex.set_filter(FilterMode::Nearest);
                info!("loaded sprite sheet {}", path);
                Some(tex)
            }
            Err(e) => {
                warn!("no sprite sheet ({}), drawing rectangles", e);
                None
            }
        },
        None => None,
    };

    let world = match World::with_arcade_rules(config.clone()) {
        Ok(world) => world,
        Err(e) => {
            error!("could not build the world: {}", e);
            return;
        }
    };

    let mut app = App::new(config, world, sheet);
    info!("=== SNAIL BAIT ===");

    loop {
        app.frame(get_time());
        next_frame().await;
    }
}
