//! Snail Bait: a side-scrolling runner.
//!
//! The `game` module is the simulation core. It takes wall-clock
//! timestamps and a `Renderer`, so it can be driven by the macroquad front
//! end in `main.rs` or by tests.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod game;
pub mod input;
