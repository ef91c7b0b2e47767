//! Sprites
//!
//! A sprite is a positioned box with a render delegate (its artist) and an
//! ordered list of behaviors. Behaviors run in attachment order every frame,
//! so a later behavior sees what an earlier one changed.

use serde::{Serialize, Deserialize};

use super::behavior::{Behavior, FrameContext};
use super::collision::{CollisionRect, Margins};
use super::entity::SpriteId;

const DEFAULT_SIZE: f32 = 10.0;

// =============================================================================
// Type Tags
// =============================================================================

/// What a sprite is. Drives collision margins and the default game rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    Runner,
    Platform,
    Bat,
    Bee,
    Button,
    Coin,
    Ruby,
    Sapphire,
    Snail,
    SnailBomb,
}

impl SpriteKind {
    /// Picked up on contact
    pub fn is_collectible(self) -> bool {
        matches!(self, SpriteKind::Coin | SpriteKind::Ruby | SpriteKind::Sapphire)
    }

    /// Ends the round on contact
    pub fn is_enemy(self) -> bool {
        matches!(
            self,
            SpriteKind::Bat | SpriteKind::Bee | SpriteKind::Snail | SpriteKind::SnailBomb
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            SpriteKind::Runner => "runner",
            SpriteKind::Platform => "platform",
            SpriteKind::Bat => "bat",
            SpriteKind::Bee => "bee",
            SpriteKind::Button => "button",
            SpriteKind::Coin => "coin",
            SpriteKind::Ruby => "ruby",
            SpriteKind::Sapphire => "sapphire",
            SpriteKind::Snail => "snail",
            SpriteKind::SnailBomb => "snail bomb",
        }
    }
}

// =============================================================================
// Artists (render delegates)
// =============================================================================

/// A frame rectangle inside a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Cell {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }
}

/// Animates through a list of sprite-sheet cells.
#[derive(Debug, Clone, Default)]
pub struct SheetArtist {
    pub cells: Vec<Cell>,
    pub cell_index: usize,
}

impl SheetArtist {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells, cell_index: 0 }
    }

    /// Step to the next cell, wrapping to the first.
    pub fn advance(&mut self) {
        if self.cells.is_empty() {
            return;
        }
        if self.cell_index + 1 >= self.cells.len() {
            self.cell_index = 0;
        } else {
            self.cell_index += 1;
        }
    }

    /// Swap the cell list (e.g. facing left vs right), keeping the index in range.
    pub fn set_cells(&mut self, cells: Vec<Cell>) {
        self.cells = cells;
        if self.cell_index >= self.cells.len() {
            self.cell_index = 0;
        }
    }

    pub fn current(&self) -> Option<&Cell> {
        self.cells.get(self.cell_index)
    }
}

/// How a sprite is drawn. The renderer interprets it; the core only advances frames.
#[derive(Debug, Clone)]
pub enum Artist {
    Sheet(SheetArtist),
    /// Solid rectangle (platforms)
    Fill { color: [u8; 3] },
}

impl Artist {
    pub fn sheet(cells: Vec<Cell>) -> Self {
        Artist::Sheet(SheetArtist::new(cells))
    }

    pub fn advance(&mut self) {
        if let Artist::Sheet(sheet) = self {
            sheet.advance();
        }
    }

    pub fn current_cell(&self) -> Option<&Cell> {
        match self {
            Artist::Sheet(sheet) => sheet.current(),
            Artist::Fill { .. } => None,
        }
    }

    pub fn cell_index(&self) -> usize {
        match self {
            Artist::Sheet(sheet) => sheet.cell_index,
            Artist::Fill { .. } => 0,
        }
    }
}

// =============================================================================
// Motion State
// =============================================================================

/// Vertical movement state. One value at a time, so a sprite can never be
/// jumping and falling at once.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Motion {
    #[default]
    Grounded,
    Ascending { launch_top: f32 },
    Descending { launch_top: f32, apex: f32 },
    Falling { initial_velocity: f32 },
}

impl Motion {
    pub fn is_grounded(&self) -> bool {
        matches!(self, Motion::Grounded)
    }

    pub fn is_jumping(&self) -> bool {
        matches!(self, Motion::Ascending { .. } | Motion::Descending { .. })
    }

    pub fn is_falling(&self) -> bool {
        matches!(self, Motion::Falling { .. })
    }
}

// =============================================================================
// Sprite
// =============================================================================

#[derive(Debug, Clone)]
pub struct Sprite {
    /// Assigned by the world on insertion
    pub id: SpriteId,
    pub kind: SpriteKind,

    /// World-space left edge (screen x is `left - h_offset`)
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,

    /// Pixels per second
    pub velocity_x: f32,
    pub velocity_y: f32,

    pub opacity: f32,
    pub visible: bool,

    /// Horizontal scroll offset applied when drawing
    pub h_offset: f32,

    /// Track the sprite stands on or belongs to (1-based, 0 = below every track)
    pub track: u8,

    /// Points awarded when collected
    pub value: Option<u32>,

    pub margins: Margins,
    pub artist: Artist,
    pub behaviors: Vec<Behavior>,
    pub motion: Motion,

    /// Zero freezes the run cycle (standing still or mid-jump)
    pub run_animation_rate: f32,
}

impl Sprite {
    pub fn new(kind: SpriteKind, artist: Artist) -> Self {
        Self {
            id: SpriteId::DETACHED,
            kind,
            left: 0.0,
            top: 0.0,
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            velocity_x: 0.0,
            velocity_y: 0.0,
            opacity: 1.0,
            visible: true,
            h_offset: 0.0,
            track: 0,
            value: None,
            margins: Margins::ZERO,
            artist,
            behaviors: Vec::new(),
            motion: Motion::Grounded,
            run_animation_rate: 0.0,
        }
    }

    pub fn with_position(mut self, left: f32, top: f32) -> Self {
        self.left = left;
        self.top = top;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_track(mut self, track: u8) -> Self {
        self.track = track;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_velocity_x(mut self, velocity_x: f32) -> Self {
        self.velocity_x = velocity_x;
        self
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behaviors.push(behavior);
        self
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Left edge after scrolling.
    pub fn screen_left(&self) -> f32 {
        self.left - self.h_offset
    }

    /// Margin-adjusted hitbox in screen space.
    pub fn collision_rect(&self) -> CollisionRect {
        CollisionRect::with_margins(self.screen_left(), self.top, self.width, self.height, &self.margins)
    }

    /// Horizontal culling test against a viewport of `canvas_width` pixels
    /// starting at this sprite's scroll offset.
    pub fn is_in_view(&self, canvas_width: f32) -> bool {
        self.left + self.width > self.h_offset && self.left < self.h_offset + canvas_width
    }

    pub fn has_collide_behavior(&self) -> bool {
        self.behaviors.iter().any(|b| matches!(b, Behavior::Collide(_)))
    }

    /// Run every behavior in attachment order.
    pub fn update(&mut self, ctx: &mut FrameContext<'_>) {
        let mut behaviors = std::mem::take(&mut self.behaviors);
        for behavior in &mut behaviors {
            behavior.execute(self, ctx);
        }
        self.behaviors = behaviors;
    }

    pub fn pause_behaviors(&mut self, now: f64) {
        for behavior in &mut self.behaviors {
            behavior.pause(now);
        }
    }

    pub fn unpause_behaviors(&mut self, now: f64) {
        for behavior in &mut self.behaviors {
            behavior.unpause(now);
        }
    }
}
