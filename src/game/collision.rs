//! Collision Detection
//!
//! Axis-aligned rectangle overlap on margin-shrunk sprite boxes.
//! Sprite art has transparent padding, so each sprite kind carries margins
//! that pull its hitbox in from the drawn bounds.
//!
//! Everything here is pure: the world decides what a collision means.

use serde::{Serialize, Deserialize};

/// Per-side inset applied to a sprite's bounds before collision tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    #[serde(default)]
    pub top: f32,
    #[serde(default)]
    pub bottom: f32,
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub right: f32,
}

impl Margins {
    pub const ZERO: Margins = Margins { top: 0.0, bottom: 0.0, left: 0.0, right: 0.0 };

    /// Same inset on every side.
    pub const fn uniform(m: f32) -> Self {
        Self { top: m, bottom: m, left: m, right: m }
    }

    pub const fn new(top: f32, bottom: f32, left: f32, right: f32) -> Self {
        Self { top, bottom, left, right }
    }
}

/// Screen-space collision rectangle, stored as edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionRect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl CollisionRect {
    /// Rectangle from position and size (no margins).
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            right: left + width,
            top,
            bottom: top + height,
        }
    }

    /// Box shrunk by margins on each side.
    pub fn with_margins(left: f32, top: f32, width: f32, height: f32, margins: &Margins) -> Self {
        Self {
            left: left + margins.left,
            right: left + width - margins.right,
            top: top + margins.top,
            bottom: top + height - margins.bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// True when the horizontal spans overlap (used for "platform underneath").
    pub fn spans_horizontally(&self, other: &CollisionRect) -> bool {
        self.right > other.left && self.left < other.right
    }
}

/// Rectangle overlap test. Touching edges count as a hit.
pub fn overlaps(a: &CollisionRect, b: &CollisionRect) -> bool {
    !(a.right < b.left || a.left > b.right || a.bottom < b.top || a.top > b.bottom)
}
