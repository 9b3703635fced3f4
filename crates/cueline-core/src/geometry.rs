//! Composition-space geometry.
//!
//! Overlay positions live in composition pixels (e.g. 1920×1080), which are
//! independent of both the timeline's pixel space and the on-screen size of
//! the player.

use glam::Vec2 as GlamVec2;
use serde::{Deserialize, Serialize};

/// 2D vector.
pub type Vec2 = GlamVec2;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Per-axis factor mapping a delta measured on `display` into this size.
    ///
    /// A degenerate display axis yields a factor of 1.0 for that axis.
    pub fn scale_from(self, display: Size) -> Vec2 {
        let axis = |target: f32, shown: f32| {
            if shown > 0.0 && shown.is_finite() {
                target / shown
            } else {
                1.0
            }
        };
        Vec2::new(
            axis(self.width, display.width),
            axis(self.height, display.height),
        )
    }

    /// Full HD composition.
    pub const HD_1080: Self = Self::new(1920.0, 1080.0);
}

impl Default for Size {
    fn default() -> Self {
        Self::HD_1080
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Minimum corner (top-left).
    #[inline]
    pub fn min(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Maximum corner (bottom-right).
    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Check if a point is inside this rectangle.
    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// The same rectangle with its top-left corner moved to `origin`.
    pub fn with_origin(self, origin: Vec2) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            ..self
        }
    }
}
