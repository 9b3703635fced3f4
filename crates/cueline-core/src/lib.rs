//! Cueline Core - Foundation types for the timeline editor
//!
//! This crate provides the fundamental types used throughout Cueline:
//! - Frame rate and frame/time conversion
//! - Time ↔ pixel coordinate mapping
//! - Composition-space geometry
//! - The shared error type

pub mod coords;
pub mod error;
pub mod geometry;
pub mod time;

pub use coords::{pixels_to_time, span_to_pixels, time_at_offset, time_to_pixels};
pub use error::{CuelineError, Result};
pub use geometry::{Rect, Size, Vec2};
pub use time::{format_clock, round_millis, FrameRate};
