//! Cueline UI - Timeline interaction layer
//!
//! Turns pointer and keyboard input into element and clock mutations:
//! - Overlay drag and time-axis move/resize
//! - Snap guides
//! - Ruler click-to-seek
//! - Keyboard deletion
//! - The `Editor` that ties them to the store and clock

pub mod drag;
pub mod editor;
pub mod keyboard;
pub mod ruler;
pub mod snapping;

pub use drag::{
    compute_move, compute_resize_end, compute_resize_start, drag_cursor, hit_test, DragConfig,
    DragMode, OverlayDragController, TimeDrag,
};
pub use editor::Editor;
pub use keyboard::{action_for, key_presses, FocusTarget, KeyAction, KeyPress};
pub use ruler::{ruler_offset, seek_from_ruler, time_at_ruler_offset};
pub use snapping::{SnapGuide, SnapKind, SnapPoint, SnappingEngine};
