//! Pointer drag interactions.
//!
//! Two independent gestures:
//! - overlay drag: free 2-D repositioning of a text overlay on the player
//! - time drag: moving or resizing an element along the time axis

use cueline_core::{pixels_to_time, Size, Vec2};
use cueline_timeline::{ElementId, ElementKind, ElementStore, TextPatch, TimeSpan};
use egui::{CursorIcon, Pos2, Rect};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Drag and snap tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Resolution overlay positions are stored in.
    pub composition: Size,
    /// Shortest span a resize may leave, in seconds.
    pub min_duration: f64,
    /// Distance in timeline pixels at which a snap guide appears.
    pub snap_threshold_px: f64,
    /// Width of the resize handle at each element edge, in pixels.
    pub handle_width_px: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            composition: Size::HD_1080,
            min_duration: 0.1,
            snap_threshold_px: 8.0,
            handle_width_px: 6.0,
        }
    }
}

// ── Overlay drag ───────────────────────────────────────────────

/// Captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OverlayGrab {
    id: ElementId,
    pointer_start: Pos2,
    element_start: Pos2,
}

/// Repositions text overlays from pointer movement over the player.
///
/// Pointer deltas are measured in display pixels and scaled into
/// composition pixels by `composition / display`.
#[derive(Debug, Clone)]
pub struct OverlayDragController {
    composition: Size,
    scale: Vec2,
    grab: Option<OverlayGrab>,
}

impl OverlayDragController {
    pub fn new(composition: Size, display: Size) -> Self {
        Self {
            composition,
            scale: composition.scale_from(display),
            grab: None,
        }
    }

    /// The player was resized on screen.
    pub fn set_display_size(&mut self, display: Size) {
        self.scale = self.composition.scale_from(display);
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    pub fn dragged(&self) -> Option<ElementId> {
        self.grab.map(|g| g.id)
    }

    /// Begin dragging text element `id`.
    ///
    /// Ignored while `blocked` (playing, or a text field is being edited)
    /// and for ids that are not text elements.
    pub fn pointer_down(
        &mut self,
        store: &ElementStore,
        id: ElementId,
        pointer: Pos2,
        blocked: bool,
    ) -> bool {
        if blocked {
            return false;
        }
        let Some(text) = store.text(id) else {
            return false;
        };
        self.grab = Some(OverlayGrab {
            id,
            pointer_start: pointer,
            element_start: Pos2::new(text.position_x, text.position_y),
        });
        true
    }

    /// Patch for the dragged element at `pointer`, if a drag is active.
    pub fn pointer_move(&self, pointer: Pos2) -> Option<(ElementId, TextPatch)> {
        let grab = self.grab?;
        let delta = pointer - grab.pointer_start;
        let x = grab.element_start.x + delta.x * self.scale.x;
        let y = grab.element_start.y + delta.y * self.scale.y;
        Some((grab.id, TextPatch::position(x, y)))
    }

    pub fn pointer_up(&mut self) {
        self.grab = None;
    }
}

// ── Time drag ──────────────────────────────────────────────────

/// What a time-axis drag changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Shift the whole span, keeping its duration.
    Move,
    /// Move the start edge.
    ResizeStart,
    /// Move the end edge.
    ResizeEnd,
}

/// Active time-axis drag of one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeDrag {
    pub id: ElementId,
    pub kind: ElementKind,
    pub mode: DragMode,
    pointer_start_x: f64,
    original: TimeSpan,
}

impl TimeDrag {
    /// Start a drag of `id` with the pointer at `pointer_x` timeline pixels.
    pub fn begin(store: &ElementStore, id: ElementId, mode: DragMode, pointer_x: f64) -> Option<Self> {
        let kind = store.kind_of(id)?;
        let original = store.span_of(id)?;
        debug!(%id, ?mode, "Time drag started");
        Some(Self {
            id,
            kind,
            mode,
            pointer_start_x: pointer_x,
            original,
        })
    }

    pub fn original(&self) -> TimeSpan {
        self.original
    }

    /// Span the element should have with the pointer at `pointer_x`.
    pub fn span_at(&self, pointer_x: f64, pixels_per_second: f64, min_duration: f64) -> TimeSpan {
        let dt = pixels_to_time(pointer_x - self.pointer_start_x, pixels_per_second);
        match self.mode {
            DragMode::Move => compute_move(self.original, dt),
            DragMode::ResizeStart => compute_resize_start(self.original, dt, min_duration),
            DragMode::ResizeEnd => compute_resize_end(self.original, dt, min_duration),
        }
    }
}

/// Shift `span` by `dt`, preserving its duration and keeping `start >= 0`.
pub fn compute_move(span: TimeSpan, dt: f64) -> TimeSpan {
    span.moved_to((span.start_time() + dt).max(0.0))
}

/// Move the start edge by `dt`, clamped to `[0, end - min_duration]`.
pub fn compute_resize_start(span: TimeSpan, dt: f64, min_duration: f64) -> TimeSpan {
    let latest = (span.end_time() - min_duration).max(0.0);
    let start = (span.start_time() + dt).max(0.0).min(latest);
    TimeSpan::new(start, span.end_time())
}

/// Move the end edge by `dt`, keeping at least `min_duration`.
pub fn compute_resize_end(span: TimeSpan, dt: f64, min_duration: f64) -> TimeSpan {
    let end = (span.end_time() + dt).max(span.start_time() + min_duration);
    TimeSpan::new(span.start_time(), end)
}

/// Which gesture a pointer at `pos` starts on an element drawn in `rect`.
pub fn hit_test(rect: Rect, pos: Pos2, handle_width: f32) -> Option<DragMode> {
    if !rect.contains(pos) {
        return None;
    }
    // Narrow elements keep a grabbable middle.
    let handle = handle_width.min(rect.width() / 3.0);
    if pos.x <= rect.left() + handle {
        Some(DragMode::ResizeStart)
    } else if pos.x >= rect.right() - handle {
        Some(DragMode::ResizeEnd)
    } else {
        Some(DragMode::Move)
    }
}

/// Pointer cursor for a drag mode.
pub fn drag_cursor(mode: DragMode) -> CursorIcon {
    match mode {
        DragMode::Move => CursorIcon::Grab,
        DragMode::ResizeStart => CursorIcon::ResizeWest,
        DragMode::ResizeEnd => CursorIcon::ResizeEast,
    }
}
