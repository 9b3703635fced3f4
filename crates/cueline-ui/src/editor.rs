//! The editing surface: element store, selection, clock and pointer state.

use cueline_core::{Result, Size};
use cueline_playback::SharedClock;
use cueline_timeline::{
    Element, ElementFactory, ElementId, ElementKind, ElementPatch, ElementStore, MediaProber,
    ProjectSnapshot, Selection, SpanPatch, TimeSpan, UploadedFile,
};
use egui::Pos2;
use tracing::{debug, info};

use crate::drag::{DragConfig, DragMode, OverlayDragController, TimeDrag};
use crate::keyboard::{action_for, KeyAction, KeyPress};
use crate::ruler;
use crate::snapping::{SnapGuide, SnapPoint, SnappingEngine};

/// Everything a timeline view mutates, behind one owner.
///
/// The clock's duration is kept at least as long as the store's after
/// every mutation that can extend it.
#[derive(Debug)]
pub struct Editor {
    store: ElementStore,
    selection: Selection,
    clock: SharedClock,
    factory: ElementFactory,
    config: DragConfig,
    overlay: OverlayDragController,
    time_drag: Option<TimeDrag>,
    snap_points: Vec<SnapPoint>,
    snapping: SnappingEngine,
    guide: SnapGuide,
    editing_text: bool,
}

impl Editor {
    pub fn new(clock: SharedClock, factory: ElementFactory, config: DragConfig) -> Self {
        let overlay = OverlayDragController::new(config.composition, config.composition);
        let snapping = SnappingEngine::new(config.snap_threshold_px);
        Self {
            store: ElementStore::new(),
            selection: Selection::new(),
            clock,
            factory,
            config,
            overlay,
            time_drag: None,
            snap_points: Vec::new(),
            snapping,
            guide: SnapGuide::default(),
            editing_text: false,
        }
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    pub fn guide(&self) -> &SnapGuide {
        &self.guide
    }

    pub fn snapping_mut(&mut self) -> &mut SnappingEngine {
        &mut self.snapping
    }

    // ── Elements ───────────────────────────────────────────────

    pub fn add_element(&mut self, element: impl Into<Element>) -> ElementId {
        let id = self.store.add(element);
        self.sync_duration();
        id
    }

    /// Add a default text overlay at the playhead.
    pub fn add_text(&mut self, text: impl Into<String>) -> ElementId {
        let start = self.clock.state().current_time;
        let element = self.factory.text(text, start);
        self.add_element(element)
    }

    /// Probe an upload and add the resulting element at `start_time`.
    ///
    /// Nothing is added when probing fails.
    pub async fn import_upload<P: MediaProber>(
        &mut self,
        prober: &P,
        file: &UploadedFile,
        start_time: f64,
    ) -> Result<ElementId> {
        let element = self.factory.from_upload(prober, file, start_time).await?;
        let id = self.add_element(element);
        info!(%id, file = %file.name, "Imported upload");
        Ok(id)
    }

    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let applied = self.store.update(id, patch);
        if applied {
            self.sync_duration();
        }
        applied
    }

    /// Remove an element by id. Unknown ids are a no-op.
    pub fn delete(&mut self, id: ElementId) -> bool {
        let Some(kind) = self.store.kind_of(id) else {
            return false;
        };
        let removed = self.store.delete(kind, id);
        self.selection.prune(&self.store);
        if self.time_drag.map_or(false, |d| d.id == id) {
            self.end_time_drag();
        }
        if self.overlay.dragged() == Some(id) {
            self.overlay.pointer_up();
        }
        removed
    }

    // ── Selection ──────────────────────────────────────────────

    pub fn select(&mut self, kind: ElementKind, id: ElementId) {
        self.selection.select(kind, id);
    }

    pub fn set_selected_track_and_id(&mut self, kind: Option<ElementKind>, id: Option<ElementId>) {
        self.selection.set_selected_track_and_id(kind, id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn delete_selected(&mut self) -> Option<ElementId> {
        let removed = self.selection.delete_selected(&mut self.store)?;
        if self.time_drag.map_or(false, |d| d.id == removed) {
            self.end_time_drag();
        }
        Some(removed)
    }

    /// Dispatch a key press. Returns the deleted id, if any.
    pub fn handle_key(&mut self, press: &KeyPress) -> Option<ElementId> {
        match action_for(press)? {
            KeyAction::DeleteSelected => self.delete_selected(),
        }
    }

    // ── Playhead ───────────────────────────────────────────────

    /// Seek to the ruler position `offset_px` from the ruler's left edge.
    pub fn seek_from_ruler(&self, offset_px: f64) -> f64 {
        ruler::seek_from_ruler(&self.clock, offset_px)
    }

    // ── Overlay drag ───────────────────────────────────────────

    /// A text field is being edited; overlay drags are ignored meanwhile.
    pub fn set_editing_text(&mut self, editing: bool) {
        self.editing_text = editing;
        if editing {
            self.overlay.pointer_up();
        }
    }

    /// On-screen size of the player the overlay is dragged on.
    pub fn set_player_display_size(&mut self, display: Size) {
        self.overlay.set_display_size(display);
    }

    pub fn begin_overlay_drag(&mut self, id: ElementId, pointer: Pos2) -> bool {
        let blocked = self.pointer_blocked();
        self.overlay.pointer_down(&self.store, id, pointer, blocked)
    }

    /// Pointer-down on an element is ignored while playing or editing text.
    fn pointer_blocked(&self) -> bool {
        self.editing_text || self.clock.state().is_playing
    }

    pub fn overlay_drag_to(&mut self, pointer: Pos2) -> bool {
        match self.overlay.pointer_move(pointer) {
            Some((id, patch)) => self.store.update(id, &ElementPatch::Text(patch)),
            None => false,
        }
    }

    pub fn end_overlay_drag(&mut self) {
        self.overlay.pointer_up();
    }

    // ── Time drag ──────────────────────────────────────────────

    pub fn begin_time_drag(&mut self, id: ElementId, mode: DragMode, pointer_x: f64) -> bool {
        if self.pointer_blocked() {
            return false;
        }
        let Some(drag) = TimeDrag::begin(&self.store, id, mode, pointer_x) else {
            return false;
        };
        let playhead = self.clock.state().current_time;
        self.snap_points = SnappingEngine::collect_snap_points(&self.store, playhead, Some(id));
        self.time_drag = Some(drag);
        true
    }

    /// Apply the active time drag with the pointer at `pointer_x`.
    ///
    /// Returns the element's new span. The snap guide follows the span.
    pub fn time_drag_to(&mut self, pointer_x: f64) -> Option<TimeSpan> {
        let drag = self.time_drag?;
        let pps = self.clock.state().pixels_per_second;
        let span = drag.span_at(pointer_x, pps, self.config.min_duration);
        let patch = ElementPatch::Span(SpanPatch::range(span.start_time(), span.end_time()));
        if !self.store.update(drag.id, &patch) {
            return None;
        }
        self.sync_duration();
        self.snapping
            .update_guide(&mut self.guide, span, &self.snap_points, pps);
        Some(span)
    }

    pub fn end_time_drag(&mut self) {
        if let Some(drag) = self.time_drag.take() {
            debug!(id = %drag.id, "Time drag ended");
        }
        self.snap_points.clear();
        self.guide.hide();
    }

    // ── Persistence ────────────────────────────────────────────

    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot::capture(&self.store)
    }

    /// Replace the store's contents with a snapshot.
    pub fn restore(&mut self, snapshot: &ProjectSnapshot) {
        self.end_time_drag();
        self.overlay.pointer_up();
        self.store = snapshot.restore();
        self.selection.clear();
        self.sync_duration();
    }

    fn sync_duration(&self) {
        let needed = self.store.duration();
        self.clock.update(|c| {
            if c.duration() < needed {
                c.set_duration(needed);
            }
        });
    }
}
