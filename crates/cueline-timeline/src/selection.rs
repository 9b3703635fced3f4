//! Selection state and lane assignment.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::{ElementId, ElementKind, TimeSpan};
use crate::store::ElementStore;

/// The single active selection: an element kind and id, or nothing.
///
/// Kind and id are always set and cleared together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<(ElementKind, ElementId)>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the selection.
    ///
    /// A half-specified pair (kind without id, or id without kind) clears
    /// the selection rather than leaving it partially set.
    pub fn set_selected_track_and_id(&mut self, kind: Option<ElementKind>, id: Option<ElementId>) {
        self.current = match (kind, id) {
            (Some(kind), Some(id)) => Some((kind, id)),
            _ => None,
        };
    }

    pub fn select(&mut self, kind: ElementKind, id: ElementId) {
        self.current = Some((kind, id));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn selected_track(&self) -> Option<ElementKind> {
        self.current.map(|(kind, _)| kind)
    }

    pub fn selected_track_id(&self) -> Option<ElementId> {
        self.current.map(|(_, id)| id)
    }

    pub fn get(&self) -> Option<(ElementKind, ElementId)> {
        self.current
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected_track_id() == Some(id)
    }

    /// Delete the selected element from the list matching its kind, then
    /// clear the selection. No selection is a no-op.
    ///
    /// Returns the id that was removed.
    pub fn delete_selected(&mut self, store: &mut ElementStore) -> Option<ElementId> {
        let (kind, id) = self.current.take()?;
        let removed = match kind {
            ElementKind::Text => store.delete_text(id),
            ElementKind::Video | ElementKind::Image => store.delete_media(id),
            ElementKind::Audio => store.delete_audio(id),
        };
        debug!(%id, %kind, removed, "Delete selected");
        removed.then_some(id)
    }

    /// Clear the selection if its element no longer exists.
    pub fn prune(&mut self, store: &ElementStore) {
        if let Some((_, id)) = self.current {
            if store.kind_of(id).is_none() {
                self.current = None;
            }
        }
    }
}

// ── Lanes ──────────────────────────────────────────────────────

/// The three tracks elements are drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Text,
    Media,
    Audio,
}

impl Lane {
    /// All lanes, top to bottom.
    pub const ALL: [Lane; 3] = [Lane::Text, Lane::Media, Lane::Audio];

    /// Lane an element kind is placed on.
    pub fn of(kind: ElementKind) -> Lane {
        match kind {
            ElementKind::Text => Lane::Text,
            ElementKind::Video | ElementKind::Image => Lane::Media,
            ElementKind::Audio => Lane::Audio,
        }
    }
}

/// One element as seen by a lane renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneEntry {
    pub id: ElementId,
    pub kind: ElementKind,
    pub span: TimeSpan,
}

/// A lane and its elements in list order.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneView {
    pub lane: Lane,
    pub entries: Vec<LaneEntry>,
}

impl LaneView {
    /// Entries whose spans intersect `[start, end]`.
    pub fn visible(&self, start: f64, end: f64) -> impl Iterator<Item = &LaneEntry> {
        self.entries
            .iter()
            .filter(move |e| e.span.end_time() >= start && e.span.start_time() <= end)
    }
}

/// Lane an element kind is drawn on.
pub fn lane_of(kind: ElementKind) -> Lane {
    Lane::of(kind)
}

/// Group the store's elements into lanes, preserving insertion order.
pub fn lanes(store: &ElementStore) -> Vec<LaneView> {
    let mut views: Vec<LaneView> = Lane::ALL
        .iter()
        .map(|&lane| LaneView {
            lane,
            entries: Vec::new(),
        })
        .collect();
    for (kind, id, span) in store.iter_spans() {
        let lane = Lane::of(kind);
        if let Some(view) = views.iter_mut().find(|v| v.lane == lane) {
            view.entries.push(LaneEntry { id, kind, span });
        }
    }
    views
}
