//! Snap guides for time-axis drags.
//!
//! The engine only suggests where a guide line should be drawn. It never
//! changes element times.

use cueline_core::time_to_pixels;
use cueline_timeline::{ElementId, ElementStore, TimeSpan};

/// Vertical guide line shown while a dragged edge lines up with something.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SnapGuide {
    visible: bool,
    x_px: f64,
    time: Option<f64>,
}

impl SnapGuide {
    pub fn show(&mut self, x_px: f64, time: Option<f64>) {
        self.visible = true;
        self.x_px = x_px;
        self.time = time;
    }

    pub fn hide(&mut self) {
        *self = Self::default();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Timeline x position of the guide.
    pub fn x_px(&self) -> f64 {
        self.x_px
    }

    pub fn time(&self) -> Option<f64> {
        self.time
    }
}

/// A time that dragged edges can line up with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapPoint {
    pub time: f64,
    pub kind: SnapKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapKind {
    ElementEdge,
    Playhead,
}

/// Finds snap targets near a dragged span.
#[derive(Debug, Clone)]
pub struct SnappingEngine {
    pub enabled: bool,
    /// Snap distance in timeline pixels.
    pub threshold_px: f64,
}

impl SnappingEngine {
    pub fn new(threshold_px: f64) -> Self {
        Self {
            enabled: true,
            threshold_px,
        }
    }

    /// Edges of every element except `exclude`, plus the playhead.
    pub fn collect_snap_points(
        store: &ElementStore,
        playhead: f64,
        exclude: Option<ElementId>,
    ) -> Vec<SnapPoint> {
        let mut points = vec![SnapPoint {
            time: playhead,
            kind: SnapKind::Playhead,
        }];
        for (_, id, span) in store.iter_spans() {
            if Some(id) == exclude {
                continue;
            }
            for time in [span.start_time(), span.end_time()] {
                points.push(SnapPoint {
                    time,
                    kind: SnapKind::ElementEdge,
                });
            }
        }
        points
    }

    /// Closest point within the pixel threshold of `time`.
    pub fn find_snap(
        &self,
        time: f64,
        points: &[SnapPoint],
        pixels_per_second: f64,
    ) -> Option<SnapPoint> {
        if !self.enabled || pixels_per_second.is_nan() || pixels_per_second <= 0.0 {
            return None;
        }
        points
            .iter()
            .map(|p| (p, (p.time - time).abs() * pixels_per_second))
            .filter(|(_, dist)| *dist <= self.threshold_px)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(p, _)| *p)
    }

    /// Closest snap for either edge of `span`.
    pub fn suggest(
        &self,
        span: TimeSpan,
        points: &[SnapPoint],
        pixels_per_second: f64,
    ) -> Option<SnapPoint> {
        let distance = |p: &SnapPoint| {
            (p.time - span.start_time())
                .abs()
                .min((p.time - span.end_time()).abs())
        };
        [span.start_time(), span.end_time()]
            .into_iter()
            .filter_map(|edge| self.find_snap(edge, points, pixels_per_second))
            .min_by(|a, b| distance(a).total_cmp(&distance(b)))
    }

    /// Show `guide` at the suggested snap for `span`, or hide it.
    pub fn update_guide(
        &self,
        guide: &mut SnapGuide,
        span: TimeSpan,
        points: &[SnapPoint],
        pixels_per_second: f64,
    ) -> Option<SnapPoint> {
        let hit = self.suggest(span, points, pixels_per_second);
        match hit {
            Some(p) => guide.show(time_to_pixels(p.time, pixels_per_second), Some(p.time)),
            None => guide.hide(),
        }
        hit
    }
}

impl Default for SnappingEngine {
    fn default() -> Self {
        Self::new(8.0)
    }
}
