//! Element types for the timeline.

use cueline_core::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique element ID. Generated once at creation and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Generate a fresh ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of element. Selection and deletion dispatch on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Video,
    Image,
    Audio,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Text => "text",
            ElementKind::Video => "video",
            ElementKind::Image => "image",
            ElementKind::Audio => "audio",
        };
        f.write_str(name)
    }
}

// ── Time span ──────────────────────────────────────────────────

/// The `[start_time, end_time]` range an element occupies, in seconds.
///
/// Always satisfies `0 <= start_time <= end_time`; `duration` is derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "SpanRepr", into = "SpanRepr")]
pub struct TimeSpan {
    start_time: f64,
    end_time: f64,
}

impl TimeSpan {
    /// Build a span, clamping `start` to `>= 0` and `end` to `>= start`.
    /// Non-finite inputs collapse onto the nearest valid bound.
    pub fn new(start: f64, end: f64) -> Self {
        let start_time = if start.is_finite() { start.max(0.0) } else { 0.0 };
        let end_time = if end.is_finite() {
            end.max(start_time)
        } else {
            start_time
        };
        Self {
            start_time,
            end_time,
        }
    }

    /// Span starting at `start` lasting `duration` seconds.
    pub fn from_start_duration(start: f64, duration: f64) -> Self {
        let span = Self::new(start, start);
        Self::new(span.start_time, span.start_time + duration.max(0.0))
    }

    #[inline]
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    #[inline]
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Same duration, new start (clamped to zero).
    pub fn moved_to(self, start: f64) -> Self {
        Self::from_start_duration(start, self.duration())
    }

    /// Check if a time is within this span (end exclusive).
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time
    }

    /// Check if two spans overlap.
    pub fn overlaps(&self, other: &TimeSpan) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

impl Default for TimeSpan {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpanRepr {
    start_time: f64,
    end_time: f64,
    #[serde(default)]
    duration: f64,
}

impl From<SpanRepr> for TimeSpan {
    fn from(repr: SpanRepr) -> Self {
        TimeSpan::new(repr.start_time, repr.end_time)
    }
}

impl From<TimeSpan> for SpanRepr {
    fn from(span: TimeSpan) -> Self {
        SpanRepr {
            start_time: span.start_time,
            end_time: span.end_time,
            duration: span.duration(),
        }
    }
}

// ── Text ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Glyph and style attributes of a text overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f32,
    pub font_family: String,
    pub color: String,
    pub background_color: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub align: TextAlign,
    pub opacity: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 48.0,
            font_family: "Arial".to_string(),
            color: "#ffffff".to_string(),
            background_color: None,
            bold: false,
            italic: false,
            align: TextAlign::Center,
            opacity: 1.0,
        }
    }
}

/// A text overlay. `position_x/y` are composition pixels, unrelated to
/// the timeline's pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: ElementId,
    #[serde(flatten)]
    pub span: TimeSpan,
    pub text: String,
    pub style: TextStyle,
    pub position_x: f32,
    pub position_y: f32,
    pub width: f32,
}

// ── Media ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
}

/// Fade-in or fade-out setting.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Fade {
    pub enabled: bool,
    /// Seconds.
    pub duration: f64,
}

/// A video or image placed on the media track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaElement {
    pub id: ElementId,
    pub kind: MediaKind,
    #[serde(flatten)]
    pub span: TimeSpan,
    pub source: String,
    pub file_name: String,
    /// Placement in composition pixels.
    pub frame: Rect,
    pub rotation: f32,
    pub opacity: f32,
    pub fade_in: Fade,
    pub fade_out: Fade,
    pub volume: f32,
    pub speed: f32,
}

// ── Audio ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioElement {
    pub id: ElementId,
    #[serde(flatten)]
    pub span: TimeSpan,
    pub source: String,
    pub file_name: String,
    pub volume: f32,
    pub speed: f32,
    /// Offset into the source where playback begins.
    pub start_from: Option<f64>,
}

// ── Element ────────────────────────────────────────────────────

/// Any element on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text(TextElement),
    Media(MediaElement),
    Audio(AudioElement),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Text(t) => t.id,
            Element::Media(m) => m.id,
            Element::Audio(a) => a.id,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Text(_) => ElementKind::Text,
            Element::Media(m) => match m.kind {
                MediaKind::Video => ElementKind::Video,
                MediaKind::Image => ElementKind::Image,
            },
            Element::Audio(_) => ElementKind::Audio,
        }
    }

    pub fn span(&self) -> TimeSpan {
        match self {
            Element::Text(t) => t.span,
            Element::Media(m) => m.span,
            Element::Audio(a) => a.span,
        }
    }

    pub fn span_mut(&mut self) -> &mut TimeSpan {
        match self {
            Element::Text(t) => &mut t.span,
            Element::Media(m) => &mut m.span,
            Element::Audio(a) => &mut a.span,
        }
    }

    pub fn start_time(&self) -> f64 {
        self.span().start_time()
    }

    pub fn end_time(&self) -> f64 {
        self.span().end_time()
    }

    pub fn duration(&self) -> f64 {
        self.span().duration()
    }
}

impl From<TextElement> for Element {
    fn from(value: TextElement) -> Self {
        Element::Text(value)
    }
}

impl From<MediaElement> for Element {
    fn from(value: MediaElement) -> Self {
        Element::Media(value)
    }
}

impl From<AudioElement> for Element {
    fn from(value: AudioElement) -> Self {
        Element::Audio(value)
    }
}
