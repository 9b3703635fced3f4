//! Partial-field patches applied to elements by id.
//!
//! Every field is optional; `None` leaves the current value untouched.
//! Time fields go through [`TimeSpan::new`] so a patch can never break
//! the `0 <= start <= end` invariant.

use cueline_core::Rect;

use crate::element::{Element, Fade, TextAlign, TimeSpan};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpanPatch {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

impl SpanPatch {
    /// Patch both boundaries.
    pub fn range(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_time.is_none() && self.end_time.is_none()
    }

    pub fn apply(&self, span: &mut TimeSpan) {
        if self.is_empty() {
            return;
        }
        let start = self.start_time.unwrap_or(span.start_time());
        let end = self.end_time.unwrap_or(span.end_time());
        *span = TimeSpan::new(start, end);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPatch {
    pub span: SpanPatch,
    pub text: Option<String>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub color: Option<String>,
    pub background_color: Option<Option<String>>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub align: Option<TextAlign>,
    pub opacity: Option<f32>,
    pub position_x: Option<f32>,
    pub position_y: Option<f32>,
    pub width: Option<f32>,
}

impl TextPatch {
    /// Patch only the overlay position.
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            position_x: Some(x),
            position_y: Some(y),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaPatch {
    pub span: SpanPatch,
    pub frame: Option<Rect>,
    pub rotation: Option<f32>,
    pub opacity: Option<f32>,
    pub fade_in: Option<Fade>,
    pub fade_out: Option<Fade>,
    pub volume: Option<f32>,
    pub speed: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioPatch {
    pub span: SpanPatch,
    pub volume: Option<f32>,
    pub speed: Option<f32>,
    pub start_from: Option<Option<f64>>,
}

/// A patch targeting one element kind, or only the time span of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementPatch {
    Span(SpanPatch),
    Text(TextPatch),
    Media(MediaPatch),
    Audio(AudioPatch),
}

fn set<T>(slot: &mut T, value: &Option<T>)
where
    T: Clone,
{
    if let Some(v) = value {
        *slot = v.clone();
    }
}

impl ElementPatch {
    /// Apply to `element`. Returns `false` when the patch targets a
    /// different element kind, in which case nothing is changed.
    pub fn apply(&self, element: &mut Element) -> bool {
        match (self, element) {
            (ElementPatch::Span(p), el) => {
                p.apply(el.span_mut());
                true
            }
            (ElementPatch::Text(p), Element::Text(t)) => {
                p.span.apply(&mut t.span);
                set(&mut t.text, &p.text);
                set(&mut t.style.font_size, &p.font_size);
                set(&mut t.style.font_family, &p.font_family);
                set(&mut t.style.color, &p.color);
                set(&mut t.style.background_color, &p.background_color);
                set(&mut t.style.bold, &p.bold);
                set(&mut t.style.italic, &p.italic);
                set(&mut t.style.align, &p.align);
                set(&mut t.style.opacity, &p.opacity);
                set(&mut t.position_x, &p.position_x);
                set(&mut t.position_y, &p.position_y);
                set(&mut t.width, &p.width);
                true
            }
            (ElementPatch::Media(p), Element::Media(m)) => {
                p.span.apply(&mut m.span);
                set(&mut m.frame, &p.frame);
                set(&mut m.rotation, &p.rotation);
                set(&mut m.opacity, &p.opacity);
                set(&mut m.fade_in, &p.fade_in);
                set(&mut m.fade_out, &p.fade_out);
                set(&mut m.volume, &p.volume);
                set(&mut m.speed, &p.speed);
                true
            }
            (ElementPatch::Audio(p), Element::Audio(a)) => {
                p.span.apply(&mut a.span);
                set(&mut a.volume, &p.volume);
                set(&mut a.speed, &p.speed);
                set(&mut a.start_from, &p.start_from);
                true
            }
            _ => false,
        }
    }
}

impl From<SpanPatch> for ElementPatch {
    fn from(value: SpanPatch) -> Self {
        ElementPatch::Span(value)
    }
}

impl From<TextPatch> for ElementPatch {
    fn from(value: TextPatch) -> Self {
        ElementPatch::Text(value)
    }
}

impl From<MediaPatch> for ElementPatch {
    fn from(value: MediaPatch) -> Self {
        ElementPatch::Media(value)
    }
}

impl From<AudioPatch> for ElementPatch {
    fn from(value: AudioPatch) -> Self {
        ElementPatch::Audio(value)
    }
}
