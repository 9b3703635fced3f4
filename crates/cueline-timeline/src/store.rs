//! The element store: sole owner of the timed element lists.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::element::{
    AudioElement, Element, ElementId, ElementKind, MediaElement, MediaKind, TextElement, TimeSpan,
};
use crate::patch::ElementPatch;

/// Ordered element lists per track, plus the project duration.
///
/// Insertion order is list order. Overlapping spans on the same track are
/// allowed; the store never rejects or resolves overlaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementStore {
    texts: Vec<TextElement>,
    media: Vec<MediaElement>,
    audios: Vec<AudioElement>,
    /// Total project length in seconds. Grows to cover every added element;
    /// deletions do not shrink it.
    duration: f64,
}

impl ElementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element to its kind's list, extending the project
    /// duration to at least the element's end time.
    pub fn add(&mut self, element: impl Into<Element>) -> ElementId {
        let element = element.into();
        let id = element.id();
        let end = element.end_time();
        debug!(%id, kind = %element.kind(), end, "Adding element");
        match element {
            Element::Text(t) => self.texts.push(t),
            Element::Media(m) => self.media.push(m),
            Element::Audio(a) => self.audios.push(a),
        }
        self.duration = self.duration.max(end);
        id
    }

    /// Apply a partial patch to the element with `id`.
    ///
    /// Returns `false` if no element has that id or the patch targets a
    /// different kind. A patch that moves an element's end past the project
    /// duration extends the duration.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let applied = self.with_element_mut(id, |el| patch.apply(el));
        match applied {
            Some(true) => {
                if let Some(span) = self.span_of(id) {
                    self.duration = self.duration.max(span.end_time());
                }
                true
            }
            Some(false) => {
                debug!(%id, "Patch kind does not match element");
                false
            }
            None => false,
        }
    }

    /// Remove a text element. Returns `false` if the id is unknown.
    pub fn delete_text(&mut self, id: ElementId) -> bool {
        remove_by_id(&mut self.texts, id, |t| t.id)
    }

    /// Remove a video or image element. Returns `false` if the id is unknown.
    pub fn delete_media(&mut self, id: ElementId) -> bool {
        remove_by_id(&mut self.media, id, |m| m.id)
    }

    /// Remove an audio element. Returns `false` if the id is unknown.
    pub fn delete_audio(&mut self, id: ElementId) -> bool {
        remove_by_id(&mut self.audios, id, |a| a.id)
    }

    /// Remove `id` from the list matching `kind`. Other lists are untouched.
    pub fn delete(&mut self, kind: ElementKind, id: ElementId) -> bool {
        let removed = match kind {
            ElementKind::Text => self.delete_text(id),
            ElementKind::Video | ElementKind::Image => self.delete_media(id),
            ElementKind::Audio => self.delete_audio(id),
        };
        if removed {
            debug!(%id, %kind, "Deleted element");
        }
        removed
    }

    /// Find an element by id in any list and return an owned copy.
    pub fn get(&self, id: ElementId) -> Option<Element> {
        if let Some(t) = self.text(id) {
            return Some(Element::Text(t.clone()));
        }
        if let Some(m) = self.media_element(id) {
            return Some(Element::Media(m.clone()));
        }
        self.audio(id).map(|a| Element::Audio(a.clone()))
    }

    pub fn text(&self, id: ElementId) -> Option<&TextElement> {
        self.texts.iter().find(|t| t.id == id)
    }

    pub fn media_element(&self, id: ElementId) -> Option<&MediaElement> {
        self.media.iter().find(|m| m.id == id)
    }

    pub fn audio(&self, id: ElementId) -> Option<&AudioElement> {
        self.audios.iter().find(|a| a.id == id)
    }

    /// Kind of the element with `id`, if present.
    pub fn kind_of(&self, id: ElementId) -> Option<ElementKind> {
        self.iter_spans()
            .find(|(_, eid, _)| *eid == id)
            .map(|(kind, _, _)| kind)
    }

    /// Time span of the element with `id`, if present.
    pub fn span_of(&self, id: ElementId) -> Option<TimeSpan> {
        self.iter_spans()
            .find(|(_, eid, _)| *eid == id)
            .map(|(_, _, span)| span)
    }

    pub fn texts(&self) -> &[TextElement] {
        &self.texts
    }

    pub fn media(&self) -> &[MediaElement] {
        &self.media
    }

    pub fn audios(&self) -> &[AudioElement] {
        &self.audios
    }

    /// Every element's kind, id and span: text, then media, then audio.
    pub fn iter_spans(&self) -> impl Iterator<Item = (ElementKind, ElementId, TimeSpan)> + '_ {
        let texts = self.texts.iter().map(|t| (ElementKind::Text, t.id, t.span));
        let media = self.media.iter().map(|m| {
            let kind = match m.kind {
                MediaKind::Video => ElementKind::Video,
                MediaKind::Image => ElementKind::Image,
            };
            (kind, m.id, m.span)
        });
        let audios = self.audios.iter().map(|a| (ElementKind::Audio, a.id, a.span));
        texts.chain(media).chain(audios)
    }

    /// Project duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Override the project duration. Never shrinks below the furthest
    /// element end.
    pub fn set_duration(&mut self, duration: f64) {
        let duration = if duration.is_finite() { duration } else { 0.0 };
        self.duration = duration.max(self.content_end());
    }

    /// Latest end time across all elements (0 when empty).
    pub fn content_end(&self) -> f64 {
        self.iter_spans()
            .map(|(_, _, span)| span.end_time())
            .fold(0.0, f64::max)
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.texts.len() + self.media.len() + self.audios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every element and reset the duration.
    pub fn clear(&mut self) {
        self.texts.clear();
        self.media.clear();
        self.audios.clear();
        self.duration = 0.0;
    }

    fn with_element_mut<R>(&mut self, id: ElementId, f: impl FnOnce(&mut Element) -> R) -> Option<R> {
        // Elements live in typed lists; wrap the hit in an `Element`, patch it,
        // and write it back only if it is still the same kind.
        if let Some(slot) = self.texts.iter_mut().find(|t| t.id == id) {
            let mut el = Element::Text(slot.clone());
            let out = f(&mut el);
            if let Element::Text(t) = el {
                *slot = t;
            }
            return Some(out);
        }
        if let Some(slot) = self.media.iter_mut().find(|m| m.id == id) {
            let mut el = Element::Media(slot.clone());
            let out = f(&mut el);
            if let Element::Media(m) = el {
                *slot = m;
            }
            return Some(out);
        }
        if let Some(slot) = self.audios.iter_mut().find(|a| a.id == id) {
            let mut el = Element::Audio(slot.clone());
            let out = f(&mut el);
            if let Element::Audio(a) = el {
                *slot = a;
            }
            return Some(out);
        }
        None
    }
}

fn remove_by_id<T>(list: &mut Vec<T>, id: ElementId, id_of: impl Fn(&T) -> ElementId) -> bool {
    match list.iter().position(|item| id_of(item) == id) {
        Some(index) => {
            list.remove(index);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Fade, TextStyle};
    use crate::patch::{SpanPatch, TextPatch};
    use cueline_core::Rect;

    fn text(start: f64, end: f64) -> TextElement {
        TextElement {
            id: ElementId::new(),
            span: TimeSpan::new(start, end),
            text: "Title".into(),
            style: TextStyle::default(),
            position_x: 960.0,
            position_y: 540.0,
            width: 600.0,
        }
    }

    fn video(start: f64, end: f64) -> MediaElement {
        MediaElement {
            id: ElementId::new(),
            kind: MediaKind::Video,
            span: TimeSpan::new(start, end),
            source: "clip.mp4".into(),
            file_name: "clip.mp4".into(),
            frame: Rect::new(0.0, 0.0, 1920.0, 1080.0),
            rotation: 0.0,
            opacity: 1.0,
            fade_in: Fade::default(),
            fade_out: Fade::default(),
            volume: 1.0,
            speed: 1.0,
        }
    }

    fn audio(start: f64, end: f64) -> AudioElement {
        AudioElement {
            id: ElementId::new(),
            span: TimeSpan::new(start, end),
            source: "music.mp3".into(),
            file_name: "music.mp3".into(),
            volume: 1.0,
            speed: 1.0,
            start_from: None,
        }
    }

    #[test]
    fn test_add_extends_duration() {
        let mut store = ElementStore::new();
        store.add(text(0.0, 3.0));
        assert_eq!(store.duration(), 3.0);
        store.add(video(2.0, 12.5));
        assert_eq!(store.duration(), 12.5);
        store.add(audio(0.0, 4.0));
        assert_eq!(store.duration(), 12.5);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_insertion_order_is_list_order() {
        let mut store = ElementStore::new();
        let a = store.add(text(5.0, 6.0));
        let b = store.add(text(0.0, 1.0));
        let ids: Vec<_> = store.texts().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_delete_removes_only_that_id() {
        let mut store = ElementStore::new();
        let t1 = store.add(text(0.0, 1.0));
        let t2 = store.add(text(1.0, 2.0));
        let v = store.add(video(0.0, 5.0));
        let a = store.add(audio(0.0, 5.0));

        assert!(store.delete(ElementKind::Text, t1));
        assert_eq!(store.texts().len(), 1);
        assert_eq!(store.texts()[0].id, t2);
        assert_eq!(store.media()[0].id, v);
        assert_eq!(store.audios()[0].id, a);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut store = ElementStore::new();
        store.add(text(0.0, 1.0));
        let before = store.clone();
        assert!(!store.delete(ElementKind::Text, ElementId::new()));
        assert!(!store.delete(ElementKind::Audio, ElementId::new()));
        assert_eq!(store, before);
    }

    #[test]
    fn test_delete_with_wrong_kind_leaves_element() {
        let mut store = ElementStore::new();
        let v = store.add(video(0.0, 5.0));
        assert!(!store.delete(ElementKind::Audio, v));
        assert_eq!(store.media().len(), 1);
        assert!(store.delete(ElementKind::Video, v));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_patches_in_place() {
        let mut store = ElementStore::new();
        let id = store.add(text(0.0, 2.0));
        assert!(store.update(id, &TextPatch::position(100.0, 200.0).into()));
        let t = store.text(id).unwrap();
        assert_eq!((t.position_x, t.position_y), (100.0, 200.0));
        assert_eq!(t.text, "Title");
    }

    #[test]
    fn test_update_span_extends_duration() {
        let mut store = ElementStore::new();
        let id = store.add(audio(0.0, 2.0));
        assert!(store.update(id, &SpanPatch::range(1.0, 20.0).into()));
        assert_eq!(store.span_of(id).unwrap().duration(), 19.0);
        assert_eq!(store.duration(), 20.0);
    }

    #[test]
    fn test_update_unknown_or_mismatched() {
        let mut store = ElementStore::new();
        let id = store.add(audio(0.0, 2.0));
        assert!(!store.update(ElementId::new(), &SpanPatch::range(0.0, 1.0).into()));
        assert!(!store.update(id, &TextPatch::position(1.0, 1.0).into()));
    }

    #[test]
    fn test_overlapping_elements_are_kept() {
        let mut store = ElementStore::new();
        store.add(video(0.0, 5.0));
        store.add(video(2.0, 6.0));
        assert_eq!(store.media().len(), 2);
        assert!(store.media()[0].span.overlaps(&store.media()[1].span));
    }

    #[test]
    fn test_set_duration_never_below_content() {
        let mut store = ElementStore::new();
        store.add(video(0.0, 8.0));
        store.set_duration(3.0);
        assert_eq!(store.duration(), 8.0);
        store.set_duration(30.0);
        assert_eq!(store.duration(), 30.0);
    }

    #[test]
    fn test_kind_lookup() {
        let mut store = ElementStore::new();
        let t = store.add(text(0.0, 1.0));
        let a = store.add(audio(0.0, 1.0));
        assert_eq!(store.kind_of(t), Some(ElementKind::Text));
        assert_eq!(store.kind_of(a), Some(ElementKind::Audio));
        assert_eq!(store.kind_of(ElementId::new()), None);
        assert!(matches!(store.get(a), Some(Element::Audio(_))));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_delete_removes_exactly_one(
                layout in prop::collection::vec((0u8..3, 0.0f64..60.0, 0.1f64..10.0), 1..12),
                pick in any::<prop::sample::Index>(),
            ) {
                let mut store = ElementStore::new();
                let ids: Vec<ElementId> = layout
                    .iter()
                    .map(|&(kind, start, len)| match kind {
                        0 => store.add(text(start, start + len)),
                        1 => store.add(video(start, start + len)),
                        _ => store.add(audio(start, start + len)),
                    })
                    .collect();

                let target = ids[pick.index(ids.len())];
                let kind = store.kind_of(target).unwrap();
                prop_assert!(store.delete(kind, target));
                prop_assert_eq!(store.len(), ids.len() - 1);
                prop_assert!(store.get(target).is_none());
                for id in ids.iter().filter(|id| **id != target) {
                    prop_assert!(store.get(*id).is_some());
                }
            }
        }
    }
}
