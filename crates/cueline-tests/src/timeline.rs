//! Integration tests for the element model and editor.
//!
//! Exercises cross-crate interactions between cueline-core,
//! cueline-timeline, cueline-playback and cueline-ui.

use cueline_core::{span_to_pixels, Rect};
use cueline_playback::{SharedClock, TimelineClock};
use cueline_timeline::{
    lanes, AudioElement, AudioPatch, ElementFactory, ElementId, ElementKind, ElementPatch,
    ElementStore, Fade, Lane, MediaElement, MediaKind, ProjectSnapshot, SpanPatch, StaticProber,
    TimeSpan, UploadedFile,
};
use cueline_ui::{DragConfig, DragMode, Editor, FocusTarget, KeyPress};
use egui::Key;

// ── Helpers ────────────────────────────────────────────────────

fn audio(start: f64, end: f64) -> AudioElement {
    AudioElement {
        id: ElementId::new(),
        span: TimeSpan::new(start, end),
        source: "media/music.mp3".into(),
        file_name: "music.mp3".into(),
        volume: 1.0,
        speed: 1.0,
        start_from: None,
    }
}

fn image(start: f64, end: f64) -> MediaElement {
    MediaElement {
        id: ElementId::new(),
        kind: MediaKind::Image,
        span: TimeSpan::new(start, end),
        source: "media/logo.png".into(),
        file_name: "logo.png".into(),
        frame: Rect::new(0.0, 0.0, 1920.0, 1080.0),
        rotation: 0.0,
        opacity: 1.0,
        fade_in: Fade::default(),
        fade_out: Fade::default(),
        volume: 1.0,
        speed: 1.0,
    }
}

fn editor() -> Editor {
    Editor::new(
        SharedClock::new(TimelineClock::default()),
        ElementFactory::default(),
        DragConfig::default(),
    )
}

// ── Store contract ─────────────────────────────────────────────

#[test]
fn delete_removes_exactly_one_id() {
    let mut store = ElementStore::new();
    let a = store.add(audio(0.0, 2.0));
    let b = store.add(audio(1.0, 3.0));
    let c = store.add(audio(2.0, 4.0));

    assert!(store.delete(ElementKind::Audio, b));
    let ids: Vec<_> = store.audios().iter().map(|x| x.id).collect();
    assert_eq!(ids, vec![a, c]);

    assert!(!store.delete(ElementKind::Audio, ElementId::new()));
    assert_eq!(store.audios().len(), 2);
}

#[test]
fn overlapping_elements_are_kept_in_insertion_order() {
    let mut store = ElementStore::new();
    let first = store.add(audio(0.0, 5.0));
    let second = store.add(audio(2.0, 4.0));

    let views = lanes(&store);
    let audio_lane = views.iter().find(|v| v.lane == Lane::Audio).unwrap();
    let ids: Vec<_> = audio_lane.entries.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![first, second]);
    assert!(audio_lane.entries[0].span.overlaps(&audio_lane.entries[1].span));
}

#[test]
fn patches_cannot_break_time_invariants() {
    let mut store = ElementStore::new();
    let id = store.add(audio(2.0, 5.0));

    let patch = ElementPatch::Audio(AudioPatch {
        span: SpanPatch::range(-3.0, -4.0),
        ..Default::default()
    });
    assert!(store.update(id, &patch));
    let span = store.span_of(id).unwrap();
    assert_eq!(span.start_time(), 0.0);
    assert_eq!(span.end_time(), 0.0);

    // A text patch on an audio element changes nothing.
    let wrong = ElementPatch::Text(Default::default());
    assert!(!store.update(id, &wrong));
}

#[test]
fn element_pixels_at_default_zoom() {
    let clock = TimelineClock::default();
    let span = TimeSpan::new(2.0, 5.0);
    let px = span_to_pixels(span.start_time(), span.end_time(), clock.pixels_per_second());
    assert_eq!(px, (40.0, 100.0));
}

// ── Editor flows ───────────────────────────────────────────────

#[tokio::test]
async fn imported_media_lands_on_its_lane() {
    let mut ed = editor();
    let prober = StaticProber::new().with_duration("intro.mp4", 4.0);

    let video = ed
        .import_upload(&prober, &UploadedFile::new("intro.mp4", "media/intro.mp4"), 0.0)
        .await
        .unwrap();
    let still = ed
        .import_upload(&prober, &UploadedFile::new("logo.png", "media/logo.png"), 4.0)
        .await
        .unwrap();

    assert_eq!(ed.store().kind_of(video), Some(ElementKind::Video));
    assert_eq!(ed.store().kind_of(still), Some(ElementKind::Image));
    let views = lanes(ed.store());
    let media = views.iter().find(|v| v.lane == Lane::Media).unwrap();
    assert_eq!(media.entries.len(), 2);
    assert_eq!(ed.store().duration(), 9.0);
    // The clock never gets shorter than its initial ten seconds.
    assert_eq!(ed.clock().state().duration, 10.0);
}

#[test]
fn keyboard_delete_follows_selection_kind() {
    let mut ed = editor();
    let text = ed.add_text("title");
    let img = ed.add_element(image(0.0, 3.0));
    let track = ed.add_element(audio(0.0, 8.0));

    ed.select(ElementKind::Image, img);
    let press = KeyPress::new(Key::Backspace, FocusTarget::None);
    assert_eq!(ed.handle_key(&press), Some(img));

    assert!(ed.store().media().is_empty());
    assert_eq!(ed.store().texts()[0].id, text);
    assert_eq!(ed.store().audios()[0].id, track);
    assert_eq!(ed.selection().selected_track(), None);
    assert_eq!(ed.selection().selected_track_id(), None);
}

#[test]
fn resize_start_respects_minimum_duration() {
    let mut ed = editor();
    let id = ed.add_element(audio(1.0, 2.0));
    assert!(ed.begin_time_drag(id, DragMode::ResizeStart, 20.0));
    let span = ed.time_drag_to(400.0).unwrap();
    assert!((span.duration() - 0.1).abs() < 1e-9);
    assert_eq!(span.end_time(), 2.0);
    ed.end_time_drag();
}

#[test]
fn snapshot_survives_json() {
    let mut ed = editor();
    ed.add_text("hello");
    ed.add_element(audio(3.0, 12.0));

    let bytes = ed.snapshot().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["audios"][0]["endTime"], 12.0);

    let snap = ProjectSnapshot::from_json(&bytes).unwrap();
    assert_eq!(snap.restore(), *ed.store());
}
