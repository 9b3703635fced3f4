//! The timeline clock: current time, zoom and the visible viewport.
//!
//! All inputs are clamped into range; nothing here returns an error.

use cueline_core::time_to_pixels;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Zoom bounds, density and duration defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Timeline pixels per second at zoom 1.0.
    pub base_pixels_per_second: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Factor applied by `zoom_in` / `zoom_out`.
    pub zoom_step: f64,
    /// Below this zoom, values are rounded to hundredths instead of tenths.
    pub fine_zoom_threshold: f64,
    /// Duration of a fresh session in seconds.
    pub initial_duration: f64,
    /// Shortest allowed duration in seconds.
    pub min_duration: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            base_pixels_per_second: 20.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
            zoom_step: 1.2,
            fine_zoom_threshold: 1.0,
            initial_duration: 10.0,
            min_duration: 1.0,
        }
    }
}

/// Copyable snapshot of the clock, published on every change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockState {
    pub current_time: f64,
    pub duration: f64,
    pub zoom: f64,
    pub is_playing: bool,
    pub pixels_per_second: f64,
    pub timeline_width: f64,
    pub viewport_start_time: f64,
    pub viewport_end_time: f64,
}

/// State machine for playback position, zoom and visible time window.
///
/// After any change to width, zoom or scroll offset,
/// `viewport_end_time - viewport_start_time == timeline_width / pixels_per_second`.
#[derive(Debug, Clone)]
pub struct TimelineClock {
    config: ClockConfig,
    current_time: f64,
    duration: f64,
    zoom: f64,
    is_playing: bool,
    pixels_per_second: f64,
    timeline_width: f64,
    viewport_start_time: f64,
    viewport_end_time: f64,
}

fn sanitize_px(px: f64) -> f64 {
    if px.is_finite() && px > 0.0 {
        px
    } else {
        0.0
    }
}

impl TimelineClock {
    pub fn new(config: ClockConfig) -> Self {
        let duration = config.initial_duration.max(config.min_duration);
        let mut clock = Self {
            zoom: 1.0_f64.clamp(config.min_zoom, config.max_zoom),
            config,
            current_time: 0.0,
            duration,
            is_playing: false,
            pixels_per_second: 0.0,
            timeline_width: 0.0,
            viewport_start_time: 0.0,
            viewport_end_time: 0.0,
        };
        clock.update_viewport();
        clock
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    // ── Time ───────────────────────────────────────────────────

    /// Move the playhead, clamped to `[0, duration]`. NaN maps to 0.
    pub fn set_current_time(&mut self, time: f64) {
        let time = if time.is_nan() { 0.0 } else { time };
        self.current_time = time.clamp(0.0, self.duration);
    }

    /// Set the total length, clamped to at least the minimum duration.
    /// The playhead is pulled back inside the new range.
    pub fn set_duration(&mut self, duration: f64) {
        let duration = if duration.is_finite() {
            duration
        } else {
            self.config.min_duration
        };
        self.duration = duration.max(self.config.min_duration);
        self.current_time = self.current_time.min(self.duration);
        self.update_viewport();
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    pub fn toggle_playing(&mut self) {
        self.is_playing = !self.is_playing;
    }

    /// Advance the playhead by `delta` seconds while playing.
    ///
    /// Reaching the end clamps to `duration` and stops playback. Returns
    /// whether playback should continue.
    pub fn advance(&mut self, delta: f64) -> bool {
        if !self.is_playing {
            return false;
        }
        let delta = if delta.is_finite() && delta > 0.0 {
            delta
        } else {
            0.0
        };
        let next = self.current_time + delta;
        if next >= self.duration {
            self.current_time = self.duration;
            self.is_playing = false;
            debug!(duration = self.duration, "Reached end of timeline");
            return false;
        }
        self.current_time = next;
        true
    }

    // ── Zoom ───────────────────────────────────────────────────

    /// Set the zoom factor, clamped to the configured bounds.
    ///
    /// Values under the fine threshold round to hundredths, the rest to
    /// tenths. NaN is ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_nan() {
            return;
        }
        let clamped = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        let rounded = if clamped < self.config.fine_zoom_threshold {
            (clamped * 100.0).round() / 100.0
        } else {
            (clamped * 10.0).round() / 10.0
        };
        self.zoom = rounded.clamp(self.config.min_zoom, self.config.max_zoom);
        self.update_viewport();
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / self.config.zoom_step);
    }

    pub fn reset_zoom(&mut self) {
        self.set_zoom(1.0);
    }

    // ── Viewport ───────────────────────────────────────────────

    /// Set the visible timeline width in pixels.
    pub fn set_timeline_width(&mut self, width_px: f64) {
        self.timeline_width = sanitize_px(width_px);
        self.update_viewport();
    }

    /// Recompute density and the end of the visible window from the
    /// current zoom, width and viewport start.
    pub fn update_viewport(&mut self) {
        self.pixels_per_second = self.config.base_pixels_per_second * self.zoom;
        self.viewport_end_time = if self.pixels_per_second > 0.0 {
            self.viewport_start_time + self.timeline_width / self.pixels_per_second
        } else {
            self.viewport_start_time
        };
    }

    /// Derive the viewport from a scrollable container's measurements.
    pub fn set_viewport_from_container(&mut self, scroll_left_px: f64, client_width_px: f64) {
        self.timeline_width = sanitize_px(client_width_px);
        self.pixels_per_second = self.config.base_pixels_per_second * self.zoom;
        self.viewport_start_time = if self.pixels_per_second > 0.0 {
            sanitize_px(scroll_left_px) / self.pixels_per_second
        } else {
            0.0
        };
        self.update_viewport();
    }

    /// Visible `(start, end)` time window.
    pub fn visible_range(&self) -> (f64, f64) {
        (self.viewport_start_time, self.viewport_end_time)
    }

    pub fn is_time_visible(&self, time: f64) -> bool {
        time >= self.viewport_start_time && time <= self.viewport_end_time
    }

    /// Re-pin the viewport so `time` is at its left edge if it is not
    /// already visible. Returns whether the viewport moved.
    pub fn scroll_to_time(&mut self, time: f64) -> bool {
        if time.is_nan() || self.is_time_visible(time) {
            return false;
        }
        self.viewport_start_time = time.clamp(0.0, self.duration);
        self.update_viewport();
        true
    }

    /// Horizontal scroll offset the host container should show.
    pub fn scroll_left_px(&self) -> f64 {
        time_to_pixels(self.viewport_start_time, self.pixels_per_second)
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn pixels_per_second(&self) -> f64 {
        self.pixels_per_second
    }

    pub fn timeline_width(&self) -> f64 {
        self.timeline_width
    }

    pub fn state(&self) -> ClockState {
        ClockState {
            current_time: self.current_time,
            duration: self.duration,
            zoom: self.zoom,
            is_playing: self.is_playing,
            pixels_per_second: self.pixels_per_second,
            timeline_width: self.timeline_width,
            viewport_start_time: self.viewport_start_time,
            viewport_end_time: self.viewport_end_time,
        }
    }
}

impl Default for TimelineClock {
    fn default() -> Self {
        Self::new(ClockConfig::default())
    }
}

// ── Shared handle ──────────────────────────────────────────────

/// Cloneable handle to the session's single clock.
///
/// Every mutation goes through [`SharedClock::update`], which publishes the
/// new [`ClockState`] to subscribers when anything changed.
#[derive(Debug, Clone)]
pub struct SharedClock {
    inner: Arc<Mutex<TimelineClock>>,
    tx: Arc<watch::Sender<ClockState>>,
}

impl SharedClock {
    pub fn new(clock: TimelineClock) -> Self {
        let (tx, _rx) = watch::channel(clock.state());
        Self {
            inner: Arc::new(Mutex::new(clock)),
            tx: Arc::new(tx),
        }
    }

    /// Mutate the clock and publish the resulting state.
    pub fn update<R>(&self, f: impl FnOnce(&mut TimelineClock) -> R) -> R {
        let mut clock = self.inner.lock();
        let out = f(&mut clock);
        let next = clock.state();
        // Published under the clock lock so subscribers never see states
        // out of order.
        self.tx.send_if_modified(|current| {
            if *current != next {
                *current = next;
                true
            } else {
                false
            }
        });
        out
    }

    pub fn read<R>(&self, f: impl FnOnce(&TimelineClock) -> R) -> R {
        f(&self.inner.lock())
    }

    pub fn state(&self) -> ClockState {
        self.inner.lock().state()
    }

    /// Receive every published state change.
    pub fn subscribe(&self) -> watch::Receiver<ClockState> {
        self.tx.subscribe()
    }

    pub fn set_current_time(&self, time: f64) {
        self.update(|c| c.set_current_time(time));
    }

    /// User scrub: stop playback, then move the playhead.
    pub fn seek(&self, time: f64) {
        self.update(|c| {
            c.set_playing(false);
            c.set_current_time(time);
        });
    }

    pub fn set_playing(&self, playing: bool) {
        self.update(|c| c.set_playing(playing));
    }

    pub fn set_duration(&self, duration: f64) {
        self.update(|c| c.set_duration(duration));
    }

    pub fn set_zoom(&self, zoom: f64) {
        self.update(|c| c.set_zoom(zoom));
    }

    pub fn zoom_in(&self) {
        self.update(|c| c.zoom_in());
    }

    pub fn zoom_out(&self) {
        self.update(|c| c.zoom_out());
    }

    pub fn reset_zoom(&self) {
        self.update(|c| c.reset_zoom());
    }

    pub fn set_timeline_width(&self, width_px: f64) {
        self.update(|c| c.set_timeline_width(width_px));
    }

    pub fn set_viewport_from_container(&self, scroll_left_px: f64, client_width_px: f64) {
        self.update(|c| c.set_viewport_from_container(scroll_left_px, client_width_px));
    }
}

impl Default for SharedClock {
    fn default() -> Self {
        Self::new(TimelineClock::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_viewport_invariant(clock: &TimelineClock) {
        let s = clock.state();
        let span = s.viewport_end_time - s.viewport_start_time;
        let expected = s.timeline_width / s.pixels_per_second;
        assert!((span - expected).abs() < 1e-9, "{span} vs {expected}");
    }

    #[test]
    fn test_default_density() {
        let clock = TimelineClock::default();
        assert_eq!(clock.zoom(), 1.0);
        assert_eq!(clock.pixels_per_second(), 20.0);
    }

    #[test]
    fn test_zoom_in_from_one() {
        let mut clock = TimelineClock::default();
        clock.zoom_in();
        assert_eq!(clock.zoom(), 1.2);
        assert_eq!(clock.pixels_per_second(), 24.0);
    }

    #[test]
    fn test_zoom_out_uses_fine_rounding() {
        let mut clock = TimelineClock::default();
        clock.zoom_out();
        // 1 / 1.2 = 0.8333…, below the threshold → hundredths.
        assert_eq!(clock.zoom(), 0.83);
        clock.reset_zoom();
        assert_eq!(clock.zoom(), 1.0);
    }

    #[test]
    fn test_zoom_clamps_to_bounds() {
        let mut clock = TimelineClock::default();
        clock.set_zoom(50.0);
        assert_eq!(clock.zoom(), 10.0);
        clock.set_zoom(0.0001);
        assert_eq!(clock.zoom(), 0.1);
        clock.set_zoom(f64::NAN);
        assert_eq!(clock.zoom(), 0.1);
        for _ in 0..40 {
            clock.zoom_out();
        }
        assert_eq!(clock.zoom(), 0.1);
    }

    #[test]
    fn test_current_time_clamps() {
        let mut clock = TimelineClock::default();
        clock.set_current_time(-4.0);
        assert_eq!(clock.current_time(), 0.0);
        clock.set_current_time(f64::NAN);
        assert_eq!(clock.current_time(), 0.0);
        clock.set_current_time(99.0);
        assert_eq!(clock.current_time(), 10.0);
        clock.set_current_time(f64::INFINITY);
        assert_eq!(clock.current_time(), 10.0);
    }

    #[test]
    fn test_duration_floor_and_playhead_pullback() {
        let mut clock = TimelineClock::default();
        clock.set_current_time(8.0);
        clock.set_duration(0.2);
        assert_eq!(clock.duration(), 1.0);
        assert_eq!(clock.current_time(), 1.0);
        clock.set_duration(f64::NAN);
        assert_eq!(clock.duration(), 1.0);
    }

    #[test]
    fn test_viewport_from_width() {
        let mut clock = TimelineClock::default();
        clock.set_timeline_width(800.0);
        assert_eq!(clock.visible_range(), (0.0, 40.0));
        clock.set_zoom(2.0);
        assert_eq!(clock.visible_range(), (0.0, 20.0));
        assert_viewport_invariant(&clock);
    }

    #[test]
    fn test_viewport_from_container() {
        let mut clock = TimelineClock::default();
        clock.set_viewport_from_container(200.0, 400.0);
        assert_eq!(clock.visible_range(), (10.0, 30.0));
        assert_eq!(clock.scroll_left_px(), 200.0);
        // Zoom keeps the scroll anchor in time units.
        clock.set_zoom(2.0);
        assert_eq!(clock.visible_range(), (10.0, 20.0));
        assert_viewport_invariant(&clock);
    }

    #[test]
    fn test_scroll_to_time_follows_playhead() {
        let mut clock = TimelineClock::default();
        clock.set_duration(120.0);
        clock.set_timeline_width(400.0);
        assert!(!clock.scroll_to_time(5.0));
        assert!(clock.scroll_to_time(45.0));
        assert_eq!(clock.visible_range(), (45.0, 65.0));
        assert_viewport_invariant(&clock);
    }

    #[test]
    fn test_advance_clamps_at_end() {
        let mut clock = TimelineClock::default();
        clock.set_current_time(9.99);
        clock.set_playing(true);
        assert!(!clock.advance(0.5));
        assert_eq!(clock.current_time(), 10.0);
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_advance_when_stopped_does_nothing() {
        let mut clock = TimelineClock::default();
        clock.set_current_time(2.0);
        assert!(!clock.advance(1.0));
        assert_eq!(clock.current_time(), 2.0);
    }

    #[test]
    fn test_shared_clock_publishes_only_changes() {
        let shared = SharedClock::default();
        let mut rx = shared.subscribe();
        assert!(!rx.has_changed().unwrap());

        shared.set_current_time(3.0);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().current_time, 3.0);

        shared.set_current_time(3.0);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_seek_stops_playback() {
        let shared = SharedClock::default();
        shared.set_playing(true);
        shared.seek(4.0);
        let s = shared.state();
        assert!(!s.is_playing);
        assert_eq!(s.current_time, 4.0);
    }

    proptest! {
        #[test]
        fn prop_zoom_always_in_bounds(z in proptest::num::f64::ANY) {
            let mut clock = TimelineClock::default();
            clock.set_zoom(z);
            let zoom = clock.zoom();
            prop_assert!((0.1..=10.0).contains(&zoom));
            prop_assert_eq!(clock.pixels_per_second(), 20.0 * zoom);
        }

        #[test]
        fn prop_current_time_never_negative(t in proptest::num::f64::ANY) {
            let mut clock = TimelineClock::default();
            clock.set_current_time(t);
            prop_assert!(clock.current_time() >= 0.0);
            prop_assert!(clock.current_time() <= clock.duration());
        }

        #[test]
        fn prop_viewport_invariant(
            width in 0.0f64..5000.0,
            zoom in 0.1f64..10.0,
            scroll in 0.0f64..10_000.0,
        ) {
            let mut clock = TimelineClock::default();
            clock.set_viewport_from_container(scroll, width);
            clock.set_zoom(zoom);
            let s = clock.state();
            let span = s.viewport_end_time - s.viewport_start_time;
            prop_assert!((span - width / s.pixels_per_second).abs() < 1e-6);
        }
    }
}
