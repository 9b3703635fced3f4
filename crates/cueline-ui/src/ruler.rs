//! Click-to-seek on the time ruler.

use cueline_core::time_at_offset;
use cueline_playback::{ClockState, SharedClock};
use egui::{Pos2, Rect};
use tracing::debug;

/// Pointer x offset from the left edge of the ruler's on-screen rect.
pub fn ruler_offset(ruler: Rect, pointer: Pos2) -> f64 {
    f64::from(pointer.x - ruler.left())
}

/// Time under a pointer `offset_px` from the visible ruler's left edge,
/// accounting for the viewport's scroll position.
pub fn time_at_ruler_offset(state: &ClockState, offset_px: f64) -> f64 {
    let scroll_px = state.viewport_start_time * state.pixels_per_second;
    time_at_offset(offset_px + scroll_px, state.pixels_per_second, state.duration)
}

/// Seek to the time under the pointer. Scrubbing stops playback.
///
/// Returns the time that was seeked to.
pub fn seek_from_ruler(clock: &SharedClock, offset_px: f64) -> f64 {
    let time = clock.update(|c| {
        let time = time_at_ruler_offset(&c.state(), offset_px);
        c.set_playing(false);
        c.set_current_time(time);
        c.current_time()
    });
    debug!(offset_px, time, "Ruler seek");
    time
}
