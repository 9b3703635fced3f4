//! Time ↔ pixel conversion for the timeline.
//!
//! Both directions round to three decimal places so that repeated
//! conversions while dragging do not accumulate floating point drift.

/// Round to three decimal places.
#[inline]
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[inline]
fn valid_density(pixels_per_second: f64) -> bool {
    pixels_per_second.is_finite() && pixels_per_second > 0.0
}

/// Horizontal pixel offset of `seconds` at the given density.
pub fn time_to_pixels(seconds: f64, pixels_per_second: f64) -> f64 {
    if !valid_density(pixels_per_second) || !seconds.is_finite() {
        return 0.0;
    }
    round3(seconds * pixels_per_second)
}

/// Time in seconds at horizontal pixel offset `pixels`.
pub fn pixels_to_time(pixels: f64, pixels_per_second: f64) -> f64 {
    if !valid_density(pixels_per_second) || !pixels.is_finite() {
        return 0.0;
    }
    round3(pixels / pixels_per_second)
}

/// Time under a pointer at `offset_px`, clamped into `[0, duration]`.
pub fn time_at_offset(offset_px: f64, pixels_per_second: f64, duration: f64) -> f64 {
    pixels_to_time(offset_px, pixels_per_second).clamp(0.0, duration.max(0.0))
}

/// Pixel span `(left, right)` of the time range `[start, end]`.
pub fn span_to_pixels(start: f64, end: f64, pixels_per_second: f64) -> (f64, f64) {
    (
        time_to_pixels(start, pixels_per_second),
        time_to_pixels(end, pixels_per_second),
    )
}
