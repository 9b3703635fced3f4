//! Playback timing configuration.

use cueline_core::FrameRate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{PlaybackError, PlaybackResult};

/// Longest accepted tick or poll interval, in milliseconds.
pub const MAX_INTERVAL_MS: f64 = 60_000.0;

/// Tick and poll cadence for the playback driver and player bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Frame rate of the attached frame player.
    pub frame_rate: FrameRate,
    /// Driver tick interval in milliseconds (one animation frame).
    pub frame_interval_ms: f64,
    /// How often the bridge reads the player's frame while playing.
    pub poll_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frame_rate: FrameRate::FPS_30,
            frame_interval_ms: 1000.0 / 60.0,
            poll_interval_ms: 100,
        }
    }
}

impl PlaybackConfig {
    pub fn frame_interval(&self) -> Duration {
        millis(self.frame_interval_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        millis(self.poll_interval_ms as f64)
    }

    /// Reject intervals outside `1..=MAX_INTERVAL_MS`. The interval getters
    /// clamp either way.
    pub fn validate(&self) -> PlaybackResult<()> {
        for (name, value) in [
            ("frame_interval_ms", self.frame_interval_ms),
            ("poll_interval_ms", self.poll_interval_ms as f64),
        ] {
            if !(1.0..=MAX_INTERVAL_MS).contains(&value) {
                return Err(PlaybackError::InvalidConfig(format!(
                    "{name} must be between 1 and {MAX_INTERVAL_MS} ms, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Tokio intervals panic on a zero period, so anything below 1 ms is raised.
fn millis(ms: f64) -> Duration {
    let ms = if ms.is_finite() {
        ms.clamp(1.0, MAX_INTERVAL_MS)
    } else {
        1.0
    };
    Duration::from_secs_f64(ms / 1000.0)
}
