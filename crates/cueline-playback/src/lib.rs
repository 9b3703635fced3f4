//! Cueline Playback - Timeline clock and player synchronization
//!
//! Owns the authoritative notion of "current time":
//! - The timeline clock (current time, zoom, viewport)
//! - A shared handle that publishes every clock change
//! - The playback driver advancing time while playing
//! - The bridge keeping an external frame player in step with the clock

pub mod bridge;
pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod session;

pub use bridge::{BridgeHandle, FramePlayer, PlayerBridge};
pub use clock::{ClockConfig, ClockState, SharedClock, TimelineClock};
pub use config::{PlaybackConfig, MAX_INTERVAL_MS};
pub use driver::PlaybackDriver;
pub use error::{PlaybackError, PlaybackResult};
pub use session::PlaybackSession;
