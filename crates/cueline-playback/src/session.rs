//! One editing session's playback machinery behind a single handle.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use crate::bridge::{BridgeHandle, FramePlayer, PlayerBridge};
use crate::clock::{ClockConfig, SharedClock, TimelineClock};
use crate::config::PlaybackConfig;
use crate::driver::PlaybackDriver;
use crate::error::PlaybackResult;

/// Clock, driver and optional player bridge of one session.
///
/// Dropping the session aborts every task it started.
#[derive(Debug)]
pub struct PlaybackSession {
    clock: SharedClock,
    driver: PlaybackDriver,
    bridge: Option<BridgeHandle>,
    config: PlaybackConfig,
}

impl PlaybackSession {
    pub fn new(clock_config: ClockConfig, config: PlaybackConfig) -> Self {
        Self::with_clock(SharedClock::new(TimelineClock::new(clock_config)), config)
    }

    /// Build a session around an existing clock handle.
    pub fn with_clock(clock: SharedClock, config: PlaybackConfig) -> Self {
        let driver = PlaybackDriver::new(clock.clone(), config.frame_interval());
        Self {
            clock,
            driver,
            bridge: None,
            config,
        }
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Connect a frame player, replacing any previous one.
    pub fn attach_player<P: FramePlayer>(&mut self, player: Arc<Mutex<P>>) -> PlaybackResult<()> {
        let bridge = PlayerBridge::new(player, self.clock.clone(), &self.config);
        self.bridge = Some(bridge.spawn()?);
        Ok(())
    }

    pub fn detach_player(&mut self) {
        if let Some(bridge) = self.bridge.take() {
            bridge.shutdown();
            debug!("Player bridge detached");
        }
    }

    pub fn has_player(&self) -> bool {
        self.bridge.is_some()
    }

    pub fn play(&mut self) -> PlaybackResult<()> {
        self.driver.start()
    }

    pub fn pause(&mut self) {
        self.driver.stop();
    }

    pub fn toggle(&mut self) -> PlaybackResult<()> {
        if self.is_playing() {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Scrub to `time`. Interrupts playback.
    pub fn seek(&mut self, time: f64) {
        self.driver.stop();
        self.clock.seek(time);
    }

    pub fn is_playing(&self) -> bool {
        self.clock.state().is_playing
    }

    /// Stop playback and detach the player.
    pub fn shutdown(&mut self) {
        self.driver.stop();
        self.detach_player();
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new(ClockConfig::default(), PlaybackConfig::default())
    }
}
