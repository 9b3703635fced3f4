//! Keeps an external frame player in step with the timeline clock.
//!
//! Two directions:
//! - push: clock time and play state changes are forwarded to the player
//!   as `seek_to(frame)`, `play()` and `pause()`. Pausing also seeks, so a
//!   player that ran ahead on its own comes to rest on the clock's frame
//! - pull: while playing, the player's own frame is polled and written back
//!   into the clock, but only when it yields a new time

use cueline_core::{round_millis, FrameRate};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::clock::{ClockState, SharedClock};
use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, PlaybackResult};

/// A frame-based renderer that plays independently of the clock.
pub trait FramePlayer: Send + 'static {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, frame: u64);
    fn current_frame(&self) -> u64;
}

/// Synchronization state between one player and the clock.
pub struct PlayerBridge<P: FramePlayer> {
    player: Arc<Mutex<P>>,
    clock: SharedClock,
    frame_rate: FrameRate,
    poll_interval: Duration,
    /// Clock time of the last pushed state.
    last_pushed_time: Option<f64>,
    last_playing: bool,
    /// Last time written back into the clock by a poll.
    last_propagated: Option<f64>,
    /// Time a poll wrote that has not been pushed back yet.
    pending_echo: Option<f64>,
}

impl<P: FramePlayer> PlayerBridge<P> {
    pub fn new(player: Arc<Mutex<P>>, clock: SharedClock, config: &PlaybackConfig) -> Self {
        Self {
            player,
            clock,
            frame_rate: config.frame_rate,
            poll_interval: config.poll_interval(),
            last_pushed_time: None,
            last_playing: false,
            last_propagated: None,
            pending_echo: None,
        }
    }

    pub fn player(&self) -> &Arc<Mutex<P>> {
        &self.player
    }

    /// Forward a clock state to the player.
    ///
    /// Any change of clock time seeks, even within the same frame. A time
    /// that `poll` just wrote is not sent back.
    pub fn push(&mut self, state: &ClockState) {
        let time = state.current_time;
        let echo = self.pending_echo.take() == Some(time);
        if self.last_pushed_time != Some(time) {
            self.last_pushed_time = Some(time);
            if !echo {
                self.seek_player(time);
            }
        }

        if state.is_playing != self.last_playing {
            self.last_playing = state.is_playing;
            if state.is_playing {
                self.player.lock().play();
            } else {
                let mut player = self.player.lock();
                player.pause();
                let frame = self.frame_rate.time_to_frame(time);
                if player.current_frame() != frame {
                    player.seek_to(frame);
                    debug!(frame, time, "Realigned paused player");
                }
                drop(player);
                self.reset_sentinel();
            }
            debug!(playing = state.is_playing, "Player state changed");
        }
    }

    fn seek_player(&self, time: f64) {
        let frame = self.frame_rate.time_to_frame(time);
        self.player.lock().seek_to(frame);
        debug!(frame, time, "Seeked player");
    }

    /// Read the player's frame and write its time into the clock.
    ///
    /// Returns the propagated time, or `None` when it equals the last one.
    pub fn poll(&mut self) -> Option<f64> {
        let frame = self.player.lock().current_frame();
        let time = round_millis(self.frame_rate.frame_to_time(frame));
        if self.last_propagated == Some(time) {
            return None;
        }
        self.last_propagated = Some(time);
        // The clock change this causes must not bounce back as a seek.
        self.pending_echo = Some(time);
        self.clock.set_current_time(time);
        debug!(frame, time, "Propagated player time");
        Some(time)
    }

    /// Forget the last propagated time so the next poll always writes.
    pub fn reset_sentinel(&mut self) {
        self.last_propagated = None;
    }

    /// Run push and pull on the current tokio runtime.
    pub fn spawn(self) -> PlaybackResult<BridgeHandle> {
        let handle = Handle::try_current().map_err(|_| PlaybackError::NoRuntime)?;
        let rx = self.clock.subscribe();
        info!(fps = %self.frame_rate, "Player bridge attached");
        Ok(BridgeHandle {
            task: handle.spawn(self.run(rx)),
        })
    }

    async fn run(mut self, mut rx: watch::Receiver<ClockState>) {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let initial = *rx.borrow_and_update();
        self.push(&initial);

        loop {
            let playing = self.last_playing;
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = *rx.borrow_and_update();
                    self.push(&state);
                    if !playing && self.last_playing {
                        // First poll comes one full interval after play starts.
                        ticker.reset();
                    }
                }
                _ = ticker.tick(), if playing => {
                    self.poll();
                }
            }
        }
        debug!("Player bridge finished");
    }
}

/// Handle to a spawned bridge. Dropping it stops synchronization.
#[derive(Debug)]
pub struct BridgeHandle {
    task: JoinHandle<()>,
}

impl BridgeHandle {
    pub fn shutdown(&self) {
        self.task.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for BridgeHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
