//! Advances the clock in real time while playing.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::clock::SharedClock;
use crate::error::{PlaybackError, PlaybackResult};

/// Owns the single playback loop of a session.
///
/// At most one loop runs at a time. The loop ends by itself once the clock
/// stops playing, whether because the end was reached or because something
/// else (a scrub, a pause) cleared `is_playing`.
#[derive(Debug)]
pub struct PlaybackDriver {
    clock: SharedClock,
    frame_interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl PlaybackDriver {
    pub fn new(clock: SharedClock, frame_interval: Duration) -> Self {
        Self {
            clock,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            task: None,
        }
    }

    /// Start playing from the current time, replacing any running loop.
    pub fn start(&mut self) -> PlaybackResult<()> {
        let handle = Handle::try_current().map_err(|_| PlaybackError::NoRuntime)?;
        self.abort_task();
        self.clock.set_playing(true);

        let clock = self.clock.clone();
        let period = self.frame_interval;
        self.task = Some(handle.spawn(run_loop(clock, period)));
        info!(time = self.clock.state().current_time, "Playback started");
        Ok(())
    }

    /// Stop playing. Calling this while stopped does nothing.
    pub fn stop(&mut self) {
        let was_running = self.abort_task();
        self.clock.set_playing(false);
        if was_running {
            info!(time = self.clock.state().current_time, "Playback stopped");
        }
    }

    /// Whether a loop task is still alive.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().map_or(false, |t| !t.is_finished())
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    fn abort_task(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                let running = !task.is_finished();
                task.abort();
                running
            }
            None => false,
        }
    }
}

impl Drop for PlaybackDriver {
    fn drop(&mut self) {
        self.abort_task();
    }
}

async fn run_loop(clock: SharedClock, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately.
    ticker.tick().await;
    let mut last_tick = Instant::now();

    loop {
        ticker.tick().await;
        let now = Instant::now();
        let delta = now.duration_since(last_tick).as_secs_f64();
        last_tick = now;

        if !clock.update(|c| c.advance(delta)) {
            debug!("Playback loop finished");
            break;
        }
    }
}
