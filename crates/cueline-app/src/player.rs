//! Stand-in frame player that advances on wall-clock time.

use cueline_core::FrameRate;
use cueline_playback::FramePlayer;
use std::time::Instant;

/// Plays at its frame rate from wherever it was last seeked.
#[derive(Debug)]
pub struct SimulatedPlayer {
    frame_rate: FrameRate,
    anchor_frame: u64,
    playing_since: Option<Instant>,
}

impl SimulatedPlayer {
    pub fn new(frame_rate: FrameRate) -> Self {
        Self {
            frame_rate,
            anchor_frame: 0,
            playing_since: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing_since.is_some()
    }

    fn frame_at(&self, now: Instant) -> u64 {
        match self.playing_since {
            Some(since) => {
                let elapsed = now.duration_since(since).as_secs_f64();
                self.anchor_frame + self.frame_rate.time_to_frame(elapsed)
            }
            None => self.anchor_frame,
        }
    }
}

impl FramePlayer for SimulatedPlayer {
    fn play(&mut self) {
        if self.playing_since.is_none() {
            self.playing_since = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.anchor_frame = self.frame_at(Instant::now());
        self.playing_since = None;
    }

    fn seek_to(&mut self, frame: u64) {
        self.anchor_frame = frame;
        if self.playing_since.is_some() {
            self.playing_since = Some(Instant::now());
        }
    }

    fn current_frame(&self) -> u64 {
        self.frame_at(Instant::now())
    }
}
