//! Integration tests for clock, driver and player bridge working together.

use cueline_playback::{ClockConfig, FramePlayer, PlaybackConfig, PlaybackSession};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Player that only moves when seeked or told to by the test.
#[derive(Debug, Default)]
struct ScriptedPlayer {
    frame: u64,
    playing: bool,
    seeks: usize,
}

impl FramePlayer for ScriptedPlayer {
    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek_to(&mut self, frame: u64) {
        self.frame = frame;
        self.seeks += 1;
    }

    fn current_frame(&self) -> u64 {
        self.frame
    }
}

fn session() -> PlaybackSession {
    PlaybackSession::new(ClockConfig::default(), PlaybackConfig::default())
}

#[tokio::test(start_paused = true)]
async fn playback_near_end_clamps_to_duration() {
    let mut session = session();
    session.seek(9.99);
    session.play().unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    let state = session.clock().state();
    assert_eq!(state.current_time, state.duration);
    assert!(!state.is_playing);
}

#[tokio::test(start_paused = true)]
async fn playing_again_at_end_stops_immediately() {
    let mut session = session();
    session.seek(10.0);
    session.play().unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let state = session.clock().state();
    assert_eq!(state.current_time, 10.0);
    assert!(!state.is_playing);
}

#[tokio::test(start_paused = true)]
async fn player_follows_scrub_and_playback() {
    let mut session = session();
    let player = Arc::new(Mutex::new(ScriptedPlayer::default()));
    session.attach_player(Arc::clone(&player)).unwrap();

    session.seek(5.0);
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(player.lock().frame, 150);

    session.play().unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    {
        let player = player.lock();
        assert!(player.playing);
        assert!(player.seeks > 1);
    }
    let time = session.clock().state().current_time;
    assert!(time > 5.0 && time < 6.0, "{time}");

    session.pause();
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert!(!player.lock().playing);
    session.shutdown();
}

#[tokio::test(start_paused = true)]
async fn zoom_changes_reach_subscribers() {
    let session = session();
    let mut rx = session.clock().subscribe();

    session.clock().set_timeline_width(480.0);
    session.clock().zoom_in();
    rx.changed().await.unwrap();

    let state = *rx.borrow_and_update();
    assert_eq!(state.zoom, 1.2);
    assert_eq!(state.pixels_per_second, 24.0);
    assert!((state.viewport_end_time - 20.0).abs() < 1e-9);
}
