//! Cueline - headless timeline session
//!
//! Imports media files onto the timeline, plays the result against a
//! simulated frame player and optionally writes a project snapshot.
//!
//! Usage: `cueline [--config PATH] [--play SECONDS] [--snapshot PATH] [FILES...]`

mod config;
mod player;

use anyhow::{bail, Context, Result};
use cueline_core::format_clock;
use cueline_playback::{FramePlayer, PlaybackSession};
use cueline_timeline::{ElementFactory, FfprobeProber, UploadedFile};
use cueline_ui::Editor;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use player::SimulatedPlayer;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    play_seconds: f64,
    snapshot: Option<PathBuf>,
    files: Vec<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args {
        play_seconds: 3.0,
        ..Default::default()
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--play" => {
                let secs = args.next().context("--play needs a number of seconds")?;
                parsed.play_seconds = secs
                    .parse()
                    .with_context(|| format!("Invalid --play value: {secs}"))?;
            }
            "--snapshot" => {
                let path = args.next().context("--snapshot needs a path")?;
                parsed.snapshot = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => bail!("Unknown flag: {flag}"),
            file => parsed.files.push(PathBuf::from(file)),
        }
    }
    Ok(parsed)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = AppConfig::load(args.config.as_deref())?;
    info!("Cueline starting...");

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    runtime.block_on(run(config, args))
}

async fn run(config: AppConfig, args: Args) -> Result<()> {
    let mut session = PlaybackSession::new(config.clock.clone(), config.playback.clone());
    let player = Arc::new(Mutex::new(SimulatedPlayer::new(config.playback.frame_rate)));
    session.attach_player(Arc::clone(&player))?;

    let prober = FfprobeProber::new(config.factory.ffprobe_binary.clone());
    let mut editor = Editor::new(
        session.clock().clone(),
        ElementFactory::new(config.factory.clone()),
        config.drag.clone(),
    );

    for path in &args.files {
        let file = upload_for(path);
        // Imports are laid end to end on the timeline.
        let start = editor.store().content_end();
        if let Err(e) = editor.import_upload(&prober, &file, start).await {
            warn!(file = %file.name, error = %e, "Skipping file");
        }
    }
    if editor.store().is_empty() {
        editor.add_text("Cueline");
    }

    let state = session.clock().state();
    info!(
        elements = editor.store().len(),
        duration = %format_clock(state.duration),
        "Timeline ready"
    );

    if args.play_seconds > 0.0 {
        session.play()?;
        tokio::time::sleep(Duration::from_secs_f64(args.play_seconds)).await;
        session.pause();
    }

    let state = session.clock().state();
    info!(
        time = %format_clock(state.current_time),
        frame = config.playback.frame_rate.time_to_frame(state.current_time),
        player_frame = player.lock().current_frame(),
        "Playback finished"
    );

    if let Some(path) = &args.snapshot {
        let bytes = editor.snapshot().to_json()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        info!(path = %path.display(), "Snapshot written");
    }

    session.shutdown();
    Ok(())
}

fn upload_for(path: &Path) -> UploadedFile {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    UploadedFile::new(name, path.display().to_string())
}
