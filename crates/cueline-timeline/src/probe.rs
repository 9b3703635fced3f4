//! Media file probing to get duration and dimensions before an element is
//! created.

use cueline_core::{CuelineError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;
use tracing::debug;

/// An uploaded file as handed over by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// Display name (usually the original file name).
    pub name: String,
    /// Path or URL the renderer loads the media from.
    pub source: String,
    /// MIME type reported by the host, if any.
    pub mime_type: Option<String>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    /// Lowercased file extension of `name`, falling back to `source`.
    pub fn extension(&self) -> Option<String> {
        let ext_of = |s: &str| {
            let file = s.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(s);
            file.rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
        };
        ext_of(&self.name).or_else(|| ext_of(&self.source))
    }
}

/// Information about a media file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MediaInfo {
    /// Duration in seconds, when the container reports one.
    pub duration: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Asynchronous metadata probe.
pub trait MediaProber: Send + Sync {
    fn probe(&self, file: &UploadedFile) -> impl Future<Output = Result<MediaInfo>> + Send;
}

// ── ffprobe ────────────────────────────────────────────────────

/// Probes files by running `ffprobe` and parsing its JSON output.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    binary: String,
}

impl FfprobeProber {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl MediaProber for FfprobeProber {
    async fn probe(&self, file: &UploadedFile) -> Result<MediaInfo> {
        debug!(source = %file.source, "Running ffprobe");
        let output = tokio::process::Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration:stream=width,height",
                "-of",
                "json",
            ])
            .arg(&file.source)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    CuelineError::NotFound(format!("ffprobe binary `{}`", self.binary))
                }
                _ => CuelineError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CuelineError::Probe(format!(
                "ffprobe failed for {}: {}",
                file.name,
                stderr.trim()
            )));
        }
        parse_ffprobe_json(&output.stdout)
    }
}

#[derive(Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: Option<FfprobeFormat>,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct FfprobeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Parse `ffprobe -of json` output.
pub fn parse_ffprobe_json(data: &[u8]) -> Result<MediaInfo> {
    let parsed: FfprobeOutput = serde_json::from_slice(data)
        .map_err(|e| CuelineError::Probe(format!("Invalid ffprobe output: {}", e)))?;

    let duration = parsed
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0);

    let dims = parsed
        .streams
        .iter()
        .find(|s| s.width.is_some() && s.height.is_some());

    Ok(MediaInfo {
        duration,
        width: dims.and_then(|s| s.width),
        height: dims.and_then(|s| s.height),
    })
}

// ── Static ─────────────────────────────────────────────────────

/// Answers probes from a fixed table keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct StaticProber {
    entries: HashMap<String, MediaInfo>,
    fallback: Option<MediaInfo>,
}

impl StaticProber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a duration for `name`.
    pub fn with_duration(mut self, name: impl Into<String>, seconds: f64) -> Self {
        self.entries.insert(
            name.into(),
            MediaInfo {
                duration: Some(seconds),
                ..Default::default()
            },
        );
        self
    }

    pub fn with_info(mut self, name: impl Into<String>, info: MediaInfo) -> Self {
        self.entries.insert(name.into(), info);
        self
    }

    /// Answer unknown names with `info` instead of failing.
    pub fn with_fallback(mut self, info: MediaInfo) -> Self {
        self.fallback = Some(info);
        self
    }
}

impl MediaProber for StaticProber {
    async fn probe(&self, file: &UploadedFile) -> Result<MediaInfo> {
        self.entries
            .get(&file.name)
            .copied()
            .or(self.fallback)
            .ok_or_else(|| CuelineError::Probe(format!("Unreadable media: {}", file.name)))
    }
}
