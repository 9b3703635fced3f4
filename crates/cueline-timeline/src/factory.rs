//! Element creation from uploads and defaults.

use cueline_core::{CuelineError, Rect, Result, Size};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::element::{
    AudioElement, Element, ElementId, Fade, MediaElement, MediaKind, TextElement, TextStyle,
    TimeSpan,
};
use crate::probe::{MediaProber, UploadedFile};

/// Defaults used when building new elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Seconds an image occupies when first placed.
    pub default_image_duration: f64,
    /// Seconds a new text overlay occupies.
    pub default_text_duration: f64,
    /// Composition resolution new visuals are fitted into.
    pub composition: Size,
    /// Executable used by the ffprobe-backed prober.
    pub ffprobe_binary: String,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            default_image_duration: 5.0,
            default_text_duration: 5.0,
            composition: Size::HD_1080,
            ffprobe_binary: "ffprobe".to_string(),
        }
    }
}

impl FactoryConfig {
    /// Reject defaults that would create empty or unprobeable elements.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("default_image_duration", self.default_image_duration),
            ("default_text_duration", self.default_text_duration),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CuelineError::Config(format!(
                    "{name} must be a positive number of seconds, got {value}"
                )));
            }
        }
        if self.ffprobe_binary.trim().is_empty() {
            return Err(CuelineError::Config("ffprobe_binary is empty".into()));
        }
        Ok(())
    }
}

/// What an upload turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Video,
    Image,
    Audio,
}

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "mkv", "avi", "m4v"];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "aac", "m4a", "flac", "opus"];

/// Classify an upload by MIME type, falling back to its extension.
pub fn classify_upload(file: &UploadedFile) -> Result<UploadKind> {
    if let Some(mime) = file.mime_type.as_deref() {
        let top = mime.split('/').next().unwrap_or_default();
        match top {
            "video" => return Ok(UploadKind::Video),
            "image" => return Ok(UploadKind::Image),
            "audio" => return Ok(UploadKind::Audio),
            _ => {}
        }
    }
    let ext = file.extension().unwrap_or_default();
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Ok(UploadKind::Video)
    } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(UploadKind::Image)
    } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        Ok(UploadKind::Audio)
    } else {
        Err(CuelineError::UnsupportedMedia(file.name.clone()))
    }
}

/// Builds elements with fresh ids and configured defaults.
#[derive(Debug, Clone, Default)]
pub struct ElementFactory {
    config: FactoryConfig,
}

impl ElementFactory {
    pub fn new(config: FactoryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Build an element from an upload, probing its duration first.
    ///
    /// Probe failures are returned as-is; the caller decides whether to
    /// retry. Images are not probed and get the default image duration.
    pub async fn from_upload<P: MediaProber>(
        &self,
        prober: &P,
        file: &UploadedFile,
        start_time: f64,
    ) -> Result<Element> {
        let kind = classify_upload(file)?;

        let (duration, dims) = match kind {
            UploadKind::Image => (self.config.default_image_duration, None),
            UploadKind::Video | UploadKind::Audio => {
                let info = prober.probe(file).await.map_err(|e| {
                    warn!(file = %file.name, error = %e, "Media probe failed");
                    e
                })?;
                let duration = info
                    .duration
                    .filter(|d| d.is_finite() && *d > 0.0)
                    .ok_or_else(|| {
                        CuelineError::Probe(format!("No duration reported for {}", file.name))
                    })?;
                (duration, info.width.zip(info.height))
            }
        };

        let span = TimeSpan::from_start_duration(start_time, duration);
        let element = match kind {
            UploadKind::Audio => Element::Audio(AudioElement {
                id: ElementId::new(),
                span,
                source: file.source.clone(),
                file_name: file.name.clone(),
                volume: 1.0,
                speed: 1.0,
                start_from: None,
            }),
            UploadKind::Video | UploadKind::Image => {
                let media_kind = if kind == UploadKind::Video {
                    MediaKind::Video
                } else {
                    MediaKind::Image
                };
                Element::Media(MediaElement {
                    id: ElementId::new(),
                    kind: media_kind,
                    span,
                    source: file.source.clone(),
                    file_name: file.name.clone(),
                    frame: fit_into(self.config.composition, dims),
                    rotation: 0.0,
                    opacity: 1.0,
                    fade_in: Fade::default(),
                    fade_out: Fade::default(),
                    volume: 1.0,
                    speed: 1.0,
                })
            }
        };

        info!(
            file = %file.name,
            kind = %element.kind(),
            start = span.start_time(),
            duration = span.duration(),
            "Created element from upload"
        );
        Ok(element)
    }

    /// A text overlay centred in the composition.
    pub fn text(&self, text: impl Into<String>, start_time: f64) -> TextElement {
        let comp = self.config.composition;
        TextElement {
            id: ElementId::new(),
            span: TimeSpan::from_start_duration(start_time, self.config.default_text_duration),
            text: text.into(),
            style: TextStyle::default(),
            position_x: comp.width / 2.0,
            position_y: comp.height / 2.0,
            width: comp.width / 2.0,
        }
    }
}

/// Largest rect with the source aspect ratio that fits `composition`,
/// centred. Unknown dimensions fill the composition.
fn fit_into(composition: Size, dims: Option<(u32, u32)>) -> Rect {
    let full = Rect::new(0.0, 0.0, composition.width, composition.height);
    let Some((w, h)) = dims.filter(|(w, h)| *w > 0 && *h > 0) else {
        return full;
    };
    let scale = (composition.width / w as f32).min(composition.height / h as f32);
    let width = w as f32 * scale;
    let height = h as f32 * scale;
    Rect::new(
        (composition.width - width) / 2.0,
        (composition.height - height) / 2.0,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::probe::{MediaInfo, StaticProber};

    #[test]
    fn test_classify_by_mime_then_extension() {
        let f = UploadedFile::new("blob", "blob:1").with_mime_type("audio/mpeg");
        assert_eq!(classify_upload(&f).unwrap(), UploadKind::Audio);
        let f = UploadedFile::new("shot.PNG", "blob:2");
        assert_eq!(classify_upload(&f).unwrap(), UploadKind::Image);
        let f = UploadedFile::new("clip.mov", "blob:3").with_mime_type("application/octet-stream");
        assert_eq!(classify_upload(&f).unwrap(), UploadKind::Video);
        let f = UploadedFile::new("subs.srt", "blob:4");
        assert!(matches!(
            classify_upload(&f),
            Err(CuelineError::UnsupportedMedia(_))
        ));
    }

    #[tokio::test]
    async fn test_video_upload_uses_probed_duration() {
        let prober = StaticProber::new().with_info(
            "clip.mp4",
            MediaInfo {
                duration: Some(8.0),
                width: Some(1280),
                height: Some(720),
            },
        );
        let factory = ElementFactory::default();
        let file = UploadedFile::new("clip.mp4", "/media/clip.mp4");
        let el = factory.from_upload(&prober, &file, 2.0).await.unwrap();
        assert_eq!(el.kind(), ElementKind::Video);
        assert_eq!((el.start_time(), el.end_time()), (2.0, 10.0));
        let Element::Media(m) = el else {
            panic!("expected media")
        };
        assert_eq!(m.frame, Rect::new(0.0, 0.0, 1920.0, 1080.0));
    }

    #[tokio::test]
    async fn test_image_upload_skips_probe() {
        // Prober knows nothing: an image must still succeed.
        let prober = StaticProber::new();
        let factory = ElementFactory::default();
        let file = UploadedFile::new("logo.png", "/media/logo.png");
        let el = factory.from_upload(&prober, &file, 0.0).await.unwrap();
        assert_eq!(el.kind(), ElementKind::Image);
        assert_eq!(el.duration(), 5.0);
    }

    #[tokio::test]
    async fn test_probe_failure_propagates() {
        let prober = StaticProber::new();
        let factory = ElementFactory::default();
        let file = UploadedFile::new("broken.mp3", "/media/broken.mp3");
        let err = factory.from_upload(&prober, &file, 0.0).await.unwrap_err();
        assert!(matches!(err, CuelineError::Probe(_)));
    }

    #[tokio::test]
    async fn test_missing_duration_is_an_error() {
        let prober = StaticProber::new().with_info("a.wav", MediaInfo::default());
        let factory = ElementFactory::default();
        let file = UploadedFile::new("a.wav", "a.wav");
        assert!(factory.from_upload(&prober, &file, 0.0).await.is_err());
    }

    #[test]
    fn test_fit_portrait_into_landscape() {
        let r = fit_into(Size::HD_1080, Some((1080, 1920)));
        assert_eq!(r.height, 1080.0);
        assert!((r.width - 607.5).abs() < 0.01);
        assert!((r.x - 656.25).abs() < 0.01);
    }

    #[test]
    fn test_config_validation() {
        assert!(FactoryConfig::default().validate().is_ok());
        let bad = FactoryConfig {
            default_image_duration: 0.0,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(CuelineError::Config(_))));
        let bad = FactoryConfig {
            ffprobe_binary: " ".into(),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_text_defaults() {
        let factory = ElementFactory::default();
        let t = factory.text("Hello", 3.0);
        assert_eq!(t.span.start_time(), 3.0);
        assert_eq!(t.span.duration(), 5.0);
        assert_eq!((t.position_x, t.position_y), (960.0, 540.0));
    }
}
