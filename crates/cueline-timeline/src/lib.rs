//! Cueline Timeline - Element data model
//!
//! Implements the timed elements placed on the editor's time axis:
//! - Text, media (video/image) and audio element variants
//! - The element store with add / patch / delete by id
//! - Selection and lane assignment
//! - Element creation from uploads with async duration probing
//! - Versioned snapshots for persistence and export

pub mod element;
pub mod factory;
pub mod patch;
pub mod probe;
pub mod selection;
pub mod serialization;
pub mod store;

pub use element::{
    AudioElement, Element, ElementId, ElementKind, Fade, MediaElement, MediaKind, TextAlign,
    TextElement, TextStyle, TimeSpan,
};
pub use factory::{classify_upload, ElementFactory, FactoryConfig, UploadKind};
pub use patch::{AudioPatch, ElementPatch, MediaPatch, SpanPatch, TextPatch};
pub use probe::{FfprobeProber, MediaInfo, MediaProber, StaticProber, UploadedFile};
pub use selection::{lane_of, lanes, Lane, LaneEntry, LaneView, Selection};
pub use serialization::ProjectSnapshot;
pub use store::ElementStore;
