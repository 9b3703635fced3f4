//! Store snapshots handed to persistence and export.
//!
//! Uses JSON with a schema version field for forward-compatible payloads.

use cueline_core::{CuelineError, Result};
use serde::{Deserialize, Serialize};

use crate::element::{AudioElement, MediaElement, TextElement};
use crate::store::ElementStore;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Plain structured copy of the element store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    /// Schema version for migration.
    pub version: u32,
    /// Application version that wrote this payload.
    pub app_version: String,
    /// Project duration in seconds.
    pub duration: f64,
    pub texts: Vec<TextElement>,
    pub media: Vec<MediaElement>,
    pub audios: Vec<AudioElement>,
}

impl ProjectSnapshot {
    /// Capture the current contents of a store.
    pub fn capture(store: &ElementStore) -> Self {
        Self {
            version: CURRENT_VERSION,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            duration: store.duration(),
            texts: store.texts().to_vec(),
            media: store.media().to_vec(),
            audios: store.audios().to_vec(),
        }
    }

    /// Rebuild a store from this snapshot, keeping list order.
    pub fn restore(&self) -> ElementStore {
        let mut store = ElementStore::new();
        for t in &self.texts {
            store.add(t.clone());
        }
        for m in &self.media {
            store.add(m.clone());
        }
        for a in &self.audios {
            store.add(a.clone());
        }
        store.set_duration(self.duration);
        store
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            CuelineError::Serialization(format!("Failed to serialize snapshot: {}", e))
        })
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| CuelineError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = match raw.get("version") {
            None => 0,
            Some(v) => v
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| {
                    CuelineError::Serialization(format!("Unsupported snapshot version {}", v))
                })?,
        };

        if version > CURRENT_VERSION {
            return Err(CuelineError::Serialization(format!(
                "Snapshot version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        serde_json::from_value(migrated)
            .map_err(|e| CuelineError::Serialization(format!("Failed to parse snapshot: {}", e)))
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 → v1: unversioned payloads lacked the header fields and
                // used `videos`/`images` lists instead of a single `media` list.
                if let Some(obj) = data.as_object_mut() {
                    let mut media = Vec::new();
                    for key in ["videos", "images"] {
                        if let Some(serde_json::Value::Array(items)) = obj.remove(key) {
                            media.extend(items);
                        }
                    }
                    obj.entry("media")
                        .or_insert_with(|| serde_json::Value::Array(media));
                    obj.entry("texts")
                        .or_insert_with(|| serde_json::Value::Array(Vec::new()));
                    obj.entry("audios")
                        .or_insert_with(|| serde_json::Value::Array(Vec::new()));
                    obj.entry("duration").or_insert_with(|| serde_json::json!(0.0));
                    obj.insert("version".into(), serde_json::json!(1));
                    obj.entry("appVersion")
                        .or_insert_with(|| serde_json::json!("0.0.0"));
                }
                version = 1;
            }
            _ => {
                return Err(CuelineError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}
