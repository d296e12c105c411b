//! Turning synthesis responses into playable clips with ephemeral handles.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use base64::Engine as _;
use bytes::Bytes;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::SpeechError;

pub const MP3_CONTENT_TYPE: &str = "audio/mpeg";

/// What the synthesis endpoint sent back. Standard voices answer with a
/// base64 string, cloned voices may answer with raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechPayload {
    Base64(String),
    Binary(Bytes),
}

/// Decoded audio, ready to hand to a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Bytes,
    pub content_type: &'static str,
}

impl AudioClip {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Decode a base64 audio payload. Surrounding whitespace is ignored.
pub fn decode_base64(encoded: &str) -> Result<AudioClip, SpeechError> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
    clip_from_bytes(Bytes::from(bytes))
}

pub fn decode_payload(payload: SpeechPayload) -> Result<AudioClip, SpeechError> {
    match payload {
        SpeechPayload::Base64(encoded) => decode_base64(&encoded),
        SpeechPayload::Binary(bytes) => clip_from_bytes(bytes),
    }
}

fn clip_from_bytes(bytes: Bytes) -> Result<AudioClip, SpeechError> {
    if bytes.is_empty() {
        return Err(SpeechError::decode("no audio data received from the server"));
    }
    Ok(AudioClip {
        bytes,
        content_type: MP3_CONTENT_TYPE,
    })
}

/// Ephemeral reference to a clip registered in a [`ResourceTable`].
///
/// A handle stays valid until it is revoked. Whoever registered it is
/// responsible for revoking it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioHandle {
    uri: String,
    len: usize,
}

impl AudioHandle {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Size of the clip behind this handle, in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Process-wide table mapping ephemeral URIs to decoded clips.
#[derive(Clone, Default)]
pub struct ResourceTable {
    inner: Arc<Mutex<HashMap<String, AudioClip>>>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, clip: AudioClip) -> AudioHandle {
        let uri = format!("blob:voxora/{}", Uuid::new_v4());
        let len = clip.len();
        self.inner
            .lock()
            .expect("resource table lock poisoned")
            .insert(uri.clone(), clip);
        debug!(%uri, len, "registered audio resource");
        AudioHandle { uri, len }
    }

    /// Release a handle. Revoking twice is harmless and only logged.
    pub fn revoke(&self, handle: &AudioHandle) -> bool {
        let removed = self
            .inner
            .lock()
            .expect("resource table lock poisoned")
            .remove(handle.uri())
            .is_some();
        if removed {
            debug!(uri = %handle.uri(), "revoked audio resource");
        } else {
            warn!(uri = %handle.uri(), "audio resource was already revoked");
        }
        removed
    }

    pub fn get(&self, handle: &AudioHandle) -> Option<AudioClip> {
        self.inner
            .lock()
            .expect("resource table lock poisoned")
            .get(handle.uri())
            .cloned()
    }

    /// Number of handles that have not been revoked yet
    pub fn live_count(&self) -> usize {
        self.inner.lock().expect("resource table lock poisoned").len()
    }

    /// Write the clip behind `handle` to `path` (the download affordance)
    pub fn save(&self, handle: &AudioHandle, path: &Path) -> anyhow::Result<()> {
        let clip = self
            .get(handle)
            .with_context(|| format!("audio resource {} has been released", handle.uri()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {parent:?}"))?;
        }
        fs::write(path, &clip.bytes).with_context(|| format!("Failed to write audio to {path:?}"))
    }
}
