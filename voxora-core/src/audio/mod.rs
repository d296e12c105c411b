//! Audio decoding, ephemeral resource handles and output backends

pub mod backend;
pub mod decoder;
#[cfg(feature = "playback")]
pub mod device;

pub use backend::{AudioBackend, NullBackend};
pub use decoder::{
    decode_base64, decode_payload, AudioClip, AudioHandle, ResourceTable, SpeechPayload,
};
