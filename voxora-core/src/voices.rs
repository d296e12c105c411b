//! Cloned voices owned by the remote voice-management service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClonedVoiceStatus {
    Processing,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClonedVoice {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_url: Option<String>,
    pub status: ClonedVoiceStatus,
}

impl ClonedVoice {
    /// Only ready voices may be used for synthesis
    pub fn is_selectable(&self) -> bool {
        self.status == ClonedVoiceStatus::Ready
    }
}

/// Ready voices in their listed order
pub fn ready_voices(voices: &[ClonedVoice]) -> impl Iterator<Item = &ClonedVoice> {
    voices.iter().filter(|v| v.is_selectable())
}

/// The list endpoint has returned both a bare array and `{ "voices": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum VoiceListResponse {
    Bare(Vec<ClonedVoice>),
    Wrapped { voices: Vec<ClonedVoice> },
}

impl VoiceListResponse {
    pub(crate) fn into_voices(self) -> Vec<ClonedVoice> {
        match self {
            Self::Bare(voices) | Self::Wrapped { voices } => voices,
        }
    }
}
