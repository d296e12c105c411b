use async_trait::async_trait;

use crate::audio::SpeechPayload;
use crate::error::SpeechError;
use crate::request::SpeechRequest;

/// The remote speech-synthesis endpoint
#[async_trait]
pub trait SpeechService: Send + Sync {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechPayload, SpeechError>;
}
