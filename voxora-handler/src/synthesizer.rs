//! AWS Polly speech synthesis

use async_trait::async_trait;
use aws_sdk_polly::config::Region;
use aws_sdk_polly::error::DisplayErrorContext;
use aws_sdk_polly::types::{Engine, OutputFormat, VoiceId};
use aws_sdk_polly::Client;
use bytes::Bytes;

use crate::error::HandlerError;

pub const DEFAULT_VOICE: &str = "Joanna";
pub const SAMPLE_RATE: &str = "24000";

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` as MP3 audio with the given voice
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Bytes, HandlerError>;
}

/// Load the shared AWS config the Polly and S3 clients are built from
pub async fn load_aws_config(profile: Option<&str>, region: &str) -> aws_config::SdkConfig {
    let mut aws_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

    if let Some(profile) = profile {
        aws_config_loader = aws_config_loader.profile_name(profile);
    }

    aws_config_loader = aws_config_loader.region(Region::new(region.to_string()));
    aws_config_loader.load().await
}

/// Neural-engine MP3 synthesis at 24 kHz
pub struct PollySynthesizer {
    client: Client,
}

impl PollySynthesizer {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for PollySynthesizer {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Bytes, HandlerError> {
        let response = self
            .client
            .synthesize_speech()
            .text(text)
            .voice_id(VoiceId::from(voice))
            .output_format(OutputFormat::Mp3)
            .engine(Engine::Neural)
            .sample_rate(SAMPLE_RATE)
            .send()
            .await
            .map_err(|e| HandlerError::Synthesis(DisplayErrorContext(&e).to_string()))?;

        let bytes = response
            .audio_stream
            .collect()
            .await
            .map_err(|e| HandlerError::Synthesis(format!("Failed to collect audio stream: {e}")))?
            .into_bytes();

        if bytes.is_empty() {
            return Err(HandlerError::MissingAudio);
        }
        Ok(bytes)
    }
}
