//! S3 storage for synthesized audio

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use crate::error::HandlerError;

pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

#[async_trait]
pub trait AudioStore: Send + Sync {
    /// Store `audio` under `key` and return its public URL
    async fn put_audio(&self, key: &str, audio: Bytes) -> Result<String, HandlerError>;
}

pub struct S3AudioStore {
    client: Client,
    bucket: String,
}

impl S3AudioStore {
    pub fn new(config: &aws_config::SdkConfig, bucket: impl Into<String>) -> Self {
        Self {
            client: Client::new(config),
            bucket: bucket.into(),
        }
    }
}

/// Virtual-hosted style URL of an object
pub fn object_url(bucket: &str, key: &str) -> String {
    format!("https://{bucket}.s3.amazonaws.com/{key}")
}

#[async_trait]
impl AudioStore for S3AudioStore {
    async fn put_audio(&self, key: &str, audio: Bytes) -> Result<String, HandlerError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(audio))
            .content_type(AUDIO_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| HandlerError::Upload(DisplayErrorContext(&e).to_string()))?;

        tracing::info!(bucket = %self.bucket, key, "uploaded synthesized audio");
        Ok(object_url(&self.bucket, key))
    }
}
