use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;

use super::service::SpeechService;
use crate::audio::SpeechPayload;
use crate::auth::CredentialProvider;
use crate::document::{validate_document, DocumentSummary};
use crate::error::SpeechError;
use crate::request::SpeechRequest;
use crate::settings::ApiSettings;
use crate::voices::{ClonedVoice, VoiceListResponse};

/// HTTP client for the speech service and its voice-management endpoints
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    synthesis_route: String,
    cloned_synthesis_route: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            synthesis_route: settings.synthesis_route.clone(),
            cloned_synthesis_route: settings.cloned_synthesis_route.clone(),
            credentials,
        })
    }

    pub fn url(&self, route: &str) -> String {
        if route.starts_with('/') {
            format!("{}{route}", self.base_url)
        } else {
            format!("{}/{route}", self.base_url)
        }
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.credentials.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, SpeechError> {
        let response = self.authorize(builder).send().await?;
        check_response(response).await
    }

    /// `GET /list-voices?category=cloned`
    pub async fn list_cloned_voices(&self) -> Result<Vec<ClonedVoice>, SpeechError> {
        let response = self
            .send(
                self.client
                    .get(self.url("/list-voices"))
                    .query(&[("category", "cloned")]),
            )
            .await?;

        let voices: VoiceListResponse = response.json().await.map_err(|e| {
            SpeechError::network(format!("Failed to parse voice list: {e}"))
        })?;
        Ok(voices.into_voices())
    }

    /// Upload a voice sample to be cloned. The service answers with a
    /// free-form description of the new voice.
    pub async fn upload_voice(
        &self,
        name: &str,
        audio: Vec<u8>,
        file_name: &str,
    ) -> Result<serde_json::Value, SpeechError> {
        let part = Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))
            .map_err(|e| SpeechError::validation(format!("Invalid upload: {e}")))?;
        let form = Form::new()
            .part("audio", part)
            .text("name", name.to_string());

        let response = self
            .send(self.client.post(self.url("/upload-voice")).multipart(form))
            .await?;
        response
            .json()
            .await
            .map_err(|e| SpeechError::network(format!("Failed to parse upload response: {e}")))
    }

    /// `DELETE /delete-voice?voiceId=<id>`
    pub async fn delete_voice(&self, voice_id: &str) -> Result<(), SpeechError> {
        self.send(
            self.client
                .delete(self.url("/delete-voice"))
                .query(&[("voiceId", voice_id)]),
        )
        .await?;
        tracing::info!(voice_id, "deleted cloned voice");
        Ok(())
    }

    /// Upload a document and get back its text and a short gist
    pub async fn process_document(&self, path: &Path) -> Result<DocumentSummary, SpeechError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| SpeechError::validation(format!("Failed to read {path:?}: {e}")))?;
        validate_document(path, metadata.len())?;

        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| SpeechError::validation(format!("Failed to read {path:?}: {e}")))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();
        let form = Form::new().part("document", Part::bytes(contents).file_name(file_name));

        let response = self
            .send(
                self.client
                    .post(self.url("/process-document"))
                    .multipart(form),
            )
            .await?;
        response
            .json()
            .await
            .map_err(|e| SpeechError::network(format!("Failed to parse document summary: {e}")))
    }
}

#[async_trait]
impl SpeechService for ApiClient {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechPayload, SpeechError> {
        let route = if request.is_cloned() {
            &self.cloned_synthesis_route
        } else {
            &self.synthesis_route
        };
        tracing::debug!(route, cloned = request.is_cloned(), "sending synthesis request");

        let response = self
            .send(self.client.post(self.url(route)).json(request))
            .await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        payload_from_body(content_type.as_deref(), body)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Non-2xx responses become `Network` errors carrying the server's message
async fn check_response(response: Response) -> Result<Response, SpeechError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SpeechError::network(error_message(status.as_u16(), &body)))
}

fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP error! status: {status}"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AudioEnvelope {
    audio_content: Option<String>,
    audio: Option<String>,
}

/// Work out what kind of audio a synthesis response carries.
///
/// Audio content types are raw bytes. A JSON string, or an object with an
/// `audioContent`/`audio` field, is base64. Any other UTF-8 body is treated
/// as bare base64 text and anything else as raw bytes.
pub fn payload_from_body(
    content_type: Option<&str>,
    body: Bytes,
) -> Result<SpeechPayload, SpeechError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(SpeechError::decode("no audio data received from the server"));
    }

    let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
    if content_type.starts_with("audio/") || content_type.starts_with("application/octet-stream") {
        return Ok(SpeechPayload::Binary(body));
    }

    if let Ok(encoded) = serde_json::from_slice::<String>(&body) {
        return Ok(SpeechPayload::Base64(encoded));
    }
    if let Ok(envelope) = serde_json::from_slice::<AudioEnvelope>(&body) {
        if let Some(encoded) = envelope.audio_content.or(envelope.audio) {
            return Ok(SpeechPayload::Base64(encoded));
        }
        return Err(SpeechError::decode("response did not contain audio"));
    }

    match std::str::from_utf8(&body) {
        Ok(text) => Ok(SpeechPayload::Base64(text.trim().to_string())),
        Err(_) => Ok(SpeechPayload::Binary(body)),
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("m4a") => "audio/mp4",
        Some("ogg") => "audio/ogg",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}
