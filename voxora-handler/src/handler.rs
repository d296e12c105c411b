//! `POST /text-to-speech`: synthesize, upload, answer with the audio URL.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::HandlerError;
use crate::store::AudioStore;
use crate::synthesizer::{SpeechSynthesizer, DEFAULT_VOICE};

pub const SUCCESS_MESSAGE: &str = "Text-to-speech conversion successful";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextToSpeechRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    /// Accepted for compatibility with older clients; Polly is called
    /// without prosody markup so these do not change the audio.
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub pitch: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextToSpeechResponse {
    pub audio_url: String,
    pub message: String,
}

#[derive(Clone)]
pub struct HandlerState {
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub store: Arc<dyn AudioStore>,
}

impl HandlerState {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, store: Arc<dyn AudioStore>) -> Self {
        Self { synthesizer, store }
    }
}

pub fn create_router(state: HandlerState) -> Router {
    Router::new()
        .route("/text-to-speech", post(text_to_speech))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn text_to_speech(
    State(state): State<HandlerState>,
    body: Result<Json<TextToSpeechRequest>, JsonRejection>,
) -> Result<Json<TextToSpeechResponse>, HandlerError> {
    let Json(request) = body.map_err(|e| HandlerError::InvalidBody(e.body_text()))?;
    convert(&state, request).await.map(Json)
}

/// Synthesize the request and upload the audio under a fresh `<uuid>.mp3` key
pub async fn convert(
    state: &HandlerState,
    request: TextToSpeechRequest,
) -> Result<TextToSpeechResponse, HandlerError> {
    let text = request
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or(HandlerError::MissingText)?;
    let voice = request.voice.as_deref().unwrap_or(DEFAULT_VOICE);
    tracing::debug!(
        voice,
        rate = request.rate.unwrap_or(1.0),
        pitch = request.pitch.unwrap_or(1.0),
        chars = text.chars().count(),
        "synthesizing speech"
    );

    let audio = state.synthesizer.synthesize(&text, voice).await?;

    let key = format!("{}.mp3", Uuid::new_v4());
    let audio_url = state.store.put_audio(&key, audio).await?;

    Ok(TextToSpeechResponse {
        audio_url,
        message: SUCCESS_MESSAGE.to_string(),
    })
}
