use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};

use voxora_handler::handler::convert;
use voxora_handler::store::object_url;
use voxora_handler::{
    create_router, AudioStore, HandlerError, HandlerState, SpeechSynthesizer, TextToSpeechRequest,
};

#[derive(Default)]
struct MockSynthesizer {
    calls: Mutex<Vec<(String, String)>>,
    fail: bool,
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Bytes, HandlerError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), voice.to_string()));
        if self.fail {
            return Err(HandlerError::Synthesis("throttled".to_string()));
        }
        Ok(Bytes::from_static(b"ID3\x04mp3"))
    }
}

#[derive(Default)]
struct MockStore {
    objects: Mutex<Vec<(String, Bytes)>>,
    fail: bool,
}

#[async_trait]
impl AudioStore for MockStore {
    async fn put_audio(&self, key: &str, audio: Bytes) -> Result<String, HandlerError> {
        if self.fail {
            return Err(HandlerError::Upload("access denied".to_string()));
        }
        self.objects.lock().unwrap().push((key.to_string(), audio));
        Ok(object_url("test-bucket", key))
    }
}

fn state(synthesizer: Arc<MockSynthesizer>, store: Arc<MockStore>) -> HandlerState {
    HandlerState::new(synthesizer, store)
}

fn request(text: Option<&str>) -> TextToSpeechRequest {
    TextToSpeechRequest {
        text: text.map(str::to_string),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_success_uploads_mp3_with_default_voice() {
    let synthesizer = Arc::new(MockSynthesizer::default());
    let store = Arc::new(MockStore::default());

    let response = convert(&state(synthesizer.clone(), store.clone()), request(Some("Hello")))
        .await
        .unwrap();

    assert_eq!(response.message, "Text-to-speech conversion successful");
    assert_eq!(
        synthesizer.calls.lock().unwrap().as_slice(),
        &[("Hello".to_string(), "Joanna".to_string())]
    );

    let objects = store.objects.lock().unwrap();
    let (key, audio) = &objects[0];
    assert!(key.ends_with(".mp3"));
    assert_eq!(key.len(), 36 + 4);
    assert_eq!(audio.as_ref(), b"ID3\x04mp3");
    assert_eq!(
        response.audio_url,
        format!("https://test-bucket.s3.amazonaws.com/{key}")
    );
}

#[tokio::test]
async fn test_missing_text_is_rejected_before_synthesis() {
    let synthesizer = Arc::new(MockSynthesizer::default());
    let handler_state = state(synthesizer.clone(), Arc::new(MockStore::default()));

    for text in [None, Some(""), Some("   ")] {
        let err = convert(&handler_state, request(text)).await.unwrap_err();
        assert!(matches!(err, HandlerError::MissingText));
        assert_eq!(err.status().as_u16(), 400);
    }
    assert!(synthesizer.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failures_are_server_errors() {
    let failing_synth = Arc::new(MockSynthesizer {
        fail: true,
        ..Default::default()
    });
    let err = convert(
        &state(failing_synth, Arc::new(MockStore::default())),
        request(Some("Hello")),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status().as_u16(), 500);
    assert_eq!(
        err.public_message(),
        "Failed to process text-to-speech conversion"
    );

    let failing_store = Arc::new(MockStore {
        fail: true,
        ..Default::default()
    });
    let err = convert(
        &state(Arc::new(MockSynthesizer::default()), failing_store),
        request(Some("Hello")),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status().as_u16(), 500);
}

async fn serve(handler_state: HandlerState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(handler_state))
            .await
            .unwrap();
    });
    format!("http://{addr}/text-to-speech")
}

#[tokio::test]
async fn test_router_status_codes() {
    let url = serve(state(
        Arc::new(MockSynthesizer::default()),
        Arc::new(MockStore::default()),
    ))
    .await;
    let client = reqwest::Client::new();

    let ok = client
        .post(&url)
        .json(&json!({ "text": "Hello", "voice": "Matthew", "rate": 1.2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status().as_u16(), 200);
    let body: Value = ok.json().await.unwrap();
    assert!(body["audioUrl"]
        .as_str()
        .unwrap()
        .starts_with("https://test-bucket.s3.amazonaws.com/"));
    assert_eq!(body["message"], "Text-to-speech conversion successful");

    let missing = client.post(&url).json(&json!({})).send().await.unwrap();
    assert_eq!(missing.status().as_u16(), 400);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Text is required" }));

    let malformed = client
        .post(&url)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status().as_u16(), 400);
}

#[tokio::test]
async fn test_router_failure_body() {
    let url = serve(state(
        Arc::new(MockSynthesizer {
            fail: true,
            ..Default::default()
        }),
        Arc::new(MockStore::default()),
    ))
    .await;

    let response = reqwest::Client::new()
        .post(&url)
        .json(&json!({ "text": "Hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "error": "Failed to process text-to-speech conversion" })
    );
}

#[tokio::test]
async fn test_router_allows_cross_origin() {
    let url = serve(state(
        Arc::new(MockSynthesizer::default()),
        Arc::new(MockStore::default()),
    ))
    .await;

    let response = reqwest::Client::new()
        .post(&url)
        .header("origin", "https://app.example.com")
        .json(&json!({ "text": "Hello" }))
        .send()
        .await
        .unwrap();

    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
