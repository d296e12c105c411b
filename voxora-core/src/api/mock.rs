use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine as _;
use bytes::Bytes;

use super::service::SpeechService;
use crate::audio::SpeechPayload;
use crate::error::SpeechError;
use crate::request::SpeechRequest;

/// Mock behavior for the mock speech service
#[derive(Debug, Clone, Default)]
pub enum MockBehavior {
    /// Answer with a short base64-encoded clip
    #[default]
    Success,
    /// Answer with these raw bytes, as the cloned endpoint does
    Binary(Vec<u8>),
    /// Answer with this exact base64 text, valid or not
    Base64(String),
    /// Fail as if the service returned a non-2xx status
    NetworkError(String),
    /// Never answer
    Hang,
    /// Play the queued behaviors in order, then fall back to `Success`
    BehaviorQueue(Vec<MockBehavior>),
}

/// Bytes of the clip `MockBehavior::Success` answers with
pub const MOCK_AUDIO: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00mock-audio";

/// Mock speech service for testing
#[derive(Clone, Default)]
pub struct MockSpeechService {
    behavior: Arc<Mutex<MockBehavior>>,
    captured_requests: Arc<Mutex<Vec<SpeechRequest>>>,
}

impl MockSpeechService {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(behavior)),
            captured_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn call_count(&self) -> usize {
        self.captured_requests.lock().unwrap().len()
    }

    pub fn captured_requests(&self) -> Vec<SpeechRequest> {
        self.captured_requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<SpeechRequest> {
        self.captured_requests.lock().unwrap().last().cloned()
    }

    fn next_behavior(&self) -> MockBehavior {
        let mut behavior = self.behavior.lock().unwrap();
        if let MockBehavior::BehaviorQueue(queue) = &mut *behavior {
            if queue.is_empty() {
                return MockBehavior::Success;
            }
            return queue.remove(0);
        }
        behavior.clone()
    }
}

#[async_trait]
impl SpeechService for MockSpeechService {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechPayload, SpeechError> {
        self.captured_requests.lock().unwrap().push(request.clone());

        match self.next_behavior() {
            MockBehavior::Success | MockBehavior::BehaviorQueue(_) => Ok(SpeechPayload::Base64(
                base64::engine::general_purpose::STANDARD.encode(MOCK_AUDIO),
            )),
            MockBehavior::Binary(bytes) => Ok(SpeechPayload::Binary(Bytes::from(bytes))),
            MockBehavior::Base64(text) => Ok(SpeechPayload::Base64(text)),
            MockBehavior::NetworkError(message) => Err(SpeechError::network(message)),
            MockBehavior::Hang => std::future::pending().await,
        }
    }
}
