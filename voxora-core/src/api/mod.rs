pub mod client;
pub mod mock;
pub mod service;

pub use client::{payload_from_body, ApiClient};
pub use mock::{MockBehavior, MockSpeechService, MOCK_AUDIO};
pub use service::SpeechService;
