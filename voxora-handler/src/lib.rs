pub mod config;
pub mod error;
pub mod handler;
pub mod store;
pub mod synthesizer;

pub use config::HandlerConfig;
pub use error::HandlerError;
pub use handler::{create_router, HandlerState, TextToSpeechRequest, TextToSpeechResponse};
pub use store::{AudioStore, S3AudioStore};
pub use synthesizer::{PollySynthesizer, SpeechSynthesizer};
