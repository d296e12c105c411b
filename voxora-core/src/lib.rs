pub mod api;
pub mod audio;
pub mod auth;
pub mod catalog;
pub mod document;
pub mod error;
pub mod playback;
pub mod request;
pub mod settings;
pub mod ssml;
pub mod state;
pub mod voices;

// Types most callers need. Everything else is reachable through its module.
pub use api::{ApiClient, SpeechService};
pub use audio::{AudioBackend, AudioClip, AudioHandle, NullBackend, ResourceTable, SpeechPayload};
pub use error::SpeechError;
pub use playback::{PlaybackController, PlaybackStatus, SpeakOutcome, Speaker};
pub use request::{build_request, SpeechRequest, SpeechSelection};
pub use settings::{Settings, SettingsManager};
pub use state::AppState;
