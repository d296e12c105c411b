pub mod controller;
pub mod driver;
pub mod events;

#[cfg(test)]
mod tests;

pub use controller::{PlaybackController, SpeakOutcome};
pub use driver::{Speaker, DEFAULT_REQUEST_TIMEOUT};
pub use events::{PlaybackEvent, PlaybackEvents, PlaybackStatus, SessionId};
