use std::time::Duration;

use tracing::warn;

use super::controller::{PlaybackController, SpeakOutcome};
use super::events::PlaybackStatus;
use crate::api::SpeechService;
use crate::audio::AudioBackend;
use crate::error::SpeechError;
use crate::request::SpeechSelection;

/// Upper bound on a single synthesis call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const END_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs one `speak` end to end: build, send with a deadline, decode, play.
pub struct Speaker<S: SpeechService, B: AudioBackend> {
    service: S,
    controller: PlaybackController<B>,
    timeout: Duration,
}

impl<S: SpeechService, B: AudioBackend> Speaker<S, B> {
    pub fn new(service: S, controller: PlaybackController<B>) -> Self {
        Self {
            service,
            controller,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn controller(&self) -> &PlaybackController<B> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<B> {
        &mut self.controller
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Press "speak". Returns once playback has started, the toggle stopped
    /// playback, or the attempt failed.
    pub async fn speak(&mut self, selection: &SpeechSelection) -> Result<SpeakOutcome, SpeechError> {
        let outcome = self.controller.speak(selection)?;

        if let SpeakOutcome::Started { session, request } = &outcome {
            let response =
                match tokio::time::timeout(self.timeout, self.service.synthesize(request)).await {
                    Ok(response) => response,
                    Err(_) => {
                        warn!(%session, timeout = ?self.timeout, "synthesis request timed out");
                        Err(SpeechError::network(format!(
                            "Request timed out after {} seconds",
                            self.timeout.as_secs()
                        )))
                    }
                };
            self.controller.on_response(*session, response)?;
        }

        Ok(outcome)
    }

    /// Wait until the backend reports end-of-audio and mark the session
    /// complete. Returns immediately when nothing is playing.
    pub async fn wait_for_end(&mut self) -> &PlaybackStatus {
        if let Some(session) = self.controller.active_session() {
            while self.controller.status() == &PlaybackStatus::Playing
                && !self.controller.backend().is_finished()
            {
                tokio::time::sleep(END_POLL_INTERVAL).await;
            }
            self.controller.on_playback_ended(session);
        }
        self.controller.status()
    }
}
