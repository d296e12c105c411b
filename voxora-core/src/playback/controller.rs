//! The request → decode → play state machine behind the "speak" button.
//!
//! ```text
//! Idle --speak--> Requesting --response--> Decoding --decoded--> Playing --ended--> Complete
//!                     |                        |                    |
//!                     +--------- stop / error -+--------------------+--> Stopped / Error
//! ```
//!
//! The controller is event driven: the caller performs the network request
//! and reports back through [`PlaybackController::on_response`], and reports
//! natural end-of-audio through [`PlaybackController::on_playback_ended`].
//! Only one session exists at a time. Starting a new one always releases the
//! previous session's audio resource first.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::events::{PlaybackEvent, PlaybackEvents, PlaybackStatus, SessionId};
use crate::audio::{decode_payload, AudioBackend, AudioHandle, ResourceTable, SpeechPayload};
use crate::error::SpeechError;
use crate::request::{build_request, SpeechRequest, SpeechSelection};

/// What a `speak` invocation did
#[derive(Debug, Clone, PartialEq)]
pub enum SpeakOutcome {
    /// A new session is waiting for `request` to be sent
    Started {
        session: SessionId,
        request: SpeechRequest,
    },
    /// Playback was active, so the same control stopped it instead
    Stopped,
}

struct PlaybackSession {
    id: SessionId,
    handle: Option<AudioHandle>,
}

pub struct PlaybackController<B: AudioBackend> {
    backend: B,
    resources: ResourceTable,
    events: PlaybackEvents,
    status: PlaybackStatus,
    session: Option<PlaybackSession>,
    next_session: u64,
}

impl<B: AudioBackend> PlaybackController<B> {
    pub fn new(
        backend: B,
        resources: ResourceTable,
    ) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (events, rx) = PlaybackEvents::new();
        (
            Self {
                backend,
                resources,
                events,
                status: PlaybackStatus::Idle,
                session: None,
                next_session: 1,
            },
            rx,
        )
    }

    pub fn status(&self) -> &PlaybackStatus {
        &self.status
    }

    pub fn can_speak(&self) -> bool {
        self.status.accepts_speak()
    }

    pub fn active_session(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// The message of the last failure, while the controller is in `Error`
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            PlaybackStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Audio of a session that played to the end. Not available after a stop.
    pub fn completed_audio(&self) -> Option<&AudioHandle> {
        if self.status != PlaybackStatus::Complete {
            return None;
        }
        self.session.as_ref()?.handle.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn resources(&self) -> &ResourceTable {
        &self.resources
    }

    pub fn events(&self) -> &PlaybackEvents {
        &self.events
    }

    /// Press the speak control.
    ///
    /// While playing this stops playback without issuing a request. Otherwise
    /// the selection is turned into a request and a new session begins; any
    /// earlier session, including one still waiting on the network, is torn
    /// down before the new one exists.
    pub fn speak(&mut self, selection: &SpeechSelection) -> Result<SpeakOutcome, SpeechError> {
        if self.status == PlaybackStatus::Playing {
            self.stop();
            return Ok(SpeakOutcome::Stopped);
        }

        let request = match build_request(selection) {
            Ok(request) => request,
            Err(e) => return Err(self.fail(e)),
        };

        self.release_session();
        let id = SessionId(self.next_session);
        self.next_session += 1;
        self.session = Some(PlaybackSession { id, handle: None });

        info!(session = %id, cloned = request.is_cloned(), "speech request started");
        self.transition(PlaybackStatus::Requesting);

        Ok(SpeakOutcome::Started {
            session: id,
            request,
        })
    }

    /// Deliver the outcome of the network request for `session`.
    ///
    /// Responses for anything but the session currently waiting on the
    /// network are discarded.
    pub fn on_response(
        &mut self,
        session: SessionId,
        response: Result<SpeechPayload, SpeechError>,
    ) -> Result<(), SpeechError> {
        if !self.is_waiting_on(session) {
            debug!(%session, "discarding response for stale session");
            return Ok(());
        }

        let payload = match response {
            Ok(payload) => payload,
            Err(e) => return Err(self.fail(e)),
        };

        self.transition(PlaybackStatus::Decoding);
        let clip = match decode_payload(payload) {
            Ok(clip) => clip,
            Err(e) => return Err(self.fail(e)),
        };

        let handle = self.resources.register(clip.clone());
        if let Some(active) = self.session.as_mut() {
            active.handle = Some(handle.clone());
        }

        if let Err(e) = self.backend.start(&handle, &clip) {
            return Err(self.fail(e));
        }

        info!(%session, bytes = handle.len(), "playback started");
        self.transition(PlaybackStatus::Playing);
        Ok(())
    }

    /// The backend reached the end of the audio for `session`
    pub fn on_playback_ended(&mut self, session: SessionId) {
        if self.active_session() != Some(session) || self.status != PlaybackStatus::Playing {
            debug!(%session, "ignoring end-of-audio for inactive session");
            return;
        }
        info!(%session, "playback complete");
        self.transition(PlaybackStatus::Complete);
    }

    /// Halt playback and release the session. Has no effect unless a session
    /// is requesting, decoding or playing. A request already on the wire is
    /// not cancelled; its response will be discarded as stale.
    pub fn stop(&mut self) -> bool {
        if !self.status.is_active() {
            return false;
        }
        if let Some(session) = self.active_session() {
            info!(%session, from = ?self.status, "playback stopped");
        }
        self.release_session();
        self.transition(PlaybackStatus::Stopped);
        true
    }

    /// Drop the completed session's audio and return to `Idle`. The event
    /// history starts over from here.
    pub fn reset(&mut self) {
        self.release_session();
        self.events.clear_history();
        if self.status != PlaybackStatus::Idle {
            self.transition(PlaybackStatus::Idle);
        }
    }

    fn is_waiting_on(&self, session: SessionId) -> bool {
        self.active_session() == Some(session) && self.status == PlaybackStatus::Requesting
    }

    fn fail(&mut self, error: SpeechError) -> SpeechError {
        warn!(session = ?self.active_session(), error = %error, "speech request failed");
        self.release_session();
        self.transition(PlaybackStatus::Error(error.to_string()));
        error
    }

    fn release_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Some(handle) = session.handle {
            self.backend.halt();
            self.resources.revoke(&handle);
        }
    }

    fn transition(&mut self, status: PlaybackStatus) {
        self.status = status.clone();
        self.events.send(PlaybackEvent {
            session: self.active_session(),
            status,
        });
    }
}

impl<B: AudioBackend> Drop for PlaybackController<B> {
    fn drop(&mut self) {
        self.release_session();
    }
}
