use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Identifies one "speak" invocation. Responses and end-of-audio events that
/// carry an id other than the active session's are stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub(crate) u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum PlaybackStatus {
    Idle,
    Requesting,
    Decoding,
    Playing,
    /// Played to the end; download and share are available
    Complete,
    /// Cut off by the user
    Stopped,
    Error(String),
}

impl PlaybackStatus {
    /// States in which a new `speak` starts a request
    pub fn accepts_speak(&self) -> bool {
        matches!(
            self,
            Self::Idle | Self::Complete | Self::Stopped | Self::Error(_)
        )
    }

    /// States that own an in-flight or playing session
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Requesting | Self::Decoding | Self::Playing)
    }
}

/// Emitted by the controller on every status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackEvent {
    pub session: Option<SessionId>,
    pub status: PlaybackStatus,
}

/// A small wrapper over the event channel that also keeps the history,
/// mostly so tests can assert the exact transition sequence.
#[derive(Clone)]
pub struct PlaybackEvents {
    event_tx: mpsc::UnboundedSender<PlaybackEvent>,
    history: Arc<Mutex<Vec<PlaybackEvent>>>,
}

impl PlaybackEvents {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (event_tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                event_tx,
                history: Arc::new(Mutex::new(Vec::new())),
            },
            rx,
        )
    }

    pub fn send(&self, event: PlaybackEvent) {
        self.history
            .lock()
            .expect("event history lock poisoned")
            .push(event.clone());
        // receiver may have been dropped by a UI that does not care
        let _ = self.event_tx.send(event);
    }

    pub fn history(&self) -> Vec<PlaybackEvent> {
        self.history
            .lock()
            .expect("event history lock poisoned")
            .clone()
    }

    /// Forget recorded events; the channel is unaffected
    pub(crate) fn clear_history(&self) {
        self.history
            .lock()
            .expect("event history lock poisoned")
            .clear();
    }

    pub fn statuses(&self) -> Vec<PlaybackStatus> {
        self.history().into_iter().map(|e| e.status).collect()
    }
}
