use thiserror::Error;

/// Everything that can go wrong between pressing "speak" and hearing audio.
///
/// Every variant carries the user-visible message. None of them are retried
/// automatically; the caller has to invoke `speak` again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    /// Empty text, text over the character limit, or an out-of-domain value
    #[error("{0}")]
    Validation(String),

    /// Cloned mode without a cloned voice, or a voice that is not selectable
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Transport failure, timeout, or non-2xx response
    #[error("{0}")]
    Network(String),

    /// Malformed base64 or an empty audio stream
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    /// The audio subsystem refused to load or play the resource
    #[error("Playback failed: {0}")]
    Playback(String),
}

impl SpeechError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_selection(message: impl Into<String>) -> Self {
        Self::InvalidSelection(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn playback(message: impl Into<String>) -> Self {
        Self::Playback(message.into())
    }
}

impl From<reqwest::Error> for SpeechError {
    fn from(source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::Network(format!("Request timed out: {source}"));
        }
        if let Some(status) = source.status() {
            return Self::Network(format!("HTTP error! status: {}", status.as_u16()));
        }
        Self::Network("Network or CORS error".to_string())
    }
}

impl From<base64::DecodeError> for SpeechError {
    fn from(source: base64::DecodeError) -> Self {
        Self::Decode(source.to_string())
    }
}
