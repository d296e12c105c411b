//! Translating the user's selection into exactly one synthesis request.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, Engine, DEFAULT_LANGUAGE};
use crate::error::SpeechError;
use crate::ssml::{encode_prosody, wrap_prosody};

/// Longest text accepted for a single synthesis request, in characters
pub const MAX_CHARACTERS: usize = 250;

/// Everything the user has chosen at the moment they press "speak"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechSelection {
    pub text: String,
    pub use_cloned_voice: bool,
    pub cloned_voice_id: Option<String>,
    pub language: String,
    pub voice: String,
    /// Explicit engine override; `None` uses the voice's first declared engine
    pub engine: Option<Engine>,
    pub rate: f64,
    pub pitch: f64,
}

impl Default for SpeechSelection {
    fn default() -> Self {
        let voice = catalog::language(DEFAULT_LANGUAGE)
            .map(|l| l.default_voice().id)
            .unwrap_or("Joanna");
        Self {
            text: String::new(),
            use_cloned_voice: false,
            cloned_voice_id: None,
            language: DEFAULT_LANGUAGE.to_string(),
            voice: voice.to_string(),
            engine: None,
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

/// Body for the standard synthesis endpoint. `text` is already wrapped in
/// prosody markup; the encoded attributes are kept alongside for inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardRequest {
    pub text: String,
    pub language: String,
    pub voice: String,
    pub engine: Engine,
    #[serde(skip)]
    pub rate_markup: String,
    #[serde(skip)]
    pub pitch_markup: String,
}

/// Body for cloned-voice synthesis. Text is sent as typed and rate/pitch as
/// raw multipliers; the service decides what to do with them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClonedRequest {
    pub text: String,
    pub cloned_voice_id: String,
    pub rate: f64,
    pub pitch: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SpeechRequest {
    Standard(StandardRequest),
    Cloned(ClonedRequest),
}

impl SpeechRequest {
    /// The text as it goes over the wire
    pub fn text(&self) -> &str {
        match self {
            Self::Standard(r) => &r.text,
            Self::Cloned(r) => &r.text,
        }
    }

    pub fn is_cloned(&self) -> bool {
        matches!(self, Self::Cloned(_))
    }
}

/// Check the text alone. Shared by the builder and the application state,
/// which shows the message before the user ever presses "speak".
pub fn validate_text(text: &str) -> Result<(), SpeechError> {
    if text.trim().is_empty() {
        return Err(SpeechError::validation(
            "Please enter some text to convert to speech",
        ));
    }
    if text.chars().count() > MAX_CHARACTERS {
        return Err(SpeechError::validation(format!(
            "Maximum {MAX_CHARACTERS} characters allowed."
        )));
    }
    Ok(())
}

/// Build the request for one "speak" action.
///
/// Cloned mode without a cloned voice is an error, never a fallback to the
/// standard voice.
pub fn build_request(selection: &SpeechSelection) -> Result<SpeechRequest, SpeechError> {
    validate_text(&selection.text)?;

    for (label, value) in [("rate", selection.rate), ("pitch", selection.pitch)] {
        if !value.is_finite() {
            return Err(SpeechError::validation(format!(
                "{label} must be a finite number"
            )));
        }
    }

    if selection.use_cloned_voice {
        let cloned_voice_id = selection
            .cloned_voice_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SpeechError::invalid_selection("no cloned voice selected"))?;

        return Ok(SpeechRequest::Cloned(ClonedRequest {
            text: selection.text.clone(),
            cloned_voice_id,
            rate: selection.rate,
            pitch: selection.pitch,
        }));
    }

    let language = catalog::language(&selection.language).ok_or_else(|| {
        SpeechError::invalid_selection(format!("unknown language: {}", selection.language))
    })?;
    let voice = language.voice(&selection.voice).ok_or_else(|| {
        SpeechError::invalid_selection(format!(
            "voice {} is not available for {}",
            selection.voice, language.name
        ))
    })?;

    let engine = match selection.engine {
        Some(engine) if voice.supports(engine) => engine,
        Some(engine) => {
            return Err(SpeechError::invalid_selection(format!(
                "voice {} does not support the {engine} engine",
                voice.id
            )))
        }
        None => voice.default_engine(),
    };

    Ok(SpeechRequest::Standard(StandardRequest {
        text: wrap_prosody(&selection.text, selection.rate, selection.pitch),
        language: language.code.to_string(),
        voice: voice.id.to_string(),
        engine,
        rate_markup: encode_prosody(selection.rate),
        pitch_markup: encode_prosody(selection.pitch),
    }))
}
