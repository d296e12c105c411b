//! The single source of truth for what the user has chosen.

use crate::catalog::{self, Engine, DEFAULT_LANGUAGE};
use crate::error::SpeechError;
use crate::request::{validate_text, SpeechSelection, MAX_CHARACTERS};
use crate::settings::Settings;
use crate::voices::{ready_voices, ClonedVoice};

pub const MIN_MULTIPLIER: f64 = 0.5;
pub const MAX_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    text: String,
    text_error: Option<String>,
    language: String,
    voice: String,
    engine: Engine,
    use_cloned_voice: bool,
    cloned_voices: Vec<ClonedVoice>,
    cloned_voice_id: Option<String>,
    rate: f64,
    pitch: f64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl AppState {
    /// Start from the saved defaults. Unknown languages or voices in the
    /// settings fall back to the catalog defaults.
    pub fn from_settings(settings: &Settings) -> Self {
        let language = catalog::language(&settings.speech.language)
            .or_else(|| catalog::language(DEFAULT_LANGUAGE))
            .unwrap_or(&catalog::LANGUAGES[0]);
        let voice = settings
            .speech
            .voice
            .as_deref()
            .and_then(|id| language.voice(id))
            .unwrap_or_else(|| language.default_voice());
        let engine = settings
            .speech
            .engine
            .filter(|e| voice.supports(*e))
            .unwrap_or_else(|| voice.default_engine());

        Self {
            text: String::new(),
            text_error: None,
            language: language.code.to_string(),
            voice: voice.id.to_string(),
            engine,
            use_cloned_voice: false,
            cloned_voices: Vec::new(),
            cloned_voice_id: None,
            rate: clamp_multiplier(settings.speech.rate),
            pitch: clamp_multiplier(settings.speech.pitch),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Message to show under the text box, if any
    pub fn text_error(&self) -> Option<&str> {
        self.text_error.as_deref()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    pub fn engine(&self) -> Engine {
        self.engine
    }

    pub fn is_using_cloned_voice(&self) -> bool {
        self.use_cloned_voice
    }

    pub fn cloned_voices(&self) -> &[ClonedVoice] {
        &self.cloned_voices
    }

    pub fn cloned_voice_id(&self) -> Option<&str> {
        self.cloned_voice_id.as_deref()
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    /// Remaining characters before the limit; negative when over it
    pub fn remaining_characters(&self) -> isize {
        MAX_CHARACTERS as isize - self.text.chars().count() as isize
    }

    /// Store the text as typed. Only the length limit is reported here; empty
    /// text is reported when the user tries to speak it.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.text_error = if self.text.chars().count() > MAX_CHARACTERS {
            validate_text(&self.text).err().map(|e| e.to_string())
        } else {
            None
        };
    }

    pub fn select_language(&mut self, code: &str) -> Result<(), SpeechError> {
        let language = catalog::language(code)
            .ok_or_else(|| SpeechError::invalid_selection(format!("unknown language: {code}")))?;
        self.language = language.code.to_string();
        if !self.use_cloned_voice {
            let voice = language.default_voice();
            self.voice = voice.id.to_string();
            self.engine = voice.default_engine();
        }
        Ok(())
    }

    /// In standard mode `id` names a catalog voice of the current language;
    /// in cloned mode it names a ready cloned voice.
    pub fn select_voice(&mut self, id: &str) -> Result<(), SpeechError> {
        if self.use_cloned_voice {
            let voice = ready_voices(&self.cloned_voices)
                .find(|v| v.id == id)
                .ok_or_else(|| {
                    SpeechError::invalid_selection(format!("cloned voice {id} is not ready"))
                })?;
            self.cloned_voice_id = Some(voice.id.clone());
            return Ok(());
        }

        let language = catalog::language(&self.language).ok_or_else(|| {
            SpeechError::invalid_selection(format!("unknown language: {}", self.language))
        })?;
        let voice = language.voice(id).ok_or_else(|| {
            SpeechError::invalid_selection(format!(
                "voice {id} is not available for {}",
                language.name
            ))
        })?;
        self.voice = voice.id.to_string();
        self.engine = voice.default_engine();
        Ok(())
    }

    /// Override the engine for the current standard voice
    pub fn select_engine(&mut self, engine: Engine) -> Result<(), SpeechError> {
        let voice = catalog::language(&self.language)
            .and_then(|l| l.voice(&self.voice))
            .ok_or_else(|| SpeechError::invalid_selection("no standard voice selected"))?;
        if !voice.supports(engine) {
            return Err(SpeechError::invalid_selection(format!(
                "voice {} does not support the {engine} engine",
                voice.id
            )));
        }
        self.engine = engine;
        Ok(())
    }

    /// Replace the cloned voice list, keeping cloned mode pointed at a ready voice
    pub fn set_cloned_voices(&mut self, voices: Vec<ClonedVoice>) {
        self.cloned_voices = voices;
        if !self.use_cloned_voice {
            return;
        }

        let still_ready = self
            .cloned_voice_id
            .as_deref()
            .is_some_and(|id| ready_voices(&self.cloned_voices).any(|v| v.id == id));
        if still_ready {
            return;
        }

        let first_ready = ready_voices(&self.cloned_voices)
            .next()
            .map(|v| v.id.clone());
        match first_ready {
            Some(id) => self.cloned_voice_id = Some(id),
            None => {
                tracing::info!("no ready cloned voices left, switching to standard voices");
                self.leave_cloned_mode();
            }
        }
    }

    pub fn use_cloned_voice(&mut self, enabled: bool) -> Result<(), SpeechError> {
        if !enabled {
            self.leave_cloned_mode();
            return Ok(());
        }

        let first = ready_voices(&self.cloned_voices)
            .next()
            .ok_or_else(|| SpeechError::invalid_selection("no cloned voices are ready"))?;
        self.cloned_voice_id = Some(first.id.clone());
        self.use_cloned_voice = true;
        Ok(())
    }

    /// Forget a deleted cloned voice
    pub fn remove_cloned_voice(&mut self, id: &str) {
        self.cloned_voices.retain(|v| v.id != id);
        if self.cloned_voice_id.as_deref() == Some(id) {
            self.leave_cloned_mode();
        }
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.rate = clamp_multiplier(rate);
    }

    pub fn set_pitch(&mut self, pitch: f64) {
        self.pitch = clamp_multiplier(pitch);
    }

    pub fn selection(&self) -> SpeechSelection {
        SpeechSelection {
            text: self.text.clone(),
            use_cloned_voice: self.use_cloned_voice,
            cloned_voice_id: self.cloned_voice_id.clone(),
            language: self.language.clone(),
            voice: self.voice.clone(),
            engine: Some(self.engine),
            rate: self.rate,
            pitch: self.pitch,
        }
    }

    fn leave_cloned_mode(&mut self) {
        self.use_cloned_voice = false;
        self.cloned_voice_id = None;
        if let Some(language) = catalog::language(&self.language) {
            let voice = language.default_voice();
            self.voice = voice.id.to_string();
            self.engine = voice.default_engine();
        }
    }
}

fn clamp_multiplier(value: f64) -> f64 {
    if value.is_nan() {
        return 1.0;
    }
    value.clamp(MIN_MULTIPLIER, MAX_MULTIPLIER)
}
