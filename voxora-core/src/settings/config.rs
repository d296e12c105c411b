use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::{self, Engine, DEFAULT_LANGUAGE};
use crate::request::SpeechSelection;

/// Where and how to reach the remote speech service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every route is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Route for standard-voice synthesis
    #[serde(default = "default_synthesis_route")]
    pub synthesis_route: String,

    /// Route for cloned-voice synthesis
    #[serde(default = "default_synthesis_route")]
    pub cloned_synthesis_route: String,

    /// Upper bound on a single request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_synthesis_route() -> String {
    "/tts".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            synthesis_route: default_synthesis_route(),
            cloned_synthesis_route: default_synthesis_route(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Selection used when the user does not say otherwise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechDefaults {
    #[serde(default = "default_language")]
    pub language: String,

    /// Defaults to the language's first voice
    #[serde(default)]
    pub voice: Option<String>,

    #[serde(default)]
    pub engine: Option<Engine>,

    #[serde(default = "default_multiplier")]
    pub rate: f64,

    #[serde(default = "default_multiplier")]
    pub pitch: f64,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_multiplier() -> f64 {
    1.0
}

impl Default for SpeechDefaults {
    fn default() -> Self {
        Self {
            language: default_language(),
            voice: None,
            engine: None,
            rate: default_multiplier(),
            pitch: default_multiplier(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Directory downloads are written to. Defaults to the working directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_file_name() -> String {
    "speech.mp3".to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: default_file_name(),
        }
    }
}

impl OutputSettings {
    pub fn download_path(&self) -> PathBuf {
        self.directory
            .clone()
            .unwrap_or_default()
            .join(&self.file_name)
    }
}

/// Core application settings, stored as TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub speech: SpeechDefaults,

    #[serde(default)]
    pub output: OutputSettings,
}

impl Settings {
    /// A selection seeded from the defaults, with `text` filled in
    pub fn selection(&self, text: impl Into<String>) -> SpeechSelection {
        let voice = self.speech.voice.clone().unwrap_or_else(|| {
            catalog::default_voice(&self.speech.language)
                .map(|v| v.id.to_string())
                .unwrap_or_default()
        });
        SpeechSelection {
            text: text.into(),
            use_cloned_voice: false,
            cloned_voice_id: None,
            language: self.speech.language.clone(),
            voice,
            engine: self.speech.engine,
            rate: self.speech.rate,
            pitch: self.speech.pitch,
        }
    }
}
