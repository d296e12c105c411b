use serde::{Deserialize, Serialize};

/// Synthesis engine a standard voice can run on
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, strum::VariantArray,
)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Standard,
    Neural,
}

impl Engine {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Neural => "neural",
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<&str> for Engine {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "neural" => Ok(Self::Neural),
            _ => Err(format!(
                "Invalid engine: {value}. Valid options: standard, neural"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    pub name: &'static str,
    pub id: &'static str,
    /// Engines in preference order. Empty means the service default.
    pub engines: &'static [Engine],
}

impl Voice {
    /// The engine a request uses when nothing narrower was chosen
    pub fn default_engine(&self) -> Engine {
        self.engines.first().copied().unwrap_or_default()
    }

    pub fn supports(&self, engine: Engine) -> bool {
        if self.engines.is_empty() {
            return engine == Engine::Standard;
        }
        self.engines.contains(&engine)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    /// Never empty; the first entry is the default voice
    pub voices: &'static [Voice],
}

impl Language {
    pub fn default_voice(&self) -> &'static Voice {
        &self.voices[0]
    }

    pub fn voice(&self, id: &str) -> Option<&'static Voice> {
        self.voices.iter().find(|v| v.id == id)
    }
}

const BOTH: &[Engine] = &[Engine::Standard, Engine::Neural];
const STANDARD: &[Engine] = &[Engine::Standard];

const fn voice(id: &'static str, engines: &'static [Engine]) -> Voice {
    Voice {
        name: id,
        id,
        engines,
    }
}

/// Languages offered for standard voices, in display order
pub static LANGUAGES: &[Language] = &[
    Language {
        code: "en-US",
        name: "English (US)",
        voices: &[
            voice("Joanna", &[]),
            voice("Matthew", BOTH),
            voice("Ivy", BOTH),
            voice("Justin", BOTH),
            voice("Kendra", BOTH),
            voice("Kimberly", BOTH),
            voice("Salli", BOTH),
            voice("Joey", BOTH),
            voice("Kevin", BOTH),
            voice("Ruth", BOTH),
            voice("Stephen", BOTH),
        ],
    },
    Language {
        code: "en-GB",
        name: "English (British)",
        voices: &[
            voice("Amy", BOTH),
            voice("Emma", BOTH),
            voice("Brian", BOTH),
            voice("Arthur", STANDARD),
        ],
    },
    Language {
        code: "en-IN",
        name: "English (Indian)",
        voices: &[voice("Aditi", STANDARD), voice("Raveena", STANDARD)],
    },
    Language {
        code: "hi-IN",
        name: "Hindi",
        voices: &[voice("Aditi", STANDARD)],
    },
    Language {
        code: "fr-FR",
        name: "French (France)",
        voices: &[voice("Celine", STANDARD), voice("Mathieu", STANDARD)],
    },
    Language {
        code: "de-DE",
        name: "German",
        voices: &[voice("Marlene", STANDARD), voice("Hans", STANDARD)],
    },
    Language {
        code: "es-ES",
        name: "Spanish (Spain)",
        voices: &[voice("Conchita", STANDARD), voice("Enrique", STANDARD)],
    },
    Language {
        code: "ja-JP",
        name: "Japanese",
        voices: &[voice("Mizuki", STANDARD)],
    },
    Language {
        code: "zh-CN",
        name: "Chinese (Mandarin)",
        voices: &[voice("Zhiyu", BOTH)],
    },
    Language {
        code: "ar-SA",
        name: "Arabic",
        voices: &[voice("Zeina", STANDARD)],
    },
    Language {
        code: "ar-AE",
        name: "Arabic (Gulf)",
        voices: &[voice("Hala", STANDARD), voice("Zayd", STANDARD)],
    },
];

pub const DEFAULT_LANGUAGE: &str = "en-US";

pub fn language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

pub fn default_voice(code: &str) -> Option<&'static Voice> {
    language(code).map(Language::default_voice)
}

/// Engine a voice runs on by default, or `None` if the voice is not offered
/// for that language
pub fn engine_for(language_code: &str, voice_id: &str) -> Option<Engine> {
    language(language_code)?
        .voice(voice_id)
        .map(Voice::default_engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::VariantArray;

    #[test]
    fn test_every_language_has_a_voice() {
        for language in LANGUAGES {
            assert!(!language.voices.is_empty(), "{} has no voices", language.code);
        }
    }

    #[test]
    fn test_default_voice_is_first() {
        let en_gb = language("en-GB").unwrap();
        assert_eq!(en_gb.default_voice().id, "Amy");
        assert_eq!(language(DEFAULT_LANGUAGE).unwrap().default_voice().id, "Joanna");
    }

    #[test]
    fn test_engine_for() {
        assert_eq!(engine_for("en-US", "Joanna"), Some(Engine::Standard));
        assert_eq!(engine_for("en-US", "Matthew"), Some(Engine::Standard));
        assert_eq!(engine_for("en-GB", "Arthur"), Some(Engine::Standard));
        assert_eq!(engine_for("en-GB", "Joanna"), None);
        assert_eq!(engine_for("xx-XX", "Joanna"), None);
    }

    #[test]
    fn test_supports() {
        let matthew = language("en-US").unwrap().voice("Matthew").unwrap();
        assert!(matthew.supports(Engine::Neural));
        let joanna = language("en-US").unwrap().voice("Joanna").unwrap();
        assert!(joanna.supports(Engine::Standard));
        assert!(!joanna.supports(Engine::Neural));
    }

    #[test]
    fn test_engine_names_parse_back() {
        for engine in Engine::VARIANTS {
            assert_eq!(Engine::try_from(engine.name()), Ok(*engine));
        }
        assert!(Engine::try_from("turbo").is_err());
    }
}
