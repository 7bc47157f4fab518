//! Learner proficiency levels and the supported-language table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language used when a request does not name one.
pub const DEFAULT_LANGUAGE: &str = "English";

/// Speech model used for languages without a dedicated voice.
pub const DEFAULT_VOICE_MODEL: &str = "aura-asteria-en";

/// A learner's proficiency level in the target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Proficiency {
    /// Just starting out.
    #[default]
    Beginner,
    /// Comfortable with everyday conversation.
    Intermediate,
    /// Fluent or near-fluent.
    Advanced,
}

impl Proficiency {
    /// Returns the lowercase name used in prompts and responses.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Proficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognised proficiency level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseProficiencyError {
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for ParseProficiencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown proficiency '{}', expected beginner, intermediate or advanced",
            self.value
        )
    }
}

impl std::error::Error for ParseProficiencyError {}

impl FromStr for Proficiency {
    type Err = ParseProficiencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(ParseProficiencyError {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Proficiency {
    type Error = ParseProficiencyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An entry in the supported-language table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    /// Short language code.
    pub code: &'static str,
    /// Display name, also used as the session language.
    pub name: &'static str,
    /// Whether spoken replies are available.
    pub tts_supported: bool,
    /// Speech model for spoken replies.
    #[serde(skip)]
    pub voice_model: Option<&'static str>,
}

/// Languages offered to learners.
pub const SUPPORTED_LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        code: "en",
        name: "English",
        tts_supported: true,
        voice_model: Some("aura-asteria-en"),
    },
    LanguageInfo {
        code: "es",
        name: "Spanish",
        tts_supported: true,
        voice_model: Some("aura-2-estrella-es"),
    },
    LanguageInfo {
        code: "fr",
        name: "French",
        tts_supported: true,
        voice_model: Some("aura-athena-fr"),
    },
    LanguageInfo {
        code: "de",
        name: "German",
        tts_supported: true,
        voice_model: Some("aura-orion-de"),
    },
    LanguageInfo {
        code: "it",
        name: "Italian",
        tts_supported: false,
        voice_model: None,
    },
    LanguageInfo {
        code: "jp",
        name: "Japanese",
        tts_supported: false,
        voice_model: None,
    },
    LanguageInfo {
        code: "zh",
        name: "Chinese",
        tts_supported: false,
        voice_model: None,
    },
    LanguageInfo {
        code: "ko",
        name: "Korean",
        tts_supported: false,
        voice_model: None,
    },
];

/// Looks up a language by display name or code, case-insensitively.
#[must_use]
pub fn find_language(name_or_code: &str) -> Option<&'static LanguageInfo> {
    let needle = name_or_code.trim();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|lang| {
            lang.name.eq_ignore_ascii_case(needle) || lang.code.eq_ignore_ascii_case(needle)
        })
}

/// Returns the speech model for a language, falling back to the English voice.
#[must_use]
pub fn voice_model_for(language: &str) -> &'static str {
    find_language(language)
        .and_then(|lang| lang.voice_model)
        .unwrap_or(DEFAULT_VOICE_MODEL)
}
