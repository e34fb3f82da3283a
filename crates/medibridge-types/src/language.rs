//! Speaker roles and supported language codes.
//!
//! Both sets are closed: a conversation has exactly two speakers, and the
//! translation engine is only ever asked for one of six language codes.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Who is speaking in a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Doctor,
    Patient,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Doctor => write!(f, "Doctor"),
            Role::Patient => write!(f, "Patient"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "doctor" => Ok(Role::Doctor),
            "patient" => Ok(Role::Patient),
            other => Err(format!("invalid role: '{other}'")),
        }
    }
}

/// A language the translation engine is asked to translate from or to.
///
/// Serialized as the engine-facing code (`"en"`, `"zh-CN"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "zh-CN")]
    ChineseSimplified,
}

impl Language {
    /// Every supported language, in selector order.
    pub const ALL: [Language; 6] = [
        Language::English,
        Language::French,
        Language::German,
        Language::Spanish,
        Language::Hindi,
        Language::ChineseSimplified,
    ];

    /// The code passed to the translation engine and stored on messages.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
            Language::German => "de",
            Language::Spanish => "es",
            Language::Hindi => "hi",
            Language::ChineseSimplified => "zh-CN",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported language code: '{s}'"))
    }
}

/// Per-role language selection for a session.
///
/// Changing it only affects turns submitted afterwards; persisted messages
/// keep the pair they were translated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageConfig {
    pub doctor: Language,
    pub patient: Language,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            doctor: Language::English,
            patient: Language::Hindi,
        }
    }
}

/// The (source, target) pair a turn is translated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: Language,
    pub target: Language,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Doctor, Role::Patient] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
        assert_eq!("PATIENT".parse::<Role>().unwrap(), Role::Patient);
        assert!("nurse".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_uses_display_name() {
        let json = serde_json::to_string(&Role::Doctor).unwrap();
        assert_eq!(json, "\"Doctor\"");
    }

    #[test]
    fn test_language_codes() {
        let codes: Vec<&str> = Language::ALL.iter().map(|l| l.code()).collect();
        assert_eq!(codes, vec!["en", "fr", "de", "es", "hi", "zh-CN"]);
    }

    #[test]
    fn test_language_parse_is_case_insensitive() {
        assert_eq!("zh-cn".parse::<Language>().unwrap(), Language::ChineseSimplified);
        assert_eq!(" HI ".parse::<Language>().unwrap(), Language::Hindi);
        assert!("pt".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_serde_uses_code() {
        let json = serde_json::to_string(&Language::ChineseSimplified).unwrap();
        assert_eq!(json, "\"zh-CN\"");
        let parsed: Language = serde_json::from_str("\"de\"").unwrap();
        assert_eq!(parsed, Language::German);
    }

    #[test]
    fn test_language_config_default() {
        let config = LanguageConfig::default();
        assert_eq!(config.doctor, Language::English);
        assert_eq!(config.patient, Language::Hindi);
    }
}
