use serde::{Deserialize, Serialize};

/// Languages the intake conversation and UI localisation support.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "or")]
    Odia,
}

impl Language {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::English),
            "hi" => Some(Language::Hindi),
            "or" => Some(Language::Odia),
            _ => None,
        }
    }

    /// Lenient decode for stored values; anything unknown reads back as English.
    pub fn from_stored(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Odia => "or",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Odia => "Odia",
        }
    }
}
