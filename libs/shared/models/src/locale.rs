use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display and request language. Sent verbatim as `Accept-Language`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    Ky,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Ru, Locale::Ky];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Ru => "ru",
            Locale::Ky => "ky",
        }
    }

    /// Name of the language in that language, for the switcher.
    pub fn label(&self) -> &'static str {
        match self {
            Locale::Ru => "Русский",
            Locale::Ky => "Кыргызча",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported language: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" => Ok(Locale::Ru),
            "ky" => Ok(Locale::Ky),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}

/// Source of the locale attached to outgoing backend requests.
pub trait LocaleProvider: Send + Sync {
    fn current(&self) -> Locale;
}

impl LocaleProvider for Locale {
    fn current(&self) -> Locale {
        *self
    }
}
