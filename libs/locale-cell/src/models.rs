use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::Locale;

/// Broadcast on every effective locale switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocaleChanged {
    pub previous: Locale,
    pub current: Locale,
}

#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("Failed to persist locale preference: {0}")]
    Persist(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
pub struct SetLocaleRequest {
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct LanguageOption {
    pub code: &'static str,
    pub label: &'static str,
    pub is_current: bool,
}

#[derive(Debug, Serialize)]
pub struct LocaleView {
    pub language: Locale,
    pub available: Vec<LanguageOption>,
}

impl LocaleView {
    pub fn new(current: Locale) -> Self {
        Self {
            language: current,
            available: Locale::ALL
                .iter()
                .map(|locale| LanguageOption {
                    code: locale.code(),
                    label: locale.label(),
                    is_current: *locale == current,
                })
                .collect(),
        }
    }
}
