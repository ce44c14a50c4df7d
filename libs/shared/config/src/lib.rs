use std::env;
use std::str::FromStr;
use tracing::warn;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_LOCALE_STORE_PATH: &str = ".clinic-locale";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_SLOT_ROW_WIDTH: usize = 4;
const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub locale_store_path: String,
    pub bind_address: String,
    pub slot_row_width: usize,
    pub api_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            locale_store_path: DEFAULT_LOCALE_STORE_PATH.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            slot_row_width: DEFAULT_SLOT_ROW_WIDTH,
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("CLINIC_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| {
                    warn!("CLINIC_API_URL not set, using default {}", DEFAULT_API_URL);
                    DEFAULT_API_URL.to_string()
                }),
            locale_store_path: env::var("LOCALE_STORE_PATH")
                .unwrap_or_else(|_| {
                    warn!("LOCALE_STORE_PATH not set, using default");
                    DEFAULT_LOCALE_STORE_PATH.to_string()
                }),
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
            slot_row_width: parse_var("SLOT_ROW_WIDTH", DEFAULT_SLOT_ROW_WIDTH),
            api_timeout_secs: parse_var("API_TIMEOUT_SECS", DEFAULT_API_TIMEOUT_SECS),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - backend origin is empty");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }
}

fn parse_var<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}
