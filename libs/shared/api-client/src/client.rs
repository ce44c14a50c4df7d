use std::sync::Arc;
use std::time::Duration;

use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, CONTENT_TYPE},
    Method,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_models::{ApiError, Locale, LocaleProvider};

/// Gateway to the clinic REST backend. Every request carries the current
/// locale as `Accept-Language`.
#[derive(Clone)]
pub struct ClinicApiClient {
    client: Client,
    base_url: String,
    locale: Arc<dyn LocaleProvider>,
}

impl ClinicApiClient {
    pub fn new(config: &AppConfig, locale: Arc<dyn LocaleProvider>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout ({}), using defaults", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            locale,
        }
    }

    pub fn current_locale(&self) -> Locale {
        self.locale.current()
    }

    fn get_headers(&self, with_body: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(self.locale.current().code()),
        );
        if with_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let headers = self.get_headers(body.is_some());

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("API error ({}): {}", status, text);
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: extract_error_message(&text),
            });
        }

        serde_json::from_str::<T>(&text).map_err(|e| {
            error!("Failed to decode response from {}: {}", url, e);
            ApiError::Decode(e.to_string())
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

/// List endpoints answer with a bare array or a paginated `{"results": [..]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Paginated { results } => results,
        }
    }
}

/// Pulls the human-readable message out of a `{"error": ..}` or `{"detail": ..}` body.
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "detail"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_field() {
        assert_eq!(
            extract_error_message(r#"{"error": "Слот уже занят"}"#),
            Some("Слот уже занят".to_string())
        );
    }

    #[test]
    fn test_extract_detail_field() {
        assert_eq!(
            extract_error_message(r#"{"detail": "Not found."}"#),
            Some("Not found.".to_string())
        );
    }

    #[test]
    fn test_extract_ignores_non_json_and_blank() {
        assert_eq!(extract_error_message("<html>502</html>"), None);
        assert_eq!(extract_error_message(r#"{"error": "  "}"#), None);
        assert_eq!(extract_error_message(r#"{"error": 42}"#), None);
    }

    #[test]
    fn test_list_envelope_accepts_both_shapes() {
        let bare: ListEnvelope<i64> = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(bare.into_vec(), vec![1, 2]);

        let paged: ListEnvelope<i64> = serde_json::from_str(r#"{"count": 1, "results": [3]}"#).unwrap();
        assert_eq!(paged.into_vec(), vec![3]);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = AppConfig {
            api_base_url: "http://clinic.test/".to_string(),
            ..AppConfig::default()
        };
        let client = ClinicApiClient::new(&config, Arc::new(Locale::Ky));
        assert_eq!(client.get_base_url(), "http://clinic.test");
        assert_eq!(client.current_locale(), Locale::Ky);
    }
}
