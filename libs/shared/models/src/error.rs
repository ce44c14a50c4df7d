use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure talking to the clinic backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error ({status})")]
    Http { status: u16, message: Option<String> },

    #[error("Decode error: {0}")]
    Decode(String),

    /// A 404 on a lookup where absence has its own meaning (e.g. a slot already taken).
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Backend-supplied message when present, else `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ApiError::Http { message: Some(msg), .. } if !msg.trim().is_empty() => msg.clone(),
            ApiError::NotFound(msg) if !msg.trim().is_empty() => msg.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Не удалось связаться с сервером. Проверьте подключение и попробуйте снова".to_string(),
            ApiError::Http { status, .. } => self.message_or(&format!("Ошибка сервера: {}", status)),
            ApiError::Decode(_) => "Сервер вернул некорректные данные".to_string(),
            ApiError::NotFound(_) => self.message_or("Запрошенные данные не найдены"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match &err {
            ApiError::NotFound(_) => AppError::NotFound(err.user_message()),
            ApiError::Http { status: 404, .. } => AppError::NotFound(err.user_message()),
            _ => AppError::ExternalService(err.user_message()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ExternalService(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        tracing::error!("Error: {}: {}", status, message);

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
