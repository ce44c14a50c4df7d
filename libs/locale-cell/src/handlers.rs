use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::warn;

use shared_models::{AppError, Locale};

use crate::models::{LocaleView, SetLocaleRequest};
use crate::services::LocaleStore;

#[axum::debug_handler]
pub async fn get_locale(
    State(store): State<Arc<LocaleStore>>,
) -> Json<LocaleView> {
    Json(LocaleView::new(store.current()))
}

#[axum::debug_handler]
pub async fn set_locale(
    State(store): State<Arc<LocaleStore>>,
    Json(request): Json<SetLocaleRequest>,
) -> Result<Json<LocaleView>, AppError> {
    let locale: Locale = request.language.parse()
        .map_err(|e: shared_models::UnknownLocale| AppError::BadRequest(e.to_string()))?;

    store.set(locale).await.map_err(|e| {
        warn!("Locale switch to {} failed: {}", locale, e);
        AppError::Internal(e.to_string())
    })?;

    Ok(Json(LocaleView::new(store.current())))
}
