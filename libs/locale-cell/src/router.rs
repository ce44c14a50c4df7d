use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::services::LocaleStore;

pub fn locale_routes(store: Arc<LocaleStore>) -> Router {
    Router::new()
        .route("/locale", get(handlers::get_locale).put(handlers::set_locale))
        .with_state(store)
}
