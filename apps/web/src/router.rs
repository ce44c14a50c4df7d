use std::sync::Arc;

use axum::Router;

use appointment_cell::router::appointment_routes;
use doctor_cell::router::doctor_routes;
use locale_cell::router::locale_routes;
use locale_cell::LocaleStore;
use shared_config::AppConfig;
use shared_utils::ClinicContext;
use slot_cell::router::slot_routes;
use slot_cell::BookingState;

/// Process-wide pieces the cells share: the locale store and the booking
/// state built on top of it.
#[derive(Clone)]
pub struct AppState {
    pub locale: Arc<LocaleStore>,
    pub booking: BookingState,
}

impl AppState {
    pub fn new(config: AppConfig, locale: Arc<LocaleStore>) -> Self {
        let context = ClinicContext::new(config, locale.clone());
        Self {
            locale,
            booking: BookingState::new(context),
        }
    }

    pub fn with_context(context: ClinicContext, locale: Arc<LocaleStore>) -> Self {
        Self {
            locale,
            booking: BookingState::new(context),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(doctor_routes(state.booking.clone()))
        .merge(slot_routes(state.booking.clone()))
        .merge(appointment_routes(state.booking))
        .merge(locale_routes(state.locale))
}
