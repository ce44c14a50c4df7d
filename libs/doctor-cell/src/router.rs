use axum::{routing::get, Router};

use slot_cell::BookingState;

use crate::handlers;

pub fn doctor_routes(state: BookingState) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/doctors", get(handlers::list_doctors))
        .route("/doctors/{doctor_id}", get(handlers::get_doctor))
        .with_state(state)
}
