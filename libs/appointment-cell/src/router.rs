use axum::{routing::get, Router};

use slot_cell::BookingState;

use crate::handlers;

pub fn appointment_routes(state: BookingState) -> Router {
    Router::new()
        .route(
            "/appointment-confirmation/{doctor_id}/{slot_id}",
            get(handlers::get_confirmation).post(handlers::submit_confirmation),
        )
        .route("/appointment-success/{doctor_id}", get(handlers::get_success))
        .with_state(state)
}
