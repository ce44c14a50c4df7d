use axum::{routing::get, Router};

use crate::handlers;
use crate::models::BookingState;

pub fn slot_routes(state: BookingState) -> Router {
    Router::new()
        .route("/doctor/{doctor_id}/slots", get(handlers::get_doctor_slots))
        .with_state(state)
}
