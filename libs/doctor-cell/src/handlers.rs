use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{debug, warn};

use shared_models::{ApiError, AppError};
use slot_cell::{BookingState, SlotPageQuery};

use crate::models::{DoctorCard, DoctorListView, DoctorPageView};
use crate::services::{DoctorDetailView, DoctorService};

// ==============================================================================
// DOCTOR LIST
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<BookingState>) -> Json<DoctorListView> {
    let doctor_service = DoctorService::new(state.context.api.clone());

    let view = match doctor_service.list_doctors().await {
        Ok(doctors) => DoctorListView {
            doctors: doctors
                .iter()
                .filter(|d| d.is_active)
                .map(DoctorCard::from)
                .collect(),
            error: None,
        },
        Err(e) => {
            warn!("Doctor list unavailable: {}", e);
            DoctorListView {
                doctors: Vec::new(),
                error: Some(e.user_message()),
            }
        }
    };

    Json(view)
}

// ==============================================================================
// DOCTOR DETAIL
// ==============================================================================

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<BookingState>,
    Path(doctor_id): Path<i64>,
    Query(query): Query<SlotPageQuery>,
) -> Result<Json<DoctorPageView>, AppError> {
    debug!("Doctor page {} with {:?}", doctor_id, query);

    if doctor_id <= 0 {
        return Err(AppError::BadRequest(format!("Invalid doctor id: {}", doctor_id)));
    }

    let window = query.window(state.context.clock.today())?;
    let detail = DoctorDetailView::new(&state.context, doctor_id, Some(Arc::clone(&state.overlay)));
    detail.slots().navigate(window, query.date).await;
    detail.load().await;

    let error = detail.error().await;
    let view = detail.view().await;
    detail.close();

    match error {
        Some(e @ ApiError::NotFound(_)) => Err(AppError::from(e)),
        _ => Ok(Json(view)),
    }
}
