use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::debug;

use shared_models::AppError;

use crate::models::{BookingState, SlotPageQuery, SlotSelectionView};
use crate::services::SlotSelector;

/// Builds the slot picker for one request: the week around `anchor` (or
/// `date`, or today) moved by `week`, with `date` selected when given.
pub async fn selection_for(
    state: &BookingState,
    doctor_id: i64,
    query: &SlotPageQuery,
) -> Result<SlotSelectionView, AppError> {
    let window = query.window(state.context.clock.today())?;
    let selector = SlotSelector::new(&state.context, doctor_id, Some(Arc::clone(&state.overlay)));

    selector.navigate(window, query.date).await;
    selector.refresh().await;

    let view = selector.view().await;
    selector.close();
    Ok(view)
}

#[axum::debug_handler]
pub async fn get_doctor_slots(
    State(state): State<BookingState>,
    Path(doctor_id): Path<i64>,
    Query(query): Query<SlotPageQuery>,
) -> Result<Json<SlotSelectionView>, AppError> {
    debug!("Slot page for doctor {} with {:?}", doctor_id, query);

    if doctor_id <= 0 {
        return Err(AppError::BadRequest(format!("Invalid doctor id: {}", doctor_id)));
    }

    Ok(Json(selection_for(&state, doctor_id, &query).await?))
}
