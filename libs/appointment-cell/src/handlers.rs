use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

use doctor_cell::Doctor;
use shared_models::AppError;
use slot_cell::{display, BookingState, TimeSlot};

use crate::models::{
    BookingError, ConfirmationView, ContactField, SubmitRequest, SubmitResponse, SuccessView,
};
use crate::services::{AppointmentService, ConfirmationFlow};

pub fn confirmation_view(doctor: &Doctor, slot: &TimeSlot) -> ConfirmationView {
    let type_label = slot.slot_type.display_name();
    let date_label = display::long_date(slot.date);
    let time = display::clock(slot.start_time);

    ConfirmationView {
        doctor_id: doctor.id,
        slot_id: slot.id,
        doctor_name: doctor.full_name(),
        specializations: doctor.specializations_label(),
        photo_url: doctor.photo_url.clone(),
        slot_type: slot.slot_type,
        type_label,
        date: slot.date,
        summary: format!("{} на {} в {}", type_label, date_label, time),
        date_label,
        time,
        duration_label: display::duration_label(slot.duration_minutes()),
        cancel_link: doctor.profile_link(),
    }
}

#[axum::debug_handler]
pub async fn get_confirmation(
    State(state): State<BookingState>,
    Path((doctor_id, slot_id)): Path<(i64, i64)>,
) -> Result<Json<ConfirmationView>, BookingError> {
    debug!("Confirmation page for doctor {} slot {}", doctor_id, slot_id);

    if state.overlay.hides(slot_id) {
        return Err(BookingError::SlotTaken);
    }

    let service = AppointmentService::new(state.context.api.clone());
    let (doctor, slot) = service
        .load_confirmation(doctor_id, slot_id, state.context.clock.now())
        .await?;

    Ok(Json(confirmation_view(&doctor, &slot)))
}

#[axum::debug_handler]
pub async fn submit_confirmation(
    State(state): State<BookingState>,
    Path((doctor_id, slot_id)): Path<(i64, i64)>,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), BookingError> {
    // A booking from this front-end is already pending or done
    if !state.overlay.try_mark_pending(slot_id, None, state.context.clock.today()) {
        return Err(BookingError::SlotTaken);
    }

    let service = AppointmentService::new(state.context.api.clone());

    let mut flow = ConfirmationFlow::new(doctor_id, slot_id);
    flow.set_field(ContactField::Name, request.name);
    flow.set_field(ContactField::Phone, request.phone);
    flow.set_field(ContactField::Comment, request.comment.unwrap_or_default());

    match flow.submit(&service).await {
        Ok(()) => {
            state.overlay.confirm(slot_id);
            info!("Booking flow {} succeeded", flow.id());

            Ok((
                StatusCode::CREATED,
                Json(SubmitResponse {
                    flow_id: flow.id().to_string(),
                    redirect: flow.success_link(),
                }),
            ))
        }
        Err(e) => {
            state.overlay.clear(slot_id);
            Err(e)
        }
    }
}

#[axum::debug_handler]
pub async fn get_success(Path(doctor_id): Path<i64>) -> Result<Json<SuccessView>, AppError> {
    if doctor_id <= 0 {
        return Err(AppError::BadRequest(format!("Invalid doctor id: {}", doctor_id)));
    }

    Ok(Json(SuccessView::new(doctor_id)))
}
