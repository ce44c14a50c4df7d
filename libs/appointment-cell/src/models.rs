use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use shared_models::ApiError;
use slot_cell::SlotType;

// ==============================================================================
// CONTACT DETAILS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Phone,
    Comment,
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactField::Name => write!(f, "name"),
            ContactField::Phone => write!(f, "phone"),
            ContactField::Comment => write!(f, "comment"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: ContactField,
    pub message: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: String,
    pub phone: String,
    pub comment: String,
}

/// Booking payload, built once per submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRequest {
    pub doctor_id: i64,
    pub time_slot_id: i64,
    pub full_name: String,
    pub phone_number: String,
    pub comment: String,
}

impl AppointmentRequest {
    pub fn from_details(doctor_id: i64, time_slot_id: i64, details: &ContactDetails) -> Self {
        Self {
            doctor_id,
            time_slot_id,
            full_name: details.name.trim().to_string(),
            phone_number: details.phone.trim().to_string(),
            comment: details.comment.trim().to_string(),
        }
    }

    pub fn to_body(&self) -> Value {
        json!({
            "time_slot_id": self.time_slot_id,
            "full_name": self.full_name,
            "phone_number": self.phone_number,
            "comment": self.comment,
        })
    }
}

// ==============================================================================
// FLOW STATE
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowState::Idle => write!(f, "idle"),
            FlowState::Validating => write!(f, "validating"),
            FlowState::Submitting => write!(f, "submitting"),
            FlowState::Succeeded => write!(f, "succeeded"),
            FlowState::Failed => write!(f, "failed"),
        }
    }
}

pub const SLOT_NOT_FOUND_MESSAGE: &str = "Временной слот не найден. Возможно, он был удален или уже занят.";
pub const SLOT_TAKEN_MESSAGE: &str = "Этот временной слот уже занят. Пожалуйста, выберите другой слот.";
pub const SLOT_IN_PAST_MESSAGE: &str = "Выбранное время уже прошло. Пожалуйста, выберите другой слот.";
pub const DOCTOR_NOT_FOUND_MESSAGE: &str = "Врач не найден";
pub const VALIDATION_MESSAGE: &str = "Проверьте правильность заполнения формы";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Time slot not found")]
    SlotNotFound,

    #[error("Time slot already taken")]
    SlotTaken,

    #[error("Time slot is in the past")]
    SlotInPast,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Invalid contact details")]
    Validation(Vec<FieldError>),

    #[error("Flow cannot move from {from} to {to}")]
    InvalidTransition { from: FlowState, to: FlowState },

    #[error("API error: {0}")]
    Api(ApiError),
}

impl BookingError {
    pub fn user_message(&self) -> String {
        match self {
            BookingError::SlotNotFound => SLOT_NOT_FOUND_MESSAGE.to_string(),
            BookingError::SlotTaken => SLOT_TAKEN_MESSAGE.to_string(),
            BookingError::SlotInPast => SLOT_IN_PAST_MESSAGE.to_string(),
            BookingError::DoctorNotFound => DOCTOR_NOT_FOUND_MESSAGE.to_string(),
            BookingError::Validation(_) => VALIDATION_MESSAGE.to_string(),
            BookingError::InvalidTransition { .. } => "Запись уже обрабатывается".to_string(),
            BookingError::Api(err @ ApiError::Http { status, .. }) => {
                err.message_or(&format!("Ошибка создания записи: {}", status))
            }
            BookingError::Api(err) => err.user_message(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            BookingError::SlotNotFound | BookingError::DoctorNotFound => StatusCode::NOT_FOUND,
            BookingError::SlotTaken | BookingError::SlotInPast => StatusCode::CONFLICT,
            BookingError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::InvalidTransition { .. } => StatusCode::CONFLICT,
            BookingError::Api(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        tracing::error!("Booking error: {}: {}", status, message);

        let body = match &self {
            BookingError::Validation(errors) => json!({
                "error": message,
                "field_errors": errors,
            }),
            _ => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

// ==============================================================================
// PAGE VIEWS
// ==============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConfirmationView {
    pub doctor_id: i64,
    pub slot_id: i64,
    pub doctor_name: String,
    pub specializations: String,
    pub photo_url: Option<String>,
    pub slot_type: SlotType,
    pub type_label: &'static str,
    pub date: chrono::NaiveDate,
    pub date_label: String,
    pub time: String,
    pub duration_label: String,
    pub summary: String,
    pub cancel_link: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuccessView {
    pub doctor_id: i64,
    pub title: &'static str,
    pub message: &'static str,
    pub back_link: String,
}

impl SuccessView {
    pub fn new(doctor_id: i64) -> Self {
        Self {
            doctor_id,
            title: "Запись успешно создана!",
            message: "Мы отправим вам SMS с подтверждением. Администратор свяжется с вами для уточнения деталей.",
            back_link: format!("/doctors/{}", doctor_id),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubmitResponse {
    pub flow_id: String,
    pub redirect: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let details = ContactDetails {
            name: " Иван ".to_string(),
            phone: "+996700123456 ".to_string(),
            comment: String::new(),
        };
        let body = AppointmentRequest::from_details(5, 42, &details).to_body();

        assert_eq!(
            body,
            json!({
                "time_slot_id": 42,
                "full_name": "Иван",
                "phone_number": "+996700123456",
                "comment": ""
            })
        );
    }

    #[test]
    fn test_api_error_message_fallback() {
        let err = BookingError::Api(ApiError::Http { status: 400, message: None });
        assert_eq!(err.user_message(), "Ошибка создания записи: 400");

        let err = BookingError::Api(ApiError::Http { status: 400, message: Some("Неверный номер".to_string()) });
        assert_eq!(err.user_message(), "Неверный номер");
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_slot_errors_are_distinct() {
        assert_ne!(BookingError::SlotTaken.user_message(), BookingError::SlotNotFound.user_message());
        assert_eq!(BookingError::SlotTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(BookingError::SlotNotFound.status_code(), StatusCode::NOT_FOUND);
    }
}
