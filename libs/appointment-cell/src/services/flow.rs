use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{AppointmentRequest, BookingError, ContactDetails, ContactField, FieldError, FlowState};
use crate::services::booking::AppointmentService;
use crate::services::validation::validate_contact;

/// One pass through the booking form for a doctor and slot:
/// `Idle -> Validating -> Submitting -> Succeeded`, with validation failures
/// returning to `Idle` and submission failures parking in `Failed` until retried.
#[derive(Debug)]
pub struct ConfirmationFlow {
    id: Uuid,
    doctor_id: i64,
    slot_id: i64,
    details: ContactDetails,
    state: FlowState,
    field_errors: Vec<FieldError>,
    last_error: Option<BookingError>,
}

impl ConfirmationFlow {
    pub fn new(doctor_id: i64, slot_id: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            doctor_id,
            slot_id,
            details: ContactDetails::default(),
            state: FlowState::Idle,
            field_errors: Vec::new(),
            last_error: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn details(&self) -> &ContactDetails {
        &self.details
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    pub fn error_for(&self, field: ContactField) -> Option<&'static str> {
        self.field_errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    pub fn last_error(&self) -> Option<&BookingError> {
        self.last_error.as_ref()
    }

    /// Editing a field drops its pending error.
    pub fn set_field(&mut self, field: ContactField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ContactField::Name => self.details.name = value,
            ContactField::Phone => self.details.phone = value,
            ContactField::Comment => self.details.comment = value,
        }
        self.field_errors.retain(|e| e.field != field);
    }

    pub fn valid_transitions(from: FlowState) -> &'static [FlowState] {
        match from {
            FlowState::Idle => &[FlowState::Validating],
            FlowState::Validating => &[FlowState::Idle, FlowState::Submitting],
            FlowState::Submitting => &[FlowState::Succeeded, FlowState::Failed],
            FlowState::Failed => &[FlowState::Idle],
            FlowState::Succeeded => &[],
        }
    }

    fn transition(&mut self, to: FlowState) -> Result<(), BookingError> {
        if !Self::valid_transitions(self.state).contains(&to) {
            warn!("Flow {}: invalid transition {} -> {}", self.id, self.state, to);
            return Err(BookingError::InvalidTransition { from: self.state, to });
        }

        debug!("Flow {}: {} -> {}", self.id, self.state, to);
        self.state = to;
        Ok(())
    }

    /// Validates, then sends exactly one booking request. A `Failed` flow is
    /// reset first, so calling this again is a retry.
    pub async fn submit(&mut self, service: &AppointmentService) -> Result<(), BookingError> {
        if self.state == FlowState::Failed {
            self.retry()?;
        }

        self.transition(FlowState::Validating)?;
        self.last_error = None;

        let errors = validate_contact(&self.details);
        if !errors.is_empty() {
            self.field_errors = errors.clone();
            self.transition(FlowState::Idle)?;
            return Err(BookingError::Validation(errors));
        }
        self.field_errors.clear();

        self.transition(FlowState::Submitting)?;
        let request = AppointmentRequest::from_details(self.doctor_id, self.slot_id, &self.details);

        match service.create_appointment(&request).await {
            Ok(_) => {
                info!("Flow {}: booked slot {} with doctor {}", self.id, self.slot_id, self.doctor_id);
                self.transition(FlowState::Succeeded)
            }
            Err(e) => {
                self.transition(FlowState::Failed)?;
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub fn retry(&mut self) -> Result<(), BookingError> {
        self.transition(FlowState::Idle)
    }

    /// Backs out without contacting the backend. Returns where to go next.
    pub fn cancel(self) -> String {
        debug!("Flow {} cancelled", self.id);
        format!("/doctors/{}", self.doctor_id)
    }

    pub fn success_link(&self) -> String {
        format!("/appointment-success/{}", self.doctor_id)
    }
}
