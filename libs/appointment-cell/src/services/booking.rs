use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::{debug, info, warn};

use doctor_cell::{Doctor, DoctorService};
use shared_api_client::ClinicApiClient;
use shared_models::ApiError;
use slot_cell::{is_past_date, SlotService, TimeSlot};

use crate::models::{AppointmentRequest, BookingError};

pub struct AppointmentService {
    api: ClinicApiClient,
    doctors: DoctorService,
    slots: SlotService,
}

impl AppointmentService {
    pub fn new(api: ClinicApiClient) -> Self {
        Self {
            doctors: DoctorService::new(api.clone()),
            slots: SlotService::new(api.clone()),
            api,
        }
    }

    /// Doctor and slot for the confirmation page, fetched side by side. The
    /// slot must still be bookable at `now`.
    pub async fn load_confirmation(
        &self,
        doctor_id: i64,
        slot_id: i64,
        now: NaiveDateTime,
    ) -> Result<(Doctor, TimeSlot), BookingError> {
        debug!("Loading confirmation for doctor {} slot {}", doctor_id, slot_id);

        let (doctor, slot) = futures::join!(self.doctors.get_doctor(doctor_id), self.slots.get_slot(slot_id));

        let slot = slot.map_err(|e| match e {
            ApiError::NotFound(_) => BookingError::SlotNotFound,
            other => BookingError::Api(other),
        })?;
        let doctor = doctor.map_err(|e| match e {
            ApiError::NotFound(_) => BookingError::DoctorNotFound,
            other => BookingError::Api(other),
        })?;

        if slot.doctor.is_some_and(|owner| owner != doctor_id) {
            warn!("Slot {} does not belong to doctor {}", slot_id, doctor_id);
            return Err(BookingError::SlotNotFound);
        }
        if !slot.is_available {
            return Err(BookingError::SlotTaken);
        }
        if is_past_date(slot.date, now.date()) || (slot.date == now.date() && slot.start_time <= now.time()) {
            return Err(BookingError::SlotInPast);
        }

        Ok((doctor, slot))
    }

    /// One POST per call. The backend answers 409/410, or 404 on a slot it no
    /// longer offers, when someone else booked first.
    pub async fn create_appointment(&self, request: &AppointmentRequest) -> Result<Value, BookingError> {
        let path = format!("/api/doctors/doctors/{}/create-appointment/", request.doctor_id);

        let created: Value = self.api.post(&path, request.to_body()).await.map_err(|e| match e {
            ApiError::Http { status: 404 | 409 | 410, .. } | ApiError::NotFound(_) => {
                warn!("Slot {} was taken before booking completed", request.time_slot_id);
                BookingError::SlotTaken
            }
            other => BookingError::Api(other),
        })?;

        info!(
            "Appointment created for doctor {} slot {}",
            request.doctor_id, request.time_slot_id
        );
        Ok(created)
    }
}
