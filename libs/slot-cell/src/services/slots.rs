use futures::future::try_join_all;
use tracing::{debug, warn};

use shared_api_client::{ClinicApiClient, ListEnvelope};
use shared_models::ApiError;

use crate::calendar::CalendarWindow;
use crate::models::{SlotQuery, TimeSlot};

pub struct SlotService {
    api: ClinicApiClient,
}

impl SlotService {
    pub fn new(api: ClinicApiClient) -> Self {
        Self { api }
    }

    /// Slots for a doctor on one date or across a month, in backend order.
    pub async fn fetch_slots(&self, doctor_id: i64, query: SlotQuery) -> Result<Vec<TimeSlot>, ApiError> {
        debug!("Fetching slots for doctor {} ({:?})", doctor_id, query);

        let path = format!(
            "/api/doctors/doctors/{}/available_slots/?{}",
            doctor_id,
            query.to_query_string()
        );
        let slots: ListEnvelope<TimeSlot> = self.api.get(&path).await?;

        Ok(slots.into_vec())
    }

    /// Every month the window touches, fetched concurrently and concatenated
    /// in calendar order.
    pub async fn fetch_window(&self, doctor_id: i64, window: &CalendarWindow) -> Result<Vec<TimeSlot>, ApiError> {
        let requests = window
            .months()
            .into_iter()
            .map(|(year, month)| self.fetch_slots(doctor_id, SlotQuery::Month { year, month }));

        let batches = try_join_all(requests).await?;
        Ok(batches.into_iter().flatten().collect())
    }

    /// A 404 here means the slot was removed or already taken.
    pub async fn get_slot(&self, slot_id: i64) -> Result<TimeSlot, ApiError> {
        debug!("Fetching time slot {}", slot_id);

        let path = format!("/api/doctors/time-slots/{}/", slot_id);
        self.api.get(&path).await.map_err(|e| match e {
            ApiError::Http { status: 404, message } => {
                warn!("Time slot {} not found", slot_id);
                ApiError::NotFound(message.unwrap_or_else(|| format!("time slot {}", slot_id)))
            }
            other => other,
        })
    }
}
