use tracing::{debug, warn};

use shared_api_client::{ClinicApiClient, ListEnvelope};
use shared_models::ApiError;

use crate::models::Doctor;

pub struct DoctorService {
    api: ClinicApiClient,
}

impl DoctorService {
    pub fn new(api: ClinicApiClient) -> Self {
        Self { api }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        debug!("Fetching doctor list");

        let doctors: ListEnvelope<Doctor> = self.api.get("/api/doctors/doctors/").await?;
        let doctors = doctors.into_vec();

        debug!("Fetched {} doctors", doctors.len());
        Ok(doctors)
    }

    pub async fn get_doctor(&self, doctor_id: i64) -> Result<Doctor, ApiError> {
        debug!("Fetching doctor {}", doctor_id);

        let path = format!("/api/doctors/doctors/{}/", doctor_id);
        self.api.get(&path).await.map_err(|e| match e {
            ApiError::Http { status: 404, message } => {
                warn!("Doctor {} not found", doctor_id);
                ApiError::NotFound(message.unwrap_or_else(|| "Врач не найден".to_string()))
            }
            other => other,
        })
    }
}
