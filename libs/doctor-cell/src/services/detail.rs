use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, broadcast::error::RecvError, watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use locale_cell::LocaleChanged;
use shared_models::ApiError;
use shared_utils::{ClinicContext, Generation};
use slot_cell::{SlotOverlay, SlotSelector};

use crate::models::{Doctor, DoctorPageView, DoctorProfileView};
use crate::services::doctor::DoctorService;
use crate::services::gallery::PhotoGallery;

#[derive(Debug, Default)]
struct DetailState {
    doctor: Option<Doctor>,
    error: Option<ApiError>,
}

/// Doctor detail page. The profile and the slot picker load concurrently,
/// and both reload on a locale change.
pub struct DoctorDetailView {
    doctor_id: i64,
    doctors: DoctorService,
    slots: Arc<SlotSelector>,
    state: RwLock<DetailState>,
    generation: Generation,
    closed: AtomicBool,
    revision: watch::Sender<u64>,
}

impl DoctorDetailView {
    pub fn new(context: &ClinicContext, doctor_id: i64, overlay: Option<Arc<SlotOverlay>>) -> Self {
        let (revision, _) = watch::channel(0);

        Self {
            doctor_id,
            doctors: DoctorService::new(context.api.clone()),
            slots: Arc::new(SlotSelector::new(context, doctor_id, overlay)),
            state: RwLock::new(DetailState::default()),
            generation: Generation::new(),
            closed: AtomicBool::new(false),
            revision,
        }
    }

    pub fn slots(&self) -> &Arc<SlotSelector> {
        &self.slots
    }

    /// Fetches the doctor and the visible slot week side by side.
    pub async fn load(&self) {
        futures::join!(self.refresh_doctor(), self.slots.refresh());
    }

    pub async fn refresh_doctor(&self) {
        if self.is_closed() {
            return;
        }

        let ticket = self.generation.begin();
        let result = self.doctors.get_doctor(self.doctor_id).await;

        let mut state = self.state.write().await;
        if !self.generation.is_current(ticket) {
            debug!("Discarding stale doctor {} response", self.doctor_id);
            return;
        }

        match result {
            Ok(doctor) => {
                state.doctor = Some(doctor);
                state.error = None;
            }
            Err(e) => {
                warn!("Failed to load doctor {}: {}", self.doctor_id, e);
                state.doctor = None;
                state.error = Some(e);
            }
        }
        drop(state);

        self.revision.send_modify(|revision| *revision += 1);
    }

    pub async fn doctor(&self) -> Option<Doctor> {
        self.state.read().await.doctor.clone()
    }

    pub async fn error(&self) -> Option<ApiError> {
        self.state.read().await.error.clone()
    }

    pub async fn view(&self) -> DoctorPageView {
        let (doctor, error) = {
            let state = self.state.read().await;
            (state.doctor.as_ref().map(profile_view), state.error.as_ref().map(ApiError::user_message))
        };

        DoctorPageView {
            doctor,
            error,
            slots: self.slots.view().await,
        }
    }

    pub fn subscribe_updates(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.generation.invalidate();
        self.slots.close();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// One reload of the doctor and the slots per locale change, until closed.
    pub fn watch_locale(self: Arc<Self>, mut events: broadcast::Receiver<LocaleChanged>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(change) => {
                        if self.is_closed() {
                            break;
                        }
                        info!("Locale switched to {}, reloading doctor {}", change.current, self.doctor_id);
                        self.load().await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        if self.is_closed() {
                            break;
                        }
                        warn!("Missed {} locale events, reloading doctor {}", skipped, self.doctor_id);
                        self.load().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

pub fn profile_view(doctor: &Doctor) -> DoctorProfileView {
    DoctorProfileView {
        id: doctor.id,
        full_name: doctor.full_name(),
        specializations: doctor.specialization_names(),
        specializations_label: doctor.specializations_label(),
        bio: doctor.bio.clone(),
        room_number: doctor.room_number.clone(),
        phone_number: doctor.phone_number.clone(),
        photos: PhotoGallery::from_doctor(doctor).into_photos(),
    }
}
