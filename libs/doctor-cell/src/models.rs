use serde::{Deserialize, Serialize};

use slot_cell::SlotSelectionView;

use crate::services::gallery::GalleryPhoto;

// ==============================================================================
// BACKEND MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub id: i64,
    #[serde(default)]
    pub user: DoctorUser,
    #[serde(default)]
    pub patronymic: Option<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub specialization: Vec<Specialization>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub photos: Vec<DoctorPhoto>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DoctorUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Specialization {
    #[serde(default)]
    pub id: Option<i64>,
    pub name_specialization: String,
    #[serde(default)]
    pub description_specialization: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorPhoto {
    #[serde(default)]
    pub id: Option<i64>,
    pub photo_url: String,
    #[serde(default)]
    pub order: i32,
}

impl Doctor {
    /// `Last First Patronymic`, skipping missing parts.
    pub fn full_name(&self) -> String {
        [
            self.user.last_name.as_str(),
            self.user.first_name.as_str(),
            self.patronymic.as_deref().unwrap_or(""),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    pub fn specialization_names(&self) -> Vec<String> {
        self.specialization
            .iter()
            .map(|s| s.name_specialization.clone())
            .collect()
    }

    pub fn specializations_label(&self) -> String {
        self.specialization_names().join(", ")
    }

    pub fn profile_link(&self) -> String {
        format!("/doctors/{}", self.id)
    }
}

// ==============================================================================
// PAGE VIEWS
// ==============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DoctorCard {
    pub id: i64,
    pub full_name: String,
    pub specializations: String,
    pub photo_url: Option<String>,
    pub room_number: Option<String>,
    pub link: String,
}

impl From<&Doctor> for DoctorCard {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            full_name: doctor.full_name(),
            specializations: doctor.specializations_label(),
            photo_url: doctor.photo_url.clone(),
            room_number: doctor.room_number.clone(),
            link: doctor.profile_link(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DoctorListView {
    pub doctors: Vec<DoctorCard>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DoctorProfileView {
    pub id: i64,
    pub full_name: String,
    pub specializations: Vec<String>,
    pub specializations_label: String,
    pub bio: Option<String>,
    pub room_number: Option<String>,
    pub phone_number: Option<String>,
    pub photos: Vec<GalleryPhoto>,
}

/// Doctor detail page: profile plus the embedded slot picker.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DoctorPageView {
    pub doctor: Option<DoctorProfileView>,
    pub error: Option<String>,
    pub slots: SlotSelectionView,
}
