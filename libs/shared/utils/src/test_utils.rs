use std::sync::{Arc, Mutex, PoisonError};

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::{Locale, LocaleProvider};

use crate::clock::Clock;
use crate::context::ClinicContext;

pub struct TestConfig {
    pub api_base_url: String,
    pub slot_row_width: usize,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            slot_row_width: 4,
        }
    }
}

impl TestConfig {
    pub fn with_api(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            slot_row_width: self.slot_row_width,
            api_timeout_secs: 5,
            ..AppConfig::default()
        }
    }

    pub fn to_context(&self, locale: Arc<dyn LocaleProvider>, clock: FixedClock) -> ClinicContext {
        ClinicContext::with_clock(self.to_app_config(), locale, Arc::new(clock))
    }

    pub fn to_ru_context(&self, clock: FixedClock) -> ClinicContext {
        self.to_context(Arc::new(Locale::Ru), clock)
    }
}

/// Clock pinned to a given local time; `set` moves it.
#[derive(Debug, Clone)]
pub struct FixedClock(Arc<Mutex<NaiveDateTime>>);

impl FixedClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self(Arc::new(Mutex::new(now)))
    }

    /// `date` at `hour:minute`. Panics on an invalid date, test input only.
    pub fn on(date: &str, hour: u32, minute: u32) -> Self {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid test date");
        Self::at(date.and_hms_opt(hour, minute, 0).expect("valid test time"))
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct MockClinicResponses;

impl MockClinicResponses {
    pub fn doctor_response(doctor_id: i64) -> Value {
        json!({
            "id": doctor_id,
            "user": {
                "id": doctor_id * 10,
                "username": format!("doctor{}", doctor_id),
                "first_name": "Иван",
                "last_name": "Петров",
                "email": "petrov@example.com"
            },
            "patronymic": "Сергеевич",
            "room_number": "204",
            "bio": "Врач-кардиолог, стаж 12 лет",
            "phone_number": "+996555000111",
            "specialization": [
                {
                    "id": 1,
                    "name_specialization": "Кардиолог",
                    "description_specialization": "Болезни сердца"
                },
                {
                    "id": 3,
                    "name_specialization": "Терапевт",
                    "description_specialization": ""
                }
            ],
            "photo_url": "http://127.0.0.1:8000/media/doctors/main.jpg",
            "photos": [
                { "id": 11, "photo_url": "http://127.0.0.1:8000/media/doctors/b.jpg", "order": 2 },
                { "id": 10, "photo_url": "http://127.0.0.1:8000/media/doctors/a.jpg", "order": 1 }
            ],
            "is_active": true
        })
    }

    pub fn doctor_list_response(ids: &[i64]) -> Value {
        Value::Array(ids.iter().map(|id| Self::doctor_response(*id)).collect())
    }

    pub fn slot_response(slot_id: i64, doctor_id: i64, date: &str, start_time: &str, is_available: bool) -> Value {
        json!({
            "id": slot_id,
            "doctor": doctor_id,
            "template": null,
            "date": date,
            "start_time": start_time,
            "duration": 15,
            "slot_type": "examination",
            "is_available": is_available,
            "created_at": "2024-06-01T09:00:00Z",
            "updated_at": "2024-06-01T09:00:00Z"
        })
    }

    pub fn treatment_slot_response(slot_id: i64, doctor_id: i64, date: &str, start_time: &str) -> Value {
        let mut slot = Self::slot_response(slot_id, doctor_id, date, start_time, true);
        slot["slot_type"] = json!("treatment");
        slot["duration"] = json!(40);
        slot
    }

    pub fn appointment_response(doctor_id: i64, slot_id: i64) -> Value {
        json!({
            "id": 900,
            "doctor": doctor_id,
            "time_slot": slot_id,
            "full_name": "Иван",
            "phone_number": "+996700123456",
            "comment": "",
            "status": "pending"
        })
    }

    pub fn error_response(message: &str) -> Value {
        json!({ "error": message })
    }
}
