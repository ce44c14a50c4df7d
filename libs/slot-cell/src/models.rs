use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use shared_models::AppError;
use shared_utils::ClinicContext;

use crate::calendar::CalendarWindow;
use crate::services::overlay::SlotOverlay;

// ==============================================================================
// BACKEND MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSlot {
    pub id: i64,
    #[serde(default)]
    pub doctor: Option<i64>,
    #[serde(default)]
    pub template: Option<i64>,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    /// Minutes.
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default, with = "clock_time::option")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub slot_type: SlotType,
    pub is_available: bool,
    #[serde(default)]
    pub label: Option<String>,
}

impl TimeSlot {
    pub fn duration_minutes(&self) -> i64 {
        if let Some(duration) = self.duration.filter(|d| *d > 0) {
            return duration;
        }
        if let Some(end) = self.end_time.filter(|end| *end > self.start_time) {
            return (end - self.start_time).num_minutes();
        }
        self.slot_type.default_duration_minutes()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    #[default]
    #[serde(alias = "consultation")]
    Examination,
    Treatment,
}

impl SlotType {
    pub fn display_name(&self) -> &'static str {
        match self {
            SlotType::Examination => "Консультация",
            SlotType::Treatment => "Лечение",
        }
    }

    pub fn default_duration_minutes(&self) -> i64 {
        match self {
            SlotType::Examination => 15,
            SlotType::Treatment => 40,
        }
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotType::Examination => write!(f, "examination"),
            SlotType::Treatment => write!(f, "treatment"),
        }
    }
}

/// What to ask the backend for: one day or a whole month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotQuery {
    Date(NaiveDate),
    Month { year: i32, month: u32 },
}

impl SlotQuery {
    pub fn month_of(date: NaiveDate) -> Self {
        use chrono::Datelike;
        SlotQuery::Month { year: date.year(), month: date.month() }
    }

    pub fn to_query_string(&self) -> String {
        match self {
            SlotQuery::Date(date) => format!("date={}", date.format("%Y-%m-%d")),
            SlotQuery::Month { year, month } => format!("year={}&month={}", year, month),
        }
    }
}

/// `start_time` arrives as `HH:MM:SS`, sometimes as `HH:MM`.
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<NaiveTime> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .ok()
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M:%S").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid time of day: {}", raw)))
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => super::serialize(time, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day: {}", raw))),
                None => Ok(None),
            }
        }
    }
}

// ==============================================================================
// PAGE VIEWS
// ==============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalendarDayView {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub day: u32,
    pub month: &'static str,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_past: bool,
    pub has_availability: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SlotButtonView {
    pub id: i64,
    pub time: String,
    pub duration_label: String,
    pub slot_type: SlotType,
    pub type_label: &'static str,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SlotSelectionView {
    pub doctor_id: i64,
    pub week_start: NaiveDate,
    pub days: Vec<CalendarDayView>,
    pub selected_date: Option<NaiveDate>,
    pub selected_date_label: Option<String>,
    pub rows: Vec<Vec<SlotButtonView>>,
    pub empty_message: Option<&'static str>,
    pub error: Option<String>,
    pub previous_week: String,
    pub next_week: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotPageQuery {
    pub date: Option<NaiveDate>,
    pub anchor: Option<NaiveDate>,
    pub week: Option<i32>,
}

impl SlotPageQuery {
    /// Week around `anchor`, else `date`, else `today`, moved by `week`.
    pub fn window(&self, today: NaiveDate) -> Result<CalendarWindow, AppError> {
        let anchor = self.anchor.or(self.date).unwrap_or(today);
        CalendarWindow::try_new(anchor)
            .and_then(|window| window.try_shift(self.week.unwrap_or(0)))
            .ok_or_else(|| AppError::BadRequest(format!("Week out of range: {:?}", self)))
    }
}

// ==============================================================================
// ROUTER STATE
// ==============================================================================

/// Shared by the slot and booking routes so both see the same overlay.
#[derive(Clone)]
pub struct BookingState {
    pub context: ClinicContext,
    pub overlay: Arc<SlotOverlay>,
}

impl BookingState {
    pub fn new(context: ClinicContext) -> Self {
        Self {
            context,
            overlay: Arc::new(SlotOverlay::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slot_decodes_seconds_and_alias() {
        let slot: TimeSlot = serde_json::from_value(json!({
            "id": 42,
            "doctor": 5,
            "date": "2024-07-01",
            "start_time": "10:00:00",
            "duration": 15,
            "slot_type": "consultation",
            "is_available": true
        }))
        .unwrap();

        assert_eq!(slot.start_time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(slot.slot_type, SlotType::Examination);
        assert_eq!(slot.date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    }

    #[test]
    fn test_slot_decodes_short_time_without_type() {
        let slot: TimeSlot = serde_json::from_value(json!({
            "id": 1,
            "date": "2024-07-01",
            "start_time": "09:30",
            "is_available": false
        }))
        .unwrap();

        assert_eq!(slot.start_time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(slot.slot_type, SlotType::Examination);
        assert_eq!(slot.duration_minutes(), 15);
    }

    #[test]
    fn test_bad_time_is_rejected() {
        let result = serde_json::from_value::<TimeSlot>(json!({
            "id": 1,
            "date": "2024-07-01",
            "start_time": "ten o'clock",
            "is_available": true
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_duration_from_end_time() {
        let slot: TimeSlot = serde_json::from_value(json!({
            "id": 2,
            "date": "2024-07-01",
            "start_time": "11:00:00",
            "end_time": "11:40:00",
            "slot_type": "treatment",
            "is_available": true
        }))
        .unwrap();

        assert_eq!(slot.duration_minutes(), 40);
    }

    #[test]
    fn test_page_query_window() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 3).unwrap();

        let query = SlotPageQuery::default();
        assert_eq!(query.window(today).unwrap().anchor(), today);

        let query = SlotPageQuery {
            date: Some(NaiveDate::from_ymd_opt(2024, 7, 20).unwrap()),
            anchor: None,
            week: Some(-1),
        };
        assert_eq!(query.window(today).unwrap().anchor(), NaiveDate::from_ymd_opt(2024, 7, 13).unwrap());
    }

    #[test]
    fn test_page_query_window_out_of_range() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 3).unwrap();

        let query = SlotPageQuery {
            week: Some(2_000_000_000),
            ..SlotPageQuery::default()
        };
        assert!(matches!(query.window(today), Err(AppError::BadRequest(_))));

        let query = SlotPageQuery {
            anchor: Some(NaiveDate::MAX),
            ..SlotPageQuery::default()
        };
        assert!(matches!(query.window(today), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_query_strings() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert_eq!(SlotQuery::Date(date).to_query_string(), "date=2024-07-01");
        assert_eq!(SlotQuery::month_of(date).to_query_string(), "year=2024&month=7");
    }
}
