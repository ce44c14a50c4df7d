//! Russian date and time labels, as the clinic renders them regardless of
//! the request language.

use chrono::{Datelike, NaiveDate, NaiveTime};

const MONTHS_GENITIVE: [&str; 12] = [
    "января", "февраля", "марта", "апреля", "мая", "июня",
    "июля", "августа", "сентября", "октября", "ноября", "декабря",
];

const MONTHS_SHORT: [&str; 12] = [
    "янв.", "февр.", "мар.", "апр.", "мая", "июн.",
    "июл.", "авг.", "сент.", "окт.", "нояб.", "дек.",
];

const WEEKDAYS_SHORT: [&str; 7] = ["пн", "вт", "ср", "чт", "пт", "сб", "вс"];

/// `1 июля 2024 г.`
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} {} {} г.",
        date.day(),
        MONTHS_GENITIVE[date.month0() as usize],
        date.year()
    )
}

pub fn short_month(date: NaiveDate) -> &'static str {
    MONTHS_SHORT[date.month0() as usize]
}

pub fn short_weekday(date: NaiveDate) -> &'static str {
    WEEKDAYS_SHORT[date.weekday().num_days_from_monday() as usize]
}

/// `10:00`
pub fn clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn duration_label(minutes: i64) -> String {
    format!("{} мин", minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_long_date() {
        assert_eq!(long_date(date("2024-07-01")), "1 июля 2024 г.");
        assert_eq!(long_date(date("2025-12-31")), "31 декабря 2025 г.");
        assert_eq!(long_date(date("2024-05-09")), "9 мая 2024 г.");
    }

    #[test]
    fn test_short_labels() {
        // Monday
        assert_eq!(short_weekday(date("2024-07-01")), "пн");
        assert_eq!(short_weekday(date("2024-07-07")), "вс");
        assert_eq!(short_month(date("2024-09-15")), "сент.");
    }

    #[test]
    fn test_clock_drops_seconds() {
        let time = NaiveTime::from_hms_opt(9, 5, 30).unwrap();
        assert_eq!(clock(time), "09:05");
        assert_eq!(duration_label(40), "40 мин");
    }
}
