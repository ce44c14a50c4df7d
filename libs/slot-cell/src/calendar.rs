use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

pub const DAYS_IN_WINDOW: usize = 7;

// A window and its neighbouring weeks must stay inside the representable
// date range.
const EDGE_MARGIN_DAYS: i64 = 2 * DAYS_IN_WINDOW as i64 - 1;

/// Seven consecutive days, Monday first, around an anchor date. Navigation
/// yields a new window; nothing here is mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWindow {
    anchor: NaiveDate,
}

impl CalendarWindow {
    pub fn new(anchor: NaiveDate) -> Self {
        Self { anchor }
    }

    /// Window around `anchor`, or `None` when the window or the weeks next to
    /// it would fall outside the supported date range.
    pub fn try_new(anchor: NaiveDate) -> Option<Self> {
        let margin = Duration::days(EDGE_MARGIN_DAYS);
        anchor.checked_sub_signed(margin)?;
        anchor.checked_add_signed(margin)?;
        Some(Self { anchor })
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn week_start(&self) -> NaiveDate {
        let offset = self.anchor.weekday().num_days_from_monday() as i64;
        self.anchor - Duration::days(offset)
    }

    pub fn week_end(&self) -> NaiveDate {
        self.week_start() + Duration::days(DAYS_IN_WINDOW as i64 - 1)
    }

    pub fn days(&self) -> [NaiveDate; DAYS_IN_WINDOW] {
        let start = self.week_start();
        std::array::from_fn(|i| start + Duration::days(i as i64))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.week_start() && date <= self.week_end()
    }

    /// Anchor moved by whole weeks, negative for backwards. `None` past the
    /// edges of the calendar.
    pub fn try_shift(&self, weeks: i32) -> Option<Self> {
        self.anchor
            .checked_add_signed(Duration::weeks(weeks as i64))
            .and_then(Self::try_new)
    }

    /// Distinct `(year, month)` pairs the window touches, in order. One or two.
    pub fn months(&self) -> Vec<(i32, u32)> {
        let mut months: Vec<(i32, u32)> = Vec::with_capacity(2);
        for day in self.days() {
            let key = (day.year(), day.month());
            if months.last() != Some(&key) {
                months.push(key);
            }
        }
        months
    }
}

/// True iff the calendar day of `candidate` is strictly before the calendar
/// day of `now`. Time of day on either side is ignored.
pub fn is_past(candidate: NaiveDateTime, now: NaiveDateTime) -> bool {
    is_past_date(candidate.date(), now.date())
}

pub fn is_past_date(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at(s: &str, h: u32, m: u32) -> NaiveDateTime {
        date(s).and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_window_starts_monday_and_contains_anchor() {
        // 2024-07-03 is a Wednesday
        let window = CalendarWindow::new(date("2024-07-03"));
        let days = window.days();

        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date("2024-07-01"));
        assert_eq!(days[0].weekday(), Weekday::Mon);
        assert_eq!(days[6], date("2024-07-07"));
        assert!(window.contains(date("2024-07-03")));
    }

    #[test]
    fn test_window_days_are_consecutive() {
        for anchor in ["2024-02-26", "2024-12-30", "2025-03-02", "2024-07-07"] {
            let days = CalendarWindow::new(date(anchor)).days();
            for pair in days.windows(2) {
                assert_eq!(pair[1] - pair[0], Duration::days(1));
            }
            assert!(days.contains(&date(anchor)));
        }
    }

    #[test]
    fn test_sunday_anchor_belongs_to_preceding_monday() {
        let window = CalendarWindow::new(date("2024-07-07"));
        assert_eq!(window.week_start(), date("2024-07-01"));
    }

    #[test]
    fn test_shift_by_weeks() {
        let window = CalendarWindow::new(date("2024-07-03"));

        assert_eq!(window.try_shift(1).unwrap().anchor(), date("2024-07-10"));
        assert_eq!(window.try_shift(-2).unwrap().anchor(), date("2024-06-19"));
        assert_eq!(window.try_shift(0), Some(window));
        // shifting leaves the receiver untouched
        assert_eq!(window.anchor(), date("2024-07-03"));
    }

    #[test]
    fn test_shift_out_of_range_is_refused() {
        let window = CalendarWindow::new(date("2024-07-03"));

        assert_eq!(window.try_shift(i32::MAX), None);
        assert_eq!(window.try_shift(i32::MIN), None);
        assert_eq!(window.try_shift(2_000_000_000), None);
    }

    #[test]
    fn test_window_at_calendar_edges_is_refused() {
        assert_eq!(CalendarWindow::try_new(NaiveDate::MAX), None);
        assert_eq!(CalendarWindow::try_new(NaiveDate::MIN), None);

        let near_end = NaiveDate::MAX - Duration::days(EDGE_MARGIN_DAYS);
        let window = CalendarWindow::try_new(near_end).unwrap();
        assert_eq!(window.days().len(), 7);
        assert!(window.try_shift(1).is_none());
        assert!(window.try_shift(-1).is_some());
    }

    #[test]
    fn test_months_spanning_boundary() {
        let window = CalendarWindow::new(date("2024-07-31"));
        assert_eq!(window.months(), vec![(2024, 7), (2024, 8)]);

        let year_end = CalendarWindow::new(date("2024-12-31"));
        assert_eq!(year_end.months(), vec![(2024, 12), (2025, 1)]);

        let inside = CalendarWindow::new(date("2024-07-10"));
        assert_eq!(inside.months(), vec![(2024, 7)]);
    }

    #[test]
    fn test_is_past_ignores_time_of_day() {
        let now = at("2024-07-01", 0, 5);

        // earlier today, late evening yesterday, early tomorrow
        assert!(!is_past(at("2024-07-01", 0, 0), now));
        assert!(is_past(at("2024-06-30", 23, 59), now));
        assert!(!is_past(at("2024-07-02", 0, 0), now));

        let late = at("2024-07-01", 23, 59);
        assert!(!is_past(at("2024-07-01", 0, 0), late));
        assert!(is_past(at("2024-06-30", 23, 59), late));
    }

    #[test]
    fn test_is_past_date() {
        let today = date("2024-07-01");
        assert!(is_past_date(date("2024-06-30"), today));
        assert!(!is_past_date(today, today));
        assert!(!is_past_date(date("2024-07-02"), today));
    }
}
