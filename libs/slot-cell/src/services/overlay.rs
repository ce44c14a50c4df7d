use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::models::TimeSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayState {
    Pending,
    Confirmed,
}

#[derive(Debug, Clone, Copy)]
struct OverlayEntry {
    state: OverlayState,
    // Slot date once known; bookings start without it.
    date: Option<NaiveDate>,
    marked_on: NaiveDate,
}

impl OverlayEntry {
    fn is_stale(&self, today: NaiveDate) -> bool {
        match self.date {
            Some(date) => date < today,
            None => self.state == OverlayState::Confirmed && self.marked_on < today,
        }
    }
}

/// Local overrides for slots booked from this front-end that the backend
/// may not yet report as taken.
#[derive(Debug, Default)]
pub struct SlotOverlay {
    entries: RwLock<HashMap<i64, OverlayEntry>>,
}

impl SlotOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `state` for a slot on a known `date`.
    pub fn mark(&self, slot_id: i64, date: NaiveDate, state: OverlayState) {
        debug!("Overlay: slot {} on {} -> {:?}", slot_id, date, state);
        self.entries.write().unwrap_or_else(PoisonError::into_inner).insert(
            slot_id,
            OverlayEntry {
                state,
                date: Some(date),
                marked_on: date,
            },
        );
    }

    /// Marks the slot pending unless it already has an entry. Check and
    /// insert happen under one lock, so only one caller wins a slot.
    pub fn try_mark_pending(&self, slot_id: i64, date: Option<NaiveDate>, today: NaiveDate) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, entry| !entry.is_stale(today));

        if entries.contains_key(&slot_id) {
            debug!("Overlay: slot {} already held", slot_id);
            return false;
        }

        debug!("Overlay: slot {} -> Pending", slot_id);
        entries.insert(
            slot_id,
            OverlayEntry {
                state: OverlayState::Pending,
                date,
                marked_on: today,
            },
        );
        true
    }

    pub fn confirm(&self, slot_id: i64) {
        if let Some(entry) = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&slot_id)
        {
            debug!("Overlay: slot {} -> Confirmed", slot_id);
            entry.state = OverlayState::Confirmed;
        }
    }

    pub fn clear(&self, slot_id: i64) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&slot_id);
    }

    pub fn state_of(&self, slot_id: i64) -> Option<OverlayState> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&slot_id)
            .map(|entry| entry.state)
    }

    pub fn hides(&self, slot_id: i64) -> bool {
        self.state_of(slot_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops overrides the backend has caught up with, given the slots
    /// fetched for `months`:
    /// - slots reported unavailable;
    /// - confirmed slots dated inside a fetched month but no longer listed;
    /// - slots dated before `today`, or confirmed before `today` with no
    ///   known date.
    pub fn reconcile(&self, fetched: &[TimeSlot], months: &[(i32, u32)], today: NaiveDate) {
        let by_id: HashMap<i64, &TimeSlot> = fetched.iter().map(|slot| (slot.id, slot)).collect();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        entries.retain(|slot_id, entry| {
            match by_id.get(slot_id) {
                Some(slot) if !slot.is_available => {
                    debug!("Overlay: backend confirms slot {} is taken", slot_id);
                    return false;
                }
                Some(slot) => entry.date = Some(slot.date),
                None => {
                    let in_fetched_month = entry
                        .date
                        .is_some_and(|date| months.contains(&(date.year(), date.month())));
                    if in_fetched_month && entry.state == OverlayState::Confirmed {
                        debug!("Overlay: backend no longer lists slot {}", slot_id);
                        return false;
                    }
                }
            }

            !entry.is_stale(today)
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use chrono::NaiveTime;

    use crate::models::SlotType;

    const JULY: &[(i32, u32)] = &[(2024, 7)];

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn slot(id: i64, available: bool) -> TimeSlot {
        TimeSlot {
            id,
            doctor: None,
            template: None,
            date: date("2024-07-01"),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            duration: None,
            end_time: None,
            slot_type: SlotType::Treatment,
            is_available: available,
            label: None,
        }
    }

    #[test]
    fn test_mark_confirm_and_clear() {
        let overlay = SlotOverlay::new();
        let today = date("2024-07-01");

        assert!(overlay.try_mark_pending(42, None, today));
        assert_eq!(overlay.state_of(42), Some(OverlayState::Pending));

        overlay.confirm(42);
        assert_eq!(overlay.state_of(42), Some(OverlayState::Confirmed));

        overlay.clear(42);
        assert!(overlay.is_empty());

        // confirming a cleared slot does not resurrect it
        overlay.confirm(42);
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_try_mark_pending_refuses_held_slot() {
        let overlay = SlotOverlay::new();
        let today = date("2024-07-01");
        overlay.mark(42, today, OverlayState::Confirmed);

        assert!(!overlay.try_mark_pending(42, None, today));
        assert_eq!(overlay.state_of(42), Some(OverlayState::Confirmed));
    }

    #[test]
    fn test_try_mark_pending_single_winner_across_threads() {
        let overlay = Arc::new(SlotOverlay::new());
        let today = date("2024-07-01");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let overlay = Arc::clone(&overlay);
                std::thread::spawn(move || overlay.try_mark_pending(42, None, today))
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(overlay.state_of(42), Some(OverlayState::Pending));
    }

    #[test]
    fn test_reconcile_drops_only_confirmed_by_backend() {
        let overlay = SlotOverlay::new();
        let today = date("2024-07-01");
        overlay.mark(1, today, OverlayState::Confirmed);
        overlay.mark(2, today, OverlayState::Confirmed);
        overlay.mark(3, today, OverlayState::Pending);

        // 1 now unavailable upstream, 2 still listed as free, 3 pending and not listed
        overlay.reconcile(&[slot(1, false), slot(2, true)], JULY, today);

        assert!(!overlay.hides(1));
        assert!(overlay.hides(2));
        assert!(overlay.hides(3));
        assert_eq!(overlay.len(), 2);
    }

    #[test]
    fn test_reconcile_drops_confirmed_slot_missing_from_fetched_month() {
        let overlay = SlotOverlay::new();
        let today = date("2024-07-01");
        overlay.mark(7, date("2024-07-05"), OverlayState::Confirmed);
        overlay.mark(8, date("2024-08-02"), OverlayState::Confirmed);

        overlay.reconcile(&[slot(2, true)], JULY, today);

        // 7 fell out of the July listing; August was not fetched
        assert!(!overlay.hides(7));
        assert!(overlay.hides(8));
    }

    #[test]
    fn test_reconcile_learns_date_of_undated_booking() {
        let overlay = SlotOverlay::new();
        let today = date("2024-07-01");
        assert!(overlay.try_mark_pending(2, None, today));
        overlay.confirm(2);

        overlay.reconcile(&[slot(2, true)], JULY, today);
        assert!(overlay.hides(2));

        // now dated in July, so a listing without it clears the entry
        overlay.reconcile(&[], JULY, today);
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_past_and_old_undated_entries_expire() {
        let overlay = SlotOverlay::new();
        let today = date("2024-07-01");
        overlay.mark(1, date("2024-06-30"), OverlayState::Confirmed);
        assert!(overlay.try_mark_pending(2, None, date("2024-06-28")));
        overlay.confirm(2);
        assert!(overlay.try_mark_pending(3, None, today));
        overlay.confirm(3);

        overlay.reconcile(&[], &[], today);

        assert!(!overlay.hides(1));
        assert!(!overlay.hides(2));
        assert!(overlay.hides(3));
    }

    #[test]
    fn test_marking_prunes_expired_entries() {
        let overlay = SlotOverlay::new();
        overlay.mark(1, date("2024-06-30"), OverlayState::Confirmed);

        assert!(overlay.try_mark_pending(2, None, date("2024-07-01")));
        assert_eq!(overlay.len(), 1);
        assert!(!overlay.hides(1));
    }
}
