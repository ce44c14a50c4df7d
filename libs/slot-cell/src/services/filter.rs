use chrono::{NaiveDate, NaiveDateTime};

use crate::calendar::is_past_date;
use crate::models::TimeSlot;
use crate::services::overlay::SlotOverlay;

/// Slots bookable on `chosen`: same date, available, not hidden by the
/// overlay, and on today only those starting strictly after `now`. Past dates
/// yield nothing. Backend order is kept.
pub fn filter_for_date(
    slots: &[TimeSlot],
    chosen: NaiveDate,
    now: NaiveDateTime,
    overlay: Option<&SlotOverlay>,
) -> Vec<TimeSlot> {
    let today = now.date();
    if is_past_date(chosen, today) {
        return Vec::new();
    }

    slots
        .iter()
        .filter(|slot| slot.date == chosen && slot.is_available)
        .filter(|slot| chosen != today || slot.start_time > now.time())
        .filter(|slot| overlay.map_or(true, |o| !o.hides(slot.id)))
        .cloned()
        .collect()
}

pub fn has_selectable_slots(
    slots: &[TimeSlot],
    date: NaiveDate,
    now: NaiveDateTime,
    overlay: Option<&SlotOverlay>,
) -> bool {
    !filter_for_date(slots, date, now, overlay).is_empty()
}

/// Layout rows of at most `width` items. A zero width is treated as one.
pub fn group_rows<T: Clone>(items: &[T], width: usize) -> Vec<Vec<T>> {
    items.chunks(width.max(1)).map(<[T]>::to_vec).collect()
}
