use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{broadcast, broadcast::error::RecvError, watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use locale_cell::LocaleChanged;
use shared_utils::{Clock, ClinicContext, Generation};

use crate::calendar::{is_past_date, CalendarWindow};
use crate::display;
use crate::models::{CalendarDayView, SlotButtonView, SlotSelectionView, TimeSlot};
use crate::services::filter::{filter_for_date, group_rows, has_selectable_slots};
use crate::services::overlay::SlotOverlay;
use crate::services::slots::SlotService;

pub const NO_SLOTS_MESSAGE: &str = "На выбранную дату нет доступных слотов";

#[derive(Debug, Clone)]
struct SelectorState {
    window: CalendarWindow,
    selected: Option<NaiveDate>,
    slots: Vec<TimeSlot>,
    error: Option<String>,
}

/// Slot-picking page state for one doctor: the visible week, the chosen day
/// and the slots fetched for that week.
pub struct SlotSelector {
    doctor_id: i64,
    service: SlotService,
    clock: Arc<dyn Clock>,
    overlay: Option<Arc<SlotOverlay>>,
    row_width: usize,
    state: RwLock<SelectorState>,
    generation: Generation,
    closed: AtomicBool,
    revision: watch::Sender<u64>,
}

impl SlotSelector {
    pub fn new(context: &ClinicContext, doctor_id: i64, overlay: Option<Arc<SlotOverlay>>) -> Self {
        let today = context.clock.today();
        let (revision, _) = watch::channel(0);

        Self {
            doctor_id,
            service: SlotService::new(context.api.clone()),
            clock: Arc::clone(&context.clock),
            overlay,
            row_width: context.config.slot_row_width,
            state: RwLock::new(SelectorState {
                window: CalendarWindow::new(today),
                selected: None,
                slots: Vec::new(),
                error: None,
            }),
            generation: Generation::new(),
            closed: AtomicBool::new(false),
            revision,
        }
    }

    pub fn doctor_id(&self) -> i64 {
        self.doctor_id
    }

    /// Positions the page without fetching. Past dates cannot be selected.
    pub async fn navigate(&self, window: CalendarWindow, selected: Option<NaiveDate>) {
        let today = self.clock.today();
        let mut state = self.state.write().await;
        state.window = window;
        state.selected = selected.filter(|date| !is_past_date(*date, today));
    }

    /// Selects `date` and re-fetches. Returns `false` for a past date or one
    /// beyond the calendar range.
    pub async fn select_date(&self, date: NaiveDate) -> bool {
        if is_past_date(date, self.clock.today()) {
            debug!("Ignoring selection of past date {}", date);
            return false;
        }

        {
            let mut state = self.state.write().await;
            if !state.window.contains(date) {
                match CalendarWindow::try_new(date) {
                    Some(window) => state.window = window,
                    None => {
                        debug!("Ignoring selection of out-of-range date {}", date);
                        return false;
                    }
                }
            }
            state.selected = Some(date);
        }

        self.refresh().await;
        true
    }

    /// Moves the week; a selection follows to the new anchor unless that day
    /// is already past. Returns `false`, leaving the page as is, when the
    /// target week is out of range.
    pub async fn shift_week(&self, weeks: i32) -> bool {
        {
            let today = self.clock.today();
            let mut state = self.state.write().await;
            let Some((window, selected)) = shifted(&state, weeks, today) else {
                debug!("Ignoring week shift by {} for doctor {}", weeks, self.doctor_id);
                return false;
            };
            state.window = window;
            state.selected = selected;
        }

        self.refresh().await;
        true
    }

    /// Fetches the visible week. Failures leave an empty slot list and an
    /// error message; responses overtaken by a newer fetch are dropped.
    pub async fn refresh(&self) {
        if self.is_closed() {
            return;
        }

        let ticket = self.generation.begin();
        let window = self.state.read().await.window;

        let result = self.service.fetch_window(self.doctor_id, &window).await;

        let mut state = self.state.write().await;
        if !self.generation.is_current(ticket) {
            debug!("Discarding stale slot response for doctor {}", self.doctor_id);
            return;
        }

        match result {
            Ok(slots) => {
                if let Some(overlay) = &self.overlay {
                    overlay.reconcile(&slots, &window.months(), self.clock.today());
                }
                debug!("Loaded {} slots for doctor {}", slots.len(), self.doctor_id);
                state.slots = slots;
                state.error = None;
            }
            Err(e) => {
                warn!("Slot fetch for doctor {} failed: {}", self.doctor_id, e);
                state.slots.clear();
                state.error = Some(e.user_message());
            }
        }
        drop(state);

        self.revision.send_modify(|revision| *revision += 1);
    }

    pub async fn view(&self) -> SlotSelectionView {
        let state = self.state.read().await.clone();
        let now = self.clock.now();
        let today = now.date();
        let overlay = self.overlay.as_deref();

        let days = state
            .window
            .days()
            .iter()
            .map(|day| CalendarDayView {
                date: *day,
                weekday: display::short_weekday(*day),
                day: chrono::Datelike::day(day),
                month: display::short_month(*day),
                is_today: *day == today,
                is_selected: state.selected == Some(*day),
                is_past: is_past_date(*day, today),
                has_availability: has_selectable_slots(&state.slots, *day, now, overlay),
            })
            .collect();

        let visible = state
            .selected
            .map(|date| filter_for_date(&state.slots, date, now, overlay))
            .unwrap_or_default();
        let buttons: Vec<SlotButtonView> = visible.iter().map(slot_button).collect();

        let empty_message = match (&state.selected, &state.error) {
            (Some(_), None) if buttons.is_empty() => Some(NO_SLOTS_MESSAGE),
            _ => None,
        };

        SlotSelectionView {
            doctor_id: self.doctor_id,
            week_start: state.window.week_start(),
            days,
            selected_date: state.selected,
            selected_date_label: state.selected.map(display::long_date),
            rows: group_rows(&buttons, self.row_width),
            empty_message,
            error: state.error.clone(),
            previous_week: self.week_link(&state, -1, today),
            next_week: self.week_link(&state, 1, today),
        }
    }

    fn week_link(&self, state: &SelectorState, weeks: i32, today: NaiveDate) -> String {
        let (window, selected) = shifted(state, weeks, today).unwrap_or((state.window, state.selected));
        let mut link = format!(
            "/doctor/{}/slots?anchor={}",
            self.doctor_id,
            window.anchor().format("%Y-%m-%d")
        );
        if let Some(date) = selected {
            link.push_str(&format!("&date={}", date.format("%Y-%m-%d")));
        }
        link
    }

    pub fn subscribe_updates(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Stops applying fetch results and ends any locale watcher.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.generation.invalidate();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Re-fetches the visible week on every locale change until closed.
    pub fn watch_locale(self: Arc<Self>, mut events: broadcast::Receiver<LocaleChanged>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(change) => {
                        if self.is_closed() {
                            break;
                        }
                        info!("Locale switched to {}, reloading slots for doctor {}", change.current, self.doctor_id);
                        self.refresh().await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        if self.is_closed() {
                            break;
                        }
                        warn!("Missed {} locale events, reloading slots", skipped);
                        self.refresh().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

fn shifted(state: &SelectorState, weeks: i32, today: NaiveDate) -> Option<(CalendarWindow, Option<NaiveDate>)> {
    let window = state.window.try_shift(weeks)?;
    let selected = state
        .selected
        .map(|_| window.anchor())
        .filter(|anchor| !is_past_date(*anchor, today));
    Some((window, selected))
}

fn slot_button(slot: &TimeSlot) -> SlotButtonView {
    SlotButtonView {
        id: slot.id,
        time: display::clock(slot.start_time),
        duration_label: display::duration_label(slot.duration_minutes()),
        slot_type: slot.slot_type,
        type_label: slot.slot_type.display_name(),
        label: slot.label.clone(),
    }
}
