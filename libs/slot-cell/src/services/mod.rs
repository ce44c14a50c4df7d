pub mod filter;
pub mod overlay;
pub mod selector;
pub mod slots;

pub use filter::{filter_for_date, group_rows, has_selectable_slots};
pub use overlay::{OverlayState, SlotOverlay};
pub use selector::SlotSelector;
pub use slots::SlotService;
