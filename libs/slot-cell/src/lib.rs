pub mod calendar;
pub mod display;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use calendar::{is_past, is_past_date, CalendarWindow};
pub use models::*;
pub use services::*;
