pub mod booking;
pub mod flow;
pub mod validation;

pub use booking::AppointmentService;
pub use flow::ConfirmationFlow;
pub use validation::{validate_contact, validate_name, validate_phone};
