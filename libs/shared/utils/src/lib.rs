pub mod clock;
pub mod context;
pub mod generation;
pub mod test_utils;

pub use clock::{Clock, SystemClock};
pub use context::ClinicContext;
pub use generation::{Generation, Ticket};
