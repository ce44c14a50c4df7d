pub mod error;
pub mod locale;

pub use error::{ApiError, AppError};
pub use locale::{Locale, LocaleProvider, UnknownLocale};
