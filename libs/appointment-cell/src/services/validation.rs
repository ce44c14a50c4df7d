use std::sync::OnceLock;

use regex::Regex;

use crate::models::{ContactDetails, ContactField, FieldError};

/// `+996` and exactly nine ASCII digits.
const PHONE_PATTERN: &str = r"^\+996[0-9]{9}$";

pub const NAME_REQUIRED: &str = "Имя обязательно для заполнения";
pub const NAME_TOO_SHORT: &str = "Имя должно содержать минимум 2 символа";
pub const PHONE_REQUIRED: &str = "Номер телефона обязателен для заполнения";
pub const PHONE_INVALID: &str = "Введите корректный номер телефона в формате +996XXXXXXXXX";

fn phone_regex() -> Option<&'static Regex> {
    static PHONE: OnceLock<Option<Regex>> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).ok()).as_ref()
}

pub fn validate_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    if name.is_empty() {
        Some(NAME_REQUIRED)
    } else if name.chars().count() < 2 {
        Some(NAME_TOO_SHORT)
    } else {
        None
    }
}

pub fn validate_phone(phone: &str) -> Option<&'static str> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Some(PHONE_REQUIRED);
    }

    match phone_regex() {
        Some(re) if re.is_match(phone) => None,
        _ => Some(PHONE_INVALID),
    }
}

/// Every failing field, name first.
pub fn validate_contact(details: &ContactDetails) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(message) = validate_name(&details.name) {
        errors.push(FieldError { field: ContactField::Name, message });
    }
    if let Some(message) = validate_phone(&details.phone) {
        errors.push(FieldError { field: ContactField::Phone, message });
    }

    errors
}
