use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// One field-level constraint violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Turn a violation list into an error, or pass. Run before any persistence.
pub fn ensure_valid(errors: Vec<FieldError>) -> AppResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn price_in_range(price: Decimal) -> bool {
    price >= Decimal::new(1, 2) && price <= Decimal::from(1000)
}

/// Seat numbers look like "A1" or "B12": one uppercase ASCII letter
/// followed by one or two digits.
pub fn seat_number_is_valid(seat: &str) -> bool {
    let mut chars = seat.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    let digits: Vec<char> = chars.collect();
    (1..=2).contains(&digits.len()) && digits.iter().all(|c| c.is_ascii_digit())
}

pub fn email_is_valid(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.starts_with('.')
        }
        None => false,
    }
}

pub fn phone_is_valid(phone: &str) -> bool {
    phone.len() >= 7
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'))
        && phone.chars().any(|c| c.is_ascii_digit())
}

pub fn validate_movie(title: &str, description: &str, price: Decimal, duration: i32) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if title.is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
    } else if title.chars().count() > 100 {
        errors.push(FieldError::new("title", "Title cannot exceed 100 characters"));
    }

    if description.is_empty() {
        errors.push(FieldError::new("description", "Description is required"));
    } else if description.chars().count() > 500 {
        errors.push(FieldError::new(
            "description",
            "Description cannot exceed 500 characters",
        ));
    }

    if !price_in_range(price) {
        errors.push(FieldError::new("price", "Price must be between 0.01 and 1000"));
    }

    if !(1..=300).contains(&duration) {
        errors.push(FieldError::new(
            "duration",
            "Duration must be between 1 and 300 minutes",
        ));
    }

    errors
}

pub fn validate_booking(cinema: &str, seat_number: &str, price: Decimal) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if cinema.is_empty() {
        errors.push(FieldError::new("cinema", "Cinema selection is required"));
    }

    if seat_number.is_empty() {
        errors.push(FieldError::new("seat_number", "Seat number is required"));
    } else if !seat_number_is_valid(seat_number) {
        errors.push(FieldError::new(
            "seat_number",
            "Seat format must be like A1, B12, etc.",
        ));
    }

    if !price_in_range(price) {
        errors.push(FieldError::new("price", "Price must be between 0.01 and 1000"));
    }

    errors
}

pub fn validate_registration(
    email: &str,
    password: &str,
    full_name: &str,
    phone: &str,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !email_is_valid(email) {
        errors.push(FieldError::new("email", "Invalid email format"));
    }

    if password.len() < 8 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }

    if full_name.is_empty() {
        errors.push(FieldError::new("full_name", "Full name is required"));
    } else if full_name.chars().count() > 100 {
        errors.push(FieldError::new("full_name", "Name cannot exceed 100 characters"));
    }

    if phone.is_empty() {
        errors.push(FieldError::new("phone", "Phone number is required"));
    } else if !phone_is_valid(phone) {
        errors.push(FieldError::new("phone", "Invalid phone number format"));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_number_accepts_row_letter_plus_digits() {
        assert!(seat_number_is_valid("A1"));
        assert!(seat_number_is_valid("B12"));
        assert!(seat_number_is_valid("Z99"));
    }

    #[test]
    fn test_seat_number_rejects_bad_formats() {
        assert!(!seat_number_is_valid("a1"));
        assert!(!seat_number_is_valid("12A"));
        assert!(!seat_number_is_valid("AA1"));
        assert!(!seat_number_is_valid("A123"));
        assert!(!seat_number_is_valid("A"));
        assert!(!seat_number_is_valid(""));
    }

    #[test]
    fn test_price_bounds() {
        let errs = validate_booking("Cinema City 1", "A1", Decimal::new(0, 2));
        assert!(errs.iter().any(|e| e.field == "price"));

        let errs = validate_booking("Cinema City 1", "A1", Decimal::from(1001));
        assert!(errs.iter().any(|e| e.field == "price"));

        let errs = validate_booking("Cinema City 1", "A1", Decimal::new(1, 2));
        assert!(errs.is_empty());

        let errs = validate_booking("Cinema City 1", "A1", Decimal::from(1000));
        assert!(errs.is_empty());
    }

    #[test]
    fn test_movie_field_lengths() {
        let long_title = "x".repeat(101);
        let errs = validate_movie(&long_title, "desc", Decimal::new(1299, 2), 120);
        assert!(errs.iter().any(|e| e.field == "title"));

        let errs = validate_movie("", "desc", Decimal::new(1299, 2), 120);
        assert!(errs.iter().any(|e| e.field == "title"));

        let long_desc = "x".repeat(501);
        let errs = validate_movie("Title", &long_desc, Decimal::new(1299, 2), 120);
        assert!(errs.iter().any(|e| e.field == "description"));
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        // 100 two-byte characters is still within the limit
        let title = "é".repeat(100);
        assert!(validate_movie(&title, "desc", Decimal::new(1299, 2), 120).is_empty());

        let title = "é".repeat(101);
        assert!(validate_movie(&title, "desc", Decimal::new(1299, 2), 120)
            .iter()
            .any(|e| e.field == "title"));

        let name = "é".repeat(100);
        assert!(validate_registration("a@b.com", "password1", &name, "555-0101").is_empty());
    }

    #[test]
    fn test_movie_duration_range() {
        assert!(validate_movie("T", "d", Decimal::from(10), 0)
            .iter()
            .any(|e| e.field == "duration"));
        assert!(validate_movie("T", "d", Decimal::from(10), 301)
            .iter()
            .any(|e| e.field == "duration"));
        assert!(validate_movie("T", "d", Decimal::from(10), 300).is_empty());
    }

    #[test]
    fn test_registration_formats() {
        assert!(validate_registration("alice@example.com", "password1", "Alice", "555-0101").is_empty());
        assert!(validate_registration("not-an-email", "password1", "Alice", "555-0101")
            .iter()
            .any(|e| e.field == "email"));
        assert!(validate_registration("alice@example.com", "password1", "Alice", "abc")
            .iter()
            .any(|e| e.field == "phone"));
    }
}
