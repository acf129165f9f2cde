//! Input validation tests
//!
//! Property-based and unit tests for the shared validators used by
//! checkout, auth and settings.

use proptest::prelude::*;

use shared::validation::{
    validate_coordinates, validate_email, validate_map_link, validate_password, validate_phone,
    validate_whatsapp_number,
};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Indonesian-style mobile numbers, with or without separators
fn phone_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "08[0-9]{8,11}",
        "\\+628[0-9]{8,10}",
        "08[0-9]{2}-[0-9]{4}-[0-9]{4}",
    ]
}

/// Digits-only WhatsApp numbers in international format
fn whatsapp_strategy() -> impl Strategy<Value = String> {
    "628[0-9]{8,11}"
}

fn email_strategy() -> impl Strategy<Value = String> {
    "[a-z]{3,10}@[a-z]{3,8}\\.(com|id|co\\.id)"
}

fn password_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9!@#$%]{6,20}"
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn phone_accepts_local_and_international_forms() {
        assert!(validate_phone("081234567890").is_ok());
        assert!(validate_phone("+6281234567890").is_ok());
        assert!(validate_phone("0812-3456-7890").is_ok());
    }

    #[test]
    fn phone_rejects_short_and_junk_input() {
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("not-a-phone").is_err());
    }

    #[test]
    fn whatsapp_number_must_be_digits_only() {
        assert!(validate_whatsapp_number("6281234567890").is_ok());
        assert!(validate_whatsapp_number("+6281234567890").is_err());
        assert!(validate_whatsapp_number("62812-34567").is_err());
    }

    #[test]
    fn email_requires_at_and_domain() {
        assert!(validate_email("admin@kopikita.id").is_ok());
        assert!(validate_email("admin").is_err());
        assert!(validate_email("admin@").is_err());
    }

    #[test]
    fn password_needs_six_characters() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("12345").is_err());
    }

    #[test]
    fn coordinates_are_lat_comma_lng() {
        assert!(validate_coordinates("-6.2088, 106.8456").is_ok());
        assert!(validate_coordinates("-6.2088").is_err());
        assert!(validate_coordinates("abc, def").is_err());
    }

    #[test]
    fn map_link_must_be_http() {
        assert!(validate_map_link("https://maps.app.goo.gl/xyz").is_ok());
        assert!(validate_map_link("maps.app.goo.gl/xyz").is_err());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn generated_phones_validate(phone in phone_strategy()) {
        prop_assert!(validate_phone(&phone).is_ok());
    }

    #[test]
    fn generated_whatsapp_numbers_validate(number in whatsapp_strategy()) {
        prop_assert!(validate_whatsapp_number(&number).is_ok());
    }

    #[test]
    fn generated_emails_validate(email in email_strategy()) {
        prop_assert!(validate_email(&email).is_ok());
    }

    #[test]
    fn generated_passwords_validate(password in password_strategy()) {
        prop_assert!(validate_password(&password).is_ok());
    }

    /// Stripping separators never changes a phone verdict
    #[test]
    fn phone_validation_ignores_separators(digits in "08[0-9]{8,11}") {
        let spaced = format!("{} ", digits);
        prop_assert_eq!(
            validate_phone(&digits).is_ok(),
            validate_phone(spaced.trim()).is_ok()
        );
    }
}
