//! Validation utilities for the Kopi Kita ordering platform
//!
//! Field-level checks shared by the write paths; all return
//! `Result<(), &'static str>` so callers can attach their own error context.

use rust_decimal::Decimal;

// ============================================================================
// Customer / contact validations
// ============================================================================

/// Validate a phone number: 10-15 digits after stripping formatting.
/// Accepts: 081234567890, 0812-3456-7890, +6281234567890
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() >= 10 && digits.len() <= 15 {
        Ok(())
    } else {
        Err("Phone number must contain 10-15 digits")
    }
}

/// Validate a WhatsApp number: digits only, 10-15, no `+` prefix.
/// This is the strict form used for the store's own outbound number.
pub fn validate_whatsapp_number(number: &str) -> Result<(), &'static str> {
    if number.len() >= 10 && number.len() <= 15 && number.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err("WhatsApp number must be 10-15 digits without country code prefix")
    }
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate admin password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

// ============================================================================
// Store settings validations
// ============================================================================

/// Validate pickup coordinates in "latitude, longitude" form.
pub fn validate_coordinates(coordinates: &str) -> Result<(), &'static str> {
    let mut parts = coordinates.split(',');
    let (lat, lng) = match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lng), None) => (lat.trim(), lng.trim()),
        _ => return Err("Coordinates must be in format: latitude, longitude"),
    };
    if lat.parse::<f64>().is_err() || lng.parse::<f64>().is_err() {
        return Err("Coordinates must be in format: latitude, longitude");
    }
    Ok(())
}

/// Validate a map link is a URL.
pub fn validate_map_link(link: &str) -> Result<(), &'static str> {
    if link.starts_with("http") {
        Ok(())
    } else {
        Err("Map link must be a valid URL")
    }
}

// ============================================================================
// Money / quantity validations
// ============================================================================

/// Recipe and stock quantities must be strictly positive.
pub fn validate_positive_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity > Decimal::ZERO {
        Ok(())
    } else {
        Err("Quantity must be positive")
    }
}

/// Fee amounts may be zero but never negative.
pub fn validate_fee_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount >= Decimal::ZERO {
        Ok(())
    } else {
        Err("Fee amount cannot be negative")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_strips_formatting() {
        assert!(validate_phone("0812-3456-7890").is_ok());
        assert!(validate_phone("+62 812 3456 7890").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn whatsapp_number_is_strict_digits() {
        assert!(validate_whatsapp_number("6281234567890").is_ok());
        assert!(validate_whatsapp_number("+6281234567890").is_err());
        assert!(validate_whatsapp_number("0812345").is_err());
    }

    #[test]
    fn coordinates_accept_signed_decimals() {
        assert!(validate_coordinates("-6.2088, 106.8456").is_ok());
        assert!(validate_coordinates("-6.2088,106.8456").is_ok());
        assert!(validate_coordinates("-6.2088").is_err());
        assert!(validate_coordinates("a, b").is_err());
        assert!(validate_coordinates("1, 2, 3").is_err());
    }

    #[test]
    fn fee_amount_zero_is_allowed() {
        assert!(validate_fee_amount(Decimal::ZERO).is_ok());
        assert!(validate_fee_amount(Decimal::from(-1)).is_err());
    }
}
