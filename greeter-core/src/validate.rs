//! Input checks applied before a value may reach [`crate::UserProfile`].

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("username cannot be empty")]
    EmptyUsername,

    #[error("city must not contain numbers")]
    CityHasDigits,

    #[error("city cannot be empty")]
    EmptyCity,
}

pub fn validate_username(input: &str) -> Result<(), ValidationError> {
    if input.trim().is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    Ok(())
}

/// Digits are reported before emptiness, so `" 4 "` yields
/// [`ValidationError::CityHasDigits`].
pub fn validate_city(input: &str) -> Result<(), ValidationError> {
    if input.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::CityHasDigits);
    }
    if input.trim().is_empty() {
        return Err(ValidationError::EmptyCity);
    }
    Ok(())
}

/// Form in which an accepted answer is stored.
pub fn normalize(input: &str) -> String {
    input.trim().to_string()
}
