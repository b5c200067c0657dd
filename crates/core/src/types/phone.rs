//! Bangladeshi mobile numbers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    #[error("phone number cannot be empty")]
    Empty,
    #[error("phone number may only contain digits, spaces, dashes and a leading +")]
    InvalidCharacter,
    #[error("phone number must be an 11-digit mobile number starting with 01")]
    InvalidFormat,
}

/// A mobile number normalized to the local 11-digit form (`01XXXXXXXXX`).
///
/// Accepts the international forms `+8801...` and `8801...` as well as
/// spaces and dashes between digit groups.
///
/// ```
/// use dokan_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("+880 1712-345678").unwrap();
/// assert_eq!(phone.as_str(), "01712345678");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse and normalize a phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other than
    /// digits, spaces, dashes or a leading `+`, or is not a valid mobile number
    /// once the country code is removed.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        let without_plus = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let mut digits = String::with_capacity(without_plus.len());
        for c in without_plus.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' => {}
                _ => return Err(PhoneError::InvalidCharacter),
            }
        }

        let local = digits.strip_prefix("88").unwrap_or(&digits);
        let valid_operator = local
            .as_bytes()
            .get(2)
            .is_some_and(|b| (b'3'..=b'9').contains(b));
        if local.len() != 11 || !local.starts_with("01") || !valid_operator {
            return Err(PhoneError::InvalidFormat);
        }

        Ok(Self(local.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
