//! Checkout errors.

use dokan_core::{CouponCodeError, ValidationError};
use thiserror::Error;

use crate::error::ApiError;

/// Errors that can occur applying a coupon or submitting an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The session is missing something; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The coupon code is malformed; nothing was sent.
    #[error(transparent)]
    Coupon(#[from] CouponCodeError),

    /// The backend answered 2xx but refused the coupon.
    #[error("coupon rejected: {0}")]
    Rejected(String),

    /// The same operation is already in flight.
    #[error("request already in progress")]
    Busy,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Fallback when a coupon is refused without a message.
pub const COUPON_REJECTED: &str = "This coupon is not valid.";

impl CheckoutError {
    /// The message to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => capitalize(&e.to_string()),
            Self::Coupon(e) => capitalize(&e.to_string()),
            Self::Rejected(message) => message.clone(),
            Self::Busy => "Please wait for the current request to finish.".to_string(),
            Self::Api(e) => e.user_message(),
        }
    }

    /// Whether the request reached the backend.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Coupon(_) | Self::Busy)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            CheckoutError::from(ValidationError::MissingDistrict).user_message(),
            "Please select a district"
        );
        assert_eq!(
            CheckoutError::from(CouponCodeError::Empty).user_message(),
            "Please enter a coupon code"
        );
        assert_eq!(
            CheckoutError::Rejected("Coupon expired".to_string()).user_message(),
            "Coupon expired"
        );
        assert_eq!(
            CheckoutError::Api(ApiError::Api {
                status: 500,
                message: None
            })
            .user_message(),
            crate::error::GENERIC_FAILURE
        );
    }

    #[test]
    fn test_is_local() {
        assert!(CheckoutError::Busy.is_local());
        assert!(!CheckoutError::Rejected(String::new()).is_local());
    }
}
