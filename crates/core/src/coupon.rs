//! Coupon codes and server-resolved coupon results.
//!
//! The client does not know coupon rules. It sends a code and the cart context
//! to the backend and displays whatever discount comes back.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Errors that can occur when parsing a [`CouponCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CouponCodeError {
    #[error("please enter a coupon code")]
    Empty,
    #[error("coupon code must be at most {max} characters")]
    TooLong { max: usize },
    #[error("coupon code cannot contain whitespace")]
    Whitespace,
}

/// A coupon code as typed by the customer, trimmed and uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouponCode(String);

impl CouponCode {
    pub const MAX_LENGTH: usize = 32;

    /// Parse a coupon code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty after trimming, too long, or
    /// contains inner whitespace.
    pub fn parse(s: &str) -> Result<Self, CouponCodeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CouponCodeError::Empty);
        }
        if s.chars().count() > Self::MAX_LENGTH {
            return Err(CouponCodeError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(CouponCodeError::Whitespace);
        }
        Ok(Self(s.to_uppercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A coupon the backend accepted, with the amounts it takes off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedCoupon {
    pub code: CouponCode,
    /// Amount off the subtotal.
    pub discount_amount: Money,
    /// Amount off the shipping charge.
    pub shipping_off: Money,
}

impl AppliedCoupon {
    /// Discount actually granted against `subtotal` (never more than it).
    #[must_use]
    pub fn subtotal_discount(&self, subtotal: Money) -> Money {
        self.discount_amount.non_negative().min(subtotal.non_negative())
    }

    /// Shipping discount actually granted against `shipping` (never more than it).
    #[must_use]
    pub fn shipping_discount(&self, shipping: Money) -> Money {
        self.shipping_off.non_negative().min(shipping.non_negative())
    }
}
