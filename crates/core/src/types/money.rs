//! Monetary amounts in Bangladeshi taka using decimal arithmetic.
//!
//! The backend speaks plain JSON numbers, so `Money` serializes as a number
//! and deserializes from either a number or a numeric string.
//!
//! Arithmetic saturates at the bounds of `Decimal` instead of panicking, so a
//! nonsensical amount from the backend cannot crash a checkout.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Sub};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::lenient;

/// Currency symbol used for display.
pub const CURRENCY_SYMBOL: &str = "৳";

/// An amount of money in taka.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero taka.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount from a decimal value.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create an amount from whole taka.
    #[must_use]
    pub fn from_taka(taka: i64) -> Self {
        Self(Decimal::from(taka))
    }

    /// Create an amount from poisha (1/100 taka).
    #[must_use]
    pub fn from_poisha(poisha: i64) -> Self {
        Self(Decimal::new(poisha, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Clamp negative amounts to zero.
    #[must_use]
    pub fn non_negative(self) -> Self {
        if self.0.is_sign_negative() {
            Self::ZERO
        } else {
            self
        }
    }

    /// Subtract, never going below zero.
    #[must_use]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        (self - rhs).non_negative()
    }

    /// Format for display (e.g., "৳1200.00").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{CURRENCY_SYMBOL}{:.2}", self.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0.saturating_mul(Decimal::from(rhs)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => Err(serde::ser::Error::custom(format!(
                "amount {} cannot be represented as a number",
                self.0
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        lenient::parse_decimal(&value)
            .map(Self)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {value}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_poisha() {
        assert_eq!(Money::from_poisha(12_050).amount(), Decimal::new(12_050, 2));
        assert_eq!(Money::from_poisha(-150).amount(), Decimal::new(-150, 2));
    }

    #[test]
    fn test_saturating_sub_clamps_at_zero() {
        let a = Money::from_taka(50);
        let b = Money::from_taka(80);
        assert_eq!(a.saturating_sub(b), Money::ZERO);
        assert_eq!(b.saturating_sub(a), Money::from_taka(30));
    }

    #[test]
    fn test_line_arithmetic() {
        let total: Money = [Money::from_taka(250) * 2, Money::from_poisha(9_950)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_poisha(59_950));
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_panicking() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max * 2, max);
        assert_eq!(max + Money::from_taka(1), max);
        assert_eq!([max, max].into_iter().sum::<Money>(), max);

        let mut running = max;
        running += max;
        assert_eq!(running, max);

        assert_eq!(Money::new(Decimal::MIN) - max, Money::new(Decimal::MIN));
        assert_eq!(Money::ZERO.saturating_sub(max), Money::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_taka(1200).to_string(), "৳1200.00");
        assert_eq!(Money::from_poisha(6_050).to_string(), "৳60.50");
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_value(Money::from_poisha(6_050)).unwrap();
        assert_eq!(json, serde_json::json!(60.5));
    }

    #[test]
    fn test_deserializes_numbers_and_strings() {
        let from_number: Money = serde_json::from_str("60").unwrap();
        let from_string: Money = serde_json::from_str("\"60.00\"").unwrap();
        assert_eq!(from_number, from_string);
        assert!(serde_json::from_str::<Money>("\"free\"").is_err());
        assert!(serde_json::from_str::<Money>("null").is_err());
    }
}
