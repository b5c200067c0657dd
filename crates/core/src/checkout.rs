//! Checkout session state, totals and the order payload.
//!
//! A [`CheckoutSession`] is the local state the checkout screen works on: the
//! cart lines, the chosen district and address, and the coupon the backend
//! accepted (if any). Everything here is pure; the network calls that apply a
//! coupon or submit the order live in the client crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::{self, CartItem};
use crate::coupon::AppliedCoupon;
use crate::shipping::{ShippingQuote, ShippingSettings};
use crate::types::{Money, PaymentMethod, PhoneNumber, ProductId};

/// Reasons a checkout cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("please select a district")]
    MissingDistrict,
    #[error("please enter a delivery address")]
    MissingAddress,
    #[error("your cart is empty")]
    EmptyCart,
}

/// Where the order is delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneNumber>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub district: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Computed order totals. All amounts are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Money,
    pub shipping: Money,
    /// Coupon discount applied to the subtotal.
    pub discount: Money,
    /// Coupon discount applied to shipping.
    pub shipping_discount: Money,
    pub total: Money,
}

impl OrderTotals {
    /// Combine a subtotal, a shipping charge and an optional coupon.
    ///
    /// `total = max(0, subtotal - discount) + max(0, shipping - shipping_off)`
    #[must_use]
    pub fn compute(subtotal: Money, shipping: Money, coupon: Option<&AppliedCoupon>) -> Self {
        let subtotal = subtotal.non_negative();
        let shipping = shipping.non_negative();
        let discount = coupon.map_or(Money::ZERO, |c| c.subtotal_discount(subtotal));
        let shipping_discount = coupon.map_or(Money::ZERO, |c| c.shipping_discount(shipping));

        Self {
            subtotal,
            shipping,
            discount,
            shipping_discount,
            total: subtotal.saturating_sub(discount) + shipping.saturating_sub(shipping_discount),
        }
    }
}

/// One order line as the backend expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product: ProductId,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&CartItem> for OrderItemPayload {
    fn from(item: &CartItem) -> Self {
        Self {
            product: item.product_id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
            size: item.size.clone(),
            color: item.color.clone(),
            image: item.image.clone(),
        }
    }
}

/// Body of `POST /api/order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub items: Vec<OrderItemPayload>,
    pub shipping_address: ShippingAddress,
    pub district: String,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    pub subtotal: Money,
    pub shipping_cost: Money,
    pub discount: Money,
    pub shipping_discount: Money,
    pub total: Money,
}

/// Local checkout state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutSession {
    pub items: Vec<CartItem>,
    pub address: ShippingAddress,
    pub payment_method: PaymentMethod,
    coupon: Option<AppliedCoupon>,
}

impl CheckoutSession {
    /// Start a checkout for the given cart lines.
    #[must_use]
    pub fn new(items: Vec<CartItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn district(&self) -> &str {
        &self.address.district
    }

    pub fn set_district(&mut self, district: impl Into<String>) {
        self.address.district = district.into();
    }

    #[must_use]
    pub fn subtotal(&self) -> Money {
        cart::subtotal(&self.items)
    }

    /// The coupon currently applied, if any.
    #[must_use]
    pub const fn coupon(&self) -> Option<&AppliedCoupon> {
        self.coupon.as_ref()
    }

    pub fn set_coupon(&mut self, coupon: AppliedCoupon) {
        self.coupon = Some(coupon);
    }

    /// Drop the applied coupon, returning it.
    pub fn clear_coupon(&mut self) -> Option<AppliedCoupon> {
        self.coupon.take()
    }

    /// Shipping quote for the current district and subtotal.
    #[must_use]
    pub fn shipping_quote(&self, settings: &ShippingSettings, now: DateTime<Utc>) -> ShippingQuote {
        settings.quote(self.district(), self.subtotal(), now)
    }

    /// Shipping cost for the current district and subtotal.
    #[must_use]
    pub fn shipping(&self, settings: &ShippingSettings, now: DateTime<Utc>) -> Money {
        self.shipping_quote(settings, now).amount()
    }

    #[must_use]
    pub fn totals(&self, settings: &ShippingSettings, now: DateTime<Utc>) -> OrderTotals {
        OrderTotals::compute(
            self.subtotal(),
            self.shipping(settings, now),
            self.coupon.as_ref(),
        )
    }

    /// Check that the session can be submitted.
    ///
    /// These are presence checks only: a district, an address, and at least
    /// one cart line.
    ///
    /// # Errors
    ///
    /// Returns the first missing piece, in the order district, address, cart.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.address.district.trim().is_empty() {
            return Err(ValidationError::MissingDistrict);
        }
        if self.address.address.trim().is_empty() {
            return Err(ValidationError::MissingAddress);
        }
        if self.items.iter().all(|item| item.quantity == 0) {
            return Err(ValidationError::EmptyCart);
        }
        Ok(())
    }

    /// Validate and assemble the order payload.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if [`Self::validate`] fails.
    pub fn to_payload(
        &self,
        settings: &ShippingSettings,
        now: DateTime<Utc>,
    ) -> Result<OrderPayload, ValidationError> {
        self.validate()?;
        let totals = self.totals(settings, now);

        Ok(OrderPayload {
            items: self
                .items
                .iter()
                .filter(|item| item.quantity > 0)
                .map(OrderItemPayload::from)
                .collect(),
            shipping_address: self.address.clone(),
            district: self.address.district.trim().to_string(),
            payment_method: self.payment_method,
            coupon_code: self.coupon.as_ref().map(|c| c.code.to_string()),
            subtotal: totals.subtotal,
            shipping_cost: totals.shipping,
            discount: totals.discount,
            shipping_discount: totals.shipping_discount,
            total: totals.total,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::coupon::CouponCode;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 14, 12, 0, 0).unwrap()
    }

    fn settings() -> ShippingSettings {
        ShippingSettings {
            inside_dhaka_rate: Some(Decimal::from(60)),
            outside_dhaka_rate: Some(Decimal::from(120)),
            free_threshold: Some(Decimal::from(1000)),
            ..ShippingSettings::default()
        }
    }

    fn line(price: i64, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new("65f0aa"),
            name: "Nakshi Kantha".to_string(),
            price: Money::from_taka(price),
            quantity,
            image: None,
            size: None,
            color: None,
        }
    }

    fn coupon(discount: i64, shipping_off: i64) -> AppliedCoupon {
        AppliedCoupon {
            code: CouponCode::parse("EID25").unwrap(),
            discount_amount: Money::from_taka(discount),
            shipping_off: Money::from_taka(shipping_off),
        }
    }

    fn ready_session() -> CheckoutSession {
        let mut session = CheckoutSession::new(vec![line(250, 2)]);
        session.set_district("Dhaka");
        session.address.address = "House 12, Road 5, Dhanmondi".to_string();
        session.address.full_name = "Ayesha Rahman".to_string();
        session
    }

    #[test]
    fn test_totals_without_coupon() {
        let totals = ready_session().totals(&settings(), now());
        assert_eq!(totals.subtotal, Money::from_taka(500));
        assert_eq!(totals.shipping, Money::from_taka(60));
        assert_eq!(totals.total, Money::from_taka(560));
    }

    #[test]
    fn test_totals_with_coupon() {
        let mut session = ready_session();
        session.set_coupon(coupon(100, 20));
        let totals = session.totals(&settings(), now());
        assert_eq!(totals.discount, Money::from_taka(100));
        assert_eq!(totals.shipping_discount, Money::from_taka(20));
        assert_eq!(totals.total, Money::from_taka(440));
    }

    #[test]
    fn test_totals_never_negative() {
        let totals = OrderTotals::compute(
            Money::from_taka(100),
            Money::from_taka(60),
            Some(&coupon(500, 500)),
        );
        assert_eq!(totals.discount, Money::from_taka(100));
        assert_eq!(totals.shipping_discount, Money::from_taka(60));
        assert_eq!(totals.total, Money::ZERO);
    }

    #[test]
    fn test_totals_saturate_on_oversized_amounts() {
        let max = Money::new(rust_decimal::Decimal::MAX);
        let totals = OrderTotals::compute(max, Money::from_taka(60), None);
        assert_eq!(totals.total, max);

        let mut huge = line(1, 2);
        huge.price = max;
        let mut session = ready_session();
        session.items.push(huge);
        session.set_coupon(coupon(100, 20));
        let totals = session.totals(&settings(), now());
        assert_eq!(totals.subtotal, max);
        assert_eq!(totals.discount, Money::from_taka(100));
    }

    #[test]
    fn test_validation_order() {
        let mut session = CheckoutSession::new(Vec::new());
        assert_eq!(session.validate(), Err(ValidationError::MissingDistrict));

        session.set_district("Khulna");
        assert_eq!(session.validate(), Err(ValidationError::MissingAddress));

        session.address.address = "12 KDA Avenue".to_string();
        assert_eq!(session.validate(), Err(ValidationError::EmptyCart));

        session.items.push(line(100, 0));
        assert_eq!(session.validate(), Err(ValidationError::EmptyCart));

        session.items.push(line(100, 1));
        assert_eq!(session.validate(), Ok(()));
    }

    #[test]
    fn test_payload_mirrors_session() {
        let mut session = ready_session();
        session.set_coupon(coupon(50, 0));
        let payload = session.to_payload(&settings(), now()).unwrap();

        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.district, "Dhaka");
        assert_eq!(payload.coupon_code.as_deref(), Some("EID25"));
        assert_eq!(payload.shipping_cost, Money::from_taka(60));
        assert_eq!(payload.total, Money::from_taka(510));

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["paymentMethod"], "cod");
        assert_eq!(json["shippingAddress"]["fullName"], "Ayesha Rahman");
        assert_eq!(json["total"], 510.0);
    }

    #[test]
    fn test_clear_coupon() {
        let mut session = ready_session();
        session.set_coupon(coupon(10, 0));
        assert!(session.clear_coupon().is_some());
        assert!(session.coupon().is_none());
    }
}
