//! Coupon application and order submission.
//!
//! Both operations send at most one request per call and never retry. Each
//! has an in-flight flag: a second call made while the first is still
//! waiting on the backend fails fast with [`CheckoutError::Busy`] instead of
//! sending a duplicate.

mod error;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use dokan_core::{AppliedCoupon, CheckoutSession, CouponCode, ShippingSettings};
use tracing::instrument;

use crate::api::ApiClient;
use crate::types::{CouponItem, CouponRequest, Order};

pub use error::{COUPON_REJECTED, CheckoutError};

/// Applies coupons and submits orders for a [`CheckoutSession`].
///
/// Clones share their in-flight flags.
#[derive(Clone)]
pub struct Checkout {
    api: ApiClient,
    applying: Arc<AtomicBool>,
    submitting: Arc<AtomicBool>,
}

/// Holds an in-flight flag for the lifetime of one request.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CheckoutError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| CheckoutError::Busy)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Checkout {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            applying: Arc::new(AtomicBool::new(false)),
            submitting: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Whether a coupon request is waiting on the backend.
    #[must_use]
    pub fn is_applying(&self) -> bool {
        self.applying.load(Ordering::Acquire)
    }

    /// Whether an order submission is waiting on the backend.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Price `code` against the session's cart and store the result on it.
    ///
    /// A malformed code is rejected locally and leaves the session as it
    /// was. Once the request is sent, any failure clears a previously
    /// applied coupon.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Busy`] if another apply is in flight
    /// - [`CheckoutError::Coupon`] if the code is empty or malformed
    /// - [`CheckoutError::Rejected`] if the backend refused the code
    /// - [`CheckoutError::Api`] if the request failed
    #[instrument(skip(self, session, settings))]
    pub async fn apply_coupon(
        &self,
        session: &mut CheckoutSession,
        settings: &ShippingSettings,
        code: &str,
    ) -> Result<AppliedCoupon, CheckoutError> {
        let _guard = InFlight::acquire(&self.applying)?;
        let code = CouponCode::parse(code)?;

        let request = CouponRequest {
            code: code.clone(),
            subtotal: session.subtotal(),
            shipping: session.shipping(settings, Utc::now()),
            items: session.items.iter().map(CouponItem::from).collect(),
            district: session.district().trim().to_string(),
        };

        let response = match self.api.apply_coupon(&request).await {
            Ok(response) => response,
            Err(e) => {
                session.clear_coupon();
                return Err(e.into());
            }
        };

        if !response.is_accepted() {
            session.clear_coupon();
            let message = response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| COUPON_REJECTED.to_string());
            tracing::info!(code = %code, %message, "Coupon rejected");
            return Err(CheckoutError::Rejected(message));
        }

        let applied = response.into_applied(code);
        tracing::info!(
            code = %applied.code,
            discount = %applied.discount_amount,
            shipping_off = %applied.shipping_off,
            "Coupon applied"
        );
        session.set_coupon(applied.clone());
        Ok(applied)
    }

    /// Remove the applied coupon. Local only.
    #[allow(clippy::unused_self)]
    pub fn remove_coupon(&self, session: &mut CheckoutSession) -> Option<AppliedCoupon> {
        session.clear_coupon()
    }

    /// Validate the session and place the order with a single request.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Busy`] if a submission is in flight
    /// - [`CheckoutError::Validation`] if district, address or items are missing
    /// - [`CheckoutError::Api`] if the request failed
    #[instrument(skip(self, session, settings), fields(district = %session.district()))]
    pub async fn submit(
        &self,
        session: &CheckoutSession,
        settings: &ShippingSettings,
    ) -> Result<Order, CheckoutError> {
        let _guard = InFlight::acquire(&self.submitting)?;
        let payload = session.to_payload(settings, Utc::now())?;
        Ok(self.api.place_order(&payload).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_guard_releases_on_drop() {
        let flag = AtomicBool::new(false);
        {
            let _guard = InFlight::acquire(&flag);
            assert!(flag.load(Ordering::Acquire));
            assert!(matches!(
                InFlight::acquire(&flag),
                Err(CheckoutError::Busy)
            ));
        }
        assert!(!flag.load(Ordering::Acquire));
        assert!(InFlight::acquire(&flag).is_ok());
    }
}
