//! Integration tests for coupon application.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::http::{Method, StatusCode};
use chrono::Utc;
use dokan_client::{ApiError, Checkout, CheckoutError};
use dokan_core::{
    CartItem, CheckoutSession, CouponCodeError, Money, ProductId, ShippingSettings,
};
use dokan_integration_tests::MockBackend;
use serde_json::json;

const APPLY: &str = "/api/cart/apply-coupon";

fn session(district: &str) -> CheckoutSession {
    let mut session = CheckoutSession::new(vec![CartItem {
        product_id: ProductId::new("p-kantha"),
        name: "Nakshi Kantha".to_string(),
        price: Money::from_taka(250),
        quantity: 2,
        image: None,
        size: None,
        color: None,
    }]);
    session.set_district(district);
    session.address.address = "House 12, Road 5".to_string();
    session
}

async fn setup() -> (MockBackend, Checkout, ShippingSettings) {
    let backend = MockBackend::start().await.unwrap();
    let api = backend.client().unwrap();
    let settings = api.shipping_settings().await.unwrap();
    (backend, Checkout::new(api), settings)
}

// =============================================================================
// Accepted coupons
// =============================================================================

#[tokio::test]
async fn test_apply_coupon_updates_totals() {
    let (backend, checkout, settings) = setup().await;
    let mut session = session("Dhaka");

    let applied = checkout
        .apply_coupon(&mut session, &settings, " eid25 ")
        .await
        .unwrap();
    assert_eq!(applied.code.as_str(), "EID25");
    assert_eq!(applied.discount_amount, Money::from_taka(100));
    assert_eq!(applied.shipping_off, Money::from_taka(20));
    assert_eq!(session.coupon(), Some(&applied));

    let totals = session.totals(&settings, Utc::now());
    assert_eq!(totals.discount, Money::from_taka(100));
    assert_eq!(totals.shipping_discount, Money::from_taka(20));
    assert_eq!(totals.total, Money::from_taka(440));

    let sent = backend.last_request(&Method::POST, APPLY).unwrap();
    assert_eq!(sent.body["code"], "EID25");
    assert_eq!(sent.body["subtotal"], json!(500.0));
    assert_eq!(sent.body["shipping"], json!(60.0));
    assert_eq!(sent.body["district"], "Dhaka");
    assert_eq!(sent.body["items"][0]["productId"], "p-kantha");
}

#[tokio::test]
async fn test_apply_coupon_with_success_and_valid_flags() {
    let (backend, checkout, settings) = setup().await;
    backend.set_coupon(
        "BOTH",
        StatusCode::OK,
        json!({ "success": true, "valid": true, "code": "BOTH", "discountAmount": 50, "shippingOff": 0 }),
    );
    let mut session = session("Dhaka");

    let applied = checkout
        .apply_coupon(&mut session, &settings, "both")
        .await
        .unwrap();
    assert_eq!(applied.discount_amount, Money::from_taka(50));
    assert_eq!(session.coupon(), Some(&applied));
}

#[tokio::test]
async fn test_shipping_discount_is_capped_at_shipping() {
    let (_backend, checkout, settings) = setup().await;
    let mut session = session("Bogura");

    checkout
        .apply_coupon(&mut session, &settings, "FREESHIP")
        .await
        .unwrap();
    let totals = session.totals(&settings, Utc::now());
    assert_eq!(totals.shipping, Money::from_taka(120));
    assert_eq!(totals.shipping_discount, Money::from_taka(120));
    assert_eq!(totals.total, Money::from_taka(500));
}

#[tokio::test]
async fn test_coupon_code_in_order_payload() {
    let (_backend, checkout, settings) = setup().await;
    let mut session = session("Dhaka");
    checkout
        .apply_coupon(&mut session, &settings, "EID25")
        .await
        .unwrap();

    let payload = session.to_payload(&settings, Utc::now()).unwrap();
    assert_eq!(payload.coupon_code.as_deref(), Some("EID25"));
    assert_eq!(payload.total, Money::from_taka(440));
}

// =============================================================================
// Rejected coupons
// =============================================================================

#[tokio::test]
async fn test_rejection_clears_previous_coupon() {
    let (_backend, checkout, settings) = setup().await;
    let mut session = session("Dhaka");
    checkout
        .apply_coupon(&mut session, &settings, "EID25")
        .await
        .unwrap();

    let err = checkout
        .apply_coupon(&mut session, &settings, "BOGUS")
        .await
        .unwrap_err();
    assert!(matches!(&err, CheckoutError::Rejected(m) if m == "Invalid coupon code"));
    assert!(session.coupon().is_none());
    assert_eq!(
        session.totals(&settings, Utc::now()).total,
        Money::from_taka(560)
    );
}

#[tokio::test]
async fn test_valid_false_is_a_rejection() {
    let (backend, checkout, settings) = setup().await;
    backend.set_coupon(
        "WINTER",
        StatusCode::OK,
        json!({ "valid": false, "message": "Coupon expired" }),
    );
    let mut session = session("Dhaka");

    let err = checkout
        .apply_coupon(&mut session, &settings, "winter")
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Coupon expired");
}

#[tokio::test]
async fn test_server_error_clears_coupon_and_shows_message() {
    let (backend, checkout, settings) = setup().await;
    backend.set_coupon(
        "BROKEN",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "Coupon service unavailable" }),
    );
    let mut session = session("Dhaka");
    checkout
        .apply_coupon(&mut session, &settings, "EID25")
        .await
        .unwrap();

    let err = checkout
        .apply_coupon(&mut session, &settings, "BROKEN")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Api(ApiError::Api { status: 500, .. })
    ));
    assert_eq!(err.user_message(), "Coupon service unavailable");
    assert!(session.coupon().is_none());
}

#[tokio::test]
async fn test_unknown_coupon_shows_server_message() {
    let (backend, checkout, settings) = setup().await;
    backend.set_coupon(
        "GONE",
        StatusCode::NOT_FOUND,
        json!({ "message": "Coupon not found" }),
    );
    let mut session = session("Dhaka");
    checkout
        .apply_coupon(&mut session, &settings, "EID25")
        .await
        .unwrap();

    let err = checkout
        .apply_coupon(&mut session, &settings, "gone")
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::Api(ApiError::NotFound { .. })));
    assert_eq!(err.user_message(), "Coupon not found");
    assert!(session.coupon().is_none());
}

#[tokio::test]
async fn test_empty_code_is_rejected_locally() {
    let (backend, checkout, settings) = setup().await;
    let mut session = session("Dhaka");
    checkout
        .apply_coupon(&mut session, &settings, "EID25")
        .await
        .unwrap();

    let err = checkout
        .apply_coupon(&mut session, &settings, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::Coupon(CouponCodeError::Empty)));
    assert!(err.is_local());

    // Nothing sent, and the earlier coupon stays.
    assert_eq!(backend.hits(&Method::POST, APPLY), 1);
    assert!(session.coupon().is_some());
}

#[tokio::test]
async fn test_remove_coupon_is_local() {
    let (backend, checkout, settings) = setup().await;
    let mut session = session("Dhaka");
    checkout
        .apply_coupon(&mut session, &settings, "EID25")
        .await
        .unwrap();

    let before = backend.requests().len();
    assert!(checkout.remove_coupon(&mut session).is_some());
    assert!(session.coupon().is_none());
    assert_eq!(backend.requests().len(), before);
}

// =============================================================================
// In-flight guard
// =============================================================================

#[tokio::test]
async fn test_concurrent_apply_sends_one_request() {
    let (backend, checkout, settings) = setup().await;
    backend.set_delay(Duration::from_millis(300));

    let mut first = session("Dhaka");
    let mut second = session("Dhaka");
    let (a, b) = tokio::join!(
        checkout.apply_coupon(&mut first, &settings, "EID25"),
        checkout.apply_coupon(&mut second, &settings, "EID25"),
    );

    assert!(a.is_ok());
    assert!(matches!(b, Err(CheckoutError::Busy)));
    assert_eq!(backend.hits(&Method::POST, APPLY), 1);

    // A busy rejection leaves that session untouched.
    assert!(first.coupon().is_some());
    assert!(second.coupon().is_none());
    assert!(!checkout.is_applying());
}
