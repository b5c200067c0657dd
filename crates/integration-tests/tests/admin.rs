//! Integration tests for admin tasks and the seller verification workflow.

#![allow(clippy::unwrap_used)]

use axum::http::Method;
use chrono::Utc;
use dokan_client::types::{AddToCartRequest, VerificationRequest};
use dokan_client::{ApiClient, ApiError, Checkout};
use dokan_core::{
    CheckoutSession, Email, InvoiceId, InvoiceStatus, Money, OrderStatus, ProductId,
    VerificationStatus,
};
use dokan_integration_tests::{MockBackend, PASSWORD};
use rust_decimal::Decimal;

async fn login(backend: &MockBackend, email: &str) -> ApiClient {
    let api = backend.client().unwrap();
    api.login(&Email::parse(email).unwrap(), PASSWORD)
        .await
        .unwrap();
    api
}

// =============================================================================
// Shipping settings
// =============================================================================

#[tokio::test]
async fn test_settings_update_invalidates_cache() {
    let backend = MockBackend::start().await.unwrap();
    let admin = login(&backend, "admin@example.com").await;

    let mut settings = admin.shipping_settings().await.unwrap();
    admin.shipping_settings().await.unwrap();
    assert_eq!(backend.hits(&Method::GET, "/api/shipping-settings"), 1);

    settings.outside_dhaka_rate = Some(Decimal::from(150));
    settings.free_for_districts = vec!["Gazipur".to_string()];
    let updated = admin.update_shipping_settings(&settings).await.unwrap();
    assert_eq!(updated.outside_dhaka_rate, Some(Decimal::from(150)));

    // Sent as plain numbers.
    assert_eq!(backend.settings()["outsideDhakaRate"], 150.0);

    let fresh = admin.shipping_settings().await.unwrap();
    assert_eq!(backend.hits(&Method::GET, "/api/shipping-settings"), 2);
    assert_eq!(
        fresh.resolve("Rangpur", Money::from_taka(100), Utc::now()),
        Money::from_taka(150)
    );
    assert_eq!(
        fresh.resolve("gazipur", Money::from_taka(100), Utc::now()),
        Money::ZERO
    );
}

#[tokio::test]
async fn test_customer_cannot_update_settings() {
    let backend = MockBackend::start().await.unwrap();
    let customer = login(&backend, "customer@example.com").await;
    let settings = customer.shipping_settings().await.unwrap();

    let err = customer
        .update_shipping_settings(&settings)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.user_message(), "Admin access required");
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_admin_moves_order_through_statuses() {
    let backend = MockBackend::start().await.unwrap();
    let customer = login(&backend, "customer@example.com").await;
    customer
        .add_to_cart(&AddToCartRequest {
            product_id: ProductId::new("p-saree"),
            quantity: 1,
            size: None,
            color: Some("red".to_string()),
        })
        .await
        .unwrap();

    let settings = customer.shipping_settings().await.unwrap();
    let mut session = CheckoutSession::new(customer.cart().await.unwrap().items);
    session.set_district("Chattogram");
    session.address.address = "GEC Circle".to_string();
    let order = Checkout::new(customer.clone())
        .submit(&session, &settings)
        .await
        .unwrap();

    let admin = login(&backend, "admin@example.com").await;
    let pending = admin.admin_orders(Some(OrderStatus::Pending)).await.unwrap();
    assert_eq!(pending.len(), 1);
    let request = backend
        .last_request(&Method::GET, "/api/admin/orders")
        .unwrap();
    assert_eq!(request.query.as_deref(), Some("status=pending"));

    let shipped = admin
        .set_order_status(&order.id, OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);
    assert!(
        admin
            .admin_orders(Some(OrderStatus::Pending))
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(admin.admin_orders(None).await.unwrap().len(), 1);

    let seen = customer.order(&order.id).await.unwrap();
    assert_eq!(seen.status, OrderStatus::Shipped);
    assert_eq!(seen.items.first().unwrap().color.as_deref(), Some("red"));
}

#[tokio::test]
async fn test_customer_cannot_list_all_orders() {
    let backend = MockBackend::start().await.unwrap();
    let customer = login(&backend, "customer@example.com").await;
    let err = customer.admin_orders(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 403, .. }));
}

// =============================================================================
// Seller verification
// =============================================================================

#[tokio::test]
async fn test_verification_submit_reject_resubmit_approve() {
    let backend = MockBackend::start().await.unwrap();
    let seller = login(&backend, "seller@example.com").await;
    let admin = login(&backend, "admin@example.com").await;

    let status = seller.verification_status().await.unwrap();
    assert_eq!(status.status, VerificationStatus::Unsubmitted);

    let request = VerificationRequest {
        shop_name: "Tangail Tant Ghor".to_string(),
        nid_number: "1990123456789".to_string(),
        trade_license: None,
        documents: vec!["https://files.example.com/nid.jpg".to_string()],
    };
    let submitted = seller.submit_verification(&request).await.unwrap();
    assert_eq!(submitted.status, VerificationStatus::Pending);

    let pending = admin.pending_verifications().await.unwrap();
    assert_eq!(pending.len(), 1);
    let id = pending.first().unwrap().id.clone().unwrap();

    admin
        .reject_verification(&id, "  NID photo is blurry ")
        .await
        .unwrap();
    let sent = backend
        .last_request(&Method::POST, &format!("/api/seller/verification/{id}/reject"))
        .unwrap();
    assert_eq!(sent.body["reason"], "NID photo is blurry");

    let status = seller.verification_status().await.unwrap();
    assert_eq!(status.status, VerificationStatus::Rejected);
    assert_eq!(
        status.rejection_reason.as_deref(),
        Some("NID photo is blurry")
    );
    assert!(admin.pending_verifications().await.unwrap().is_empty());

    let resubmitted = seller.submit_verification(&request).await.unwrap();
    let id = resubmitted.id.unwrap();
    let message = admin.approve_verification(&id).await.unwrap();
    assert_eq!(message.as_deref(), Some("Seller approved"));
    assert_eq!(
        seller.verification_status().await.unwrap().status,
        VerificationStatus::Approved
    );
}

#[tokio::test]
async fn test_unknown_verification_is_not_found() {
    let backend = MockBackend::start().await.unwrap();
    let admin = login(&backend, "admin@example.com").await;
    let err = admin
        .approve_verification(&"ver-404".into())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
    assert_eq!(err.user_message(), "Verification request not found");
}

// =============================================================================
// Invoices
// =============================================================================

#[tokio::test]
async fn test_invoices() {
    let backend = MockBackend::start().await.unwrap();
    let customer = login(&backend, "customer@example.com").await;

    let invoices = customer.invoices().await.unwrap();
    assert_eq!(invoices.len(), 1);
    let invoice = customer.invoice(&InvoiceId::new("inv-1")).await.unwrap();
    assert_eq!(invoice.status, InvoiceStatus::Paid);
    assert_eq!(invoice.amount, Money::from_taka(560));
    assert_eq!(invoice.lines.len(), 2);
    assert_eq!(invoice.lines.last().unwrap().quantity, 1);

    let err = customer
        .invoice(&InvoiceId::new("inv-404"))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Invoice not found");
}
