//! Integration tests for login, OTP signup and bearer token handling.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::http::Method;
use dokan_client::types::SignupRequest;
use dokan_client::{ApiError, FileTokenStore, MemoryTokenStore, TokenStore};
use dokan_core::{Email, PhoneNumber, Role};
use dokan_integration_tests::{MockBackend, OTP, PASSWORD};

fn email(s: &str) -> Email {
    Email::parse(s).unwrap()
}

// =============================================================================
// Login / Logout
// =============================================================================

#[tokio::test]
async fn test_login_attaches_bearer_token() {
    let backend = MockBackend::start().await.unwrap();
    let api = backend.client().unwrap();
    assert!(!api.is_authenticated().unwrap());

    let user = api
        .login(&email("Customer@Example.com"), PASSWORD)
        .await
        .unwrap();
    assert_eq!(user.role, Role::Customer);
    assert!(api.is_authenticated().unwrap());

    api.cart().await.unwrap();
    let request = backend.last_request(&Method::GET, "/api/cart").unwrap();
    assert_eq!(
        request.authorization.as_deref(),
        Some("Bearer token-customer@example.com")
    );
}

#[tokio::test]
async fn test_login_rejected_surfaces_server_message() {
    let backend = MockBackend::start().await.unwrap();
    let api = backend.client().unwrap();

    let err = api
        .login(&email("customer@example.com"), "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(Some(_))));
    assert_eq!(err.user_message(), "Invalid email or password");
    assert!(!api.is_authenticated().unwrap());
}

#[tokio::test]
async fn test_requests_without_token_have_no_authorization_header() {
    let backend = MockBackend::start().await.unwrap();
    let api = backend.client().unwrap();

    let err = api.cart().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));

    let request = backend.last_request(&Method::GET, "/api/cart").unwrap();
    assert!(request.authorization.is_none());
}

#[tokio::test]
async fn test_logout_removes_token_without_calling_backend() {
    let backend = MockBackend::start().await.unwrap();
    let api = backend.client().unwrap();
    api.login(&email("customer@example.com"), PASSWORD)
        .await
        .unwrap();

    let before = backend.requests().len();
    api.logout().unwrap();
    assert_eq!(backend.requests().len(), before);
    assert!(!api.is_authenticated().unwrap());

    assert!(matches!(
        api.cart().await.unwrap_err(),
        ApiError::Unauthorized(_)
    ));
}

// =============================================================================
// Signup with OTP
// =============================================================================

#[tokio::test]
async fn test_signup_then_verify_otp() {
    let backend = MockBackend::start().await.unwrap();
    let api = backend.client().unwrap();

    let request = SignupRequest {
        name: "Rafiq Islam".to_string(),
        email: email("rafiq@example.com"),
        phone: Some(PhoneNumber::parse("+880 1712-345678").unwrap()),
        password: PASSWORD.to_string(),
    };
    let message = api.signup(&request).await.unwrap();
    assert_eq!(message.as_deref(), Some("OTP sent to your email"));
    assert!(!api.is_authenticated().unwrap());

    let sent = backend
        .last_request(&Method::POST, "/api/auth/signup")
        .unwrap();
    assert_eq!(sent.body["phone"], "01712345678");

    let err = api
        .verify_otp(&request.email, "000000")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message(), "Invalid or expired OTP");

    let user = api.verify_otp(&request.email, OTP).await.unwrap();
    assert_eq!(user.email, request.email);
    assert!(api.is_authenticated().unwrap());
}

// =============================================================================
// Token stores
// =============================================================================

#[tokio::test]
async fn test_file_token_survives_new_client() {
    let backend = MockBackend::start().await.unwrap();
    let dir = std::env::temp_dir().join(format!("dokan-it-{}", uuid::Uuid::new_v4()));
    let path = dir.join("token.json");

    let first = backend
        .client_with_store(Arc::new(FileTokenStore::new(&path)))
        .unwrap();
    first
        .login(&email("customer@example.com"), PASSWORD)
        .await
        .unwrap();

    let second = backend
        .client_with_store(Arc::new(FileTokenStore::new(&path)))
        .unwrap();
    assert!(second.is_authenticated().unwrap());
    second.my_orders().await.unwrap();

    second.logout().unwrap();
    assert!(!first.is_authenticated().unwrap());

    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_shared_memory_store() {
    let backend = MockBackend::start().await.unwrap();
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let a = backend.client_with_store(Arc::clone(&store)).unwrap();
    let b = backend.client_with_store(store).unwrap();

    a.login(&email("customer@example.com"), PASSWORD)
        .await
        .unwrap();
    assert!(b.is_authenticated().unwrap());
}
