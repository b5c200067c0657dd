//! Integration tests for Dokan.
//!
//! The tests drive `dokan-client` against [`MockBackend`], an in-process
//! axum server that speaks the same JSON as the real REST backend. It binds
//! an ephemeral port, records every request it receives, and can be told to
//! slow down or to answer coupon codes in specific ways.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dokan-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_token` - Login, OTP verification and bearer token handling
//! - `catalog` - Product listing, caching and error mapping
//! - `checkout_flow` - Cart, shipping, coupon and order submission end to end
//! - `coupon` - Coupon acceptance, rejection and in-flight guarding
//! - `admin` - Order status, shipping settings and seller verification

#![cfg_attr(not(test), forbid(unsafe_code))]

mod routes;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::http::{Method, StatusCode};
use dokan_client::{ApiClient, ClientConfig, MemoryTokenStore, TokenStore};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

/// Password the mock accepts for every account.
pub const PASSWORD: &str = "secret";

/// One-time code the mock accepts for every signup.
pub const OTP: &str = "123456";

/// A request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Mutable backend state shared with the route handlers.
pub(crate) struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    delay: Mutex<Duration>,
    settings: Mutex<Value>,
    coupons: Mutex<HashMap<String, (StatusCode, Value)>>,
    products: Vec<Value>,
    categories: Vec<Value>,
    cart: Mutex<Vec<Value>>,
    orders: Mutex<Vec<Value>>,
    reviews: Mutex<Vec<Value>>,
    invoices: Vec<Value>,
    verifications: Mutex<Vec<Value>>,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockState {
    fn seeded() -> Self {
        let coupons = HashMap::from([
            (
                "EID25".to_string(),
                (
                    StatusCode::OK,
                    json!({ "success": true, "code": "EID25", "discountAmount": 100, "shippingOff": 20 }),
                ),
            ),
            (
                "FREESHIP".to_string(),
                (
                    StatusCode::OK,
                    json!({ "success": true, "code": "FREESHIP", "discountAmount": 0, "shippingOff": 500 }),
                ),
            ),
        ]);

        Self {
            requests: Mutex::new(Vec::new()),
            delay: Mutex::new(Duration::ZERO),
            settings: Mutex::new(json!({
                "insideDhakaRate": 60,
                "outsideDhakaRate": 120,
                "freeThreshold": 1000,
                "freeForDistricts": [],
                "campaign": { "active": false }
            })),
            coupons: Mutex::new(coupons),
            products: vec![
                json!({
                    "_id": "p-saree", "name": "Jamdani Saree", "price": 2500, "stock": 5,
                    "category": "sarees", "images": ["https://cdn.example.com/saree.jpg"]
                }),
                json!({
                    "_id": "p-kantha", "name": "Nakshi Kantha", "price": 300,
                    "discountPrice": 250, "stock": 8, "category": "home"
                }),
                json!({
                    "_id": "p-scarf", "name": "Muslin Scarf", "price": "900", "stock": 0,
                    "category": "accessories"
                }),
            ],
            categories: vec![
                json!({ "_id": "c1", "name": "Sarees", "slug": "sarees" }),
                json!({ "_id": "c2", "name": "Home", "slug": "home" }),
            ],
            cart: Mutex::new(Vec::new()),
            orders: Mutex::new(Vec::new()),
            reviews: Mutex::new(vec![json!({
                "_id": "r1", "product": "p-saree", "userName": "Nusrat", "rating": 5,
                "comment": "Beautiful weave"
            })]),
            invoices: vec![json!({
                "_id": "inv-1", "invoiceNumber": "INV-0001", "orderId": "order-0",
                "amount": 560, "status": "paid", "issuedAt": "2026-03-01T10:00:00Z",
                "lines": [{ "description": "Nakshi Kantha x2", "quantity": 2, "amount": 500 },
                          { "description": "Shipping", "amount": 60 }]
            })],
            verifications: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn record(&self, request: RecordedRequest) {
        lock(&self.requests).push(request);
    }

    pub(crate) fn delay(&self) -> Duration {
        *lock(&self.delay)
    }
}

/// In-process stand-in for the Dokan REST backend.
///
/// The server task is aborted when the value is dropped.
pub struct MockBackend {
    url: Url,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Start a seeded backend on an ephemeral local port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = Arc::new(MockState::seeded());
        let app = routes::router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let url = Url::parse(&format!("http://{addr}/")).map_err(std::io::Error::other)?;
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock backend stopped");
            }
        });

        Ok(Self {
            url,
            state,
            handle,
        })
    }

    /// Base URL of the backend.
    #[must_use]
    pub fn url(&self) -> Url {
        self.url.clone()
    }

    /// Client configuration pointing at this backend.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.url());
        config.request_timeout = Duration::from_secs(5);
        config.cache_ttl = Duration::from_secs(60);
        config
    }

    /// A client with an in-memory token store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn client(&self) -> dokan_client::Result<ApiClient> {
        self.client_with_store(Arc::new(MemoryTokenStore::new()))
    }

    /// A client using `store` for its bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn client_with_store(&self, store: Arc<dyn TokenStore>) -> dokan_client::Result<ApiClient> {
        ApiClient::with_token_store(&self.config(), store)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }

    /// How many requests hit `method path`.
    #[must_use]
    pub fn hits(&self, method: &Method, path: &str) -> usize {
        lock(&self.state.requests)
            .iter()
            .filter(|r| r.method == *method && r.path == path)
            .count()
    }

    /// The most recent request to `method path`.
    #[must_use]
    pub fn last_request(&self, method: &Method, path: &str) -> Option<RecordedRequest> {
        lock(&self.state.requests)
            .iter()
            .rev()
            .find(|r| r.method == *method && r.path == path)
            .cloned()
    }

    /// Current shipping settings document.
    #[must_use]
    pub fn settings(&self) -> Value {
        lock(&self.state.settings).clone()
    }

    // =========================================================================
    // Behaviour
    // =========================================================================

    /// Delay coupon and order responses by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.state.delay) = delay;
    }

    /// Replace the shipping settings document.
    pub fn set_settings(&self, settings: Value) {
        *lock(&self.state.settings) = settings;
    }

    /// Answer `code` with the given status and body.
    pub fn set_coupon(&self, code: &str, status: StatusCode, body: Value) {
        lock(&self.state.coupons).insert(code.to_string(), (status, body));
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
