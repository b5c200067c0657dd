//! Route handlers for the mock backend.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{Json, Router};
use axum::body::{Body, to_bytes};
use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use chrono::Utc;
use serde_json::{Value, json};

use crate::{MockState, OTP, PASSWORD, RecordedRequest, lock};

type Shared = Arc<MockState>;

pub fn router(state: Shared) -> Router {
    Router::new()
        // Auth
        .route("/api/auth/login", post(login))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/verify-otp", post(verify_otp))
        // Catalog
        .route("/api/products", get(list_products))
        .route("/api/products/{id}", get(get_product))
        .route("/api/categories", get(list_categories))
        // Cart
        .route("/api/cart", get(get_cart).delete(clear_cart))
        .route("/api/cart/items", post(add_cart_item))
        .route(
            "/api/cart/items/{product}",
            put(update_cart_item).delete(remove_cart_item),
        )
        .route("/api/cart/apply-coupon", post(apply_coupon))
        // Shipping
        .route(
            "/api/shipping-settings",
            get(get_settings).put(put_settings),
        )
        // Orders
        .route("/api/order", post(place_order))
        .route("/api/order/my", get(my_orders))
        .route("/api/order/{id}", get(get_order))
        .route("/api/admin/orders", get(admin_orders))
        .route("/api/admin/orders/{id}/status", patch(set_order_status))
        // Reviews & invoices
        .route("/api/reviews", get(list_reviews).post(post_review))
        .route("/api/invoices", get(list_invoices))
        .route("/api/invoices/{id}", get(get_invoice))
        // Seller verification
        .route("/api/seller/verification/status", get(verification_status))
        .route("/api/seller/verification/submit", post(submit_verification))
        .route("/api/seller/verification/pending", get(pending_verifications))
        .route(
            "/api/seller/verification/{id}/approve",
            post(approve_verification),
        )
        .route(
            "/api/seller/verification/{id}/reject",
            post(reject_verification),
        )
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

/// Record every request, body included, before routing it.
async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Ok(bytes) = to_bytes(body, usize::MAX).await else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    state.record(RecordedRequest {
        method: parts.method.clone(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    });

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn message(status: StatusCode, text: &str) -> Response {
    reply(status, json!({ "message": text }))
}

/// Reject requests without a bearer token the way the backend does.
fn require_auth(headers: &HeaderMap) -> Result<(), Response> {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer ") && v.len() > "Bearer ".len());
    if authorized {
        Ok(())
    } else {
        Err(message(StatusCode::UNAUTHORIZED, "Not authorized, no token"))
    }
}

fn require_admin(headers: &HeaderMap) -> Result<(), Response> {
    require_auth(headers)?;
    let admin = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer token-admin"));
    if admin {
        Ok(())
    } else {
        Err(message(StatusCode::FORBIDDEN, "Admin access required"))
    }
}

fn str_field<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn id_of(doc: &Value) -> &str {
    str_field(doc, "_id")
}

// =============================================================================
// Auth
// =============================================================================

fn session_for(email: &str) -> Value {
    let role = if email.starts_with("admin") {
        "admin"
    } else if email.starts_with("seller") {
        "seller"
    } else {
        "customer"
    };
    json!({
        "token": format!("token-{email}"),
        "user": { "_id": format!("u-{email}"), "name": "Test User", "email": email, "role": role }
    })
}

async fn login(Json(body): Json<Value>) -> Response {
    if str_field(&body, "password") != PASSWORD {
        return message(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }
    reply(StatusCode::OK, session_for(str_field(&body, "email")))
}

async fn signup(Json(body): Json<Value>) -> Response {
    if str_field(&body, "email").is_empty() || str_field(&body, "password").is_empty() {
        return message(StatusCode::BAD_REQUEST, "Please fill all fields");
    }
    message(StatusCode::CREATED, "OTP sent to your email")
}

async fn verify_otp(Json(body): Json<Value>) -> Response {
    if str_field(&body, "otp") != OTP {
        return message(StatusCode::BAD_REQUEST, "Invalid or expired OTP");
    }
    reply(StatusCode::OK, session_for(str_field(&body, "email")))
}

// =============================================================================
// Catalog
// =============================================================================

async fn list_products(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let search = query.get("search").map(|s| s.to_lowercase());
    let category = query.get("category");
    let products: Vec<Value> = state
        .products
        .iter()
        .filter(|p| {
            search
                .as_deref()
                .is_none_or(|s| str_field(p, "name").to_lowercase().contains(s))
        })
        .filter(|p| category.is_none_or(|c| str_field(p, "category") == c.as_str()))
        .cloned()
        .collect();
    reply(
        StatusCode::OK,
        json!({ "products": products, "total": products.len(), "page": 1, "pages": 1 }),
    )
}

async fn get_product(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    state.products.iter().find(|p| id_of(p) == id).map_or_else(
        || message(StatusCode::NOT_FOUND, "Product not found"),
        |p| reply(StatusCode::OK, json!({ "product": p })),
    )
}

async fn list_categories(State(state): State<Shared>) -> Response {
    reply(StatusCode::OK, json!({ "categories": state.categories }))
}

// =============================================================================
// Cart
// =============================================================================

fn cart_reply(state: &MockState) -> Response {
    reply(StatusCode::OK, json!({ "items": *lock(&state.cart) }))
}

async fn get_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = require_auth(&headers) {
        return r;
    }
    cart_reply(&state)
}

async fn add_cart_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = require_auth(&headers) {
        return r;
    }
    let product_id = str_field(&body, "productId");
    let Some(product) = state.products.iter().find(|p| id_of(p) == product_id) else {
        return message(StatusCode::NOT_FOUND, "Product not found");
    };
    let quantity = body.get("quantity").and_then(Value::as_u64).unwrap_or(1);

    {
        let mut cart = lock(&state.cart);
        if let Some(line) = cart.iter_mut().find(|l| str_field(l, "productId") == product_id) {
            let current = line.get("quantity").and_then(Value::as_u64).unwrap_or(0);
            line["quantity"] = json!(current + quantity);
        } else {
            let price = product
                .get("discountPrice")
                .or_else(|| product.get("price"))
                .cloned()
                .unwrap_or(Value::Null);
            cart.push(json!({
                "productId": product_id,
                "name": product.get("name"),
                "price": price,
                "quantity": quantity,
                "size": body.get("size"),
                "color": body.get("color"),
            }));
        }
    }
    cart_reply(&state)
}

async fn update_cart_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(product): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = require_auth(&headers) {
        return r;
    }
    {
        let mut cart = lock(&state.cart);
        let Some(line) = cart.iter_mut().find(|l| str_field(l, "productId") == product) else {
            return message(StatusCode::NOT_FOUND, "Item not in cart");
        };
        line["quantity"] = body.get("quantity").cloned().unwrap_or(json!(1));
    }
    cart_reply(&state)
}

async fn remove_cart_item(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(product): Path<String>,
) -> Response {
    if let Err(r) = require_auth(&headers) {
        return r;
    }
    lock(&state.cart).retain(|l| str_field(l, "productId") != product);
    cart_reply(&state)
}

async fn clear_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = require_auth(&headers) {
        return r;
    }
    lock(&state.cart).clear();
    cart_reply(&state)
}

async fn apply_coupon(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    tokio::time::sleep(state.delay()).await;
    let code = str_field(&body, "code").to_string();
    let answer = lock(&state.coupons).get(&code).cloned();
    match answer {
        Some((status, body)) => reply(status, body),
        None => reply(
            StatusCode::OK,
            json!({ "success": false, "message": "Invalid coupon code" }),
        ),
    }
}

// =============================================================================
// Shipping
// =============================================================================

async fn get_settings(State(state): State<Shared>) -> Response {
    reply(StatusCode::OK, lock(&state.settings).clone())
}

async fn put_settings(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = require_admin(&headers) {
        return r;
    }
    *lock(&state.settings) = body.clone();
    reply(StatusCode::OK, json!({ "settings": body }))
}

// =============================================================================
// Orders
// =============================================================================

async fn place_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    tokio::time::sleep(state.delay()).await;
    if let Err(r) = require_auth(&headers) {
        return r;
    }
    if body
        .get("items")
        .and_then(Value::as_array)
        .is_none_or(Vec::is_empty)
    {
        return message(StatusCode::BAD_REQUEST, "No order items");
    }

    let mut order = body;
    {
        let mut orders = lock(&state.orders);
        let number = orders.len() + 1;
        order["_id"] = json!(format!("order-{number}"));
        order["orderNumber"] = json!(format!("DK-{number:05}"));
        order["status"] = json!("pending");
        order["createdAt"] = json!(Utc::now().to_rfc3339());
        orders.push(order.clone());
    }
    lock(&state.cart).clear();
    reply(StatusCode::CREATED, json!({ "order": order }))
}

async fn my_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = require_auth(&headers) {
        return r;
    }
    reply(StatusCode::OK, json!({ "orders": *lock(&state.orders) }))
}

async fn get_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(r) = require_auth(&headers) {
        return r;
    }
    let order = lock(&state.orders).iter().find(|o| id_of(o) == id).cloned();
    order.map_or_else(
        || message(StatusCode::NOT_FOUND, "Order not found"),
        |o| reply(StatusCode::OK, json!({ "order": o })),
    )
}

async fn admin_orders(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(r) = require_admin(&headers) {
        return r;
    }
    let status = query.get("status");
    let orders: Vec<Value> = lock(&state.orders)
        .iter()
        .filter(|o| status.is_none_or(|s| str_field(o, "status") == s.as_str()))
        .cloned()
        .collect();
    reply(StatusCode::OK, json!({ "orders": orders }))
}

async fn set_order_status(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = require_admin(&headers) {
        return r;
    }
    let mut orders = lock(&state.orders);
    let Some(order) = orders.iter_mut().find(|o| id_of(o) == id) else {
        return message(StatusCode::NOT_FOUND, "Order not found");
    };
    order["status"] = body.get("status").cloned().unwrap_or(Value::Null);
    reply(StatusCode::OK, json!({ "order": order }))
}

// =============================================================================
// Reviews & invoices
// =============================================================================

async fn list_reviews(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let product = query.get("product");
    let reviews: Vec<Value> = lock(&state.reviews)
        .iter()
        .filter(|r| product.is_none_or(|p| str_field(r, "product") == p.as_str()))
        .cloned()
        .collect();
    reply(StatusCode::OK, json!({ "reviews": reviews }))
}

async fn post_review(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = require_auth(&headers) {
        return r;
    }
    let mut reviews = lock(&state.reviews);
    let review = json!({
        "_id": format!("r{}", reviews.len() + 1),
        "product": str_field(&body, "productId"),
        "userName": "Test User",
        "rating": body.get("rating"),
        "comment": body.get("comment"),
    });
    reviews.push(review.clone());
    reply(StatusCode::CREATED, json!({ "review": review }))
}

async fn list_invoices(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = require_auth(&headers) {
        return r;
    }
    reply(StatusCode::OK, json!({ "invoices": state.invoices }))
}

async fn get_invoice(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(r) = require_auth(&headers) {
        return r;
    }
    state.invoices.iter().find(|i| id_of(i) == id).map_or_else(
        || message(StatusCode::NOT_FOUND, "Invoice not found"),
        |i| reply(StatusCode::OK, json!({ "invoice": i })),
    )
}

// =============================================================================
// Seller verification
// =============================================================================

async fn verification_status(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = require_auth(&headers) {
        return r;
    }
    let latest = lock(&state.verifications).last().cloned();
    reply(StatusCode::OK, json!({ "verification": latest }))
}

async fn submit_verification(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = require_auth(&headers) {
        return r;
    }
    if str_field(&body, "shopName").is_empty() || str_field(&body, "nidNumber").is_empty() {
        return message(StatusCode::BAD_REQUEST, "Shop name and NID are required");
    }
    let mut verifications = lock(&state.verifications);
    let mut record = body;
    record["_id"] = json!(format!("ver-{}", verifications.len() + 1));
    record["status"] = json!("pending");
    record["submittedAt"] = json!(Utc::now().to_rfc3339());
    verifications.push(record.clone());
    reply(StatusCode::CREATED, json!({ "verification": record }))
}

async fn pending_verifications(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(r) = require_admin(&headers) {
        return r;
    }
    let pending: Vec<Value> = lock(&state.verifications)
        .iter()
        .filter(|v| str_field(v, "status") == "pending")
        .cloned()
        .collect();
    reply(StatusCode::OK, json!({ "verifications": pending }))
}

fn review_verification(
    state: &MockState,
    headers: &HeaderMap,
    id: &str,
    status: &str,
    reason: Option<Value>,
) -> Response {
    if let Err(r) = require_admin(headers) {
        return r;
    }
    let mut verifications = lock(&state.verifications);
    let Some(record) = verifications.iter_mut().find(|v| id_of(v) == id) else {
        return message(StatusCode::NOT_FOUND, "Verification request not found");
    };
    record["status"] = json!(status);
    if let Some(reason) = reason {
        record["rejectionReason"] = reason;
    }
    message(StatusCode::OK, &format!("Seller {status}"))
}

async fn approve_verification(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    review_verification(&state, &headers, &id, "approved", None)
}

async fn reject_verification(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    review_verification(&state, &headers, &id, "rejected", body.get("reason").cloned())
}
