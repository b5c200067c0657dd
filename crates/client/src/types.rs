//! Request and response types for the REST backend.
//!
//! Documents carry their id in `_id`; every id field also accepts `id`.
//! Fields the backend may omit default rather than failing the whole
//! response.

use chrono::{DateTime, Utc};
use dokan_core::{
    AppliedCoupon, CartItem, CategoryId, CouponCode, Email, InvoiceId, InvoiceStatus, Money,
    OrderId, OrderItemPayload, OrderStatus, PaymentMethod, ProductId, ReviewId, Role,
    ShippingAddress, ShippingSettings, UserId, VerificationId, VerificationStatus,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog
// =============================================================================

/// A product as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    /// Sale price, when the product is discounted.
    #[serde(default)]
    pub discount_price: Option<Money>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub seller: Option<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub num_reviews: u32,
}

impl Product {
    /// The price a customer pays right now.
    #[must_use]
    pub fn effective_price(&self) -> Money {
        self.discount_price
            .filter(|sale| sale.is_positive() && *sale < self.price)
            .unwrap_or(self.price)
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// One page of a product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page")]
    pub pages: u32,
}

const fn first_page() -> u32 {
    1
}

/// Filters for `GET /api/products`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductQuery {
    /// Query string pairs, skipping unset filters.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            pairs.push(("search", search.to_string()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }

    /// Search results are not cached.
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        self.search.as_deref().is_none_or(|s| s.trim().is_empty())
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductEnvelope {
    pub product: Product,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoriesEnvelope {
    #[serde(default)]
    pub categories: Vec<Category>,
}

// =============================================================================
// Cart
// =============================================================================

/// The server-side cart (`GET /api/cart`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn subtotal(&self) -> Money {
        dokan_core::cart::subtotal(&self.items)
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        dokan_core::cart::item_count(&self.items)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Body of `POST /api/cart/items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateQuantityRequest {
    pub quantity: u32,
}

// =============================================================================
// Shipping & coupons
// =============================================================================

/// `GET /api/shipping-settings` answers either `{ "settings": {...} }` or the
/// bare settings object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SettingsEnvelope {
    Wrapped { settings: ShippingSettings },
    Bare(ShippingSettings),
}

impl SettingsEnvelope {
    pub fn into_settings(self) -> ShippingSettings {
        match self {
            Self::Wrapped { settings } | Self::Bare(settings) => settings,
        }
    }
}

/// One cart line in a coupon request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponItem {
    pub product_id: ProductId,
    pub price: Money,
    pub quantity: u32,
}

impl From<&CartItem> for CouponItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// Body of `POST /api/cart/apply-coupon`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponRequest {
    pub code: CouponCode,
    pub subtotal: Money,
    pub shipping: Money,
    pub items: Vec<CouponItem>,
    pub district: String,
}

/// Response of `POST /api/cart/apply-coupon`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CouponResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub valid: Option<bool>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub discount_amount: Option<Money>,
    #[serde(default)]
    pub shipping_off: Option<Money>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CouponResponse {
    /// Accepted unless either `success` or `valid` is `false`.
    pub const fn is_accepted(&self) -> bool {
        !matches!(self.success, Some(false)) && !matches!(self.valid, Some(false))
    }

    /// Turn an accepted response into the coupon to store on the session.
    ///
    /// Missing amounts count as zero; a code echoed back by the server wins
    /// over the one sent when it parses.
    pub fn into_applied(self, requested: CouponCode) -> AppliedCoupon {
        let code = self
            .code
            .as_deref()
            .and_then(|c| CouponCode::parse(c).ok())
            .unwrap_or(requested);
        AppliedCoupon {
            code,
            discount_amount: self.discount_amount.unwrap_or(Money::ZERO).non_negative(),
            shipping_off: self.shipping_off.unwrap_or(Money::ZERO).non_negative(),
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// An order as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItemPayload>,
    #[serde(default)]
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub subtotal: Money,
    #[serde(default)]
    pub shipping_cost: Money,
    #[serde(default)]
    pub discount: Money,
    #[serde(default)]
    pub shipping_discount: Money,
    #[serde(default)]
    pub total: Money,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Order number when the backend assigns one, else the id.
    #[must_use]
    pub fn reference(&self) -> &str {
        self.order_number.as_deref().unwrap_or(self.id.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderEnvelope {
    pub order: Order,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrdersEnvelope {
    #[serde(default)]
    pub orders: Vec<Order>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

// =============================================================================
// Reviews
// =============================================================================

/// A product review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", alias = "id")]
    pub id: ReviewId,
    #[serde(alias = "product")]
    pub product_id: ProductId,
    #[serde(default)]
    pub user_name: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Errors that can occur building a [`NewReview`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("rating must be between 1 and 5")]
    RatingOutOfRange,
    #[error("please write a comment")]
    EmptyComment,
}

/// Body of `POST /api/reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    product_id: ProductId,
    rating: u8,
    comment: String,
}

impl NewReview {
    /// Build a review, checking the rating range and that there is a comment.
    ///
    /// # Errors
    ///
    /// Returns an error if `rating` is outside 1..=5 or `comment` is blank.
    pub fn new(product_id: ProductId, rating: u8, comment: &str) -> Result<Self, ReviewError> {
        if !(1..=5).contains(&rating) {
            return Err(ReviewError::RatingOutOfRange);
        }
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(ReviewError::EmptyComment);
        }
        Ok(Self {
            product_id,
            rating,
            comment: comment.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewsEnvelope {
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewEnvelope {
    pub review: Review,
}

// =============================================================================
// Invoices
// =============================================================================

/// One invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub description: String,
    #[serde(default = "one")]
    pub quantity: u32,
    pub amount: Money,
}

const fn one() -> u32 {
    1
}

/// An invoice issued for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "_id", alias = "id")]
    pub id: InvoiceId,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default, alias = "order")]
    pub order_id: Option<OrderId>,
    pub amount: Money,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default)]
    pub issued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub lines: Vec<InvoiceLine>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvoicesEnvelope {
    #[serde(default)]
    pub invoices: Vec<Invoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvoiceEnvelope {
    pub invoice: Invoice,
}

// =============================================================================
// Seller verification
// =============================================================================

/// A seller's verification record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerVerification {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<VerificationId>,
    #[serde(default)]
    pub status: VerificationStatus,
    #[serde(default)]
    pub shop_name: String,
    #[serde(default)]
    pub nid_number: String,
    #[serde(default)]
    pub trade_license: Option<String>,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/seller/verification/submit`.
///
/// Documents are URLs of files already uploaded elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub shop_name: String,
    pub nid_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_license: Option<String>,
    #[serde(default)]
    pub documents: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerificationEnvelope {
    #[serde(default)]
    pub verification: Option<SellerVerification>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerificationsEnvelope {
    #[serde(default)]
    pub verifications: Vec<SellerVerification>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RejectVerificationRequest<'a> {
    pub reason: &'a str,
}

// =============================================================================
// Auth
// =============================================================================

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a Email,
    pub password: &'a str,
}

/// Body of `POST /api/auth/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<dokan_core::PhoneNumber>,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyOtpRequest<'a> {
    pub email: &'a Email,
    pub otp: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Bare `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_accepts_mongo_ids_and_sparse_fields() {
        let product: Product = serde_json::from_value(json!({
            "_id": "65f0aa",
            "name": "Muslin Scarf",
            "price": 900,
            "discountPrice": "750"
        }))
        .unwrap();

        assert_eq!(product.id.as_str(), "65f0aa");
        assert_eq!(product.effective_price(), Money::from_taka(750));
        assert!(!product.in_stock());
    }

    #[test]
    fn test_effective_price_ignores_bogus_sale() {
        let product: Product = serde_json::from_value(json!({
            "id": "p1", "name": "Lungi", "price": 400, "discountPrice": 0
        }))
        .unwrap();
        assert_eq!(product.effective_price(), Money::from_taka(400));
    }

    #[test]
    fn test_product_query_pairs() {
        let query = ProductQuery {
            search: Some("  saree ".to_string()),
            page: Some(2),
            ..ProductQuery::default()
        };
        assert_eq!(
            query.to_pairs(),
            vec![("search", "saree".to_string()), ("page", "2".to_string())]
        );
        assert!(!query.is_cacheable());
        assert!(ProductQuery::default().is_cacheable());
    }

    #[test]
    fn test_settings_envelope_shapes() {
        let wrapped: SettingsEnvelope =
            serde_json::from_value(json!({ "settings": { "insideDhakaRate": 60 } })).unwrap();
        let bare: SettingsEnvelope =
            serde_json::from_value(json!({ "insideDhakaRate": 60 })).unwrap();
        assert_eq!(wrapped.into_settings(), bare.into_settings());
    }

    #[test]
    fn test_coupon_response_defaults() {
        let response: CouponResponse =
            serde_json::from_value(json!({ "discountAmount": 100 })).unwrap();
        assert!(response.is_accepted());

        let applied = response.into_applied(CouponCode::parse("eid").unwrap());
        assert_eq!(applied.code.as_str(), "EID");
        assert_eq!(applied.discount_amount, Money::from_taka(100));
        assert_eq!(applied.shipping_off, Money::ZERO);

        let rejected: CouponResponse =
            serde_json::from_value(json!({ "valid": false, "message": "Expired" })).unwrap();
        assert!(!rejected.is_accepted());
    }

    #[test]
    fn test_coupon_response_with_success_and_valid() {
        let both: CouponResponse = serde_json::from_value(json!({
            "success": true, "valid": true, "discountAmount": 100, "shippingOff": 0
        }))
        .unwrap();
        assert!(both.is_accepted());

        let mixed: CouponResponse =
            serde_json::from_value(json!({ "success": true, "valid": false })).unwrap();
        assert!(!mixed.is_accepted());
    }

    #[test]
    fn test_new_review_validation() {
        let product = ProductId::new("p1");
        assert_eq!(
            NewReview::new(product.clone(), 0, "ok"),
            Err(ReviewError::RatingOutOfRange)
        );
        assert_eq!(
            NewReview::new(product.clone(), 4, "   "),
            Err(ReviewError::EmptyComment)
        );
        let review = NewReview::new(product, 5, " Great fabric ").unwrap();
        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json, json!({ "productId": "p1", "rating": 5, "comment": "Great fabric" }));
    }

    #[test]
    fn test_order_reference() {
        let order: Order = serde_json::from_value(json!({ "_id": "o1", "total": 560 })).unwrap();
        assert_eq!(order.reference(), "o1");
        assert_eq!(order.status, OrderStatus::Pending);
    }
}
