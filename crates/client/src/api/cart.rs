//! Server-side cart.

use dokan_core::ProductId;
use reqwest::Method;
use tracing::instrument;

use super::ApiClient;
use crate::error::Result;
use crate::types::{
    AddToCartRequest, Cart, CouponRequest, CouponResponse, UpdateQuantityRequest,
};

impl ApiClient {
    /// Fetch the signed-in customer's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn cart(&self) -> Result<Cart> {
        self.get(&["api", "cart"], &[]).await
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product = %request.product_id, quantity = request.quantity))]
    pub async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<Cart> {
        self.send(Method::POST, &["api", "cart", "items"], request)
            .await
    }

    /// Set the quantity of a cart line. A quantity of zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product = %product))]
    pub async fn update_cart_item(&self, product: &ProductId, quantity: u32) -> Result<Cart> {
        if quantity == 0 {
            return self.remove_cart_item(product).await;
        }
        self.send(
            Method::PUT,
            &["api", "cart", "items", product.as_str()],
            &UpdateQuantityRequest { quantity },
        )
        .await
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product = %product))]
    pub async fn remove_cart_item(&self, product: &ProductId) -> Result<Cart> {
        self.delete(&["api", "cart", "items", product.as_str()])
            .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<Cart> {
        self.delete(&["api", "cart"]).await
    }

    /// Ask the backend to price a coupon against the current cart.
    ///
    /// A 2xx response can still reject the code; see [`CouponResponse::success`].
    #[instrument(skip(self, request), fields(code = %request.code))]
    pub(crate) async fn apply_coupon(&self, request: &CouponRequest) -> Result<CouponResponse> {
        self.send(Method::POST, &["api", "cart", "apply-coupon"], request)
            .await
    }
}
