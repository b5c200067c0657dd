//! Customer orders.

use dokan_core::{OrderId, OrderPayload};
use reqwest::Method;
use tracing::instrument;

use super::ApiClient;
use crate::error::Result;
use crate::types::{Order, OrderEnvelope, OrdersEnvelope};

impl ApiClient {
    /// Create an order. Sends exactly one request; never retried.
    ///
    /// Prefer [`crate::Checkout::submit`], which validates the session and
    /// guards against double submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, payload), fields(items = payload.items.len(), total = %payload.total))]
    pub async fn place_order(&self, payload: &OrderPayload) -> Result<Order> {
        let envelope: OrderEnvelope = self.send(Method::POST, &["api", "order"], payload).await?;
        tracing::info!(order = %envelope.order.id, "Order placed");
        Ok(envelope.order)
    }

    /// The signed-in customer's orders, newest first as the backend returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>> {
        let envelope: OrdersEnvelope = self.get(&["api", "order", "my"], &[]).await?;
        Ok(envelope.orders)
    }

    /// A single order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::NotFound`] if there is no such order, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(order = %id))]
    pub async fn order(&self, id: &OrderId) -> Result<Order> {
        let envelope: OrderEnvelope = self.get(&["api", "order", id.as_str()], &[]).await?;
        Ok(envelope.order)
    }
}
