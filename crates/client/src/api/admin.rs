//! Admin endpoints: order management and seller verification review.
//!
//! The backend enforces the admin role; these calls fail with
//! [`crate::ApiError::Unauthorized`] or a 403 [`crate::ApiError::Api`] for
//! other accounts.

use dokan_core::{OrderId, OrderStatus, VerificationId};
use reqwest::Method;
use tracing::instrument;

use super::ApiClient;
use crate::error::Result;
use crate::types::{
    MessageResponse, Order, OrderEnvelope, OrdersEnvelope, RejectVerificationRequest,
    SellerVerification, UpdateOrderStatusRequest, VerificationsEnvelope,
};

impl ApiClient {
    /// All orders, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn admin_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>> {
        let query: Vec<(&str, String)> = status
            .map(|s| ("status", s.as_str().to_string()))
            .into_iter()
            .collect();
        let envelope: OrdersEnvelope = self.get(&["api", "admin", "orders"], &query).await?;
        Ok(envelope.orders)
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order = %id, status = %status))]
    pub async fn set_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order> {
        let envelope: OrderEnvelope = self
            .send(
                Method::PATCH,
                &["api", "admin", "orders", id.as_str(), "status"],
                &UpdateOrderStatusRequest { status },
            )
            .await?;
        tracing::info!("Order status updated");
        Ok(envelope.order)
    }

    /// Verification requests awaiting review.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn pending_verifications(&self) -> Result<Vec<SellerVerification>> {
        let envelope: VerificationsEnvelope = self
            .get(&["api", "seller", "verification", "pending"], &[])
            .await?;
        Ok(envelope.verifications)
    }

    /// Approve a seller's verification. Returns the server's message, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(verification = %id))]
    pub async fn approve_verification(&self, id: &VerificationId) -> Result<Option<String>> {
        let response: MessageResponse = self
            .send(
                Method::POST,
                &["api", "seller", "verification", id.as_str(), "approve"],
                &serde_json::json!({}),
            )
            .await?;
        tracing::info!("Verification approved");
        Ok(response.message)
    }

    /// Reject a seller's verification with a reason shown to the seller.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(verification = %id))]
    pub async fn reject_verification(
        &self,
        id: &VerificationId,
        reason: &str,
    ) -> Result<Option<String>> {
        let response: MessageResponse = self
            .send(
                Method::POST,
                &["api", "seller", "verification", id.as_str(), "reject"],
                &RejectVerificationRequest {
                    reason: reason.trim(),
                },
            )
            .await?;
        tracing::info!("Verification rejected");
        Ok(response.message)
    }
}
