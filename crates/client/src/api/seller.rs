//! Seller verification, from the seller's side.

use reqwest::Method;
use tracing::instrument;

use super::ApiClient;
use crate::error::Result;
use crate::types::{SellerVerification, VerificationEnvelope, VerificationRequest};

impl ApiClient {
    /// The seller's current verification record.
    ///
    /// Sellers that never submitted get a record with status `unsubmitted`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn verification_status(&self) -> Result<SellerVerification> {
        let envelope: VerificationEnvelope = self
            .get(&["api", "seller", "verification", "status"], &[])
            .await?;
        Ok(envelope.verification.unwrap_or_default())
    }

    /// Submit verification documents for review.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, request), fields(shop = %request.shop_name))]
    pub async fn submit_verification(
        &self,
        request: &VerificationRequest,
    ) -> Result<SellerVerification> {
        let envelope: VerificationEnvelope = self
            .send(
                Method::POST,
                &["api", "seller", "verification", "submit"],
                request,
            )
            .await?;
        tracing::info!("Verification submitted");
        Ok(envelope.verification.unwrap_or_default())
    }
}
