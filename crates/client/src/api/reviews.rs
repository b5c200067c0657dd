use dokan_core::ProductId;
use reqwest::Method;
use tracing::instrument;

use super::ApiClient;
use crate::error::Result;
use crate::types::{NewReview, Review, ReviewEnvelope, ReviewsEnvelope};

impl ApiClient {
    /// Reviews for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product = %product))]
    pub async fn reviews(&self, product: &ProductId) -> Result<Vec<Review>> {
        let envelope: ReviewsEnvelope = self
            .get(
                &["api", "reviews"],
                &[("product", product.as_str().to_string())],
            )
            .await?;
        Ok(envelope.reviews)
    }

    /// Post a review.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, review))]
    pub async fn post_review(&self, review: &NewReview) -> Result<Review> {
        let envelope: ReviewEnvelope = self.send(Method::POST, &["api", "reviews"], review).await?;
        Ok(envelope.review)
    }
}
