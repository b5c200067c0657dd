//! Products and categories.

use dokan_core::ProductId;
use tracing::instrument;

use super::{ApiClient, CacheKey, CacheValue};
use crate::error::Result;
use crate::types::{
    CategoriesEnvelope, Category, Product, ProductEnvelope, ProductPage, ProductQuery,
};

impl ApiClient {
    /// List products.
    ///
    /// Pages without a search term are cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<ProductPage> {
        let key = CacheKey::Products(query.clone());
        if query.is_cacheable()
            && let Some(CacheValue::Products(page)) = self.cached(&key).await
        {
            return Ok(page);
        }

        let page: ProductPage = self.get(&["api", "products"], &query.to_pairs()).await?;

        if query.is_cacheable() {
            self.cache_insert(key, CacheValue::Products(page.clone()))
                .await;
        }
        Ok(page)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::NotFound`] if there is no such product, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(product = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.cached(&key).await {
            return Ok(*product);
        }

        let envelope: ProductEnvelope = self.get(&["api", "products", id.as_str()], &[]).await?;
        let product = envelope.product;

        self.cache_insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// List product categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>> {
        if let Some(CacheValue::Categories(categories)) = self.cached(&CacheKey::Categories).await
        {
            return Ok(categories);
        }

        let envelope: CategoriesEnvelope = self.get(&["api", "categories"], &[]).await?;
        self.cache_insert(
            CacheKey::Categories,
            CacheValue::Categories(envelope.categories.clone()),
        )
        .await;
        Ok(envelope.categories)
    }
}
