//! Shipping settings.

use dokan_core::ShippingSettings;
use reqwest::Method;
use tracing::instrument;

use super::{ApiClient, CacheKey, CacheValue};
use crate::error::Result;
use crate::types::SettingsEnvelope;

impl ApiClient {
    /// Fetch the shipping settings, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn shipping_settings(&self) -> Result<ShippingSettings> {
        if let Some(CacheValue::ShippingSettings(settings)) =
            self.cached(&CacheKey::ShippingSettings).await
        {
            return Ok(*settings);
        }

        let envelope: SettingsEnvelope = self.get(&["api", "shipping-settings"], &[]).await?;
        let settings = envelope.into_settings();

        self.cache_insert(
            CacheKey::ShippingSettings,
            CacheValue::ShippingSettings(Box::new(settings.clone())),
        )
        .await;
        Ok(settings)
    }

    /// Replace the shipping settings (admin).
    ///
    /// The cached copy is dropped so the next read sees the new values.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, settings))]
    pub async fn update_shipping_settings(
        &self,
        settings: &ShippingSettings,
    ) -> Result<ShippingSettings> {
        let result: Result<SettingsEnvelope> = self
            .send(Method::PUT, &["api", "shipping-settings"], settings)
            .await;
        self.cache_invalidate(&CacheKey::ShippingSettings).await;

        let updated = result?.into_settings();
        tracing::info!("Shipping settings updated");
        Ok(updated)
    }
}
