use dokan_core::InvoiceId;
use tracing::instrument;

use super::ApiClient;
use crate::error::Result;
use crate::types::{Invoice, InvoiceEnvelope, InvoicesEnvelope};

impl ApiClient {
    /// Invoices visible to the signed-in account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn invoices(&self) -> Result<Vec<Invoice>> {
        let envelope: InvoicesEnvelope = self.get(&["api", "invoices"], &[]).await?;
        Ok(envelope.invoices)
    }

    /// A single invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice does not exist or the API request fails.
    #[instrument(skip(self), fields(invoice = %id))]
    pub async fn invoice(&self, id: &InvoiceId) -> Result<Invoice> {
        let envelope: InvoiceEnvelope = self.get(&["api", "invoices", id.as_str()], &[]).await?;
        Ok(envelope.invoice)
    }
}
