//! Customer invoice endpoints.

use serde_json::Value;

use crate::clients::{HttpError, ListParams, Page, PageStream, SimproClient};

/// Collection path for customer invoices.
const INVOICES_PATH: &str = "customerInvoices/";

impl SimproClient {
    /// Fetches one page of customer invoices.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::get_page`].
    pub async fn invoice_page(
        &self,
        page_number: u32,
        params: &ListParams,
    ) -> Result<Page<Value>, HttpError> {
        self.get_page(INVOICES_PATH, page_number, params).await
    }

    /// Returns a lazy stream over all customer invoice pages.
    #[must_use]
    pub fn invoice_pages(&self, params: ListParams) -> PageStream<Value> {
        self.pages(INVOICES_PATH, params)
    }
}
