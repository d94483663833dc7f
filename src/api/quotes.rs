//! Quote endpoints.

use serde_json::Value;

use crate::clients::{HttpError, ListParams, Page, PageStream, SimproClient};

/// Collection path for quotes.
const QUOTES_PATH: &str = "quotes/";

impl SimproClient {
    /// Fetches one page of quotes.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::get_page`].
    pub async fn quote_page(
        &self,
        page_number: u32,
        params: &ListParams,
    ) -> Result<Page<Value>, HttpError> {
        self.get_page(QUOTES_PATH, page_number, params).await
    }

    /// Returns a lazy stream over all quote pages.
    #[must_use]
    pub fn quote_pages(&self, params: ListParams) -> PageStream<Value> {
        self.pages(QUOTES_PATH, params)
    }

    /// Fetches the timeline entries of a quote.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::execute`].
    pub async fn quote_timeline(&self, quote_id: i64) -> Result<Value, HttpError> {
        self.get(&format!("quotes/{quote_id}/timelines/")).await
    }
}
