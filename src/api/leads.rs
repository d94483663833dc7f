//! Lead endpoints.

use serde_json::Value;

use crate::clients::{HttpError, ListParams, Page, PageStream, SimproClient};

/// Collection path for leads.
const LEADS_PATH: &str = "leads/";

impl SimproClient {
    /// Fetches one page of leads.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::get_page`].
    pub async fn lead_page(
        &self,
        page_number: u32,
        params: &ListParams,
    ) -> Result<Page<Value>, HttpError> {
        self.get_page(LEADS_PATH, page_number, params).await
    }

    /// Returns a lazy stream over all lead pages.
    #[must_use]
    pub fn lead_pages(&self, params: ListParams) -> PageStream<Value> {
        self.pages(LEADS_PATH, params)
    }

    /// Fetches a single lead by id.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::execute`].
    pub async fn lead(&self, lead_id: i64) -> Result<Value, HttpError> {
        self.get(&format!("leads/{lead_id}")).await
    }
}
