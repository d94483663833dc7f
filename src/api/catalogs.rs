//! Catalog endpoints.

use std::collections::HashMap;

use serde_json::Value;

use crate::clients::{HttpError, ListParams, Page, PageStream, SimproClient};

/// Collection path for catalog items.
const CATALOGS_PATH: &str = "catalogs/";

impl SimproClient {
    /// Fetches one page of catalog items.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::get_page`].
    pub async fn catalog_page(
        &self,
        page_number: u32,
        params: &ListParams,
    ) -> Result<Page<Value>, HttpError> {
        self.get_page(CATALOGS_PATH, page_number, params).await
    }

    /// Returns a lazy stream over all catalog pages.
    #[must_use]
    pub fn catalog_pages(&self, params: ListParams) -> PageStream<Value> {
        self.pages(CATALOGS_PATH, params)
    }

    /// Looks up catalog items by part number.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::execute`].
    pub async fn catalog_by_part_no(&self, part_no: &str) -> Result<Value, HttpError> {
        let mut params = HashMap::new();
        params.insert("PartNo".to_string(), part_no.to_string());
        self.get_with_params(CATALOGS_PATH, params).await
    }
}
