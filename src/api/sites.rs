//! Site endpoints.

use serde_json::Value;

use crate::clients::{HttpError, SimproClient};

impl SimproClient {
    /// Fetches a single site by id.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::execute`].
    pub async fn site(&self, site_id: i64) -> Result<Value, HttpError> {
        self.get(&format!("sites/{site_id}")).await
    }
}
