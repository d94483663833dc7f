//! Prebuild endpoints: groups, standard prices, catalog links, and
//! attachments.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::clients::{HttpError, ListParams, Page, PageStream, SimproClient};

/// Collection path for prebuild groups.
const GROUPS_PATH: &str = "prebuildGroups/";

/// Collection path for standard-price prebuilds.
const STANDARD_PRICE_PATH: &str = "prebuilds/standardPrice/";

/// Body for creating a standard-price prebuild.
#[derive(Clone, Debug, Serialize)]
pub struct NewStandardPrice {
    /// The prebuild group the new prebuild belongs to.
    #[serde(rename = "Group")]
    pub group_id: i64,
    /// The part number.
    #[serde(rename = "PartNo")]
    pub part_no: String,
    /// The display name.
    #[serde(rename = "Name")]
    pub name: String,
    /// The description.
    #[serde(rename = "Description")]
    pub description: String,
}

/// Partial update for a standard-price prebuild.
///
/// Only the fields that are set are sent in the PATCH body.
#[derive(Clone, Debug, Default, Serialize)]
pub struct StandardPriceUpdate {
    /// Moves the prebuild to another group.
    #[serde(rename = "Group", skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    /// Replaces the part number.
    #[serde(rename = "PartNo", skip_serializing_if = "Option::is_none")]
    pub part_no: Option<String>,
    /// Replaces the display name.
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replaces the description.
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replaces the ex-tax total price.
    #[serde(rename = "TotalEx", skip_serializing_if = "Option::is_none")]
    pub total_ex: Option<f64>,
}

impl SimproClient {
    /// Fetches one page of prebuild groups.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::get_page`].
    pub async fn prebuild_group_page(
        &self,
        page_number: u32,
        params: &ListParams,
    ) -> Result<Page<Value>, HttpError> {
        self.get_page(GROUPS_PATH, page_number, params).await
    }

    /// Returns a lazy stream over all prebuild group pages.
    ///
    /// The flat group list can be rebuilt into a forest with
    /// [`to_tree`](crate::to_tree).
    #[must_use]
    pub fn prebuild_group_pages(&self, params: ListParams) -> PageStream<Value> {
        self.pages(GROUPS_PATH, params)
    }

    /// Fetches one page of standard-price prebuilds, optionally filtered
    /// to one group.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::get_page`].
    pub async fn prebuild_standard_price_page(
        &self,
        page_number: u32,
        params: &ListParams,
        group_id: Option<i64>,
    ) -> Result<Page<Value>, HttpError> {
        let params = with_group_filter(params.clone(), group_id);
        self.get_page(STANDARD_PRICE_PATH, page_number, &params)
            .await
    }

    /// Returns a lazy stream over standard-price prebuild pages,
    /// optionally filtered to one group.
    #[must_use]
    pub fn prebuild_standard_price_pages(
        &self,
        params: ListParams,
        group_id: Option<i64>,
    ) -> PageStream<Value> {
        self.pages(STANDARD_PRICE_PATH, with_group_filter(params, group_id))
    }

    /// Fetches a single standard-price prebuild by id.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::execute`].
    pub async fn prebuild_standard_price(&self, prebuild_id: i64) -> Result<Value, HttpError> {
        self.get(&format!("{STANDARD_PRICE_PATH}{prebuild_id}"))
            .await
    }

    /// Looks up standard-price prebuilds by part number, optionally
    /// scoped to one group.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::execute`].
    pub async fn prebuild_standard_price_by_part_no(
        &self,
        part_no: &str,
        group_id: Option<i64>,
    ) -> Result<Value, HttpError> {
        let mut params = HashMap::new();
        params.insert("PartNo".to_string(), part_no.to_string());
        if let Some(group_id) = group_id {
            params.insert("Group.ID".to_string(), group_id.to_string());
        }
        self.get_with_params(STANDARD_PRICE_PATH, params).await
    }

    /// Creates a standard-price prebuild and returns the created record.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::execute`].
    pub async fn create_prebuild_standard_price(
        &self,
        new: &NewStandardPrice,
    ) -> Result<Value, HttpError> {
        self.post(STANDARD_PRICE_PATH, serde_json::to_value(new)?)
            .await
    }

    /// Applies a partial update to a standard-price prebuild.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::execute`].
    pub async fn update_prebuild_standard_price(
        &self,
        prebuild_id: i64,
        update: &StandardPriceUpdate,
    ) -> Result<Value, HttpError> {
        self.patch(
            &format!("{STANDARD_PRICE_PATH}{prebuild_id}"),
            serde_json::to_value(update)?,
        )
        .await
    }

    /// Lists the catalog items linked to a prebuild.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::execute`].
    pub async fn prebuild_catalogs(&self, prebuild_id: i64) -> Result<Value, HttpError> {
        self.get(&format!("prebuilds/{prebuild_id}/catalogs/")).await
    }

    /// Links a catalog item to a prebuild.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::execute`].
    pub async fn create_prebuild_catalog(
        &self,
        prebuild_id: i64,
        catalog_id: i64,
        quantity: f64,
    ) -> Result<Value, HttpError> {
        self.post(
            &format!("prebuilds/{prebuild_id}/catalogs/"),
            json!({"Catalog": catalog_id, "Quantity": quantity}),
        )
        .await
    }

    /// Removes a catalog link from a prebuild.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::execute`].
    pub async fn delete_prebuild_catalog(
        &self,
        prebuild_id: i64,
        catalog_id: i64,
    ) -> Result<Value, HttpError> {
        self.delete(&format!("prebuilds/{prebuild_id}/catalogs/{catalog_id}"))
            .await
    }

    /// Lists the file attachments on a prebuild.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::execute`].
    pub async fn prebuild_attachments(&self, prebuild_id: i64) -> Result<Value, HttpError> {
        self.get(&format!("prebuilds/{prebuild_id}/attachments/files/"))
            .await
    }

    /// Attaches a file to a prebuild. `content` is base64-encoded data.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::execute`].
    pub async fn add_prebuild_attachment(
        &self,
        prebuild_id: i64,
        filename: &str,
        content: &str,
    ) -> Result<Value, HttpError> {
        self.post(
            &format!("prebuilds/{prebuild_id}/attachments/files/"),
            json!({"Filename": filename, "Base64Data": content}),
        )
        .await
    }

    /// Removes a file attachment from a prebuild.
    ///
    /// # Errors
    ///
    /// See [`SimproClient::execute`].
    pub async fn delete_prebuild_attachment(
        &self,
        prebuild_id: i64,
        attachment_id: i64,
    ) -> Result<Value, HttpError> {
        self.delete(&format!(
            "prebuilds/{prebuild_id}/attachments/files/{attachment_id}"
        ))
        .await
    }
}

fn with_group_filter(params: ListParams, group_id: Option<i64>) -> ListParams {
    match group_id {
        Some(group_id) => params.filter("Group.ID", group_id.to_string()),
        None => params,
    }
}
