use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ItemError, ItemResult};

/// Item as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Store-assigned identifier (24 lowercase hex characters)
    #[schema(example = "65f1c0ffee0000000000beef")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub tax: Option<f64>,
}

/// Request body for creating and replacing an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemInput {
    #[schema(example = "Widget")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schema(example = 9.99)]
    pub price: f64,
    #[serde(default)]
    pub tax: Option<f64>,
}

/// Item as stored in the `item` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDocument {
    /// Left unset on insert so the store assigns one
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub tax: Option<f64>,
}

impl From<ItemInput> for ItemDocument {
    fn from(input: ItemInput) -> Self {
        Self {
            id: None,
            name: input.name,
            description: input.description,
            price: input.price,
            tax: input.tax,
        }
    }
}

impl ItemDocument {
    /// Render the stored record for the API, turning its `_id` into hex.
    ///
    /// A record without `_id` means the store broke its contract.
    pub fn into_item(self) -> ItemResult<Item> {
        let id = self.id.ok_or_else(|| {
            ItemError::MissingIdentifier(format!("stored item '{}' has no _id", self.name))
        })?;

        Ok(Item {
            id: id.to_hex(),
            name: self.name,
            description: self.description,
            price: self.price,
            tax: self.tax,
        })
    }
}

/// Pagination for listing items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Maximum number of items to return; 0 returns everything
    #[serde(default)]
    pub limit: u64,
    /// Number of items to skip from the start
    #[serde(default)]
    pub skip: u64,
}

/// Result of a delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteStatus {
    #[schema(example = "deleted count: 1")]
    pub status: String,
}

impl DeleteStatus {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            status: format!("deleted count: {}", deleted_count),
        }
    }
}

/// Parse an external item id into the store's native identifier.
///
/// Every id-taking operation goes through here.
pub fn parse_item_id(id: &str) -> ItemResult<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|_| ItemError::InvalidIdentifier(format!("'{}' is not a valid ObjectId", id)))
}
