//! OpenAPI documentation configuration

use utoipa::{Modify, OpenApi};

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Item Store",
        version = "0.1",
        description = "MongoDB-backed CRUD API for items"
    ),
    modifiers(&ItemsDoc),
    tags(
        (name = "Items", description = "Item management endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;

/// Item routes are mounted at their full paths, so their document merges as-is
struct ItemsDoc;

impl Modify for ItemsDoc {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.merge(domain_items::ApiDoc::openapi());
    }
}
