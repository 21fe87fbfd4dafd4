use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError,
    errors::responses::{
        BadRequestIdentifierResponse, InternalServerErrorResponse, NotFoundResponse,
        ServiceUnavailableResponse, ValidationErrorResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ItemResult;
use crate::models::{DeleteStatus, Item, ItemInput, ListParams};
use crate::repository::ItemRepository;
use crate::service::ItemService;

/// OpenAPI documentation for Items API
#[derive(OpenApi)]
#[openapi(
    paths(list_items, create_item, get_item, update_item, delete_item),
    components(
        schemas(Item, ItemInput, ListParams, DeleteStatus),
        responses(
            NotFoundResponse,
            BadRequestIdentifierResponse,
            ValidationErrorResponse,
            ServiceUnavailableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Items", description = "Item management endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;

/// Create the items router with all HTTP endpoints
///
/// The collection is reachable both with and without the trailing slash.
pub fn router<R: ItemRepository + 'static>(service: ItemService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/items/", get(list_items).post(create_item))
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .with_state(shared_service)
}

/// List items
#[utoipa::path(
    get,
    path = "/items/",
    tag = "Items",
    params(ListParams),
    responses(
        (status = 200, description = "Items in insertion order", body = Vec<Item>),
        (status = 400, description = "Malformed limit or skip"),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_items<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Item>>, AppError> {
    let Query(params) = params?;
    let items = service.list_items(params).await?;
    Ok(Json(items))
}

/// Create a new item
#[utoipa::path(
    post,
    path = "/items/",
    tag = "Items",
    request_body = ItemInput,
    responses(
        (status = 201, description = "Item created successfully", body = Item),
        (status = 422, response = ValidationErrorResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn create_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    payload: Result<Json<ItemInput>, JsonRejection>,
) -> ItemResult<impl IntoResponse> {
    let Json(input) = payload?;
    let item = service.create_item(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Get an item by ID
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "Items",
    params(
        ("id" = String, Path, description = "Item ObjectId (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Item found", body = Item),
        (status = 400, response = BadRequestIdentifierResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn get_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    Path(id): Path<String>,
) -> ItemResult<Json<Item>> {
    let item = service.get_item(&id).await?;
    Ok(Json(item))
}

/// Replace every field of an item
#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "Items",
    params(
        ("id" = String, Path, description = "Item ObjectId (24 hex characters)")
    ),
    request_body = ItemInput,
    responses(
        (status = 200, description = "Item updated successfully", body = Item),
        (status = 304, description = "Item matched but no field changed"),
        (status = 400, response = BadRequestIdentifierResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn update_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<ItemInput>, JsonRejection>,
) -> ItemResult<Json<Item>> {
    let Json(input) = payload?;
    let item = service.update_item(&id, input).await?;
    Ok(Json(item))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "Items",
    params(
        ("id" = String, Path, description = "Item ObjectId (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Item deleted", body = DeleteStatus),
        (status = 400, response = BadRequestIdentifierResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn delete_item<R: ItemRepository>(
    State(service): State<Arc<ItemService<R>>>,
    Path(id): Path<String>,
) -> ItemResult<Json<DeleteStatus>> {
    let status = service.delete_item(&id).await?;
    Ok(Json(status))
}
