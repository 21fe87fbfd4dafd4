//! Handler tests for Items domain
//!
//! These tests drive the items router end to end over an in-memory
//! repository:
//! - Request deserialization (JSON → Rust structs)
//! - Response serialization (Rust structs → JSON)
//! - HTTP status codes
//! - Error responses

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::InMemoryItemRepository;
use domain_items::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::TestDataBuilder;
use test_utils::assertions::assert_object_id_hex;
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app() -> (Router, InMemoryItemRepository) {
    let repo = InMemoryItemRepository::default();
    let app = handlers::router(ItemService::new(repo.clone()));
    (app, repo)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn create(app: &Router, body: Value) -> Item {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/items/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_item_handler_returns_201() {
    let (app, _) = app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/items/",
            json!({"name": "Widget", "price": 9.99}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = json_body(response.into_body()).await;
    assert_object_id_hex(body["id"].as_str().unwrap(), "created id");
    assert_eq!(body["name"], "Widget");
    assert_eq!(body["price"], 9.99);
    assert_eq!(body["description"], Value::Null);
    assert_eq!(body["tax"], Value::Null);
}

#[tokio::test]
async fn test_create_item_without_trailing_slash() {
    let (app, _) = app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/items",
            json!({"name": "Widget", "price": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_item_handler_validates_before_store() {
    let (app, repo) = app();

    for body in [
        json!({"name": "Widget"}),
        json!({"price": 9.99}),
        json!({"name": "Widget", "price": "cheap"}),
        json!({"name": 42, "price": 1.0}),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/items/", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: Value = json_body(response.into_body()).await;
        assert_eq!(error["error"], "VALIDATION_ERROR");
    }

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/items/")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn test_update_item_handler_validates_before_store() {
    let (app, repo) = app();
    let uri = format!("/items/{}", ::mongodb::bson::oid::ObjectId::new().to_hex());

    for body in [
        json!({"name": "Widget"}),
        json!({"name": "Widget", "price": "cheap"}),
        json!({"name": "Widget", "price": 1.0, "tax": "none"}),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("PUT", &uri, body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let error: Value = json_body(response.into_body()).await;
        assert_eq!(error["error"], "VALIDATION_ERROR");
    }

    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn test_full_item_lifecycle() {
    let (app, _) = app();

    let created = create(&app, json!({"name": "Widget", "price": 9.99})).await;
    let uri = format!("/items/{}", created.id);

    // Read back
    let response = app.clone().oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Item = json_body(response.into_body()).await;
    assert_eq!(fetched, created);

    // Replace every field
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            json!({"name": "Widget", "price": 12.00, "description": "updated", "tax": 1.5}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Item = json_body(response.into_body()).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.price, 12.0);
    assert_eq!(updated.description.as_deref(), Some("updated"));
    assert_eq!(updated.tax, Some(1.5));

    // Delete
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let status: Value = json_body(response.into_body()).await;
    assert_eq!(status, json!({"status": "deleted count: 1"}));

    // Gone
    let response = app.oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: Value = json_body(response.into_body()).await;
    assert_eq!(error["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_id_returns_400_without_store_access() {
    let (app, repo) = app();

    let requests = [
        empty_request("GET", "/items/not-a-valid-id"),
        json_request(
            "PUT",
            "/items/not-a-valid-id",
            json!({"name": "Widget", "price": 1.0}),
        ),
        empty_request("DELETE", "/items/not-a-valid-id"),
    ];

    for request in requests {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let error: Value = json_body(response.into_body()).await;
        assert_eq!(error["error"], "INVALID_IDENTIFIER");
    }

    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn test_unknown_id_returns_404() {
    let (app, _) = app();
    let uri = format!("/items/{}", ::mongodb::bson::oid::ObjectId::new().to_hex());

    let response = app
        .clone()
        .oneshot(empty_request("GET", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            json!({"name": "Widget", "price": 1.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_identical_update_returns_304() {
    let (app, _) = app();
    let body = json!({"name": "Widget", "price": 9.99});
    let created = create(&app, body.clone()).await;

    let response = app
        .oneshot(json_request("PUT", &format!("/items/{}", created.id), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
}

#[tokio::test]
async fn test_list_items_pagination() {
    let (app, _) = app();
    let builder = TestDataBuilder::from_test_name("list_pagination");

    let mut created = Vec::new();
    for i in 0..5u64 {
        created.push(
            create(
                &app,
                json!({"name": builder.name("item", &i.to_string()), "price": builder.price(i)}),
            )
            .await,
        );
    }

    let list = |uri: &'static str| {
        let app = app.clone();
        async move {
            let response = app.oneshot(empty_request("GET", uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            json_body::<Vec<Item>>(response.into_body()).await
        }
    };

    let all = list("/items/").await;
    assert_eq!(all, created);
    assert_eq!(list("/items").await, created);
    assert_eq!(list("/items/?limit=0").await, created);
    assert_eq!(list("/items/?limit=2").await, created[..2]);
    assert_eq!(list("/items/?limit=2&skip=1").await, created[1..3]);
    assert_eq!(list("/items/?limit=10&skip=3").await, created[3..]);
    assert_eq!(list("/items/?skip=4").await, created[4..]);
    assert!(list("/items/?skip=5").await.is_empty());
    assert!(list("/items/?limit=3&skip=9").await.is_empty());
}

#[tokio::test]
async fn test_list_items_skip_beyond_i64_is_empty_page() {
    let (app, repo) = app();
    create(&app, json!({"name": "Widget", "price": 1.0})).await;
    let calls_after_create = repo.calls();

    for uri in [
        "/items/?limit=1&skip=9223372036854775808",
        "/items/?limit=0&skip=18446744073709551615",
    ] {
        let response = app.clone().oneshot(empty_request("GET", uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");

        let items: Vec<Item> = json_body(response.into_body()).await;
        assert!(items.is_empty(), "{uri}");
    }

    assert_eq!(repo.calls(), calls_after_create);
}

#[tokio::test]
async fn test_list_items_rejects_bad_query() {
    let (app, _) = app();

    for uri in ["/items/?limit=-1", "/items/?skip=abc", "/items/?limit=1.5"] {
        let response = app.clone().oneshot(empty_request("GET", uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");

        let error: Value = json_body(response.into_body()).await;
        assert_eq!(error["error"], "INVALID_QUERY");
    }
}

#[tokio::test]
async fn test_duplicates_are_allowed() {
    let (app, _) = app();
    let body = json!({"name": "Widget", "price": 9.99});

    let first = create(&app, body.clone()).await;
    let second = create(&app, body).await;

    assert_ne!(first.id, second.id);
}
