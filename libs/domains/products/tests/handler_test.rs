//! Handler tests for Products domain
//!
//! These tests drive the products router directly:
//! - Request deserialization and validation
//! - Response serialization
//! - HTTP status codes and error bodies
//!
//! They run against the in-memory repository, so no database is needed.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

fn app_with_repo() -> (Router, InMemoryProductRepository) {
    let repo = InMemoryProductRepository::new();
    let app = handlers::router(ProductService::new(repo.clone()));
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

async fn body_bytes(body: Body) -> Vec<u8> {
    body.collect().await.unwrap().to_bytes().to_vec()
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

async fn create(app: &Router, body: Value) -> Product {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_product_returns_201_with_id() {
    let (app, _) = app_with_repo();

    let product = create(
        &app,
        json!({"name": "Wireless Mouse", "price": 24.99, "quantity": 25}),
    )
    .await;

    assert_eq!(product.id, Some(1));
    assert_eq!(product.name, "Wireless Mouse");
    assert_eq!(product.price, 24.99);
    assert_eq!(product.quantity, 25);
}

#[tokio::test]
async fn test_create_ignores_client_id() {
    let (app, _) = app_with_repo();

    let product = create(
        &app,
        json!({"id": 500, "name": "Keyboard", "price": 49.0, "quantity": 3}),
    )
    .await;

    assert_eq!(product.id, Some(1));
}

#[tokio::test]
async fn test_create_then_get_returns_same_product() {
    let (app, _) = app_with_repo();
    let created = create(&app, json!({"name": "Monitor", "price": 199.5, "quantity": 4})).await;

    let response = app
        .oneshot(empty_request("GET", "/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let fetched: Product = json_body(response.into_body()).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_invalid_create_is_rejected_before_persistence() {
    let (app, repo) = app_with_repo();

    let invalid_payloads = [
        json!({"name": "Mouse", "price": 0, "quantity": 1}),
        json!({"name": "Mouse", "price": -3.5, "quantity": 1}),
        json!({"name": "   ", "price": 1.0, "quantity": 1}),
        json!({"name": "x".repeat(101), "price": 1.0, "quantity": 1}),
        json!({"name": "Mouse", "price": 1.0, "quantity": -1}),
        json!({"price": 1.0, "quantity": 1}),
        json!({"name": "Mouse", "quantity": 1}),
        json!({"name": "Mouse", "price": 1.0}),
    ];

    for payload in invalid_payloads {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/", payload.clone()))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "payload {} should be rejected",
            payload
        );
    }

    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_validation_error_body_lists_every_field() {
    let (app, _) = app_with_repo();

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({"name": "", "price": 0, "quantity": -2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["details"]["name"][0]["message"], "Product name is required");
    assert_eq!(body["details"]["price"][0]["message"], "Price must be greater than 0");
    assert_eq!(body["details"]["quantity"][0]["message"], "Quantity cannot be negative");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _) = app_with_repo();

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": \"Mouse\", "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_JSON");
}

#[tokio::test]
async fn test_get_missing_product_is_empty_404() {
    let (app, _) = app_with_repo();

    let response = app.oneshot(empty_request("GET", "/42")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(response.into_body()).await.is_empty());
}

#[tokio::test]
async fn test_non_integer_id_is_bad_request() {
    let (app, _) = app_with_repo();

    let response = app.oneshot(empty_request("GET", "/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_ID");
}

#[tokio::test]
async fn test_update_overwrites_fields_and_keeps_id() {
    let (app, _) = app_with_repo();
    create(&app, json!({"name": "Mouse", "price": 24.99, "quantity": 25})).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/1",
            json!({"id": 77, "name": "Silent Mouse", "price": 19.99, "quantity": 10}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(
        updated,
        Product {
            id: Some(1),
            name: "Silent Mouse".to_string(),
            price: 19.99,
            quantity: 10,
        }
    );

    let fetched: Product = json_body(
        app.oneshot(empty_request("GET", "/1"))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_update_missing_product_is_404_and_creates_nothing() {
    let (app, repo) = app_with_repo();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/9",
            json!({"name": "Ghost", "price": 1.0, "quantity": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_requires_all_fields() {
    let (app, repo) = app_with_repo();
    create(&app, json!({"name": "Mouse", "price": 24.99, "quantity": 25})).await;

    let response = app
        .oneshot(json_request("PUT", "/1", json!({"price": 5.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let unchanged = repo.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(unchanged.price, 24.99);
}

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let (app, _) = app_with_repo();
    create(&app, json!({"name": "Mouse", "price": 24.99, "quantity": 25})).await;

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response.into_body()).await.is_empty());

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(empty_request("DELETE", "/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_returns_every_product_in_order() {
    let (app, _) = app_with_repo();

    let response = app.clone().oneshot(empty_request("GET", "/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let empty: Vec<Product> = json_body(response.into_body()).await;
    assert!(empty.is_empty());

    for (i, name) in ["Mouse", "Keyboard", "Monitor"].iter().enumerate() {
        create(&app, json!({"name": name, "price": 10.0 + i as f64, "quantity": i})).await;
    }

    let response = app.oneshot(empty_request("GET", "/")).await.unwrap();
    let products: Vec<Product> = json_body(response.into_body()).await;

    assert_eq!(products.len(), 3);
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Mouse", "Keyboard", "Monitor"]);
}

#[tokio::test]
async fn test_patch_is_not_supported() {
    let (app, _) = app_with_repo();
    create(&app, json!({"name": "Mouse", "price": 24.99, "quantity": 25})).await;

    let response = app
        .oneshot(json_request("PATCH", "/1", json!({"price": 5.0})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_wireless_mouse_lifecycle() {
    let (app, _) = app_with_repo();

    let created = create(
        &app,
        json!({"name": "Wireless Mouse", "price": 24.99, "quantity": 25}),
    )
    .await;
    assert_eq!(created.id, Some(1));

    let response = app.clone().oneshot(empty_request("GET", "/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/1",
            json!({"name": "Wireless Mouse", "price": 19.99, "quantity": 10}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.price, 19.99);
    assert_eq!(updated.quantity, 10);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(empty_request("GET", "/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_with_unparsable_body_is_rejected_before_lookup() {
    let (app, repo) = app_with_repo();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/9",
            json!({"name": "Ghost", "price": 0, "quantity": 1.5}),
        ))
        .await
        .unwrap();

    // A fractional quantity fails parsing, so this is a JSON error, not a 404.
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_JSON");
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_with_null_fields_lists_required_errors() {
    let (app, repo) = app_with_repo();

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({"name": null, "price": null, "quantity": null}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["details"]["name"][0]["code"], "required");
    assert_eq!(body["details"]["price"][0]["code"], "required");
    assert_eq!(body["details"]["quantity"][0]["code"], "required");
    assert_eq!(repo.count().await.unwrap(), 0);
}
