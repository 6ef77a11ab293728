use super::common::*;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::receipts::router::{points_handler, process_handler};
use crate::receipts::ReceiptService;

fn post_receipt(body: &serde_json::Value) -> Request<axum::body::Body> {
    Request::post("/receipts/process")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serializable body"),
        ))
        .expect("request builds")
}

fn get_points(id: &str) -> Request<axum::body::Body> {
    Request::get(format!("/receipts/{id}/points"))
        .body(axum::body::Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn process_route_returns_identifier() {
    let (service, _) = build_service();
    let router = receipt_router_with_service(service);

    let response = router
        .oneshot(post_receipt(
            &serde_json::to_value(minimal_submission()).expect("serializable"),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "id": "test-000001" }));
}

#[tokio::test]
async fn points_route_awards_once() {
    let (service, _) = build_service();
    let id = service
        .submit(minimal_submission())
        .expect("submission succeeds");
    let router = receipt_router_with_service(service);

    let first = router
        .clone()
        .oneshot(get_points(id.as_str()))
        .await
        .expect("route executes");
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(read_json_body(first).await, json!({ "points": 52 }));

    let second = router
        .oneshot(get_points(id.as_str()))
        .await
        .expect("route executes");
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(read_json_body(second).await, json!({ "points": 0 }));
}

#[tokio::test]
async fn process_route_rejects_empty_items() {
    let (service, _) = build_service();
    let router = receipt_router_with_service(service);

    let response = router
        .oneshot(post_receipt(&json!({
            "retailer": "Target",
            "purchaseDate": "2022-01-01",
            "purchaseTime": "13:01",
            "total": "1.25",
            "items": [],
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("fields"), Some(&json!(["items"])));
    assert!(payload
        .get("error")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .contains("items"));
}

#[tokio::test]
async fn points_route_returns_not_found_for_unknown_id() {
    let (service, _) = build_service();
    let router = receipt_router_with_service(service);

    let response = router
        .oneshot(get_points("unknown-id"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert!(payload.get("fields").is_none());
    assert!(payload
        .get("error")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .contains("unknown-id"));
}

#[tokio::test]
async fn process_route_rejects_numeric_total_by_name() {
    let (service, store) = build_service();
    let router = receipt_router_with_service(service);

    let response = router
        .oneshot(post_receipt(&json!({
            "retailer": "Target",
            "purchaseDate": "2022-01-01",
            "purchaseTime": "13:01",
            "total": 10.00,
            "items": [{ "shortDescription": "abc", "price": "10.00" }],
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("fields"), Some(&json!(["total"])));
    assert!(payload.get("error").and_then(serde_json::Value::as_str).is_some());
    assert!(store.is_empty().expect("store readable"));
}

#[tokio::test]
async fn process_route_names_nested_type_mismatch() {
    let (service, _) = build_service();
    let router = receipt_router_with_service(service);

    let response = router
        .oneshot(post_receipt(&json!({
            "retailer": "Target",
            "purchaseDate": "2022-01-01",
            "purchaseTime": "13:01",
            "total": "1.25",
            "items": [{ "shortDescription": "abc", "price": 1.25 }],
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("fields"), Some(&json!(["items[0].price"])));
}

#[tokio::test]
async fn process_route_rejects_non_json_body() {
    let (service, _) = build_service();
    let router = receipt_router_with_service(service);

    let request = Request::post("/receipts/process")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("retailer=Target"))
        .expect("request builds");
    let response = router.oneshot(request).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("fields"), Some(&json!([])));
    assert!(payload
        .get("error")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .starts_with("malformed receipt payload"));
}

#[tokio::test]
async fn process_route_requires_json_content_type() {
    let (service, _) = build_service();
    let router = receipt_router_with_service(service);

    let request = Request::post("/receipts/process")
        .body(axum::body::Body::from("{}"))
        .expect("request builds");
    let response = router.oneshot(request).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn process_handler_hides_internal_details() {
    let service = Arc::new(ReceiptService::new(Arc::new(PoisonedStore)));

    let response =
        process_handler::<PoisonedStore>(State(service), Ok(axum::Json(minimal_submission())))
            .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "error": "internal server error" }));
}

#[tokio::test]
async fn points_handler_hides_internal_details() {
    let service = Arc::new(ReceiptService::new(Arc::new(PoisonedStore)));

    let response =
        points_handler::<PoisonedStore>(State(service), Path("any".to_string())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert!(!payload.to_string().contains("poisoned"));
}
