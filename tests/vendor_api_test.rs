mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{response_json, TestApp};

fn vendor_payload(code: &str, name: &str) -> serde_json::Value {
    json!({
        "vendor_code": code,
        "name": name,
        "contact_details": "purchasing@acme.test",
        "address": "1 Industrial Way, Springfield"
    })
}

#[tokio::test]
async fn create_vendor_defaults_metrics_to_zero() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/vendors",
            Some(vendor_payload("VN-001", "Acme Supplies")),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert!(body["success"].as_bool().unwrap_or(false));
    let data = &body["data"];
    assert_eq!(data["vendor_code"], "VN-001");
    assert_eq!(data["on_time_delivery_rate"], 0.0);
    assert_eq!(data["quality_rating_avg"], 0.0);
    assert_eq!(data["average_response_time"], 0.0);
    assert_eq!(data["fulfillment_rate"], 0.0);
}

#[tokio::test]
async fn create_vendor_ignores_client_supplied_metrics() {
    let app = TestApp::new().await;

    let mut payload = vendor_payload("VN-002", "Globex");
    payload["on_time_delivery_rate"] = json!(88.0);
    payload["fulfillment_rate"] = json!(99.0);

    let response = app.request(Method::POST, "/vendors", Some(payload)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    assert_eq!(body["data"]["on_time_delivery_rate"], 0.0);
    assert_eq!(body["data"]["fulfillment_rate"], 0.0);
}

#[tokio::test]
async fn create_vendor_with_blank_name_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::POST, "/vendors", Some(vendor_payload("VN-003", "")))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("name"));
}

#[tokio::test]
async fn create_vendor_with_missing_fields_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/vendors",
            Some(json!({"vendor_code": "VN-004"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_vendor_code_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/vendors",
            Some(vendor_payload("VN-010", "First")),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(
            Method::POST,
            "/vendors",
            Some(vendor_payload("VN-010", "Second")),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_unknown_vendor_returns_404() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/vendors/NOPE", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn update_vendor_changes_contact_fields_only() {
    let app = TestApp::new().await;

    app.request(
        Method::POST,
        "/vendors",
        Some(vendor_payload("VN-020", "Initech")),
    )
    .await;

    let response = app
        .request(
            Method::PUT,
            "/vendors/VN-020",
            Some(json!({"name": "Initech Global", "address": "2 Office Park"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let data = &body["data"];
    assert_eq!(data["name"], "Initech Global");
    assert_eq!(data["address"], "2 Office Park");
    // untouched field survives a partial update
    assert_eq!(data["contact_details"], "purchasing@acme.test");
    // derived metrics stay derived
    assert_eq!(data["on_time_delivery_rate"], 0.0);
}

#[tokio::test]
async fn update_unknown_vendor_returns_404() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::PUT,
            "/vendors/GHOST",
            Some(json!({"name": "Phantom"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_vendor_then_fetch_returns_404() {
    let app = TestApp::new().await;

    app.request(
        Method::POST,
        "/vendors",
        Some(vendor_payload("VN-030", "Hooli")),
    )
    .await;

    let response = app.request(Method::DELETE, "/vendors/VN-030", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.request(Method::GET, "/vendors/VN-030", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_vendors_is_paginated() {
    let app = TestApp::new().await;

    for i in 0..3 {
        app.request(
            Method::POST,
            "/vendors",
            Some(vendor_payload(&format!("VN-10{}", i), "Vendor")),
        )
        .await;
    }

    let response = app
        .request(Method::GET, "/vendors?page=1&per_page=2", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let page = &body["data"];
    assert_eq!(page["data"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(page["pagination"]["total"], 3);
    assert_eq!(page["pagination"]["total_pages"], 2);
}

#[tokio::test]
async fn performance_history_for_unknown_vendor_returns_404() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/vendors/GHOST/performance", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn new_vendor_has_empty_performance_history() {
    let app = TestApp::new().await;

    app.request(
        Method::POST,
        "/vendors",
        Some(vendor_payload("VN-040", "Umbrella")),
    )
    .await;

    let response = app
        .request(Method::GET, "/vendors/VN-040/performance", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(0));
}
