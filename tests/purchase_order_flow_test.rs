mod common;

use axum::http::{Method, StatusCode};
use sea_orm::EntityTrait;
use serde_json::json;
use vendorhub_api::entities::performance_snapshot;

use common::{response_json, TestApp};

async fn seed_vendor(app: &TestApp, code: &str) {
    let response = app
        .request(
            Method::POST,
            "/vendors",
            Some(json!({
                "vendor_code": code,
                "name": "Acme Supplies",
                "contact_details": "purchasing@acme.test",
                "address": "1 Industrial Way, Springfield"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

fn po_payload(po_number: &str, vendor_code: &str, delivery: &str, issue: &str) -> serde_json::Value {
    json!({
        "po_number": po_number,
        "vendor_code": vendor_code,
        "order_date": issue,
        "delivery_date": delivery,
        "items": [{"sku": "WIDGET-1", "qty": 10}],
        "quantity": 10,
        "issue_date": issue
    })
}

#[tokio::test]
async fn create_purchase_order_starts_pending() {
    let app = TestApp::new().await;
    seed_vendor(&app, "VN-100").await;

    // status / rating / acknowledgment in the payload must be ignored
    let mut payload = po_payload(
        "PO-1",
        "VN-100",
        "2025-02-01T00:00:00Z",
        "2025-01-01T00:00:00Z",
    );
    payload["status"] = json!("completed");
    payload["quality_rating"] = json!(5.0);
    payload["acknowledgment_date"] = json!("2025-01-02T00:00:00Z");

    let response = app
        .request(Method::POST, "/purchase_orders", Some(payload))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = response_json(response).await;
    let data = &body["data"];
    assert_eq!(data["po_number"], "PO-1");
    assert_eq!(data["status"], "pending");
    assert!(data["quality_rating"].is_null());
    assert!(data["acknowledgment_date"].is_null());
}

#[tokio::test]
async fn create_purchase_order_for_unknown_vendor_returns_404() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/purchase_orders",
            Some(po_payload(
                "PO-1",
                "GHOST",
                "2025-02-01T00:00:00Z",
                "2025-01-01T00:00:00Z",
            )),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_po_number_is_rejected() {
    let app = TestApp::new().await;
    seed_vendor(&app, "VN-100").await;

    let payload = po_payload(
        "PO-1",
        "VN-100",
        "2025-02-01T00:00:00Z",
        "2025-01-01T00:00:00Z",
    );
    let response = app
        .request(Method::POST, "/purchase_orders", Some(payload.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(Method::POST, "/purchase_orders", Some(payload))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn completing_orders_updates_vendor_metrics_and_snapshot() {
    let app = TestApp::new().await;
    seed_vendor(&app, "VN-100").await;

    for po in ["PO-A", "PO-B"] {
        let response = app
            .request(
                Method::POST,
                "/purchase_orders",
                Some(po_payload(
                    po,
                    "VN-100",
                    "2025-02-01T00:00:00Z",
                    "2025-01-01T00:00:00Z",
                )),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // PO-A: acknowledged on the delivery date, rated 5.
    let response = app
        .request(
            Method::PUT,
            "/purchase_orders/PO-A",
            Some(json!({
                "status": "completed",
                "quality_rating": 5.0,
                "acknowledgment_date": "2025-02-01T00:00:00Z"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // After one completed, on-time, rated and acked order every ratio is 100
    // except the rating average, which is the rating itself.
    let response = app.request(Method::GET, "/vendors/VN-100", None).await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["on_time_delivery_rate"], 100.0);
    assert_eq!(body["data"]["quality_rating_avg"], 5.0);
    assert_eq!(body["data"]["fulfillment_rate"], 100.0);

    // PO-B: acknowledged two days past the delivery date, never rated.
    let response = app
        .request(
            Method::PUT,
            "/purchase_orders/PO-B",
            Some(json!({
                "status": "completed",
                "acknowledgment_date": "2025-02-03T00:00:00Z"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request(Method::GET, "/vendors/VN-100", None).await;
    let body = response_json(response).await;
    let data = &body["data"];
    assert_eq!(data["on_time_delivery_rate"], 50.0);
    assert_eq!(data["quality_rating_avg"], 5.0);
    assert_eq!(data["fulfillment_rate"], 50.0);
    // mean of 31 and 33 days issue-to-acknowledgment, in minutes
    assert_eq!(data["average_response_time"], 46080.0);

    // The snapshot row is upserted, never appended: still exactly one row
    // after two recalculations, carrying the latest figures.
    let snapshots = performance_snapshot::Entity::find()
        .all(&*app.state.db)
        .await
        .expect("query snapshots");
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].vendor_code, "VN-100");
    assert_eq!(snapshots[0].on_time_delivery_rate, 50.0);

    let response = app
        .request(Method::GET, "/vendors/VN-100/performance", None)
        .await;
    let body = response_json(response).await;
    let history = body["data"].as_array().expect("history array");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["on_time_delivery_rate"], 50.0);
    assert_eq!(history[0]["quality_rating_avg"], 5.0);
    assert_eq!(history[0]["fulfillment_rate"], 50.0);
    assert!(history[0]["date"].is_string());
}

#[tokio::test]
async fn acknowledge_endpoint_sets_timestamp_and_drives_response_time() {
    let app = TestApp::new().await;
    seed_vendor(&app, "VN-200").await;

    app.request(
        Method::POST,
        "/purchase_orders",
        Some(po_payload(
            "PO-X",
            "VN-200",
            "2025-02-01T00:00:00Z",
            "2025-01-01T00:00:00Z",
        )),
    )
    .await;

    // Acknowledged one hour after issue.
    let response = app
        .request(
            Method::PUT,
            "/purchase_orders/PO-X/acknowledge",
            Some(json!({"acknowledgment_date": "2025-01-01T01:00:00Z"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["data"]["acknowledgment_date"], "2025-01-01T01:00:00Z");

    let response = app
        .request(
            Method::PUT,
            "/purchase_orders/PO-X",
            Some(json!({"status": "completed"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request(Method::GET, "/vendors/VN-200", None).await;
    let body = response_json(response).await;
    let data = &body["data"];
    assert_eq!(data["average_response_time"], 60.0);
    // acknowledged well before delivery
    assert_eq!(data["on_time_delivery_rate"], 100.0);
    // no rating, so the order does not count as fulfilled
    assert_eq!(data["fulfillment_rate"], 0.0);
}

#[tokio::test]
async fn acknowledge_without_timestamp_defaults_to_now() {
    let app = TestApp::new().await;
    seed_vendor(&app, "VN-210").await;

    app.request(
        Method::POST,
        "/purchase_orders",
        Some(po_payload(
            "PO-Y",
            "VN-210",
            "2025-02-01T00:00:00Z",
            "2025-01-01T00:00:00Z",
        )),
    )
    .await;

    let response = app
        .request(
            Method::PUT,
            "/purchase_orders/PO-Y/acknowledge",
            Some(json!({})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert!(body["data"]["acknowledgment_date"].is_string());
}

#[tokio::test]
async fn list_purchase_orders_filters_by_vendor() {
    let app = TestApp::new().await;
    seed_vendor(&app, "VN-301").await;
    seed_vendor(&app, "VN-302").await;

    for (po, vendor) in [("PO-1", "VN-301"), ("PO-2", "VN-301"), ("PO-3", "VN-302")] {
        app.request(
            Method::POST,
            "/purchase_orders",
            Some(po_payload(
                po,
                vendor,
                "2025-02-01T00:00:00Z",
                "2025-01-01T00:00:00Z",
            )),
        )
        .await;
    }

    let response = app
        .request(Method::GET, "/purchase_orders?vendor_id=VN-301", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let page = &body["data"];
    assert_eq!(page["pagination"]["total"], 2);
    for order in page["data"].as_array().expect("orders array") {
        assert_eq!(order["vendor_code"], "VN-301");
    }

    let response = app.request(Method::GET, "/purchase_orders", None).await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["pagination"]["total"], 3);
}

#[tokio::test]
async fn unknown_status_value_is_rejected() {
    let app = TestApp::new().await;
    seed_vendor(&app, "VN-400").await;

    app.request(
        Method::POST,
        "/purchase_orders",
        Some(po_payload(
            "PO-1",
            "VN-400",
            "2025-02-01T00:00:00Z",
            "2025-01-01T00:00:00Z",
        )),
    )
    .await;

    let response = app
        .request(
            Method::PUT,
            "/purchase_orders/PO-1",
            Some(json!({"status": "shipped"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("shipped"));
}

#[tokio::test]
async fn update_unknown_purchase_order_returns_404() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::PUT,
            "/purchase_orders/GHOST",
            Some(json!({"quantity": 5})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_order_does_not_recalculate_metrics() {
    let app = TestApp::new().await;
    seed_vendor(&app, "VN-500").await;

    app.request(
        Method::POST,
        "/purchase_orders",
        Some(po_payload(
            "PO-1",
            "VN-500",
            "2025-02-01T00:00:00Z",
            "2025-01-01T00:00:00Z",
        )),
    )
    .await;

    app.request(
        Method::PUT,
        "/purchase_orders/PO-1",
        Some(json!({
            "status": "completed",
            "quality_rating": 4.0,
            "acknowledgment_date": "2025-01-05T00:00:00Z"
        })),
    )
    .await;

    let response = app.request(Method::DELETE, "/purchase_orders/PO-1", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Metrics stay where the last order write left them until the vendor's
    // next order write.
    let response = app.request(Method::GET, "/vendors/VN-500", None).await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["on_time_delivery_rate"], 100.0);
    assert_eq!(body["data"]["quality_rating_avg"], 4.0);

    let response = app.request(Method::GET, "/purchase_orders/PO-1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
