use super::common::{
    created_response, default_page, default_per_page, map_service_error, no_content_response,
    success_response, validate_input, ApiJson, PaginatedResponse,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::purchase_orders::{CreatePurchaseOrderInput, UpdatePurchaseOrderInput},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

// Request and response DTOs

/// Fields accepted when placing an order. `status`, `quality_rating` and
/// `acknowledgment_date` are not accepted here: status always starts
/// `pending` and the other two start null.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseOrderRequest {
    #[validate(length(min = 1, max = 100))]
    pub po_number: String,
    #[validate(length(min = 1, max = 50))]
    pub vendor_code: String,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    /// Unstructured item list
    #[schema(value_type = Object)]
    pub items: serde_json::Value,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub issue_date: DateTime<Utc>,
}

/// Partial update. Setting `status` to `completed` (with a rating and an
/// acknowledgment in place) is what moves the vendor's metrics.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePurchaseOrderRequest {
    #[validate(length(min = 1, max = 50))]
    pub vendor_code: Option<String>,
    pub order_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    #[schema(value_type = Option<Object>)]
    pub items: Option<serde_json::Value>,
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    /// One of `pending`, `completed`, `canceled`
    pub status: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub quality_rating: Option<f64>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AcknowledgePurchaseOrderRequest {
    /// Defaults to the current time when omitted
    pub acknowledgment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PurchaseOrderListQuery {
    /// Restrict the listing to one vendor
    pub vendor_id: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

// Handler functions

/// Create a new purchase order
#[utoipa::path(
    post,
    path = "/purchase_orders",
    request_body = CreatePurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreatePurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let order = state
        .services
        .purchase_orders
        .create_purchase_order(CreatePurchaseOrderInput {
            po_number: payload.po_number,
            vendor_code: payload.vendor_code,
            order_date: payload.order_date,
            delivery_date: payload.delivery_date,
            items: payload.items,
            quantity: payload.quantity,
            issue_date: payload.issue_date,
        })
        .await
        .map_err(map_service_error)?;

    info!("Purchase order created: {}", order.po_number);

    Ok(created_response(order))
}

/// List purchase orders, optionally filtered by vendor
#[utoipa::path(
    get,
    path = "/purchase_orders",
    params(PurchaseOrderListQuery),
    responses(
        (status = 200, description = "Purchase orders listed", body = crate::ApiResponse<serde_json::Value>)
    ),
    tag = "purchase-orders"
)]
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(query): Query<PurchaseOrderListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (orders, total) = state
        .services
        .purchase_orders
        .list_purchase_orders(query.vendor_id.as_deref(), query.page, query.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        orders,
        query.page,
        query.per_page,
        total,
    )))
}

/// Get a purchase order by number
#[utoipa::path(
    get,
    path = "/purchase_orders/{po_number}",
    params(("po_number" = String, Path, description = "Purchase order number")),
    responses(
        (status = 200, description = "Purchase order found", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    Path(po_number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .purchase_orders
        .get_purchase_order(&po_number)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Purchase order {} not found", po_number)))?;

    Ok(success_response(order))
}

/// Update a purchase order. The owning vendor's metrics are recomputed
/// within the same request.
#[utoipa::path(
    put,
    path = "/purchase_orders/{po_number}",
    params(("po_number" = String, Path, description = "Purchase order number")),
    request_body = UpdatePurchaseOrderRequest,
    responses(
        (status = 200, description = "Purchase order updated", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn update_purchase_order(
    State(state): State<AppState>,
    Path(po_number): Path<String>,
    ApiJson(payload): ApiJson<UpdatePurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let order = state
        .services
        .purchase_orders
        .update_purchase_order(
            &po_number,
            UpdatePurchaseOrderInput {
                vendor_code: payload.vendor_code,
                order_date: payload.order_date,
                delivery_date: payload.delivery_date,
                items: payload.items,
                quantity: payload.quantity,
                status: payload.status,
                quality_rating: payload.quality_rating,
                acknowledgment_date: payload.acknowledgment_date,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!("Purchase order updated: {}", po_number);

    Ok(success_response(order))
}

/// Delete a purchase order
#[utoipa::path(
    delete,
    path = "/purchase_orders/{po_number}",
    params(("po_number" = String, Path, description = "Purchase order number")),
    responses(
        (status = 204, description = "Purchase order deleted"),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn delete_purchase_order(
    State(state): State<AppState>,
    Path(po_number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .purchase_orders
        .delete_purchase_order(&po_number)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order deleted: {}", po_number);

    Ok(no_content_response())
}

/// Record the vendor's acknowledgment of a purchase order
#[utoipa::path(
    put,
    path = "/purchase_orders/{po_number}/acknowledge",
    params(("po_number" = String, Path, description = "Purchase order number")),
    request_body = AcknowledgePurchaseOrderRequest,
    responses(
        (status = 200, description = "Purchase order acknowledged", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn acknowledge_purchase_order(
    State(state): State<AppState>,
    Path(po_number): Path<String>,
    ApiJson(payload): ApiJson<AcknowledgePurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .purchase_orders
        .acknowledge_purchase_order(&po_number, payload.acknowledgment_date)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order acknowledged: {}", po_number);

    Ok(success_response(order))
}

/// Creates the router for purchase order endpoints
pub fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_purchase_order))
        .route("/", get(list_purchase_orders))
        .route("/:po_number", get(get_purchase_order))
        .route("/:po_number", put(update_purchase_order))
        .route("/:po_number", delete(delete_purchase_order))
        .route("/:po_number/acknowledge", put(acknowledge_purchase_order))
}
