use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    ApiJson, PaginatedResponse, PaginationParams,
};
use crate::{
    entities::performance_snapshot,
    errors::ApiError,
    handlers::AppState,
    services::vendors::{CreateVendorInput, UpdateVendorInput},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

// Request and response DTOs

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVendorRequest {
    #[validate(length(min = 1, max = 50))]
    pub vendor_code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1))]
    pub contact_details: String,
    #[validate(length(min = 1))]
    pub address: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVendorRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub contact_details: Option<String>,
    #[validate(length(min = 1))]
    pub address: Option<String>,
}

/// One historical performance record, as exposed over the wire.
#[derive(Debug, Serialize, ToSchema)]
pub struct VendorPerformanceResponse {
    pub date: DateTime<Utc>,
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    pub average_response_time: f64,
    pub fulfillment_rate: f64,
}

impl From<performance_snapshot::Model> for VendorPerformanceResponse {
    fn from(snapshot: performance_snapshot::Model) -> Self {
        Self {
            date: snapshot.recorded_at,
            on_time_delivery_rate: snapshot.on_time_delivery_rate,
            quality_rating_avg: snapshot.quality_rating_avg,
            average_response_time: snapshot.average_response_time,
            fulfillment_rate: snapshot.fulfillment_rate,
        }
    }
}

// Handler functions

/// Register a new vendor. Metric fields are derived and always start at zero;
/// any client-supplied values for them are ignored.
#[utoipa::path(
    post,
    path = "/vendors",
    request_body = CreateVendorRequest,
    responses(
        (status = 201, description = "Vendor created", body = crate::ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn create_vendor(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateVendorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let vendor = state
        .services
        .vendors
        .create_vendor(CreateVendorInput {
            vendor_code: payload.vendor_code,
            name: payload.name,
            contact_details: payload.contact_details,
            address: payload.address,
        })
        .await
        .map_err(map_service_error)?;

    info!("Vendor created: {}", vendor.vendor_code);

    Ok(created_response(vendor))
}

/// List all vendors with pagination
#[utoipa::path(
    get,
    path = "/vendors",
    params(PaginationParams),
    responses(
        (status = 200, description = "Vendors listed", body = crate::ApiResponse<serde_json::Value>)
    ),
    tag = "vendors"
)]
pub async fn list_vendors(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (vendors, total) = state
        .services
        .vendors
        .list_vendors(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        vendors,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Get a vendor by code
#[utoipa::path(
    get,
    path = "/vendors/{vendor_code}",
    params(("vendor_code" = String, Path, description = "Vendor code")),
    responses(
        (status = 200, description = "Vendor found", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(vendor_code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor = state
        .services
        .vendors
        .get_vendor(&vendor_code)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Vendor {} not found", vendor_code)))?;

    Ok(success_response(vendor))
}

/// Update a vendor's identity and contact fields. The vendor code and the
/// four metric fields are read-only.
#[utoipa::path(
    put,
    path = "/vendors/{vendor_code}",
    params(("vendor_code" = String, Path, description = "Vendor code")),
    request_body = UpdateVendorRequest,
    responses(
        (status = 200, description = "Vendor updated", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn update_vendor(
    State(state): State<AppState>,
    Path(vendor_code): Path<String>,
    ApiJson(payload): ApiJson<UpdateVendorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let vendor = state
        .services
        .vendors
        .update_vendor(
            &vendor_code,
            UpdateVendorInput {
                name: payload.name,
                contact_details: payload.contact_details,
                address: payload.address,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!("Vendor updated: {}", vendor_code);

    Ok(success_response(vendor))
}

/// Delete a vendor
#[utoipa::path(
    delete,
    path = "/vendors/{vendor_code}",
    params(("vendor_code" = String, Path, description = "Vendor code")),
    responses(
        (status = 204, description = "Vendor deleted"),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(vendor_code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .vendors
        .delete_vendor(&vendor_code)
        .await
        .map_err(map_service_error)?;

    info!("Vendor deleted: {}", vendor_code);

    Ok(no_content_response())
}

/// List a vendor's historical performance snapshots
#[utoipa::path(
    get,
    path = "/vendors/{vendor_code}/performance",
    params(("vendor_code" = String, Path, description = "Vendor code")),
    responses(
        (status = 200, description = "Performance history", body = crate::ApiResponse<serde_json::Value>),
        (status = 404, description = "Vendor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn vendor_performance(
    State(state): State<AppState>,
    Path(vendor_code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshots = state
        .services
        .performance
        .history(&vendor_code)
        .await
        .map_err(map_service_error)?;

    let history: Vec<VendorPerformanceResponse> = snapshots
        .into_iter()
        .map(VendorPerformanceResponse::from)
        .collect();

    Ok(success_response(history))
}

/// Creates the router for vendor endpoints
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vendor))
        .route("/", get(list_vendors))
        .route("/:vendor_code", get(get_vendor))
        .route("/:vendor_code", put(update_vendor))
        .route("/:vendor_code", delete(delete_vendor))
        .route("/:vendor_code/performance", get(vendor_performance))
}
