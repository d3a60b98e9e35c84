use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document for the vendor management surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "VendorHub API",
        description = "Vendor registry, purchase order lifecycle and derived vendor performance metrics"
    ),
    paths(
        crate::handlers::vendors::create_vendor,
        crate::handlers::vendors::list_vendors,
        crate::handlers::vendors::get_vendor,
        crate::handlers::vendors::update_vendor,
        crate::handlers::vendors::delete_vendor,
        crate::handlers::vendors::vendor_performance,
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::list_purchase_orders,
        crate::handlers::purchase_orders::get_purchase_order,
        crate::handlers::purchase_orders::update_purchase_order,
        crate::handlers::purchase_orders::delete_purchase_order,
        crate::handlers::purchase_orders::acknowledge_purchase_order,
        crate::handlers::health::health_check,
    ),
    components(schemas(
        crate::handlers::vendors::CreateVendorRequest,
        crate::handlers::vendors::UpdateVendorRequest,
        crate::handlers::vendors::VendorPerformanceResponse,
        crate::handlers::purchase_orders::CreatePurchaseOrderRequest,
        crate::handlers::purchase_orders::UpdatePurchaseOrderRequest,
        crate::handlers::purchase_orders::AcknowledgePurchaseOrderRequest,
        crate::handlers::health::HealthResponse,
        crate::handlers::health::ComponentHealth,
        crate::handlers::health::ComponentStatus,
        crate::errors::ErrorResponse,
    )),
    tags(
        (name = "vendors", description = "Vendor registry and performance history"),
        (name = "purchase-orders", description = "Purchase order lifecycle"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Swagger UI served at `/docs`, backed by the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
