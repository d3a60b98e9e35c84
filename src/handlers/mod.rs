pub mod common;
pub mod health;
pub mod purchase_orders;
pub mod vendors;

use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{
    performance::PerformanceService, purchase_orders::PurchaseOrderService, vendors::VendorService,
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub vendors: Arc<VendorService>,
    pub purchase_orders: Arc<PurchaseOrderService>,
    pub performance: Arc<PerformanceService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        let performance = Arc::new(PerformanceService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let vendors = Arc::new(VendorService::new(db_pool.clone(), event_sender.clone()));
        let purchase_orders = Arc::new(PurchaseOrderService::new(
            db_pool,
            event_sender,
            performance.clone(),
        ));

        Self {
            vendors,
            purchase_orders,
            performance,
        }
    }
}
