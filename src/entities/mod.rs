pub mod performance_snapshot;
pub mod purchase_order;
pub mod vendor;
