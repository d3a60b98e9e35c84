use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A vendor the company places purchase orders with.
///
/// The four metric columns are derived values: they are recomputed from the
/// vendor's purchase orders on every order write and are never accepted from
/// clients.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub vendor_code: String,
    pub name: String,
    pub contact_details: String,
    pub address: String,
    /// Percentage of completed orders acknowledged no later than their
    /// delivery date.
    pub on_time_delivery_rate: f64,
    /// Mean quality rating over rated completed orders.
    pub quality_rating_avg: f64,
    /// Mean acknowledgment delay over acked completed orders, in minutes.
    pub average_response_time: f64,
    /// Percentage of completed orders with both a rating and an acknowledgment.
    pub fulfillment_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::purchase_order::Entity")]
    PurchaseOrders,
    #[sea_orm(has_many = "super::performance_snapshot::Entity")]
    PerformanceSnapshots,
}

impl Related<super::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrders.def()
    }
}

impl Related<super::performance_snapshot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PerformanceSnapshots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
