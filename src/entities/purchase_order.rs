use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Lifecycle states of a purchase order.
///
/// Stored as lowercase text in the `status` column; parse with
/// [`PurchaseOrderStatus::from_str`] when accepting client input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    Pending,
    Completed,
    Canceled,
}

/// An order placed with a vendor.
///
/// `quality_rating` and `acknowledgment_date` start out null and are filled in
/// as the order moves through its lifecycle. `acknowledgment_date >= issue_date`
/// is a caller responsibility and is not enforced here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub po_number: String,
    pub vendor_code: String,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub items: Json,
    pub quantity: i32,
    pub status: String,
    pub quality_rating: Option<f64>,
    pub issue_date: DateTime<Utc>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn is_completed(&self) -> bool {
        self.status == PurchaseOrderStatus::Completed.as_ref()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorCode",
        to = "super::vendor::Column::VendorCode",
        on_delete = "Cascade"
    )]
    Vendor,
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
