use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::{info, instrument, warn};

use crate::{
    db::DbPool,
    entities::{
        purchase_order::{self, PurchaseOrderStatus},
        vendor,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::performance::PerformanceService,
};

/// Fields accepted when placing an order. Status always starts `pending`;
/// rating and acknowledgment start null and are filled in later through
/// updates and the acknowledge operation.
#[derive(Debug, Clone)]
pub struct CreatePurchaseOrderInput {
    pub po_number: String,
    pub vendor_code: String,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub items: serde_json::Value,
    pub quantity: i32,
    pub issue_date: DateTime<Utc>,
}

/// Partial update; absent fields are left unchanged. `po_number` is not
/// updatable. Status, rating and acknowledgment ARE updatable here: marking
/// an order completed through this path is what drives vendor metrics.
#[derive(Debug, Clone, Default)]
pub struct UpdatePurchaseOrderInput {
    pub vendor_code: Option<String>,
    pub order_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub items: Option<serde_json::Value>,
    pub quantity: Option<i32>,
    pub status: Option<String>,
    pub quality_rating: Option<f64>,
    pub acknowledgment_date: Option<DateTime<Utc>>,
}

/// Service for managing purchase orders. Every successful create, update or
/// acknowledge triggers a synchronous metrics recalculation for the owning
/// vendor.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    performance: Arc<PerformanceService>,
}

impl PurchaseOrderService {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        performance: Arc<PerformanceService>,
    ) -> Self {
        Self {
            db,
            event_sender,
            performance,
        }
    }

    #[instrument(skip(self))]
    pub async fn create_purchase_order(
        &self,
        input: CreatePurchaseOrderInput,
    ) -> Result<purchase_order::Model, ServiceError> {
        let vendor_exists = vendor::Entity::find_by_id(input.vendor_code.clone())
            .one(&*self.db)
            .await?;
        if vendor_exists.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Vendor {} not found",
                input.vendor_code
            )));
        }

        let existing = purchase_order::Entity::find_by_id(input.po_number.clone())
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::ValidationError(format!(
                "Purchase order {} already exists",
                input.po_number
            )));
        }

        let created = purchase_order::ActiveModel {
            po_number: Set(input.po_number),
            vendor_code: Set(input.vendor_code),
            order_date: Set(input.order_date),
            delivery_date: Set(input.delivery_date),
            items: Set(input.items),
            quantity: Set(input.quantity),
            status: Set(PurchaseOrderStatus::Pending.to_string()),
            quality_rating: Set(None),
            issue_date: Set(input.issue_date),
            acknowledgment_date: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await?;

        self.recalculate_or_warn(&created.vendor_code, &created.po_number)
            .await;
        self.publish(Event::PurchaseOrderCreated {
            po_number: created.po_number.clone(),
            vendor_code: created.vendor_code.clone(),
        })
        .await;
        info!(po_number = %created.po_number, "purchase order created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_purchase_order(
        &self,
        po_number: &str,
    ) -> Result<Option<purchase_order::Model>, ServiceError> {
        let order = purchase_order::Entity::find_by_id(po_number.to_owned())
            .one(&*self.db)
            .await?;
        Ok(order)
    }

    /// Lists purchase orders, optionally restricted to one vendor.
    #[instrument(skip(self))]
    pub async fn list_purchase_orders(
        &self,
        vendor_code: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<purchase_order::Model>, u64), ServiceError> {
        let mut query = purchase_order::Entity::find().order_by_asc(purchase_order::Column::PoNumber);
        if let Some(vendor_code) = vendor_code {
            query = query.filter(purchase_order::Column::VendorCode.eq(vendor_code));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((orders, total))
    }

    #[instrument(skip(self))]
    pub async fn update_purchase_order(
        &self,
        po_number: &str,
        input: UpdatePurchaseOrderInput,
    ) -> Result<purchase_order::Model, ServiceError> {
        let order = purchase_order::Entity::find_by_id(po_number.to_owned())
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {} not found", po_number))
            })?;

        if let Some(status) = input.status.as_deref() {
            PurchaseOrderStatus::from_str(status).map_err(|_| {
                ServiceError::InvalidStatus(format!(
                    "{} (expected pending, completed or canceled)",
                    status
                ))
            })?;
        }

        if let Some(vendor_code) = input.vendor_code.as_deref() {
            let vendor_exists = vendor::Entity::find_by_id(vendor_code.to_owned())
                .one(&*self.db)
                .await?;
            if vendor_exists.is_none() {
                return Err(ServiceError::NotFound(format!(
                    "Vendor {} not found",
                    vendor_code
                )));
            }
        }

        let mut order_model: purchase_order::ActiveModel = order.into();
        if let Some(vendor_code) = input.vendor_code {
            order_model.vendor_code = Set(vendor_code);
        }
        if let Some(order_date) = input.order_date {
            order_model.order_date = Set(order_date);
        }
        if let Some(delivery_date) = input.delivery_date {
            order_model.delivery_date = Set(delivery_date);
        }
        if let Some(items) = input.items {
            order_model.items = Set(items);
        }
        if let Some(quantity) = input.quantity {
            order_model.quantity = Set(quantity);
        }
        if let Some(status) = input.status {
            order_model.status = Set(status);
        }
        if let Some(quality_rating) = input.quality_rating {
            order_model.quality_rating = Set(Some(quality_rating));
        }
        if let Some(acknowledgment_date) = input.acknowledgment_date {
            order_model.acknowledgment_date = Set(Some(acknowledgment_date));
        }
        order_model.updated_at = Set(Some(Utc::now()));
        let updated = order_model.update(&*self.db).await?;

        self.recalculate_or_warn(&updated.vendor_code, &updated.po_number)
            .await;
        self.publish(Event::PurchaseOrderUpdated {
            po_number: updated.po_number.clone(),
            vendor_code: updated.vendor_code.clone(),
        })
        .await;
        info!(po_number, "purchase order updated");
        Ok(updated)
    }

    /// Records the vendor's acknowledgment of an order. Defaults the
    /// timestamp to now when the caller does not supply one.
    #[instrument(skip(self))]
    pub async fn acknowledge_purchase_order(
        &self,
        po_number: &str,
        acknowledgment_date: Option<DateTime<Utc>>,
    ) -> Result<purchase_order::Model, ServiceError> {
        let order = purchase_order::Entity::find_by_id(po_number.to_owned())
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {} not found", po_number))
            })?;

        let mut order_model: purchase_order::ActiveModel = order.into();
        order_model.acknowledgment_date =
            Set(Some(acknowledgment_date.unwrap_or_else(Utc::now)));
        order_model.updated_at = Set(Some(Utc::now()));
        let updated = order_model.update(&*self.db).await?;

        self.recalculate_or_warn(&updated.vendor_code, &updated.po_number)
            .await;
        self.publish(Event::PurchaseOrderAcknowledged {
            po_number: updated.po_number.clone(),
            vendor_code: updated.vendor_code.clone(),
        })
        .await;
        info!(po_number, "purchase order acknowledged");
        Ok(updated)
    }

    /// Deletes an order. Deletion does not trigger a recalculation; metrics
    /// catch up on the vendor's next order write.
    #[instrument(skip(self))]
    pub async fn delete_purchase_order(&self, po_number: &str) -> Result<(), ServiceError> {
        let order = purchase_order::Entity::find_by_id(po_number.to_owned())
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {} not found", po_number))
            })?;

        order.delete(&*self.db).await?;

        self.publish(Event::PurchaseOrderDeleted {
            po_number: po_number.to_owned(),
        })
        .await;
        info!(po_number, "purchase order deleted");
        Ok(())
    }

    /// The order write has already committed by the time this runs, so a
    /// recalculation failure must not fail the request; metrics stay stale
    /// until the vendor's next order write.
    async fn recalculate_or_warn(&self, vendor_code: &str, po_number: &str) {
        if let Err(e) = self.performance.recalculate(vendor_code).await {
            warn!(
                po_number,
                vendor_code,
                error = %e,
                "metrics recalculation failed; metrics remain stale"
            );
        }
    }

    async fn publish(&self, event: Event) {
        if let Err(e) = self.event_sender.send(event).await {
            warn!(error = %e, "failed to publish purchase order event");
        }
    }
}
