use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    db::DbPool,
    entities::{performance_snapshot, purchase_order, vendor},
    errors::ServiceError,
    events::{Event, EventSender},
};

/// The four rolling figures derived from a vendor's purchase orders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub on_time_delivery_rate: f64,
    pub quality_rating_avg: f64,
    pub average_response_time: f64,
    pub fulfillment_rate: f64,
}

impl PerformanceMetrics {
    pub const ZERO: Self = Self {
        on_time_delivery_rate: 0.0,
        quality_rating_avg: 0.0,
        average_response_time: 0.0,
        fulfillment_rate: 0.0,
    };
}

/// Derives all four metrics from the full set of a vendor's purchase orders.
///
/// Pure and idempotent: no incremental state is carried between calls, so the
/// result is always re-derivable from the order set alone. Every ratio
/// defaults to 0 when its denominator would be zero.
///
/// An order is on time when the vendor acknowledged it no later than its
/// delivery date; an order with no acknowledgment counts as late.
pub fn compute_metrics(orders: &[purchase_order::Model]) -> PerformanceMetrics {
    let completed: Vec<&purchase_order::Model> =
        orders.iter().filter(|o| o.is_completed()).collect();
    if completed.is_empty() {
        return PerformanceMetrics::ZERO;
    }
    let total = completed.len() as f64;

    let on_time = completed
        .iter()
        .filter(|o| matches!(o.acknowledgment_date, Some(ack) if ack <= o.delivery_date))
        .count() as f64;
    let on_time_delivery_rate = on_time / total * 100.0;

    let ratings: Vec<f64> = completed.iter().filter_map(|o| o.quality_rating).collect();
    let quality_rating_avg = if ratings.is_empty() {
        0.0
    } else {
        ratings.iter().sum::<f64>() / ratings.len() as f64
    };

    // Acknowledgment delay in minutes, fractional.
    let response_minutes: Vec<f64> = completed
        .iter()
        .filter_map(|o| {
            o.acknowledgment_date
                .map(|ack| (ack - o.issue_date).num_seconds() as f64 / 60.0)
        })
        .collect();
    let average_response_time = if response_minutes.is_empty() {
        0.0
    } else {
        response_minutes.iter().sum::<f64>() / response_minutes.len() as f64
    };

    let fulfilled = completed
        .iter()
        .filter(|o| o.quality_rating.is_some() && o.acknowledgment_date.is_some())
        .count() as f64;
    let fulfillment_rate = fulfilled / total * 100.0;

    PerformanceMetrics {
        on_time_delivery_rate,
        quality_rating_avg,
        average_response_time,
        fulfillment_rate,
    }
}

/// Recomputes vendor metrics after purchase-order writes and maintains the
/// per-vendor performance snapshot.
#[derive(Clone)]
pub struct PerformanceService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl PerformanceService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Recomputes all four metrics for a vendor from its full purchase-order
    /// set, overwrites the vendor's stored metric columns, and upserts the
    /// vendor's single snapshot row.
    ///
    /// The vendor update and the snapshot upsert are separate statements, not
    /// one transaction: a failure between them leaves metrics stale until the
    /// next order write, which is accepted behavior.
    #[instrument(skip(self))]
    pub async fn recalculate(&self, vendor_code: &str) -> Result<PerformanceMetrics, ServiceError> {
        let vendor = vendor::Entity::find_by_id(vendor_code.to_owned())
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor {} not found", vendor_code)))?;

        let orders = purchase_order::Entity::find()
            .filter(purchase_order::Column::VendorCode.eq(vendor_code))
            .all(&*self.db)
            .await?;

        let metrics = compute_metrics(&orders);
        let now = Utc::now();

        let mut vendor_model: vendor::ActiveModel = vendor.into();
        vendor_model.on_time_delivery_rate = Set(metrics.on_time_delivery_rate);
        vendor_model.quality_rating_avg = Set(metrics.quality_rating_avg);
        vendor_model.average_response_time = Set(metrics.average_response_time);
        vendor_model.fulfillment_rate = Set(metrics.fulfillment_rate);
        vendor_model.updated_at = Set(Some(now));
        vendor_model.update(&*self.db).await?;

        // Get-or-create keyed on vendor alone: the snapshot row is overwritten
        // on every recalculation, never appended.
        let existing = performance_snapshot::Entity::find()
            .filter(performance_snapshot::Column::VendorCode.eq(vendor_code))
            .one(&*self.db)
            .await?;
        match existing {
            Some(snapshot) => {
                let mut snapshot_model: performance_snapshot::ActiveModel = snapshot.into();
                snapshot_model.recorded_at = Set(now);
                snapshot_model.on_time_delivery_rate = Set(metrics.on_time_delivery_rate);
                snapshot_model.quality_rating_avg = Set(metrics.quality_rating_avg);
                snapshot_model.average_response_time = Set(metrics.average_response_time);
                snapshot_model.fulfillment_rate = Set(metrics.fulfillment_rate);
                snapshot_model.update(&*self.db).await?;
            }
            None => {
                performance_snapshot::ActiveModel {
                    id: NotSet,
                    vendor_code: Set(vendor_code.to_owned()),
                    recorded_at: Set(now),
                    on_time_delivery_rate: Set(metrics.on_time_delivery_rate),
                    quality_rating_avg: Set(metrics.quality_rating_avg),
                    average_response_time: Set(metrics.average_response_time),
                    fulfillment_rate: Set(metrics.fulfillment_rate),
                }
                .insert(&*self.db)
                .await?;
            }
        }

        if let Err(e) = self
            .event_sender
            .send(Event::MetricsRecalculated {
                vendor_code: vendor_code.to_owned(),
                on_time_delivery_rate: metrics.on_time_delivery_rate,
                quality_rating_avg: metrics.quality_rating_avg,
                average_response_time: metrics.average_response_time,
                fulfillment_rate: metrics.fulfillment_rate,
            })
            .await
        {
            warn!(vendor_code, error = %e, "failed to publish metrics event");
        }

        info!(vendor_code, "vendor performance metrics recalculated");
        Ok(metrics)
    }

    /// Lists a vendor's performance snapshots, newest first. In the default
    /// flow this is zero or one row.
    #[instrument(skip(self))]
    pub async fn history(
        &self,
        vendor_code: &str,
    ) -> Result<Vec<performance_snapshot::Model>, ServiceError> {
        let exists = vendor::Entity::find_by_id(vendor_code.to_owned())
            .one(&*self.db)
            .await?;
        if exists.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Vendor {} not found",
                vendor_code
            )));
        }

        let snapshots = performance_snapshot::Entity::find()
            .filter(performance_snapshot::Column::VendorCode.eq(vendor_code))
            .order_by_desc(performance_snapshot::Column::RecordedAt)
            .all(&*self.db)
            .await?;
        Ok(snapshots)
    }
}
