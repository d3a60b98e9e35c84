use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder, Set};
use tracing::{info, instrument, warn};

use crate::{
    db::DbPool,
    entities::vendor,
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Fields accepted when registering a vendor. The four metric columns are
/// derived and always start at zero.
#[derive(Debug, Clone)]
pub struct CreateVendorInput {
    pub vendor_code: String,
    pub name: String,
    pub contact_details: String,
    pub address: String,
}

/// Identity/contact updates; absent fields are left unchanged. The vendor
/// code and the metric columns are not updatable.
#[derive(Debug, Clone, Default)]
pub struct UpdateVendorInput {
    pub name: Option<String>,
    pub contact_details: Option<String>,
    pub address: Option<String>,
}

/// Service for managing vendors
#[derive(Clone)]
pub struct VendorService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl VendorService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn create_vendor(
        &self,
        input: CreateVendorInput,
    ) -> Result<vendor::Model, ServiceError> {
        let existing = vendor::Entity::find_by_id(input.vendor_code.clone())
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::ValidationError(format!(
                "Vendor {} already exists",
                input.vendor_code
            )));
        }

        let created = vendor::ActiveModel {
            vendor_code: Set(input.vendor_code),
            name: Set(input.name),
            contact_details: Set(input.contact_details),
            address: Set(input.address),
            on_time_delivery_rate: Set(0.0),
            quality_rating_avg: Set(0.0),
            average_response_time: Set(0.0),
            fulfillment_rate: Set(0.0),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db)
        .await?;

        self.publish(Event::VendorCreated {
            vendor_code: created.vendor_code.clone(),
        })
        .await;
        info!(vendor_code = %created.vendor_code, "vendor created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_vendor(&self, vendor_code: &str) -> Result<Option<vendor::Model>, ServiceError> {
        let vendor = vendor::Entity::find_by_id(vendor_code.to_owned())
            .one(&*self.db)
            .await?;
        Ok(vendor)
    }

    /// Lists vendors ordered by code. Returns the page plus the total count.
    #[instrument(skip(self))]
    pub async fn list_vendors(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<vendor::Model>, u64), ServiceError> {
        let paginator = vendor::Entity::find()
            .order_by_asc(vendor::Column::VendorCode)
            .paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let vendors = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((vendors, total))
    }

    #[instrument(skip(self))]
    pub async fn update_vendor(
        &self,
        vendor_code: &str,
        input: UpdateVendorInput,
    ) -> Result<vendor::Model, ServiceError> {
        let vendor = vendor::Entity::find_by_id(vendor_code.to_owned())
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor {} not found", vendor_code)))?;

        let mut vendor_model: vendor::ActiveModel = vendor.into();
        if let Some(name) = input.name {
            vendor_model.name = Set(name);
        }
        if let Some(contact_details) = input.contact_details {
            vendor_model.contact_details = Set(contact_details);
        }
        if let Some(address) = input.address {
            vendor_model.address = Set(address);
        }
        vendor_model.updated_at = Set(Some(Utc::now()));
        let updated = vendor_model.update(&*self.db).await?;

        self.publish(Event::VendorUpdated {
            vendor_code: updated.vendor_code.clone(),
        })
        .await;
        info!(vendor_code, "vendor updated");
        Ok(updated)
    }

    /// Deletes a vendor. Purchase orders and the performance snapshot cascade
    /// at the database level.
    #[instrument(skip(self))]
    pub async fn delete_vendor(&self, vendor_code: &str) -> Result<(), ServiceError> {
        let vendor = vendor::Entity::find_by_id(vendor_code.to_owned())
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor {} not found", vendor_code)))?;

        vendor.delete(&*self.db).await?;

        self.publish(Event::VendorDeleted {
            vendor_code: vendor_code.to_owned(),
        })
        .await;
        info!(vendor_code, "vendor deleted");
        Ok(())
    }

    async fn publish(&self, event: Event) {
        if let Err(e) = self.event_sender.send(event).await {
            warn!(error = %e, "failed to publish vendor event");
        }
    }
}
