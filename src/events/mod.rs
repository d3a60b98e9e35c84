use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

/// Domain events emitted by the service layer after successful writes.
///
/// Events are fire-and-forget telemetry: a failed send never fails the write
/// that produced it. Metric recalculation does not ride on this channel; it
/// runs synchronously in the request path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    VendorCreated {
        vendor_code: String,
    },
    VendorUpdated {
        vendor_code: String,
    },
    VendorDeleted {
        vendor_code: String,
    },
    PurchaseOrderCreated {
        po_number: String,
        vendor_code: String,
    },
    PurchaseOrderUpdated {
        po_number: String,
        vendor_code: String,
    },
    PurchaseOrderDeleted {
        po_number: String,
    },
    PurchaseOrderAcknowledged {
        po_number: String,
        vendor_code: String,
    },
    MetricsRecalculated {
        vendor_code: String,
        on_time_delivery_rate: f64,
        quality_rating_avg: f64,
        average_response_time: f64,
        fulfillment_rate: f64,
    },
}

/// Cloneable handle for publishing events onto the in-process channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Runs for the life of the
/// process; exits when every sender is dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        info!(event = ?event, "domain event");
    }
}
