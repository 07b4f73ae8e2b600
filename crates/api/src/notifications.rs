//! Best-effort reminder dispatch.
//!
//! A successful booking may notify the requester, but notification failure
//! must never fail or roll back the booking itself. The sink runs on a
//! spawned task after the transaction has committed; errors are logged at
//! `warn` and swallowed.

use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use slotbook_db::models::DbAppointment;
use tracing::{info, warn};

#[async_trait]
pub trait ReminderSink: Send + Sync {
    async fn booking_confirmed(&self, appointment: &DbAppointment) -> Result<()>;
}

/// Default sink: records the reminder in the log. A deployment wanting
/// real email delivery swaps in its own implementation.
pub struct LogReminderSink;

#[async_trait]
impl ReminderSink for LogReminderSink {
    async fn booking_confirmed(&self, appointment: &DbAppointment) -> Result<()> {
        info!(
            "Reminder: appointment {} for {} starting at {}",
            appointment.id, appointment.requester_name, appointment.starts_at
        );
        Ok(())
    }
}

/// Fire-and-forget dispatch, detached from the request lifecycle.
pub fn dispatch_reminder(sink: Arc<dyn ReminderSink>, appointment: DbAppointment) {
    tokio::spawn(async move {
        if let Err(err) = sink.booking_confirmed(&appointment).await {
            warn!(
                "Reminder dispatch failed for appointment {}: {err:#}",
                appointment.id
            );
        }
    });
}
