//! Approval notifications.
//!
//! `ChannelNotifier` hands approved units to a background task over an
//! unbounded channel; the task looks up the building's subscribers and sends
//! one message each. Delivery failures are logged and dropped.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use realty_catalog::{ApprovalNotifier, SubscriptionRepository, Unit};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("mail delivery to {recipient} failed: {reason}")]
pub struct MailError {
    pub recipient: String,
    pub reason: String,
}

/// Outbound mail transport.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, recipient: &str, message: &str) -> Result<(), MailError>;
}

/// Writes each message to the log instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMailSender;

#[async_trait]
impl MailSender for LoggingMailSender {
    async fn send(&self, recipient: &str, message: &str) -> Result<(), MailError> {
        info!(recipient, message, "mail sent");
        Ok(())
    }
}

fn approval_message(unit: &Unit) -> String {
    format!(
        "Flat {} in house {} is now available: {} rooms, price {}",
        unit.number, unit.building_id, unit.rooms, unit.price
    )
}

/// Sending half. Dropping every clone stops the worker once the queue drains.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Unit>,
}

impl ApprovalNotifier for ChannelNotifier {
    fn unit_approved(&self, unit: &Unit) {
        if self.tx.send(unit.clone()).is_err() {
            warn!(flat_id = %unit.id, "notification worker stopped; approval not announced");
        }
    }
}

/// Handle to join the background worker.
#[derive(Debug)]
pub struct WorkerHandle {
    join: JoinHandle<()>,
}

impl WorkerHandle {
    /// Wait for the worker to drain. Drop all notifiers first.
    pub async fn join(self) {
        if let Err(err) = self.join.await {
            warn!(error = %err, "notification worker panicked");
        }
    }
}

/// Spawn the worker on the current runtime.
pub fn spawn_notification_worker(
    subscriptions: Arc<dyn SubscriptionRepository>,
    mailer: Arc<dyn MailSender>,
) -> (ChannelNotifier, WorkerHandle) {
    let (tx, rx) = mpsc::unbounded_channel();
    let join = tokio::spawn(worker_loop(rx, subscriptions, mailer));
    (ChannelNotifier { tx }, WorkerHandle { join })
}

async fn worker_loop(
    mut rx: mpsc::UnboundedReceiver<Unit>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    mailer: Arc<dyn MailSender>,
) {
    while let Some(unit) = rx.recv().await {
        let recipients = match subscriptions.list_for_building(unit.building_id).await {
            Ok(subs) => subs,
            Err(err) => {
                warn!(flat_id = %unit.id, error = %err, "could not load subscribers");
                continue;
            }
        };

        let message = approval_message(&unit);
        for sub in &recipients {
            if let Err(err) = mailer.send(&sub.email, &message).await {
                warn!(flat_id = %unit.id, error = %err, "approval notification failed");
            }
        }
        info!(flat_id = %unit.id, recipients = recipients.len(), "approval announced");
    }
}

/// Records deliveries; addresses starting with `bounce` fail.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingMailer {
    pub sent: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(test)]
#[async_trait]
impl MailSender for RecordingMailer {
    async fn send(&self, recipient: &str, message: &str) -> Result<(), MailError> {
        if recipient.starts_with("bounce") {
            return Err(MailError {
                recipient: recipient.to_string(),
                reason: "mailbox unavailable".into(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), message.to_string()));
        Ok(())
    }
}
