//! Push transport seam.

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::models::{NotificationRecord, NotificationSubscription};

/// Delivers a stored notification to a device.
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Push one notification to one subscription.
    async fn push(
        &self,
        subscription: &NotificationSubscription,
        notification: &NotificationRecord,
    ) -> Result<()>;

    /// Transport name for logs.
    fn name(&self) -> &str;
}

/// Transport that only records deliveries in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

#[async_trait]
impl PushTransport for LogTransport {
    async fn push(
        &self,
        subscription: &NotificationSubscription,
        notification: &NotificationRecord,
    ) -> Result<()> {
        info!(
            user_id = %subscription.user_id,
            notification_id = %notification.id,
            kind = notification.kind.as_str(),
            "Push notification"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
