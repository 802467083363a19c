//! Per-user bounded notification sequences.
//!
//! Each user's notifications live under one key as a newest-first list capped
//! at [`MAX_NOTIFICATIONS`]. All mutations are single read-modify-writes
//! under the user's key lock.

use crate::error::Result;
use crate::keys;
use crate::models::NotificationRecord;
use crate::store::Records;

/// Maximum notifications kept per user; older entries are evicted.
pub const MAX_NOTIFICATIONS: usize = 50;

/// Access to users' notification sequences.
#[derive(Clone)]
pub struct NotificationStore {
    records: Records,
}

impl NotificationStore {
    pub fn new(records: Records) -> Self {
        Self { records }
    }

    /// Prepend a notification, dropping the oldest entries beyond the cap.
    pub async fn append(&self, user_id: &str, record: NotificationRecord) -> Result<()> {
        self.records
            .update_list::<NotificationRecord, _, _>(&keys::notifications(user_id), |items| {
                items.insert(0, record);
                items.truncate(MAX_NOTIFICATIONS);
                (true, ())
            })
            .await
    }

    /// A user's notifications, newest first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<NotificationRecord>> {
        self.records.get_list(&keys::notifications(user_id)).await
    }

    /// Mark one notification read.
    ///
    /// Returns whether anything changed. Unknown or already-read IDs succeed
    /// without a write.
    pub async fn mark_read(&self, user_id: &str, notification_id: &str) -> Result<bool> {
        self.records
            .update_list::<NotificationRecord, _, _>(&keys::notifications(user_id), |items| {
                match items.iter_mut().find(|n| n.id == notification_id) {
                    Some(notification) if !notification.read => {
                        notification.read = true;
                        (true, true)
                    }
                    _ => (false, false),
                }
            })
            .await
    }

    /// Mark every unread notification read in one pass.
    ///
    /// Returns how many entries changed; writes at most once.
    pub async fn mark_all_read(&self, user_id: &str) -> Result<usize> {
        self.records
            .update_list::<NotificationRecord, _, _>(&keys::notifications(user_id), |items| {
                let mut changed = 0;
                for notification in items.iter_mut().filter(|n| !n.read) {
                    notification.read = true;
                    changed += 1;
                }
                (changed > 0, changed)
            })
            .await
    }

    /// Number of unread notifications.
    pub async fn unread_count(&self, user_id: &str) -> Result<usize> {
        Ok(self.list(user_id).await?.iter().filter(|n| !n.read).count())
    }
}
