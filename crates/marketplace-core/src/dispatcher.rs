//! Notification fan-out.
//!
//! A dispatch resolves its audience to a list of user IDs, then writes one
//! fresh notification record into each recipient's store. Writes run with
//! bounded parallelism and a per-recipient deadline; a failed or slow write
//! is logged and skipped without affecting the other recipients.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::DispatchConfig;
use crate::directory::RoleDirectory;
use crate::models::{NotificationRecord, NotificationType, Role};
use crate::notifications::NotificationStore;
use crate::push::PushTransport;
use crate::users::UserService;

/// Who should receive a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Explicit recipients. An empty list means every registered user.
    Users(Vec<String>),
    /// Members of `roles` whose profile location contains `location`
    /// (case-insensitive).
    Located { roles: Vec<Role>, location: String },
}

/// The content of one notification event.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NotificationType,
    pub message: Value,
    pub sender_id: Option<String>,
    pub data: Option<Value>,
}

impl Notice {
    pub fn new(kind: NotificationType, message: Value) -> Self {
        Self {
            kind,
            message,
            sender_id: None,
            data: None,
        }
    }

    pub fn from_sender(mut self, sender_id: impl Into<String>) -> Self {
        self.sender_id = Some(sender_id.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// A fresh per-recipient record.
    fn to_record(&self) -> NotificationRecord {
        NotificationRecord {
            id: Uuid::new_v4().to_string(),
            kind: self.kind,
            message: self.message.clone(),
            sender_id: self.sender_id.clone(),
            timestamp: Utc::now(),
            read: false,
            data: self.data.clone(),
        }
    }
}

/// Outcome of a dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    /// Recipients resolved from the audience.
    pub targeted: usize,
    /// Recipients whose store accepted the notification.
    pub sent: usize,
    /// Recipients skipped after a failed or timed-out write.
    pub failed: usize,
}

/// Resolves audiences and delivers notifications.
#[derive(Clone)]
pub struct Dispatcher {
    notifications: NotificationStore,
    directory: RoleDirectory,
    users: UserService,
    push: Arc<dyn PushTransport>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(
        notifications: NotificationStore,
        directory: RoleDirectory,
        users: UserService,
        push: Arc<dyn PushTransport>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            notifications,
            directory,
            users,
            push,
            config,
        }
    }

    /// Deliver `notice` to every recipient in `audience`.
    pub async fn dispatch(&self, notice: &Notice, audience: &Audience) -> DispatchReport {
        let targets = self.resolve(notice.sender_id.as_deref(), audience).await;
        let targeted = targets.len();

        info!(
            kind = notice.kind.as_str(),
            sender = ?notice.sender_id,
            recipient_count = targeted,
            "Dispatching notification"
        );

        let outcomes: Vec<bool> = stream::iter(targets)
            .map(|user_id| self.deliver(user_id, notice))
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;

        let sent = outcomes.iter().filter(|ok| **ok).count();
        let report = DispatchReport {
            targeted,
            sent,
            failed: targeted - sent,
        };

        info!(sent = report.sent, failed = report.failed, "Dispatch complete");
        report
    }

    /// Recipient IDs for an audience.
    ///
    /// Explicit and broadcast audiences never include the sender.
    pub async fn resolve(&self, sender_id: Option<&str>, audience: &Audience) -> Vec<String> {
        let candidates = match audience {
            Audience::Users(ids) if !ids.is_empty() => dedupe(ids.iter().cloned()),
            Audience::Users(_) => self.directory.everyone().await,
            Audience::Located { roles, location } => {
                return self.located(roles, location).await;
            }
        };

        candidates
            .into_iter()
            .filter(|id| Some(id.as_str()) != sender_id)
            .collect()
    }

    async fn located(&self, roles: &[Role], location: &str) -> Vec<String> {
        let needle = location.trim().to_lowercase();
        let members = self.directory.members_of(roles).await;

        let matches: Vec<Option<String>> = stream::iter(members)
            .map(|user_id| {
                let needle = needle.as_str();
                async move {
                    match self.users.find(&user_id).await {
                        Ok(Some(user)) if user.profile.location.to_lowercase().contains(needle) => {
                            Some(user_id)
                        }
                        Ok(_) => None,
                        Err(err) => {
                            warn!(user_id = %user_id, error = %err, "Profile lookup failed during targeting");
                            None
                        }
                    }
                }
            })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        matches.into_iter().flatten().collect()
    }

    async fn deliver(&self, user_id: String, notice: &Notice) -> bool {
        let record = notice.to_record();
        let write = self.notifications.append(&user_id, record.clone());

        match tokio::time::timeout(self.config.write_timeout, write).await {
            Ok(Ok(())) => {
                debug!(recipient = %user_id, "Notification stored");
            }
            Ok(Err(err)) => {
                warn!(recipient = %user_id, error = %err, "Notification write failed");
                return false;
            }
            Err(_) => {
                warn!(
                    recipient = %user_id,
                    timeout_ms = self.config.write_timeout.as_millis() as u64,
                    "Notification write timed out"
                );
                return false;
            }
        }

        self.push_to(&user_id, &record).await;
        true
    }

    async fn push_to(&self, user_id: &str, record: &NotificationRecord) {
        let subscription = match self.users.subscription(user_id).await {
            Ok(Some(subscription)) => subscription,
            Ok(None) => return,
            Err(err) => {
                warn!(recipient = %user_id, error = %err, "Subscription lookup failed");
                return;
            }
        };

        if !subscription.preferences.allows(record.kind) {
            return;
        }

        if let Err(err) = self.push.push(&subscription, record).await {
            warn!(
                recipient = %user_id,
                transport = self.push.name(),
                error = %err,
                "Push delivery failed"
            );
        }
    }
}

fn dedupe(ids: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(id.clone())).collect()
}
