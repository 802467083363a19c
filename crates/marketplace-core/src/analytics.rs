//! Per-user activity summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{ListingKind, Role};
use crate::Marketplace;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalytics {
    pub user_posts: usize,
    pub user_tools: usize,
    pub user_seeds: usize,
    pub notifications: usize,
    pub unread_notifications: usize,
    pub role: Role,
    pub join_date: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Marketplace {
    /// Counts of a user's own listings and notifications.
    ///
    /// Reading analytics does not refresh `lastActive`.
    pub async fn analytics(&self, user_id: &str) -> Result<UserAnalytics> {
        let user = self.users.require(user_id).await?;

        let posts = self.listings(ListingKind::Post).owned_by(user_id).await?;
        let tools = self.listings(ListingKind::Tool).owned_by(user_id).await?;
        let seeds = self.listings(ListingKind::Seed).owned_by(user_id).await?;
        let items = self.notifications.list(user_id).await?;

        Ok(UserAnalytics {
            user_posts: posts.len(),
            user_tools: tools.len(),
            user_seeds: seeds.len(),
            notifications: items.len(),
            unread_notifications: items.iter().filter(|n| !n.read).count(),
            role: user.role,
            join_date: user.created_at,
            last_active: user.last_active,
        })
    }
}
