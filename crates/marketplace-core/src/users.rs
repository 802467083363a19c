//! User accounts, profiles and push subscriptions.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::directory::RoleDirectory;
use crate::error::{MarketError, Result};
use crate::identity::IdentityProvider;
use crate::keys;
use crate::models::{
    Identity, NotificationPreferences, NotificationSubscription, UserRecord,
};
use crate::store::Records;
use crate::validation::{self, merge_profile_updates, parse_signup_data};

/// Sign-up input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub user_data: Value,
}

/// Bearer session returned after sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub access_token: String,
}

/// Result of a successful sign-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupOutcome {
    pub user: Identity,
    pub profile: UserRecord,
    pub session: SessionToken,
}

/// Account and profile operations.
#[derive(Clone)]
pub struct UserService {
    records: Records,
    directory: RoleDirectory,
    identity: Arc<dyn IdentityProvider>,
}

impl UserService {
    pub fn new(
        records: Records,
        directory: RoleDirectory,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            records,
            directory,
            identity,
        }
    }

    /// Create an account, store its profile and register it in the role directory.
    pub async fn signup(&self, request: SignupRequest) -> Result<SignupOutcome> {
        validation::validate_email(&request.email)?;
        validation::validate_password(&request.password)?;
        let (role, profile) = parse_signup_data(&request.user_data)?;

        let identity = self
            .identity
            .create_user(&request.email, &request.password)
            .await?;

        let now = Utc::now();
        let record = UserRecord {
            id: identity.id.clone(),
            email: identity.email.clone(),
            role,
            profile,
            created_at: now,
            last_active: now,
            updated_at: None,
        };
        self.records.put(&keys::user(&record.id), &record).await?;
        self.directory.add(role, &record.id).await?;

        let access_token = self.identity.issue_token(&identity).await?;

        info!(user_id = %record.id, role = %role, "User created");
        Ok(SignupOutcome {
            user: identity,
            profile: record,
            session: SessionToken { access_token },
        })
    }

    /// Look up a user record without touching it.
    pub async fn find(&self, user_id: &str) -> Result<Option<UserRecord>> {
        self.records.get(&keys::user(user_id)).await
    }

    /// Look up a user record, failing with `NotFound` when absent.
    pub async fn require(&self, user_id: &str) -> Result<UserRecord> {
        self.find(user_id)
            .await?
            .ok_or_else(|| MarketError::not_found("Profile", user_id))
    }

    /// Fetch the caller's profile and refresh `lastActive`.
    pub async fn get_profile(&self, user_id: &str) -> Result<UserRecord> {
        self.records
            .update::<UserRecord, _>(&keys::user(user_id), "Profile", |record| {
                record.last_active = Utc::now();
                Ok(())
            })
            .await
    }

    /// Merge updates into the caller's profile.
    pub async fn update_profile(&self, user_id: &str, updates: &Value) -> Result<UserRecord> {
        let record = self
            .records
            .update::<UserRecord, _>(&keys::user(user_id), "Profile", |record| {
                record.profile = merge_profile_updates(&record.profile, updates)?;
                record.updated_at = Some(Utc::now());
                Ok(())
            })
            .await?;

        info!(user_id = %user_id, "Profile updated");
        Ok(record)
    }

    /// Store the caller's push subscription and preferences.
    pub async fn subscribe(
        &self,
        user_id: &str,
        subscription: Value,
        preferences: NotificationPreferences,
    ) -> Result<NotificationSubscription> {
        let record = NotificationSubscription {
            user_id: user_id.to_string(),
            subscription,
            preferences,
            created_at: Utc::now(),
        };
        self.records.put(&keys::subscription(user_id), &record).await?;

        info!(user_id = %user_id, "Push subscription stored");
        Ok(record)
    }

    /// The user's push subscription, if any.
    pub async fn subscription(&self, user_id: &str) -> Result<Option<NotificationSubscription>> {
        self.records.get(&keys::subscription(user_id)).await
    }
}
