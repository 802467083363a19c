//! Identity provider seam.
//!
//! Account creation and bearer-token verification belong to an external
//! identity service. [`LocalIdentityProvider`] keeps Argon2 password hashes
//! and opaque tokens in the key-value store so the server can run on its own.
//! Its tokens do not expire.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{MarketError, Result};
use crate::keys;
use crate::models::Identity;
use crate::password;
use crate::store::Records;
use crate::validation::ValidationError;

/// Issues and verifies identities.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account. Fails with a validation error if the email is taken.
    async fn create_user(&self, email: &str, password: &str) -> Result<Identity>;

    /// Issue a bearer token for an identity.
    async fn issue_token(&self, identity: &Identity) -> Result<String>;

    /// Resolve a bearer token to its identity.
    async fn verify_token(&self, token: &str) -> Result<Identity>;

    /// Check an email and password pair. Fails with `Unauthorized` on mismatch.
    async fn verify_password(&self, email: &str, password: &str) -> Result<Identity>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Credential {
    user_id: String,
    email: String,
    password_hash: String,
}

/// Identity provider backed by the marketplace key-value store.
#[derive(Clone)]
pub struct LocalIdentityProvider {
    records: Records,
}

impl LocalIdentityProvider {
    pub fn new(records: Records) -> Self {
        Self { records }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn create_user(&self, email: &str, password: &str) -> Result<Identity> {
        let email = email.trim().to_lowercase();
        let key = keys::credential(&email);
        let _guard = self.records.lock(&key).await;

        if self.records.get::<Credential>(&key).await?.is_some() {
            return Err(ValidationError::AlreadyRegistered(email).into());
        }

        let credential = Credential {
            user_id: Uuid::new_v4().to_string(),
            email: email.clone(),
            password_hash: password::hash_password(password)?,
        };
        self.records.put(&key, &credential).await?;

        info!(user_id = %credential.user_id, "Created identity");
        Ok(Identity {
            id: credential.user_id,
            email,
        })
    }

    async fn issue_token(&self, identity: &Identity) -> Result<String> {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        self.records.put(&keys::token(&token), identity).await?;
        Ok(token)
    }

    async fn verify_token(&self, token: &str) -> Result<Identity> {
        if token.trim().is_empty() {
            return Err(MarketError::Unauthorized(
                "Authorization token required".to_string(),
            ));
        }

        self.records
            .get::<Identity>(&keys::token(token))
            .await?
            .ok_or_else(|| MarketError::Unauthorized("Unknown token".to_string()))
    }

    async fn verify_password(&self, email: &str, password: &str) -> Result<Identity> {
        let email = email.trim().to_lowercase();
        let rejected = || MarketError::Unauthorized("Invalid email or password".to_string());

        let Some(credential) = self.records.get::<Credential>(&keys::credential(&email)).await? else {
            return Err(rejected());
        };

        if !password::verify_password(password, &credential.password_hash)? {
            warn!(user_id = %credential.user_id, "Password mismatch");
            return Err(rejected());
        }

        Ok(Identity {
            id: credential.user_id,
            email: credential.email,
        })
    }
}
