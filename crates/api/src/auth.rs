//! Bearer token authentication.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use marketplace_core::{Identity, MarketError, UserRecord};

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// The authenticated caller.
///
/// Extracting this rejects the request with 401 unless it carries a valid
/// `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.0.id
    }

    /// The caller's stored user record.
    pub async fn record(&self, state: &AppState) -> Result<UserRecord> {
        Ok(state.market.users.require(self.id()).await?)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Authorization token required".to_string()))?;

        let identity = state
            .market
            .authenticate(token)
            .await
            .map_err(|err| match err {
                MarketError::Unauthorized(_) => {
                    ApiError::Unauthorized("Invalid token".to_string())
                }
                other => other.into(),
            })?;

        Ok(AuthUser(identity))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
