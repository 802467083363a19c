//! Profile routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use marketplace_core::UserRecord;
use serde_json::Value;

use crate::auth::AuthUser;
use crate::error::Result;
use crate::state::AppState;

/// The caller's profile. Refreshes `lastActive`.
pub async fn get_profile(State(state): State<AppState>, user: AuthUser) -> Result<Json<UserRecord>> {
    let record = state.market.users.get_profile(user.id()).await?;
    Ok(Json(record))
}

/// Merge updates into the caller's profile.
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<UserRecord>> {
    let Json(updates) = payload?;
    let record = state.market.users.update_profile(user.id(), &updates).await?;
    Ok(Json(record))
}
