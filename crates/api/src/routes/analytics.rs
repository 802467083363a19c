//! Per-user analytics.

use axum::extract::State;
use axum::Json;
use marketplace_core::UserAnalytics;

use crate::auth::AuthUser;
use crate::error::Result;
use crate::state::AppState;

pub async fn analytics(State(state): State<AppState>, user: AuthUser) -> Result<Json<UserAnalytics>> {
    let stats = state.market.analytics(user.id()).await?;
    Ok(Json(stats))
}
