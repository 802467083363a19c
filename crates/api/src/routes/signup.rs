//! Account creation.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use marketplace_core::{SignupOutcome, SignupRequest};
use tracing::info;

use crate::error::Result;
use crate::state::AppState;

/// Create an account, its profile and a bearer session.
pub async fn signup(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<SignupOutcome>> {
    let Json(request) = payload?;
    info!(email = %request.email, "Creating user account");

    let outcome = state.market.users.signup(request).await?;
    Ok(Json(outcome))
}
