//! Posts, tools and seeds.
//!
//! The three listing kinds share handlers; the kind is bound when the route
//! is registered.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, MethodRouter};
use axum::Json;
use marketplace_core::{ListingKind, ListingRecord, ListingView};
use serde_json::Value;

use crate::auth::AuthUser;
use crate::error::Result;
use crate::state::AppState;

/// `GET` and `POST` for one listing kind.
pub fn routes(kind: ListingKind) -> MethodRouter<AppState> {
    get(move |state: State<AppState>, user: AuthUser| list(state, user, kind)).post(
        move |state: State<AppState>,
              user: AuthUser,
              payload: std::result::Result<Json<Value>, JsonRejection>| {
            create(state, user, kind, payload)
        },
    )
}

/// Listings visible to the caller.
///
/// Consumers see every producer's listings with owner details; everyone
/// else sees their own.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    kind: ListingKind,
) -> Result<Json<Vec<ListingView>>> {
    let viewer = user.record(&state).await?;
    let views = state.market.listings(kind).list_for(&viewer).await?;
    Ok(Json(views))
}

/// Create a listing owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    kind: ListingKind,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<ListingRecord>> {
    let Json(data) = payload?;
    let owner = user.record(&state).await?;
    let record = state.market.listings(kind).create(&owner, &data).await?;
    Ok(Json(record))
}
