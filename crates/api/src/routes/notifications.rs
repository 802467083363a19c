//! Notification routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use marketplace_core::{Audience, Notice, NotificationPreferences, NotificationRecord, NotificationType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub subscription: Value,
    #[serde(default)]
    pub preferences: NotificationPreferences,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub message: Value,
    #[serde(default)]
    pub target_users: Option<Vec<String>>,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct MarkAllResponse {
    pub success: bool,
    pub updated: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub success: bool,
    pub sent_to: usize,
}

/// Store the caller's push subscription.
pub async fn subscribe(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<Json<Success>> {
    let Json(request) = payload?;
    if request.subscription.is_null() {
        return Err(ApiError::BadRequest("subscription is required".to_string()));
    }

    state
        .market
        .users
        .subscribe(user.id(), request.subscription, request.preferences)
        .await?;
    Ok(Json(Success { success: true }))
}

/// The caller's notifications, newest first.
pub async fn list(State(state): State<AppState>, user: AuthUser) -> Result<Json<Vec<NotificationRecord>>> {
    let items = state.market.notifications.list(user.id()).await?;
    Ok(Json(items))
}

pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(notification_id): Path<String>,
) -> Result<Json<Success>> {
    state
        .market
        .notifications
        .mark_read(user.id(), &notification_id)
        .await?;
    Ok(Json(Success { success: true }))
}

/// Mark every unread notification read in one write.
pub async fn mark_all_read(State(state): State<AppState>, user: AuthUser) -> Result<Json<MarkAllResponse>> {
    let updated = state.market.notifications.mark_all_read(user.id()).await?;
    Ok(Json(MarkAllResponse {
        success: true,
        updated,
    }))
}

/// Send a notification to explicit users, or to everyone when none are given.
pub async fn send(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<SendRequest>, JsonRejection>,
) -> Result<Json<SendResponse>> {
    let Json(request) = payload?;

    let mut notice = Notice::new(request.kind, request.message).from_sender(user.id());
    if let Some(data) = request.data {
        notice = notice.with_data(data);
    }
    let audience = Audience::Users(request.target_users.unwrap_or_default());

    let report = state.market.dispatcher.dispatch(&notice, &audience).await;
    info!(sender = %user.id(), sent = report.sent, "Notification sent");

    Ok(Json(SendResponse {
        success: true,
        sent_to: report.sent,
    }))
}
