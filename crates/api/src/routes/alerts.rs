//! Weather and price alerts.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use marketplace_core::alerts::parse_alert;
use marketplace_core::{PriceAlert, WeatherAlert};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertResponse {
    pub success: bool,
    pub alerts_sent: usize,
}

/// Alert farmers whose location matches.
pub async fn weather(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<AlertResponse>> {
    let Json(body) = payload?;
    let alert: WeatherAlert = parse_alert(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let location = alert.location.clone();
    let (notice, audience) = alert
        .into_dispatch(user.id())
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let report = state.market.dispatcher.dispatch(&notice, &audience).await;
    info!(location = %location, sent = report.sent, "Weather alert dispatched");

    Ok(Json(AlertResponse {
        success: true,
        alerts_sent: report.sent,
    }))
}

/// Alert farmers and buyers whose location matches.
pub async fn price(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<AlertResponse>> {
    let Json(body) = payload?;
    let alert: PriceAlert = parse_alert(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let crop = alert.crop_type.clone();
    let (notice, audience) = alert
        .into_dispatch(user.id())
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let report = state.market.dispatcher.dispatch(&notice, &audience).await;
    info!(crop = %crop, sent = report.sent, "Price alert dispatched");

    Ok(Json(AlertResponse {
        success: true,
        alerts_sent: report.sent,
    }))
}
