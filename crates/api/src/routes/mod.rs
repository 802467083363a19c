//! Route handlers for the marketplace API.

pub mod alerts;
pub mod analytics;
pub mod health;
pub mod listings;
pub mod notifications;
pub mod profile;
pub mod signup;

use axum::routing::{get, post, put};
use axum::Router;
use marketplace_core::ListingKind;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        // Accounts
        .route("/auth/signup", post(signup::signup))
        .route(
            "/user/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        // Listings
        .route("/posts", listings::routes(ListingKind::Post))
        .route("/tools", listings::routes(ListingKind::Tool))
        .route("/seeds", listings::routes(ListingKind::Seed))
        // Notifications
        .route("/notifications", get(notifications::list))
        .route("/notifications/subscribe", post(notifications::subscribe))
        .route("/notifications/send", post(notifications::send))
        .route("/notifications/read-all", put(notifications::mark_all_read))
        .route("/notifications/:id/read", put(notifications::mark_read))
        // Alerts
        .route("/weather/alerts", post(alerts::weather))
        .route("/price/alerts", post(alerts::price))
        .route("/analytics", get(analytics::analytics))
}
