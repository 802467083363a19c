//! Marketplace API HTTP client.

use marketplace_core::{
    ListingKind, ListingRecord, NotificationPreferences, NotificationRecord, NotificationType,
    PriceAlert, SignupOutcome, UserAnalytics, UserRecord, WeatherAlert,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::demo;
use crate::error::{ClientError, Result};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    sent_to: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlertResponse {
    alerts_sent: usize,
}

#[derive(Debug, Deserialize)]
struct MarkAllResponse {
    updated: usize,
}

/// Client for the marketplace HTTP API.
#[derive(Clone)]
pub struct MarketplaceClient {
    http: Client,
    config: ClientConfig,
}

impl MarketplaceClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether the server answers its health check.
    pub async fn health_check(&self) -> Result<bool> {
        let url = self.config.url("/health");
        debug!("Health check: {}", url);
        let resp = self.http.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    pub async fn signup(&self, email: &str, password: &str, user_data: Value) -> Result<SignupOutcome> {
        let body = json!({
            "email": email,
            "password": password,
            "userData": user_data,
        });
        let request = self.request(Method::POST, "/auth/signup", None).json(&body);
        decode(request.send().await?).await
    }

    pub async fn profile(&self, token: &str) -> Result<UserRecord> {
        self.call(Method::GET, "/user/profile", token, None).await
    }

    pub async fn update_profile(&self, token: &str, updates: &Value) -> Result<UserRecord> {
        self.call(Method::PUT, "/user/profile", token, Some(updates)).await
    }

    /// Listings of one kind as seen by the caller.
    ///
    /// In demo mode a network-level failure yields sample listings instead
    /// of an error. Server errors always propagate.
    pub async fn listings(&self, token: &str, kind: ListingKind) -> Result<Vec<ListingRecord>> {
        let path = format!("/{}", kind.namespace());
        match self.call(Method::GET, &path, token, None).await {
            Err(err) if self.config.demo_mode && err.is_network() => {
                warn!(kind = kind.namespace(), error = %err, "API unreachable, serving demo listings");
                Ok(demo::sample_listings(kind))
            }
            other => other,
        }
    }

    pub async fn create_listing(&self, token: &str, kind: ListingKind, data: &Value) -> Result<ListingRecord> {
        let path = format!("/{}", kind.namespace());
        self.call(Method::POST, &path, token, Some(data)).await
    }

    pub async fn subscribe(
        &self,
        token: &str,
        subscription: Value,
        preferences: NotificationPreferences,
    ) -> Result<()> {
        let body = json!({
            "subscription": subscription,
            "preferences": preferences,
        });
        let _: Value = self
            .call(Method::POST, "/notifications/subscribe", token, Some(&body))
            .await?;
        Ok(())
    }

    pub async fn notifications(&self, token: &str) -> Result<Vec<NotificationRecord>> {
        self.call(Method::GET, "/notifications", token, None).await
    }

    pub async fn mark_read(&self, token: &str, notification_id: &str) -> Result<()> {
        let path = format!("/notifications/{}/read", notification_id);
        let _: Value = self.call(Method::PUT, &path, token, None).await?;
        Ok(())
    }

    /// Mark every notification read with one request. Returns how many changed.
    pub async fn mark_all_read(&self, token: &str) -> Result<usize> {
        let resp: MarkAllResponse = self
            .call(Method::PUT, "/notifications/read-all", token, None)
            .await?;
        Ok(resp.updated)
    }

    /// Send a notification; an empty target list broadcasts. Returns `sentTo`.
    pub async fn send_notification(
        &self,
        token: &str,
        kind: NotificationType,
        message: Value,
        target_users: &[String],
    ) -> Result<usize> {
        let body = json!({
            "type": kind,
            "message": message,
            "targetUsers": target_users,
        });
        let resp: SendResponse = self
            .call(Method::POST, "/notifications/send", token, Some(&body))
            .await?;
        Ok(resp.sent_to)
    }

    pub async fn weather_alert(&self, token: &str, alert: &WeatherAlert) -> Result<usize> {
        let body = serde_json::to_value(alert)?;
        let resp: AlertResponse = self
            .call(Method::POST, "/weather/alerts", token, Some(&body))
            .await?;
        Ok(resp.alerts_sent)
    }

    pub async fn price_alert(&self, token: &str, alert: &PriceAlert) -> Result<usize> {
        let body = serde_json::to_value(alert)?;
        let resp: AlertResponse = self
            .call(Method::POST, "/price/alerts", token, Some(&body))
            .await?;
        Ok(resp.alerts_sent)
    }

    pub async fn analytics(&self, token: &str) -> Result<UserAnalytics> {
        self.call(Method::GET, "/analytics", token, None).await
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, self.config.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        debug!(%method, path, "API request");
        let mut request = self.request(method, path, Some(token));
        if let Some(body) = body {
            request = request.json(body);
        }
        decode(request.send().await?).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    let bytes = resp.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|body| body.error)
            .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_slice(&bytes)?)
}
