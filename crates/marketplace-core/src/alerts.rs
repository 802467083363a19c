//! Location-scoped weather and price alerts.

use serde::{Deserialize, Serialize};
use serde_json::{json, Number, Value};

use crate::dispatcher::{Audience, Notice};
use crate::models::{NotificationType, Role};
use crate::validation::{require_text, ValidationError};

/// How serious a weather alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Weather alert sent to farmers in a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAlert {
    pub alert_type: String,
    pub location: String,
    pub severity: Severity,
    pub message: String,
}

impl WeatherAlert {
    /// Validate and turn the alert into a notice plus its audience.
    pub fn into_dispatch(self, sender_id: &str) -> Result<(Notice, Audience), ValidationError> {
        require_text("alertType", &self.alert_type)?;
        require_text("location", &self.location)?;
        require_text("message", &self.message)?;

        let notice = Notice::new(
            NotificationType::Weather,
            json!({
                "title": format!("Weather Alert: {}", self.alert_type.trim()),
                "body": self.message,
                "severity": self.severity.as_str(),
            }),
        )
        .from_sender(sender_id)
        .with_data(json!({
            "alertType": self.alert_type,
            "location": self.location,
            "severity": self.severity.as_str(),
        }));

        let audience = Audience::Located {
            roles: vec![Role::Farmer],
            location: self.location,
        };
        Ok((notice, audience))
    }
}

/// Price movement sent to farmers and buyers in a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceAlert {
    pub crop_type: String,
    /// Percentage change; negative for a drop.
    pub price_change: f64,
    pub new_price: Number,
    pub location: String,
}

impl PriceAlert {
    /// Human-readable summary used as the notification body.
    pub fn body(&self) -> String {
        let direction = if self.price_change > 0.0 {
            "increased"
        } else {
            "decreased"
        };
        format!(
            "Price {} by {}% to ₹{} in {}",
            direction,
            self.price_change.abs(),
            self.new_price,
            self.location
        )
    }

    /// Validate and turn the alert into a notice plus its audience.
    pub fn into_dispatch(self, sender_id: &str) -> Result<(Notice, Audience), ValidationError> {
        require_text("cropType", &self.crop_type)?;
        require_text("location", &self.location)?;
        if !self.price_change.is_finite() {
            return Err(ValidationError::InvalidField {
                field: "priceChange".to_string(),
                reason: "must be a finite number".to_string(),
            });
        }

        let body = self.body();
        let notice = Notice::new(
            NotificationType::Prices,
            json!({
                "title": format!("Price Alert: {}", self.crop_type.trim()),
                "body": body,
                "priceChange": self.price_change,
                "newPrice": self.new_price,
            }),
        )
        .from_sender(sender_id)
        .with_data(json!({
            "cropType": self.crop_type,
            "priceChange": self.price_change,
            "newPrice": self.new_price,
            "location": self.location,
        }));

        let audience = Audience::Located {
            roles: vec![Role::Farmer, Role::Buyer],
            location: self.location,
        };
        Ok((notice, audience))
    }
}

/// Parse a JSON body into an alert, mapping shape errors to validation errors.
pub fn parse_alert<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, ValidationError> {
    serde_json::from_value(body).map_err(|e| ValidationError::InvalidField {
        field: "body".to_string(),
        reason: e.to_string(),
    })
}
