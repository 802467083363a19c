//! Records persisted in the key-value store.
//!
//! All records serialize with camelCase field names so the stored documents
//! and the HTTP payloads share one shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::ValidationError;

/// Marketplace role chosen at sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Grows and sells crops; rents tools and buys seeds.
    Farmer,
    /// Buys crops from farmers.
    Buyer,
    /// Rents out tools and sells seeds.
    Renter,
}

impl Role {
    /// Every role, in directory order.
    pub const ALL: [Role; 3] = [Role::Farmer, Role::Buyer, Role::Renter];

    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Buyer => "buyer",
            Role::Renter => "renter",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ValidationError;

    /// Parse a role from user input, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "farmer" => Ok(Role::Farmer),
            "buyer" => Ok(Role::Buyer),
            "renter" => Ok(Role::Renter),
            _ => Err(ValidationError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Personal profile details entered during sign-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-form location (e.g., "Coimbatore, TN").
    #[serde(default)]
    pub location: String,
    /// Contact number.
    #[serde(default)]
    pub phone_number: String,
    /// Any other profile fields (photo, current cultivation, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A registered user, stored under `user:<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Identity provider user ID.
    pub id: String,
    /// Sign-up email.
    pub email: String,
    /// Role chosen at sign-up.
    pub role: Role,
    /// Profile details.
    pub profile: Profile,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Last time the user fetched their profile.
    pub last_active: DateTime<Utc>,
    /// Last profile update, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Kinds of marketplace listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    /// Crop for sale, posted by a farmer.
    Post,
    /// Rentable equipment, listed by a renter.
    Tool,
    /// Seeds for sale, listed by a renter.
    Seed,
}

impl ListingKind {
    /// Every listing kind.
    pub const ALL: [ListingKind; 3] = [ListingKind::Post, ListingKind::Tool, ListingKind::Seed];

    /// Key namespace for per-owner sequences (`posts:<owner>`).
    pub fn namespace(&self) -> &'static str {
        match self {
            ListingKind::Post => "posts",
            ListingKind::Tool => "tools",
            ListingKind::Seed => "seeds",
        }
    }

    /// Fields a new listing of this kind must carry.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            ListingKind::Post => &["cropName", "quantity", "price", "description"],
            ListingKind::Tool => &["name", "description", "dailyRate"],
            ListingKind::Seed => &["name", "variety", "description", "pricePerKg"],
        }
    }
}

/// A post, tool or seed listing, stored inside its owner's sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    /// Listing ID.
    pub id: String,
    /// Owner user ID.
    pub user_id: String,
    /// Type-specific fields as submitted by the owner.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A listing as presented to a viewer, with owner details joined in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    #[serde(flatten)]
    pub record: ListingRecord,
    /// Owner fields such as `farmerName`; empty for a producer's own listings.
    #[serde(flatten)]
    pub owner: Map<String, Value>,
}

/// Notification categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Weather,
    Prices,
    NewCropListing,
    Diseases,
}

impl NotificationType {
    /// Wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Weather => "weather",
            NotificationType::Prices => "prices",
            NotificationType::NewCropListing => "new_crop_listing",
            NotificationType::Diseases => "diseases",
        }
    }
}

/// One entry in a user's notification sequence (`notifications:<id>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Notification ID, unique per recipient copy.
    pub id: String,
    /// Category.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Free-form payload (title/body or plain text).
    pub message: Value,
    /// User who triggered the notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    /// When the notification was created.
    pub timestamp: DateTime<Utc>,
    /// Whether the recipient has read it.
    #[serde(default)]
    pub read: bool,
    /// Structured event details (alert location, severity, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Per-type opt-ins for push delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    #[serde(default = "enabled")]
    pub weather: bool,
    #[serde(default = "enabled")]
    pub prices: bool,
    #[serde(default = "enabled")]
    pub new_listings: bool,
    #[serde(default = "enabled")]
    pub diseases: bool,
}

fn enabled() -> bool {
    true
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            weather: true,
            prices: true,
            new_listings: true,
            diseases: true,
        }
    }
}

impl NotificationPreferences {
    /// Whether push delivery is enabled for a notification type.
    pub fn allows(&self, kind: NotificationType) -> bool {
        match kind {
            NotificationType::Weather => self.weather,
            NotificationType::Prices => self.prices,
            NotificationType::NewCropListing => self.new_listings,
            NotificationType::Diseases => self.diseases,
        }
    }
}

/// A push subscription, stored under `notification:<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSubscription {
    pub user_id: String,
    /// Opaque push endpoint description from the client.
    pub subscription: Value,
    #[serde(default)]
    pub preferences: NotificationPreferences,
    pub created_at: DateTime<Utc>,
}

/// An authenticated identity as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}
