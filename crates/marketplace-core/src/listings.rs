//! Listing stores for posts, tools and seeds.
//!
//! Each owner has one sequence per kind. Consumers see every producer's
//! listings merged and joined with the owner's contact details; anyone else
//! sees only their own sequence.

use chrono::Utc;
use serde_json::{json, Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Retention;
use crate::directory::RoleDirectory;
use crate::error::Result;
use crate::keys;
use crate::models::{ListingKind, ListingRecord, ListingView, Role, UserRecord};
use crate::store::Records;
use crate::users::UserService;
use crate::validation::{validate_listing, ValidationError};

/// Which role produces a kind of listing and which role browses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingStrategy {
    pub kind: ListingKind,
    pub producer: Role,
    pub consumer: Role,
    /// Prefix of the joined owner fields (`farmerName`, `renterPhone`, ...).
    pub owner_label: &'static str,
}

impl ListingStrategy {
    /// The strategy for a listing kind.
    pub fn for_kind(kind: ListingKind) -> Self {
        match kind {
            ListingKind::Post => Self {
                kind,
                producer: Role::Farmer,
                consumer: Role::Buyer,
                owner_label: "farmer",
            },
            ListingKind::Tool | ListingKind::Seed => Self {
                kind,
                producer: Role::Renter,
                consumer: Role::Farmer,
                owner_label: "renter",
            },
        }
    }

    /// Owner fields joined onto a listing, or placeholders when the owner is unknown.
    pub fn owner_fields(&self, owner: Option<&UserRecord>) -> Map<String, Value> {
        let label = self.owner_label;
        let placeholder_name = format!("Unknown {}{}", label[..1].to_uppercase(), &label[1..]);

        let (name, location, phone) = match owner {
            Some(owner) => (
                non_empty_or(&owner.profile.name, &placeholder_name),
                non_empty_or(&owner.profile.location, "Unknown Location"),
                non_empty_or(&owner.profile.phone_number, "N/A"),
            ),
            None => (
                placeholder_name.clone(),
                "Unknown Location".to_string(),
                "N/A".to_string(),
            ),
        };

        let [name_key, location_key, phone_key] = self.owner_keys();
        let mut fields = Map::new();
        fields.insert(name_key, json!(name));
        fields.insert(location_key, json!(location));
        fields.insert(phone_key, json!(phone));
        fields
    }

    /// Names of the owner fields joined at read time.
    pub fn owner_keys(&self) -> [String; 3] {
        let label = self.owner_label;
        [
            format!("{}Name", label),
            format!("{}Location", label),
            format!("{}Phone", label),
        ]
    }

    /// Drop owner fields from listing data; only the read-time join sets them.
    pub fn strip_owner_fields(&self, fields: &mut Map<String, Value>) {
        for key in self.owner_keys() {
            fields.remove(&key);
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Store for one kind of listing.
#[derive(Clone)]
pub struct ListingStore {
    strategy: ListingStrategy,
    records: Records,
    directory: RoleDirectory,
    users: UserService,
    retention: Retention,
}

impl ListingStore {
    pub fn new(
        kind: ListingKind,
        records: Records,
        directory: RoleDirectory,
        users: UserService,
        retention: Retention,
    ) -> Self {
        Self {
            strategy: ListingStrategy::for_kind(kind),
            records,
            directory,
            users,
            retention,
        }
    }

    /// Append a new listing to the owner's sequence.
    pub async fn create(&self, owner: &UserRecord, data: &Value) -> Result<ListingRecord> {
        let kind = self.strategy.kind;
        if owner.role != self.strategy.producer {
            return Err(ValidationError::RoleNotPermitted {
                role: owner.role,
                action: format!("create {} listings", kind.namespace()),
            }
            .into());
        }

        let mut fields = validate_listing(kind, data)?;
        self.strategy.strip_owner_fields(&mut fields);
        let now = Utc::now();
        let record = ListingRecord {
            id: Uuid::new_v4().to_string(),
            user_id: owner.id.clone(),
            fields,
            created_at: now,
            updated_at: now,
        };

        let retention = self.retention;
        let appended = record.clone();
        let pruned = self
            .records
            .update_list::<ListingRecord, _, _>(&keys::listings(kind, &owner.id), move |items| {
                let before = items.len();
                items.retain(|item| retention.retains(item.created_at, now));
                let pruned = before - items.len();
                items.push(appended);
                (true, pruned)
            })
            .await?;

        if pruned > 0 {
            info!(owner = %owner.id, kind = kind.namespace(), pruned, "Pruned expired listings");
        }
        info!(listing_id = %record.id, kind = kind.namespace(), "Listing created");
        Ok(record)
    }

    /// Listings visible to `viewer`, newest first.
    pub async fn list_for(&self, viewer: &UserRecord) -> Result<Vec<ListingView>> {
        let mut views = if viewer.role == self.strategy.consumer {
            self.merged().await?
        } else {
            self.owned_by(&viewer.id)
                .await?
                .into_iter()
                .map(|record| ListingView {
                    record,
                    owner: Map::new(),
                })
                .collect()
        };

        views.sort_by(|a, b| b.record.created_at.cmp(&a.record.created_at));
        Ok(views)
    }

    /// One owner's retained listings, in insertion order.
    pub async fn owned_by(&self, owner_id: &str) -> Result<Vec<ListingRecord>> {
        let now = Utc::now();
        let mut items = self
            .records
            .get_list::<ListingRecord>(&keys::listings(self.strategy.kind, owner_id))
            .await?;
        items.retain(|item| self.retention.retains(item.created_at, now));
        Ok(items)
    }

    async fn merged(&self) -> Result<Vec<ListingView>> {
        let mut views = Vec::new();

        for owner_id in self.directory.members(self.strategy.producer).await {
            let items = self.owned_by(&owner_id).await?;
            if items.is_empty() {
                continue;
            }

            let owner = match self.users.find(&owner_id).await {
                Ok(owner) => owner,
                Err(err) => {
                    warn!(owner = %owner_id, error = %err, "Owner lookup failed");
                    None
                }
            };
            let owner_fields = self.strategy.owner_fields(owner.as_ref());

            views.extend(items.into_iter().map(|mut record| {
                self.strategy.strip_owner_fields(&mut record.fields);
                ListingView {
                    record,
                    owner: owner_fields.clone(),
                }
            }));
        }

        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::LocalIdentityProvider;
    use crate::models::Profile;
    use crate::store::{KeyValueStore, MemoryStore};
    use crate::MarketError;
    use std::sync::Arc;

    struct Fixture {
        store: Arc<MemoryStore>,
        directory: RoleDirectory,
        records: Records,
        users: UserService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let records = Records::new(store.clone());
        let directory = RoleDirectory::new(records.clone());
        let identity = Arc::new(LocalIdentityProvider::new(records.clone()));
        let users = UserService::new(records.clone(), directory.clone(), identity);
        Fixture {
            store,
            directory,
            records,
            users,
        }
    }

    impl Fixture {
        fn listings(&self, kind: ListingKind, retention: Retention) -> ListingStore {
            ListingStore::new(
                kind,
                self.records.clone(),
                self.directory.clone(),
                self.users.clone(),
                retention,
            )
        }

        async fn user(&self, id: &str, role: Role, name: &str, location: &str) -> UserRecord {
            let now = Utc::now();
            let record = UserRecord {
                id: id.to_string(),
                email: format!("{}@example.com", id),
                role,
                profile: Profile {
                    name: name.to_string(),
                    location: location.to_string(),
                    phone_number: "+91 9876543210".to_string(),
                    ..Profile::default()
                },
                created_at: now,
                last_active: now,
                updated_at: None,
            };
            self.records.put(&keys::user(id), &record).await.unwrap();
            self.directory.add(role, id).await.unwrap();
            record
        }
    }

    fn post(crop: &str) -> Value {
        json!({
            "cropName": crop,
            "quantity": "500 kg",
            "price": "₹25/kg",
            "description": "Fresh, Grade A"
        })
    }

    #[tokio::test]
    async fn test_buyer_sees_enriched_farmer_posts() {
        let fx = fixture();
        let posts = fx.listings(ListingKind::Post, Retention::Infinite);
        let farmer = fx.user("f1", Role::Farmer, "Rajesh Kumar", "Coimbatore, TN").await;
        let buyer = fx.user("b1", Role::Buyer, "Anita", "Chennai, TN").await;

        let created = posts.create(&farmer, &post("Tomatoes")).await.unwrap();
        let views = posts.list_for(&buyer).await.unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].record, created);
        assert_eq!(views[0].owner["farmerName"], "Rajesh Kumar");
        assert_eq!(views[0].owner["farmerLocation"], "Coimbatore, TN");
        assert_eq!(views[0].owner["farmerPhone"], "+91 9876543210");

        let value = serde_json::to_value(&views[0]).unwrap();
        assert_eq!(value["cropName"], "Tomatoes");
        assert_eq!(value["userId"], "f1");
        assert_eq!(value["farmerName"], "Rajesh Kumar");
    }

    #[tokio::test]
    async fn test_owner_fields_come_only_from_profile() {
        let fx = fixture();
        let posts = fx.listings(ListingKind::Post, Retention::Infinite);
        let farmer = fx.user("f1", Role::Farmer, "Rajesh Kumar", "Coimbatore, TN").await;
        let buyer = fx.user("b1", Role::Buyer, "Anita", "Chennai, TN").await;

        let mut data = post("Tomatoes");
        data["farmerName"] = json!("Spoofed");
        data["farmerPhone"] = json!("000");
        let created = posts.create(&farmer, &data).await.unwrap();
        assert!(!created.fields.contains_key("farmerName"));
        assert!(!created.fields.contains_key("farmerPhone"));

        // Records written before owner fields were stripped on create.
        let mut legacy = created.clone();
        legacy.id = "legacy".to_string();
        legacy.fields.insert("farmerName".to_string(), json!("Spoofed"));
        fx.records
            .put(&keys::listings(ListingKind::Post, "f1"), &vec![created, legacy])
            .await
            .unwrap();

        let views = posts.list_for(&buyer).await.unwrap();
        assert_eq!(views.len(), 2);
        for view in &views {
            let body = serde_json::to_string(view).unwrap();
            for key in ["\"farmerName\"", "\"farmerLocation\"", "\"farmerPhone\""] {
                assert_eq!(body.matches(key).count(), 1, "{} repeated in {}", key, body);
            }
            let value = serde_json::to_value(view).unwrap();
            assert_eq!(value["farmerName"], "Rajesh Kumar");
            assert_eq!(value["farmerPhone"], "+91 9876543210");
        }
    }

    #[tokio::test]
    async fn test_missing_owner_gets_placeholders() {
        let fx = fixture();
        let tools = fx.listings(ListingKind::Tool, Retention::Infinite);
        let renter = fx.user("r1", Role::Renter, "Ravi", "Salem, TN").await;
        let farmer = fx.user("f1", Role::Farmer, "Priya", "Salem, TN").await;

        tools
            .create(&renter, &json!({"name": "Tractor", "description": "50HP", "dailyRate": "₹1,500"}))
            .await
            .unwrap();
        // Profile disappears after the listing was created.
        fx.store.set(&keys::user("r1"), Value::Null).await.unwrap();

        let views = tools.list_for(&farmer).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].owner["renterName"], "Unknown Renter");
        assert_eq!(views[0].owner["renterLocation"], "Unknown Location");
        assert_eq!(views[0].owner["renterPhone"], "N/A");
        assert_eq!(views[0].record.fields["name"], "Tractor");
    }

    #[tokio::test]
    async fn test_producer_sees_only_own_listings_newest_first() {
        let fx = fixture();
        let posts = fx.listings(ListingKind::Post, Retention::Infinite);
        let f1 = fx.user("f1", Role::Farmer, "A", "Salem").await;
        let f2 = fx.user("f2", Role::Farmer, "B", "Salem").await;

        let first = posts.create(&f1, &post("Rice")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = posts.create(&f1, &post("Wheat")).await.unwrap();
        posts.create(&f2, &post("Millet")).await.unwrap();

        let views = posts.list_for(&f1).await.unwrap();
        let ids: Vec<_> = views.iter().map(|v| v.record.id.clone()).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert!(views.iter().all(|v| v.owner.is_empty()));
    }

    #[tokio::test]
    async fn test_merged_listings_sorted_across_owners() {
        let fx = fixture();
        let seeds = fx.listings(ListingKind::Seed, Retention::Infinite);
        let r1 = fx.user("r1", Role::Renter, "Seeds Corp", "Chennai").await;
        let r2 = fx.user("r2", Role::Renter, "Agro Mart", "Madurai").await;
        let farmer = fx.user("f1", Role::Farmer, "Priya", "Salem").await;

        let seed = |name: &str| {
            json!({"name": name, "variety": "BPT 5204", "description": "d", "pricePerKg": 45})
        };
        seeds.create(&r1, &seed("Paddy")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        seeds.create(&r2, &seed("Cotton")).await.unwrap();

        let views = seeds.list_for(&farmer).await.unwrap();
        let names: Vec<_> = views.iter().map(|v| v.record.fields["name"].clone()).collect();
        assert_eq!(names, vec![json!("Cotton"), json!("Paddy")]);
        assert_eq!(views[0].owner["renterName"], "Agro Mart");
    }

    #[tokio::test]
    async fn test_wrong_role_cannot_create() {
        let fx = fixture();
        let posts = fx.listings(ListingKind::Post, Retention::Infinite);
        let buyer = fx.user("b1", Role::Buyer, "Anita", "Chennai").await;

        let result = posts.create(&buyer, &post("Tomatoes")).await;
        assert!(matches!(
            result,
            Err(MarketError::Validation(ValidationError::RoleNotPermitted { .. }))
        ));
    }

    #[tokio::test]
    async fn test_other_roles_see_own_empty_sequence() {
        let fx = fixture();
        let tools = fx.listings(ListingKind::Tool, Retention::Infinite);
        let renter = fx.user("r1", Role::Renter, "Ravi", "Salem").await;
        let buyer = fx.user("b1", Role::Buyer, "Anita", "Chennai").await;
        tools
            .create(&renter, &json!({"name": "Plow", "description": "3-furrow", "dailyRate": 300}))
            .await
            .unwrap();

        assert!(tools.list_for(&buyer).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ttl_hides_and_prunes_expired() {
        let fx = fixture();
        let retention = Retention::Ttl(chrono::Duration::days(30));
        let posts = fx.listings(ListingKind::Post, retention);
        let farmer = fx.user("f1", Role::Farmer, "A", "Salem").await;

        let old = Utc::now() - chrono::Duration::days(45);
        let stale = ListingRecord {
            id: "old".to_string(),
            user_id: "f1".to_string(),
            fields: Map::new(),
            created_at: old,
            updated_at: old,
        };
        fx.records
            .put(&keys::listings(ListingKind::Post, "f1"), &vec![stale])
            .await
            .unwrap();

        assert!(posts.list_for(&farmer).await.unwrap().is_empty());

        posts.create(&farmer, &post("Rice")).await.unwrap();
        let stored: Vec<ListingRecord> = fx
            .records
            .get_list(&keys::listings(ListingKind::Post, "f1"))
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_ne!(stored[0].id, "old");
    }
}
