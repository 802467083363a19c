//! Domain services for the Velan agricultural marketplace.
//!
//! Farmers sell crops to buyers, renters offer tools and seeds to farmers,
//! and everyone receives alerts. Every record lives in a namespaced
//! key-value store as a JSON document; this crate layers the marketplace
//! rules on top of it.
//!
//! # Architecture
//!
//! ```text
//!                 ┌──────────────────────┐
//!   event ───────►│      Dispatcher      │ resolve audience
//!                 └──────────┬───────────┘
//!                            │ bounded fan-out, per-recipient timeout
//!        ┌───────────────────┼────────────────────┐
//!        ▼                   ▼                    ▼
//!  notifications:<a>   notifications:<b>    notifications:<c>   (≤ 50, newest first)
//!
//!  users:<role> ──► RoleDirectory ──► ListingStore (posts / tools / seeds)
//!                                        merge + enrich for the consumer role
//! ```
//!
//! All read-modify-writes go through [`Records`], which holds a per-key async
//! lock so concurrent requests touching the same key are serialized.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use marketplace_core::{Marketplace, MarketConfig, MemoryStore};
//!
//! let market = Marketplace::new(Arc::new(MemoryStore::new()), MarketConfig::default());
//! let outcome = market.users.signup(request).await?;
//! let posts = market.listings(ListingKind::Post).list_for(&outcome.profile).await?;
//! ```

pub mod alerts;
pub mod analytics;
pub mod config;
pub mod directory;
pub mod dispatcher;
pub mod error;
pub mod identity;
pub mod keys;
pub mod listings;
pub mod models;
pub mod notifications;
pub mod password;
pub mod push;
pub mod store;
pub mod users;
pub mod validation;

use std::sync::Arc;

pub use alerts::{PriceAlert, Severity, WeatherAlert};
pub use analytics::UserAnalytics;
pub use config::{DispatchConfig, MarketConfig, Retention};
pub use directory::RoleDirectory;
pub use dispatcher::{Audience, DispatchReport, Dispatcher, Notice};
pub use error::{MarketError, Result};
pub use identity::{IdentityProvider, LocalIdentityProvider};
pub use listings::{ListingStore, ListingStrategy};
pub use models::{
    Identity, ListingKind, ListingRecord, ListingView, NotificationPreferences,
    NotificationRecord, NotificationSubscription, NotificationType, Profile, Role, UserRecord,
};
pub use notifications::{NotificationStore, MAX_NOTIFICATIONS};
pub use push::{LogTransport, PushTransport};
pub use store::{KeyValueStore, MemoryStore, Records, SqliteStore};
pub use users::{SessionToken, SignupOutcome, SignupRequest, UserService};
pub use validation::ValidationError;

/// Every marketplace service, wired to one store.
///
/// Built once at startup and cloned into request handlers; all fields are
/// cheap handles over shared state.
#[derive(Clone)]
pub struct Marketplace {
    pub records: Records,
    pub directory: RoleDirectory,
    pub identity: Arc<dyn IdentityProvider>,
    pub users: UserService,
    pub posts: ListingStore,
    pub tools: ListingStore,
    pub seeds: ListingStore,
    pub notifications: NotificationStore,
    pub dispatcher: Dispatcher,
}

impl Marketplace {
    /// Wire the services with the local identity provider and the logging
    /// push transport.
    pub fn new(store: Arc<dyn KeyValueStore>, config: MarketConfig) -> Self {
        let records = Records::new(store);
        let identity = Arc::new(LocalIdentityProvider::new(records.clone()));
        Self::assemble(records, config, identity, Arc::new(LogTransport))
    }

    /// Wire the services with caller-supplied collaborators.
    pub fn with_services(
        store: Arc<dyn KeyValueStore>,
        config: MarketConfig,
        identity: Arc<dyn IdentityProvider>,
        push: Arc<dyn PushTransport>,
    ) -> Self {
        Self::assemble(Records::new(store), config, identity, push)
    }

    fn assemble(
        records: Records,
        config: MarketConfig,
        identity: Arc<dyn IdentityProvider>,
        push: Arc<dyn PushTransport>,
    ) -> Self {
        let directory = RoleDirectory::new(records.clone());
        let users = UserService::new(records.clone(), directory.clone(), identity.clone());
        let notifications = NotificationStore::new(records.clone());

        let listing = |kind| {
            ListingStore::new(
                kind,
                records.clone(),
                directory.clone(),
                users.clone(),
                config.retention,
            )
        };
        let posts = listing(ListingKind::Post);
        let tools = listing(ListingKind::Tool);
        let seeds = listing(ListingKind::Seed);

        let dispatcher = Dispatcher::new(
            notifications.clone(),
            directory.clone(),
            users.clone(),
            push,
            config.dispatch,
        );

        Self {
            records,
            directory,
            identity,
            users,
            posts,
            tools,
            seeds,
            notifications,
            dispatcher,
        }
    }

    /// The store for one listing kind.
    pub fn listings(&self, kind: ListingKind) -> &ListingStore {
        match kind {
            ListingKind::Post => &self.posts,
            ListingKind::Tool => &self.tools,
            ListingKind::Seed => &self.seeds,
        }
    }

    /// Resolve a bearer token to the caller's identity.
    pub async fn authenticate(&self, token: &str) -> Result<Identity> {
        self.identity.verify_token(token).await
    }
}
