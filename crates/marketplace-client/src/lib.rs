//! Rust client for the Velan marketplace API.
//!
//! [`MarketplaceClient`] wraps each HTTP endpoint; [`App`] layers the
//! onboarding and navigation flow on top, keeping per-user state in an
//! explicit [`Session`].
//!
//! # Example
//!
//! ```rust,ignore
//! use marketplace_client::{App, ClientConfig, Language, MarketplaceClient};
//! use marketplace_core::{ListingKind, Role};
//!
//! let client = MarketplaceClient::new(ClientConfig::new("http://127.0.0.1:8787"))?;
//! let mut app = App::new(client);
//!
//! app.start_signup("anu@example.com")?;
//! app.choose_language(Language::Tamil)?;
//! app.choose_role(Role::Buyer)?;
//! app.complete_profile(profile, "harvest42").await?;
//!
//! let posts = app.listings(ListingKind::Post).await?;
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod demo;
pub mod error;
pub mod navigation;
pub mod session;

pub use app::App;
pub use client::MarketplaceClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use navigation::Screen;
pub use session::{Language, Session, SignupDraft};
