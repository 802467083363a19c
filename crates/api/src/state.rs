//! Application state shared across handlers.

use marketplace_core::Marketplace;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Marketplace services.
    pub market: Marketplace,
}

impl AppState {
    /// Create new application state.
    pub fn new(market: Marketplace) -> Self {
        Self { market }
    }
}
