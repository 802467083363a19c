//! Configuration types for the marketplace client.

use std::time::Duration;

/// Where and how to reach the marketplace API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API server (e.g., "http://127.0.0.1:8787").
    pub base_url: String,
    /// Serve built-in sample listings when listing reads fail at the
    /// network layer. Off unless explicitly enabled.
    pub demo_mode: bool,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            demo_mode: false,
            timeout: Duration::from_secs(30),
        }
    }

    /// Enable offline/demo listing fallback.
    pub fn with_demo_mode(mut self, enabled: bool) -> Self {
        self.demo_mode = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:8787")
    }
}
