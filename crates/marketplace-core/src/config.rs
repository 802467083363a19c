//! Tunables for the marketplace services.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// How long listings stay visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retention {
    /// Listings never expire.
    #[default]
    Infinite,
    /// Listings older than this are hidden and pruned on the owner's next append.
    Ttl(chrono::Duration),
}

impl Retention {
    /// Parse `infinite` or a number of days.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        if s.is_empty() || s == "infinite" {
            return Some(Retention::Infinite);
        }
        let days: i64 = s.strip_suffix('d').unwrap_or(&s).parse().ok()?;
        if days <= 0 {
            return None;
        }
        chrono::Duration::try_days(days).map(Retention::Ttl)
    }

    /// Whether a record created at `created_at` is still retained at `now`.
    pub fn retains(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Retention::Infinite => true,
            Retention::Ttl(ttl) => now.signed_duration_since(created_at) < *ttl,
        }
    }
}

/// Notification fan-out limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Recipient writes in flight at once.
    pub concurrency: usize,
    /// Per-recipient write deadline; slower writes are skipped and logged.
    pub write_timeout: Duration,
}

impl DispatchConfig {
    /// Default number of concurrent recipient writes.
    pub const DEFAULT_CONCURRENCY: usize = 16;

    /// Default per-recipient write timeout.
    pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_millis(2000);
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            concurrency: Self::DEFAULT_CONCURRENCY,
            write_timeout: Self::DEFAULT_WRITE_TIMEOUT,
        }
    }
}

/// Service-wide configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarketConfig {
    pub dispatch: DispatchConfig,
    pub retention: Retention,
}
