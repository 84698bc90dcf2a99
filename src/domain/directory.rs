//! Token Directory Snapshot
//!
//! An immutable, fully-populated copy of the token directory together with the
//! time its refresh started. Freshness is a pure function of the snapshot age.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::token::TokenListEntry;

/// Default snapshot lifetime (5 minutes)
pub const DEFAULT_DIRECTORY_TTL: Duration = Duration::from_millis(300_000);

/// Complete directory snapshot, replaced wholesale on refresh
#[derive(Debug, Clone)]
pub struct CachedDirectory {
    entries: Arc<Vec<TokenListEntry>>,
    fetched_at: DateTime<Utc>,
}

impl CachedDirectory {
    pub fn new(entries: Vec<TokenListEntry>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            entries: Arc::new(entries),
            fetched_at,
        }
    }

    pub fn entries(&self) -> &[TokenListEntry] {
        &self.entries
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose symbol matches case-insensitively
    pub fn find(&self, symbol: &str) -> Option<&TokenListEntry> {
        self.entries.iter().find(|e| e.matches_symbol(symbol))
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        is_fresh(self.fetched_at, now, ttl)
    }
}

/// A snapshot taken at `fetched_at` is fresh while `now - fetched_at < ttl`
///
/// A clock that moved backwards yields a negative age, which counts as fresh.
pub fn is_fresh(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    let age = now.signed_duration_since(fetched_at);
    match chrono::Duration::from_std(ttl) {
        Ok(ttl) => age < ttl,
        Err(_) => true,
    }
}
