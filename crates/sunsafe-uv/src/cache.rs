//! Time-boxed cache of the last fetched UV dataset.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::storage::KeyValueStore;
use crate::types::{UvDataset, UvError};

pub const CACHE_KEY: &str = "sunSafetyUvData";

/// Cached data is served for this long after it was fetched
pub const FRESHNESS_WINDOW_MINUTES: i64 = 30;

pub fn freshness_window() -> Duration {
    Duration::minutes(FRESHNESS_WINDOW_MINUTES)
}

/// Stored blob: `{ "data": ..., "timestamp": <epoch ms> }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: UvDataset,
    pub timestamp: i64,
}

impl CacheEntry {
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// Fresh while `now` is less than the window past the fetch time.
    /// Unrepresentable or future timestamps are stale.
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        match self.fetched_at() {
            Some(fetched_at) if fetched_at <= now => {
                now.signed_duration_since(fetched_at) < freshness_window()
            }
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct UvCache {
    store: Arc<dyn KeyValueStore>,
    last_updated: Option<DateTime<Utc>>,
}

impl UvCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            last_updated: None,
        }
    }

    /// When the dataset currently on screen was fetched
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn save(&mut self, data: &UvDataset) -> Result<DateTime<Utc>, UvError> {
        self.save_at(data, Utc::now())
    }

    pub fn save_at(&mut self, data: &UvDataset, now: DateTime<Utc>) -> Result<DateTime<Utc>, UvError> {
        let entry = CacheEntry {
            data: data.clone(),
            timestamp: now.timestamp_millis(),
        };
        let raw = serde_json::to_string(&entry)
            .map_err(|e| UvError::Storage(format!("failed to serialize UV cache: {}", e)))?;

        // Marker follows the dataset even if the write fails
        self.last_updated = Some(now);
        self.store.set(CACHE_KEY, &raw)?;
        tracing::debug!("UV cache updated at {}", now);
        Ok(now)
    }

    pub fn load(&mut self) -> Option<UvDataset> {
        self.load_at(Utc::now())
    }

    /// The cached dataset if it is still fresh at `now`.
    /// A stale entry is reported as a miss and left in place.
    pub fn load_at(&mut self, now: DateTime<Utc>) -> Option<UvDataset> {
        let entry = self.entry()?;
        if !entry.is_fresh_at(now) {
            tracing::debug!("UV cache expired (fetched at {:?})", entry.fetched_at());
            return None;
        }

        self.last_updated = entry.fetched_at();
        Some(entry.data)
    }

    /// Raw stored entry regardless of freshness
    pub fn entry(&self) -> Option<CacheEntry> {
        let raw = match self.store.get(CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read UV cache: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Discarding corrupt UV cache: {}", e);
                None
            }
        }
    }
}
