pub mod store;

use crate::cache::store::KeyValueStore;
use crate::domain::analysis::AnalysisResult;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const KEY_PREFIX: &str = "ai_analysis_";
const FRESHNESS_WINDOW_MS: i64 = 60 * 60 * 1000;

/// Entries older than this are ignored on read (they are never deleted).
pub fn freshness_window() -> Duration {
    Duration::milliseconds(FRESHNESS_WINDOW_MS)
}

/// Lower-cased label with whitespace runs collapsed to `_`. Labels that collapse to the same
/// token share an entry.
pub fn cache_key(label: &str) -> String {
    let mut key = String::with_capacity(KEY_PREFIX.len() + label.len());
    key.push_str(KEY_PREFIX);
    let mut in_whitespace = false;
    for c in label.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                key.push('_');
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            key.extend(c.to_lowercase());
        }
    }
    key
}

/// Persisted shape: `{ "data": <AnalysisResult>, "timestamp": <epoch millis> }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: AnalysisResult,
    pub timestamp: i64,
}

#[derive(Debug, Clone)]
pub struct CachedAnalysis {
    pub result: AnalysisResult,
    pub created_at: DateTime<Utc>,
    pub age: Duration,
}

impl CachedAnalysis {
    pub fn is_fresh(&self) -> bool {
        self.age < freshness_window()
    }
}

#[derive(Clone)]
pub struct AnalysisCache {
    store: Arc<dyn KeyValueStore>,
}

impl AnalysisCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Never fails: unreadable, malformed or ill-formed entries are a miss.
    pub async fn get(&self, key: &str, now: DateTime<Utc>) -> Option<CachedAnalysis> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(key, error = %err, "analysis cache read failed; treating as miss");
                return None;
            }
        };

        let entry = match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(key, error = %err, "analysis cache entry malformed; ignoring");
                return None;
            }
        };

        if !entry.data.is_well_formed() {
            tracing::debug!(key, "analysis cache entry violates result invariants; ignoring");
            return None;
        }

        let Some(created_at) = Utc.timestamp_millis_opt(entry.timestamp).single() else {
            tracing::debug!(
                key,
                timestamp = entry.timestamp,
                "analysis cache entry timestamp out of range; ignoring"
            );
            return None;
        };

        Some(CachedAnalysis {
            result: entry.data,
            created_at,
            age: now - created_at,
        })
    }

    pub async fn set(
        &self,
        key: &str,
        result: &AnalysisResult,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let entry = CacheEntry {
            data: result.clone(),
            timestamp: now.timestamp_millis(),
        };
        self.store.set(key, serde_json::to_string(&entry)?).await
    }
}
