//! The single persisted fingerprint entry.

use crate::error::Result;
use crate::runtime::EpochMillis;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};

/// Stored form of a fingerprint: `{"value": "...", "expiry": <epoch ms>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedFingerprint {
    pub value: String,
    pub expiry: u64,
}

impl CachedFingerprint {
    pub fn is_expired(&self, now: EpochMillis) -> bool {
        now.is_after(EpochMillis(self.expiry))
    }
}

/// Reads and writes the cache entry under one fixed key.
pub struct FingerprintCache<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> FingerprintCache<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Return the cached value if present and not yet expired.
    ///
    /// Expired and unparsable entries are deleted. Store failures count as
    /// a miss.
    pub fn load(&self, now: EpochMillis) -> Option<String> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::debug!("Fingerprint cache read failed: {}", e);
                return None;
            }
        };

        let entry: CachedFingerprint = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Discarding unreadable fingerprint cache entry: {}", e);
                self.remove_quietly();
                return None;
            }
        };

        if entry.is_expired(now) {
            log::debug!("Fingerprint cache entry expired at {}", entry.expiry);
            self.remove_quietly();
            return None;
        }

        Some(entry.value)
    }

    /// Write (or overwrite) the entry.
    pub fn save(&self, value: &str, expiry: EpochMillis) -> Result<()> {
        let entry = CachedFingerprint {
            value: value.to_string(),
            expiry: expiry.as_millis(),
        };
        let raw = serde_json::to_string(&entry)?;
        self.store.set(&self.key, &raw)
    }

    /// Delete the entry.
    pub fn invalidate(&self) -> Result<()> {
        self.store.delete(&self.key)
    }

    fn remove_quietly(&self) {
        if let Err(e) = self.store.delete(&self.key) {
            log::debug!("Failed to delete fingerprint cache entry: {}", e);
        }
    }
}
