//! Device Fingerprint Engine
//!
//! Collects device/browser signals, canonicalizes them, hashes the result
//! and caches it for a TTL.
//!
//! ## Usage
//!
//! ```javascript
//! import init, { generate_fingerprint } from './pkg/widget_wasm.js';
//! await init();
//! const fp = await generate_fingerprint();               // cached for 24h
//! const fp2 = await generate_fingerprint({ ttl_ms: 3600000 });
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! cache hit? ──yes──▶ return cached value (no probes run)
//!     │no
//!     ▼
//! probes (each guarded) ─▶ canonical JSON ─▶ SHA-256 hex | rolling hash
//!     ▼
//! cache with expiry = now + ttl ─▶ return
//! ```
//!
//! `generate()` never fails: a pipeline error yields `"error-fallback"`.

pub mod cache;
pub mod components;
pub mod digest;
pub mod probes;

pub use cache::{CachedFingerprint, FingerprintCache};
pub use components::FingerprintComponents;
pub use digest::{hash_canonical, rolling_hash, DigestProvider, NoDigest, Sha256Digest, SubtleDigest};
pub use probes::{collect, BrowserSignals, ProbeError, SignalSource};

use crate::config::{FingerprintConfig, FALLBACK_FINGERPRINT};
use crate::error::Result;
use crate::runtime::{Clock, SystemClock};
use crate::storage::{KeyValueStore, LocalStorageStore, MemoryStore};
use std::time::Duration;

/// Fingerprint generator over an injected store, signal source and clock.
pub struct FingerprintEngine<S, P, C = SystemClock> {
    ttl: Duration,
    cache: FingerprintCache<S>,
    signals: P,
    digest: Box<dyn DigestProvider>,
    clock: C,
}

impl<S: KeyValueStore, P: SignalSource> FingerprintEngine<S, P, SystemClock> {
    /// Create an engine using the wall clock and the pure-Rust SHA-256.
    pub fn new(config: &FingerprintConfig, store: S, signals: P) -> Self {
        Self {
            ttl: Duration::from_millis(config.ttl_ms),
            cache: FingerprintCache::new(store, config.storage_key.clone()),
            signals,
            digest: Box::new(Sha256Digest),
            clock: SystemClock,
        }
    }
}

impl FingerprintEngine<Box<dyn KeyValueStore>, BrowserSignals, SystemClock> {
    /// Engine wired to the live browser.
    ///
    /// Uses `localStorage` when it is reachable and an in-memory store
    /// otherwise, so the value is at least stable for this page.
    pub fn browser(config: &FingerprintConfig) -> Self {
        let store: Box<dyn KeyValueStore> = match LocalStorageStore::new() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("Fingerprint cache falling back to memory: {}", e);
                Box::new(MemoryStore::new())
            }
        };
        let digest: Box<dyn DigestProvider> = if config.prefer_web_crypto {
            Box::new(SubtleDigest)
        } else {
            Box::new(Sha256Digest)
        };

        Self::new(config, store, BrowserSignals::new(config)).with_digest(digest)
    }
}

impl<S: KeyValueStore, P: SignalSource, C: Clock> FingerprintEngine<S, P, C> {
    /// Replace the digest provider.
    pub fn with_digest(mut self, digest: Box<dyn DigestProvider>) -> Self {
        self.digest = digest;
        self
    }

    /// Replace the clock.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> FingerprintEngine<S, P, C2> {
        FingerprintEngine {
            ttl: self.ttl,
            cache: self.cache,
            signals: self.signals,
            digest: self.digest,
            clock,
        }
    }

    /// Return the fingerprint, computing and caching it on a miss.
    ///
    /// Never fails; returns `"error-fallback"` if the pipeline breaks.
    pub async fn generate(&self) -> String {
        match self.try_generate().await {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Fingerprint generation failed: {}", e);
                FALLBACK_FINGERPRINT.to_string()
            }
        }
    }

    async fn try_generate(&self) -> Result<String> {
        let now = self.clock.now();
        if let Some(value) = self.cache.load(now) {
            log::debug!("Fingerprint cache hit");
            return Ok(value);
        }

        log::debug!("Fingerprint cache miss, probing");
        self.signals.ensure_available()?;
        let canonical = collect(&self.signals).canonical()?;
        let value = hash_canonical(self.digest.as_ref(), &canonical).await;

        if let Err(e) = self.cache.save(&value, now + self.ttl) {
            log::warn!("Failed to cache fingerprint: {}", e);
        }

        Ok(value)
    }

    /// The cached fingerprint, if present and unexpired. Never probes.
    pub fn cached(&self) -> Option<String> {
        self.cache.load(self.clock.now())
    }

    /// Drop the cached entry so the next `generate()` recomputes.
    pub fn invalidate(&self) -> Result<()> {
        self.cache.invalidate()
    }

    /// A fresh component snapshot, without hashing or caching.
    pub fn components(&self) -> FingerprintComponents {
        collect(&self.signals)
    }

    pub fn store(&self) -> &S {
        self.cache.store()
    }
}
