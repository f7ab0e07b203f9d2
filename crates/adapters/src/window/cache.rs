// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Short-lived cache for display enumeration.

use corral_core::Display;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Default TTL for cached display lists.
pub const DISPLAY_CACHE_TTL: Duration = Duration::from_secs(30);

struct Entry {
    displays: Vec<Display>,
    fetched_at: Instant,
}

/// Wraps a platform's raw enumeration call with a TTL cache. Callers
/// should hold one `DisplayCache` per adapter instance, not per call.
/// Uses wall-clock `Instant` rather than the session-level [`corral_core::Clock`]
/// abstraction: cache freshness is a real-time property of the underlying
/// OS call, not something tests need to fake alongside session timers.
pub struct DisplayCache {
    ttl: Duration,
    entry: Mutex<Option<Entry>>,
}

impl DisplayCache {
    pub fn new() -> Self {
        Self::with_ttl(DISPLAY_CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, entry: Mutex::new(None) }
    }

    /// Returns the cached display list if still fresh, else calls `fetch`,
    /// caches the result, and returns it. `fetch` is only invoked on a
    /// cache miss.
    pub async fn get_or_fetch<F, Fut, E>(&self, fetch: F) -> Result<Vec<Display>, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<Vec<Display>, E>>,
    {
        {
            let guard = self.entry.lock();
            if let Some(entry) = guard.as_ref() {
                if entry.fetched_at.elapsed() < self.ttl {
                    return Ok(entry.displays.clone());
                }
            }
        }

        let displays = fetch().await?;
        let mut guard = self.entry.lock();
        *guard = Some(Entry { displays: displays.clone(), fetched_at: Instant::now() });
        Ok(displays)
    }

    pub fn invalidate(&self) {
        *self.entry.lock() = None;
    }
}

impl Default for DisplayCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
