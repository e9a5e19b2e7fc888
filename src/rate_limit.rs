use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::RateLimitConfig;
use crate::store::{get_as, put_as, ExpiringStore};

const KEY_PREFIX: &str = "rate-limit:";

/// Counter state for one client's current window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Window {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Fixed-window limiter keyed by client (IP address, email, ...).
///
/// Window state lives in an [`ExpiringStore`] so limits hold across restarts
/// and across processes sharing the store. The read-modify-write is not
/// atomic; concurrent requests from one client may briefly exceed the limit.
pub struct RateLimiter<'a> {
    store: &'a dyn ExpiringStore,
    max_requests: u32,
    window: Duration,
}

impl<'a> RateLimiter<'a> {
    pub fn new(store: &'a dyn ExpiringStore, max_requests: u32, window: Duration) -> Self {
        Self {
            store,
            max_requests,
            window,
        }
    }

    pub fn from_config(store: &'a dyn ExpiringStore, config: &RateLimitConfig) -> Result<Self> {
        Ok(Self::new(store, config.max_requests, config.window_duration()?))
    }

    /// Record a request from `client` at `now`. Returns false when the client
    /// has used up its window.
    pub fn check(&self, client: &str, now: DateTime<Utc>) -> Result<bool> {
        let key = format!("{}{}", KEY_PREFIX, client);
        let window_len = chrono::Duration::from_std(self.window)?;

        let current: Option<Window> = get_as(self.store, &key)?;
        let next = match current {
            Some(w) if now <= w.reset_at => {
                if w.count >= self.max_requests {
                    log::warn!("Rate limit exceeded for {}", client);
                    return Ok(false);
                }
                Window {
                    count: w.count + 1,
                    reset_at: w.reset_at,
                }
            }
            _ => Window {
                count: 1,
                reset_at: now + window_len,
            },
        };

        // Keep the entry at least until its window closes
        let ttl = (next.reset_at - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO)
            .max(self.window);
        put_as(self.store, &key, &next, ttl)?;
        Ok(true)
    }
}
