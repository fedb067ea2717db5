//! TTL cache for the ERP session token.
//!
//! The ERP hands out a session id on login and accepts it on inventory calls
//! for a bounded window. The cache keeps the `{token, obtained-at}` pair and
//! treats anything older than the TTL as discarded: a stale entry is removed
//! on read, so the caller always either reuses a live token or logs in again.
//!
//! There is deliberately no cross-task guard around the miss path. Two tasks
//! missing at once both log in and the second store wins; the ERP tolerates
//! overlapping sessions.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

#[derive(Debug)]
struct CachedSession {
    session_id: String,
    obtained_at: Instant,
}

#[derive(Debug)]
pub(crate) struct SessionCache {
    ttl: Duration,
    inner: Mutex<Option<CachedSession>>,
}

impl SessionCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(None),
        }
    }

    /// Returns the cached session id if it is still within the TTL window.
    /// A stale entry is dropped so a failed re-login cannot fall back to it.
    pub(crate) async fn get(&self) -> Option<String> {
        let mut guard = self.inner.lock().await;
        match guard.as_ref() {
            Some(cached) if cached.obtained_at.elapsed() < self.ttl => {
                Some(cached.session_id.clone())
            }
            Some(_) => {
                *guard = None;
                None
            }
            None => None,
        }
    }

    pub(crate) async fn store(&self, session_id: String) {
        let mut guard = self.inner.lock().await;
        *guard = Some(CachedSession {
            session_id,
            obtained_at: Instant::now(),
        });
    }
}
