//! Thread-local cache for the live-activity summary.
//!
//! The summary survives component remounts (route changes, the panel being
//! scrolled out and back) so the GitHub API is hit at most once per TTL.
//! Nothing is persisted; a reload starts empty.

use crate::activity::ActivitySummary;
use std::cell::RefCell;

/// Cached value: (fetched_at_ms, summary)
pub type CacheValue = (f64, ActivitySummary);

thread_local! {
    pub static ACTIVITY_CACHE: RefCell<Option<CacheValue>> = const { RefCell::new(None) };
}

/// The cached summary if it is younger than `ttl_ms` at `now_ms`.
pub fn cached_activity(now_ms: f64, ttl_ms: f64) -> Option<ActivitySummary> {
    ACTIVITY_CACHE.with(|c| {
        c.borrow()
            .as_ref()
            .filter(|(fetched_at, _)| now_ms - fetched_at < ttl_ms)
            .map(|(_, summary)| summary.clone())
    })
}

pub fn store_activity(now_ms: f64, summary: ActivitySummary) {
    ACTIVITY_CACHE.with(|c| *c.borrow_mut() = Some((now_ms, summary)));
}
