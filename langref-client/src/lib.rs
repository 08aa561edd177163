//! Client-side access to compiled langref artifacts
//!
//!     The reference site renders from two kinds of artifact: the hierarchy index and one
//!     document per slug. [ResourceCache] fetches these on demand through a [Fetcher], exposes
//!     per-key readiness and error state, and reports every failure as a transient
//!     [Notification] on a shared [NotificationQueue].
//!
//! File Layout
//!
//!     .
//!     ├── cache.rs        # ResourceCache and CacheEntry
//!     ├── fetch.rs        # Fetcher trait, HTTP and directory fetchers
//!     ├── notify.rs       # NotificationQueue with per-notification expiry
//!     ├── schedule.rs     # Scheduler trait, Tokio and manual clocks
//!     ├── error.rs
//!     └── lib.rs
//!
//!     Accessors never return errors. Callers read `ready`, `data` and `error` off the returned
//!     entry; the same failure is also posted to the notification queue for display.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod notify;
pub mod schedule;

use langref_config::ClientConfig;
use std::sync::Arc;
use tokio::runtime::TryCurrentError;

pub use cache::{CacheEntry, HierarchyView, ResourceCache};
pub use error::FetchError;
pub use fetch::{DirFetcher, Fetcher, HttpFetcher};
pub use notify::{Notification, NotificationKind, NotificationQueue, DEFAULT_TTL};
pub use schedule::{ManualScheduler, Scheduler, TaskHandle, TokioScheduler};

/// HTTP-backed cache configured from `[client]`, expiring notifications on the current runtime.
pub fn connect(config: &ClientConfig) -> Result<ResourceCache<HttpFetcher>, TryCurrentError> {
    let scheduler = TokioScheduler::current()?;
    let queue = NotificationQueue::new(Arc::new(scheduler), config.notification_ttl());
    Ok(ResourceCache::new(HttpFetcher::from_config(config), queue))
}
