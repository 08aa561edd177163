//! Transient user-facing notifications
//!
//! Every notification is posted with a time-to-live and removes itself when it elapses. A
//! notification dismissed early cancels its pending expiry; an expiry for an id that is already
//! gone does nothing.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use uuid::Uuid;

use crate::schedule::{Scheduler, TaskHandle};

pub const DEFAULT_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub ttl: Duration,
}

/// Shared, cloneable queue of live notifications.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    entries: Mutex<Vec<Posted>>,
    scheduler: Arc<dyn Scheduler>,
    default_ttl: Duration,
}

struct Posted {
    notification: Notification,
    expiry: TaskHandle,
}

impl NotificationQueue {
    pub fn new(scheduler: Arc<dyn Scheduler>, default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                entries: Mutex::new(Vec::new()),
                scheduler,
                default_ttl,
            }),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl
    }

    /// Post with the queue's default time-to-live.
    pub fn post(&self, message: impl Into<String>, kind: NotificationKind) -> Uuid {
        self.post_with_ttl(message, kind, self.inner.default_ttl)
    }

    pub fn post_with_ttl(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        ttl: Duration,
    ) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            ttl,
        };
        let id = notification.id;
        tracing::debug!(%id, %kind, message = %notification.message, "notification posted");

        // Held across scheduling so an immediate expiry cannot run before the entry exists.
        let mut entries = self.inner.lock();
        let weak = Arc::downgrade(&self.inner);
        let expiry = self
            .inner
            .scheduler
            .schedule(ttl, Box::new(move || expire(&weak, id)));
        entries.push(Posted {
            notification,
            expiry,
        });
        id
    }

    /// Remove a notification before its time-to-live elapses. Returns false if it was already gone.
    pub fn dismiss(&self, id: Uuid) -> bool {
        match self.inner.remove(id) {
            Some(posted) => {
                posted.expiry.cancel();
                true
            }
            None => false,
        }
    }

    /// Live notifications, oldest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .iter()
            .map(|posted| posted.notification.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for NotificationQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationQueue")
            .field("entries", &self.snapshot())
            .field("default_ttl", &self.inner.default_ttl)
            .finish()
    }
}

impl QueueInner {
    fn lock(&self) -> MutexGuard<'_, Vec<Posted>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: Uuid) -> Option<Posted> {
        let mut entries = self.lock();
        let index = entries.iter().position(|p| p.notification.id == id)?;
        Some(entries.remove(index))
    }
}

fn expire(inner: &Weak<QueueInner>, id: Uuid) {
    if let Some(inner) = inner.upgrade() {
        if inner.remove(id).is_some() {
            tracing::debug!(%id, "notification expired");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;

    fn queue() -> (Arc<ManualScheduler>, NotificationQueue) {
        let scheduler = Arc::new(ManualScheduler::new());
        let queue = NotificationQueue::new(scheduler.clone(), DEFAULT_TTL);
        (scheduler, queue)
    }

    #[test]
    fn notification_lives_for_exactly_its_ttl() {
        let (clock, queue) = queue();
        let id = queue.post("saved", NotificationKind::Success);

        let live = queue.snapshot();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].id, id);
        assert_eq!(live[0].ttl, Duration::from_millis(5000));

        clock.advance(Duration::from_millis(4999));
        assert_eq!(queue.len(), 1);
        clock.advance(Duration::from_millis(1));
        assert!(queue.is_empty());
    }

    #[test]
    fn custom_ttl_overrides_default() {
        let (clock, queue) = queue();
        queue.post_with_ttl("short", NotificationKind::Info, Duration::from_millis(10));
        queue.post("long", NotificationKind::Info);

        clock.advance(Duration::from_millis(10));
        let live = queue.snapshot();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].message, "long");
    }

    #[test]
    fn dismiss_cancels_pending_expiry() {
        let (clock, queue) = queue();
        let id = queue.post("oops", NotificationKind::Error);

        assert!(queue.dismiss(id));
        assert!(queue.is_empty());
        assert_eq!(clock.pending(), 0);
        assert!(!queue.dismiss(id));
        clock.advance(DEFAULT_TTL);
        assert!(queue.is_empty());
    }

    #[test]
    fn expiring_an_absent_id_is_a_noop() {
        let (clock, queue) = queue();
        let keep = queue.post_with_ttl("keep", NotificationKind::Warning, Duration::from_secs(60));

        expire(&Arc::downgrade(&queue.inner), Uuid::new_v4());
        clock.advance(DEFAULT_TTL);

        assert_eq!(queue.snapshot()[0].id, keep);
    }

    #[test]
    fn posts_keep_arrival_order_and_unique_ids() {
        let (_clock, queue) = queue();
        let first = queue.post("one", NotificationKind::Info);
        let second = queue.post("two", NotificationKind::Info);

        assert_ne!(first, second);
        let messages: Vec<_> = queue.snapshot().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["one", "two"]);
    }

    #[test]
    fn unbounded_ttl_after_time_has_passed() {
        let (clock, queue) = queue();
        clock.advance(Duration::from_secs(1));
        queue.post_with_ttl("sticky", NotificationKind::Info, Duration::MAX);

        clock.advance(DEFAULT_TTL);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn clones_share_entries() {
        let (_clock, queue) = queue();
        let other = queue.clone();
        other.post("shared", NotificationKind::Info);
        assert_eq!(queue.len(), 1);
    }
}
