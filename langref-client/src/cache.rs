//! Keyed resource cache
//!
//!     The cache holds one entry for the hierarchy index and one per document slug. Each accessor
//!     marks its entry in flight, fetches the artifact, and records either the decoded data or the
//!     error. Locks are never held across a fetch, so readers always observe a consistent entry:
//!
//!         begin     ready = false, pending += 1, previous data kept
//!         success   ready = (pending == 0), data replaced, error cleared
//!         failure   ready = false, data kept, error recorded, one error notification posted
//!
//!     Overlapping fetches for the same key are not coalesced. Each completion overwrites the
//!     entry, so whichever completes last decides the final state. An entry never reads as ready
//!     while a fetch for it is still in flight.

use langref_core::{DocumentBody, HierarchyIndex, HierarchyLookups, Slug, HIERARCHY_FILE};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::FetchError;
use crate::fetch::Fetcher;
use crate::notify::{NotificationKind, NotificationQueue};

/// Observable state of one cached resource.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub ready: bool,
    pub data: Option<Arc<T>>,
    pub error: Option<FetchError>,
    /// Fetches for this key still in flight.
    pub pending: usize,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            ready: false,
            data: None,
            error: None,
            pending: 0,
        }
    }
}

impl<T> CacheEntry<T> {
    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    fn begin(&mut self) {
        self.ready = false;
        self.pending += 1;
    }

    fn finish(&mut self, result: Result<T, FetchError>) {
        self.pending = self.pending.saturating_sub(1);
        match result {
            Ok(data) => {
                self.data = Some(Arc::new(data));
                self.error = None;
                self.ready = self.pending == 0;
            }
            Err(err) => {
                self.error = Some(err);
                self.ready = false;
            }
        }
    }
}

/// The hierarchy index together with its derived navigation tables.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyView {
    pub index: HierarchyIndex,
    pub lookups: HierarchyLookups,
}

impl HierarchyView {
    pub fn new(index: HierarchyIndex) -> Result<Self, langref_core::HierarchyError> {
        let lookups = index.lookups()?;
        Ok(Self { index, lookups })
    }
}

pub struct ResourceCache<F> {
    fetcher: F,
    notifications: NotificationQueue,
    hierarchy: RwLock<CacheEntry<HierarchyView>>,
    documents: RwLock<HashMap<Slug, CacheEntry<DocumentBody>>>,
}

impl<F: Fetcher> ResourceCache<F> {
    pub fn new(fetcher: F, notifications: NotificationQueue) -> Self {
        Self {
            fetcher,
            notifications,
            hierarchy: RwLock::new(CacheEntry::default()),
            documents: RwLock::new(HashMap::new()),
        }
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// Fetch the hierarchy index and return the entry as it stands once this fetch settles.
    pub async fn hierarchy(&self) -> CacheEntry<HierarchyView> {
        self.hierarchy.write().await.begin();

        let result = self.fetch_json(HIERARCHY_FILE).await.and_then(|value| {
            let index: HierarchyIndex = serde_json::from_value(value)
                .map_err(|e| FetchError::decode(HIERARCHY_FILE, e))?;
            HierarchyView::new(index).map_err(|e| FetchError::decode(HIERARCHY_FILE, e))
        });
        let failure = result.as_ref().err().cloned();

        let entry = {
            let mut entry = self.hierarchy.write().await;
            entry.finish(result);
            entry.clone()
        };
        if let Some(err) = failure {
            self.report("the language list", &err);
        }
        entry
    }

    /// Fetch the document for `slug` and return its entry once this fetch settles.
    pub async fn document(&self, slug: &Slug) -> CacheEntry<DocumentBody> {
        self.documents
            .write()
            .await
            .entry(slug.clone())
            .or_default()
            .begin();

        let path = slug.artifact_path();
        let result = self.fetch_json(&path).await.map(DocumentBody::from_value);
        let failure = result.as_ref().err().cloned();

        let entry = {
            let mut documents = self.documents.write().await;
            let entry = documents.entry(slug.clone()).or_default();
            entry.finish(result);
            entry.clone()
        };
        if let Some(err) = failure {
            self.report(&format!("language {slug}"), &err);
        }
        entry
    }

    /// Current hierarchy entry without fetching.
    pub async fn hierarchy_entry(&self) -> CacheEntry<HierarchyView> {
        self.hierarchy.read().await.clone()
    }

    /// Current entry for `slug` without fetching. Unknown slugs read as an empty entry.
    pub async fn document_entry(&self, slug: &Slug) -> CacheEntry<DocumentBody> {
        self.documents
            .read()
            .await
            .get(slug)
            .cloned()
            .unwrap_or_default()
    }

    async fn fetch_json(&self, path: &str) -> Result<Value, FetchError> {
        let bytes = self.fetcher.fetch(path).await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::decode(path, e))
    }

    fn report(&self, what: &str, err: &FetchError) {
        tracing::warn!(path = err.path(), error = %err, "fetch failed");
        self.notifications
            .post(format!("Failed to load {what}: {err}"), NotificationKind::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::DEFAULT_TTL;
    use crate::schedule::ManualScheduler;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Serves canned responses, each call consuming the next scripted delay for its path.
    #[derive(Default)]
    struct MockFetcher {
        responses: Mutex<HashMap<String, Vec<(u64, Result<&'static str, FetchError>)>>>,
        calls: AtomicUsize,
    }

    impl MockFetcher {
        fn respond(self, path: &str, delay_ms: u64, body: Result<&'static str, FetchError>) -> Self {
            self.responses
                .lock()
                .unwrap()
                .entry(path.to_string())
                .or_default()
                .push((delay_ms, body));
            self
        }
    }

    impl Fetcher for MockFetcher {
        async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = {
                let mut responses = self.responses.lock().unwrap();
                match responses.get_mut(path) {
                    Some(queue) if !queue.is_empty() => Some(queue.remove(0)),
                    _ => None,
                }
            };
            let (delay, body) = next.unwrap_or((
                0,
                Err(FetchError::NotFound {
                    path: path.to_string(),
                }),
            ));
            tokio::time::sleep(Duration::from_millis(delay)).await;
            body.map(|text| text.as_bytes().to_vec())
        }
    }

    fn cache(fetcher: MockFetcher) -> (Arc<ManualScheduler>, ResourceCache<MockFetcher>) {
        let clock = Arc::new(ManualScheduler::new());
        let queue = NotificationQueue::new(clock.clone(), DEFAULT_TTL);
        (clock, ResourceCache::new(fetcher, queue))
    }

    fn slug(s: &str) -> Slug {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn loads_hierarchy_and_lookups() {
        let (_clock, cache) = cache(MockFetcher::default().respond(
            "hierarchy.json",
            0,
            Ok(r#"{"python":["python","2","3"],"rescript":["rescript"]}"#),
        ));

        let entry = cache.hierarchy().await;

        assert!(entry.ready);
        assert!(entry.error.is_none());
        let view = entry.data.unwrap();
        assert_eq!(view.lookups.root_languages, vec!["python", "rescript"]);
        assert_eq!(view.lookups.resolve("python-3"), Some(&slug("python-3")));
        assert!(cache.notifications().is_empty());
    }

    #[tokio::test]
    async fn missing_artifact_posts_exactly_one_error() {
        let (_clock, cache) = cache(MockFetcher::default());

        let entry = cache.document(&slug("cobol")).await;

        assert!(!entry.ready);
        assert!(entry.data.is_none());
        assert!(matches!(entry.error, Some(FetchError::NotFound { .. })));
        let posted = cache.notifications().snapshot();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].kind, NotificationKind::Error);
        assert_eq!(posted[0].ttl, DEFAULT_TTL);
        assert!(posted[0].message.contains("cobol"));
    }

    #[tokio::test]
    async fn undecodable_artifact_is_a_failure() {
        let (_clock, cache) = cache(MockFetcher::default().respond(
            "hierarchy.json",
            0,
            Ok(r#"{"python":"not a list"}"#),
        ));

        let entry = cache.hierarchy().await;

        assert!(!entry.ready);
        assert!(matches!(entry.error, Some(FetchError::Decode { .. })));
        assert_eq!(cache.notifications().len(), 1);
    }

    #[tokio::test]
    async fn index_listing_a_variant_twice_is_a_failure() {
        let (_clock, cache) = cache(MockFetcher::default().respond(
            "hierarchy.json",
            0,
            Ok(r#"{"python":["3","3"]}"#),
        ));

        let entry = cache.hierarchy().await;

        assert!(!entry.ready);
        assert!(entry.data.is_none());
        assert!(matches!(entry.error, Some(FetchError::Decode { .. })));
        assert_eq!(cache.notifications().len(), 1);
    }

    #[tokio::test]
    async fn hierarchy_refetch_failure_keeps_previous_view() {
        let (_clock, cache) = cache(
            MockFetcher::default()
                .respond("hierarchy.json", 0, Ok(r#"{"rescript":["rescript","v10"]}"#))
                .respond(
                    "hierarchy.json",
                    0,
                    Err(FetchError::Network {
                        path: "hierarchy.json".to_string(),
                        message: "connection reset".to_string(),
                    }),
                ),
        );

        let first = cache.hierarchy().await;
        assert!(first.ready);
        let entry = cache.hierarchy().await;

        assert!(!entry.ready);
        assert_eq!(entry.data, first.data);
        assert!(matches!(entry.error, Some(FetchError::Network { .. })));
        assert_eq!(cache.hierarchy_entry().await, entry);

        let posted = cache.notifications().snapshot();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].kind, NotificationKind::Error);
        assert!(posted[0].message.contains("connection reset"));
    }

    #[tokio::test]
    async fn error_notifications_expire_after_default_ttl() {
        let (clock, cache) = cache(MockFetcher::default());
        cache.document(&slug("cobol")).await;

        clock.advance(DEFAULT_TTL - Duration::from_millis(1));
        assert_eq!(cache.notifications().len(), 1);
        clock.advance(Duration::from_millis(1));
        assert!(cache.notifications().is_empty());
    }

    #[tokio::test]
    async fn markup_documents_decode_as_markup() {
        let (_clock, cache) = cache(MockFetcher::default().respond(
            "languages/rescript-v10.json",
            0,
            Ok(r#"{"type":"root","children":[]}"#),
        ));

        let entry = cache.document(&slug("rescript-v10")).await;

        assert!(entry.ready);
        assert!(entry.data.unwrap().as_markup().is_some());
    }

    #[tokio::test]
    async fn data_with_a_root_type_key_loads_as_data() {
        let (_clock, cache) = cache(MockFetcher::default().respond(
            "languages/lisp.json",
            0,
            Ok(r#"{"name":"Lisp","type":"root"}"#),
        ));

        let entry = cache.document(&slug("lisp")).await;

        assert!(entry.ready, "{:?}", entry.error);
        assert_eq!(entry.data.unwrap().as_data().unwrap()["name"], "Lisp");
        assert!(cache.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn refetch_failure_keeps_previous_data() {
        let (_clock, cache) = cache(
            MockFetcher::default()
                .respond("languages/py.json", 0, Ok(r#"{"name":"Python"}"#))
                .respond(
                    "languages/py.json",
                    0,
                    Err(FetchError::Status {
                        path: "languages/py.json".to_string(),
                        status: 500,
                    }),
                ),
        );
        let py = slug("py");

        assert!(cache.document(&py).await.ready);
        let entry = cache.document(&py).await;

        assert!(!entry.ready);
        assert_eq!(entry.data.unwrap().as_data().unwrap()["name"], "Python");
        assert!(matches!(entry.error, Some(FetchError::Status { status: 500, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_state_is_visible_to_readers() {
        let (_clock, cache) = cache(
            MockFetcher::default()
                .respond("languages/py.json", 0, Ok(r#"{"name":"Python"}"#))
                .respond("languages/py.json", 50, Ok(r#"{"name":"Python 3"}"#)),
        );
        let py = slug("py");
        cache.document(&py).await;

        let (settled, during) = tokio::join!(cache.document(&py), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            cache.document_entry(&py).await
        });

        assert!(!during.ready);
        assert_eq!(during.pending, 1);
        assert_eq!(during.data.unwrap().as_data().unwrap()["name"], "Python");
        assert!(settled.ready);
        assert_eq!(settled.data.unwrap().as_data().unwrap()["name"], "Python 3");
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_fetches_settle_on_the_last_to_complete() {
        let fetcher = MockFetcher::default()
            .respond("languages/py.json", 100, Ok(r#"{"name":"slow"}"#))
            .respond("languages/py.json", 10, Ok(r#"{"name":"fast"}"#));
        let (_clock, cache) = cache(fetcher);
        let py = slug("py");

        let (slow, fast) = tokio::join!(cache.document(&py), cache.document(&py));

        assert!(!fast.ready, "another fetch is still in flight");
        assert_eq!(fast.pending, 1);
        assert_eq!(fast.data.as_ref().unwrap().as_data().unwrap()["name"], "fast");
        assert!(slow.ready);
        let settled = cache.document_entry(&py).await;
        assert_eq!(settled, slow);
        assert_eq!(settled.data.unwrap().as_data().unwrap()["name"], "slow");
        assert_eq!(cache.fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unknown_slug_reads_as_empty_entry() {
        let (_clock, cache) = cache(MockFetcher::default());
        let entry = cache.document_entry(&slug("cobol")).await;
        assert_eq!(entry, CacheEntry::default());
        assert!(!entry.is_loading());
    }
}
