//! Background warming of sections around the one being read.
//!
//! Prefetches run on their own tasks and only ever add cache entries. They
//! never report errors to the reader and never hold up a transition.

use std::sync::{Arc, Mutex, PoisonError};

use flipbook_model::{SectionId, SectionRegistry};
use tokio::task::JoinSet;

use crate::source::ContentSource;
use crate::store::ContentStore;

/// Sections on each side of the current one to warm.
pub const DEFAULT_PREFETCH_RADIUS: usize = 2;

/// Outcome of one scheduling pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefetchPlan {
    /// Neighbours considered, nearest first.
    pub candidates: Vec<SectionId>,
    /// Candidates that were not cached and got a background fetch.
    pub spawned: Vec<SectionId>,
}

impl PrefetchPlan {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Spawns background resolves for nearby sections.
pub struct Prefetcher<S> {
    store: Arc<ContentStore<S>>,
    radius: usize,
    tasks: Mutex<JoinSet<()>>,
}

impl<S: ContentSource> Prefetcher<S> {
    pub fn new(store: Arc<ContentStore<S>>, radius: usize) -> Self {
        Self {
            store,
            radius,
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Warm the sections within the configured radius of `around`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, registry: &SectionRegistry, around: &SectionId) -> PrefetchPlan {
        let candidates = registry.neighbors(around.as_str(), self.radius);
        self.spawn_missing(candidates)
    }

    /// Warm every content section except `except`.
    pub fn schedule_all(&self, registry: &SectionRegistry, except: &SectionId) -> PrefetchPlan {
        let candidates = registry
            .sections()
            .iter()
            .filter(|section| *section != except)
            .cloned()
            .collect();
        self.spawn_missing(candidates)
    }

    fn spawn_missing(&self, candidates: Vec<SectionId>) -> PrefetchPlan {
        let spawned: Vec<SectionId> = candidates
            .iter()
            .filter(|section| !self.store.is_cached(section))
            .cloned()
            .collect();

        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        while let Some(finished) = tasks.try_join_next() {
            log_join_error(finished);
        }

        for section in spawned.iter().cloned() {
            let store = Arc::clone(&self.store);
            tasks.spawn(async move {
                match store.resolve(&section).await {
                    Ok(_) => tracing::debug!("Prefetched {}", section),
                    Err(e) => tracing::debug!("Prefetch of {} failed: {}", section, e),
                }
            });
        }

        if !spawned.is_empty() {
            tracing::debug!(
                "Prefetching {} of {} neighbouring sections",
                spawned.len(),
                candidates.len()
            );
        }

        PrefetchPlan {
            candidates,
            spawned,
        }
    }

    /// Number of prefetches not yet reaped.
    pub fn in_flight(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Wait for every outstanding prefetch to finish.
    pub async fn settle(&self) {
        let mut tasks = {
            let mut guard = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *guard)
        };
        while let Some(finished) = tasks.join_next().await {
            log_join_error(finished);
        }
    }

    /// Cancel every outstanding prefetch.
    pub fn abort_all(&self) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .abort_all();
    }
}

fn log_join_error(finished: Result<(), tokio::task::JoinError>) {
    if let Err(e) = finished
        && e.is_panic()
    {
        tracing::warn!("Prefetch task panicked: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticContentSource;

    fn id(raw: &str) -> SectionId {
        SectionId::new(raw).unwrap()
    }

    fn registry() -> SectionRegistry {
        SectionRegistry::from_ids("cover", ["part1", "part2", "part3"]).unwrap()
    }

    fn source() -> StaticContentSource {
        StaticContentSource::new()
            .with_page("part1", "<p>1</p>")
            .with_page("part2", "<p>2</p>")
            .with_page("part3", "<p>3</p>")
    }

    #[tokio::test]
    async fn test_skips_cached_neighbours() {
        let store = Arc::new(ContentStore::new(source()));
        store.resolve(&id("part1")).await.unwrap();
        let prefetcher = Prefetcher::new(Arc::clone(&store), DEFAULT_PREFETCH_RADIUS);

        let plan = prefetcher.schedule(&registry(), &id("part2"));
        assert_eq!(plan.candidates, vec![id("part3"), id("part1")]);
        assert_eq!(plan.spawned, vec![id("part3")]);

        prefetcher.settle().await;
        assert!(store.is_cached(&id("part3")));
        assert_eq!(store.source().request_count("part1"), 1);
        assert_eq!(prefetcher.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let store = Arc::new(ContentStore::new(
            StaticContentSource::new().with_status("part2", 500),
        ));
        let prefetcher = Prefetcher::new(Arc::clone(&store), 1);

        let plan = prefetcher.schedule(&registry(), &id("part1"));
        assert_eq!(plan.spawned, vec![id("part2")]);

        prefetcher.settle().await;
        assert!(!store.is_cached(&id("part2")));
    }

    #[tokio::test]
    async fn test_schedule_all_excludes_current() {
        let store = Arc::new(ContentStore::new(source()));
        let prefetcher = Prefetcher::new(Arc::clone(&store), DEFAULT_PREFETCH_RADIUS);

        let plan = prefetcher.schedule_all(&registry(), &id("part2"));
        assert_eq!(plan.candidates, vec![id("part1"), id("part3")]);

        prefetcher.settle().await;
        assert_eq!(store.cache().sections(), vec![id("part1"), id("part3")]);
    }

    #[tokio::test]
    async fn test_zero_radius_plans_nothing() {
        let store = Arc::new(ContentStore::new(source()));
        let prefetcher = Prefetcher::new(store, 0);
        assert!(prefetcher.schedule(&registry(), &id("part2")).is_empty());
    }
}
