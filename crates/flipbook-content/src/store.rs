//! Session content cache in front of a [`ContentSource`].

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use flipbook_model::SectionId;

use crate::error::{ContentError, Result};
use crate::source::ContentSource;

/// Add-only map from section to fetched HTML.
///
/// Entries are never invalidated within a session. A duplicate insert from a
/// racing prefetch simply replaces identical content.
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: RwLock<HashMap<SectionId, Arc<str>>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, section: &SectionId) -> Option<Arc<str>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(section)
            .cloned()
    }

    pub fn contains(&self, section: &SectionId) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(section)
    }

    pub fn insert(&self, section: SectionId, html: Arc<str>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(section, html);
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached section ids, sorted for stable output.
    pub fn sections(&self) -> Vec<SectionId> {
        let mut sections: Vec<SectionId> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        sections.sort();
        sections
    }
}

/// Resolves section content, going to the source only on a cache miss.
#[derive(Debug)]
pub struct ContentStore<S> {
    source: S,
    cache: ContentCache,
}

impl<S: ContentSource> ContentStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: ContentCache::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    #[inline]
    pub fn is_cached(&self, section: &SectionId) -> bool {
        self.cache.contains(section)
    }

    /// Sections currently held in the cache, sorted.
    pub fn cached_sections(&self) -> Vec<SectionId> {
        self.cache.sections()
    }

    /// Returns the section's HTML, fetching it on a cache miss.
    ///
    /// # Errors
    ///
    /// - [`ContentError::Fetch`] when the source answers a non-success status
    /// - [`ContentError::Empty`] when the body is blank
    /// - [`ContentError::Transport`] when the source is unreachable
    ///
    /// Failures are not cached; calling again retries the source.
    pub async fn resolve(&self, section: &SectionId) -> Result<Arc<str>> {
        if let Some(html) = self.cache.get(section) {
            tracing::trace!("Cache hit for {}", section);
            return Ok(html);
        }
        self.fetch_and_store(section).await
    }

    /// Like [`Self::resolve`] but always asks the source (explicit user retry).
    pub async fn resolve_fresh(&self, section: &SectionId) -> Result<Arc<str>> {
        self.fetch_and_store(section).await
    }

    async fn fetch_and_store(&self, section: &SectionId) -> Result<Arc<str>> {
        let response = self.source.fetch(section).await?;

        if !response.is_success() {
            return Err(ContentError::Fetch {
                section: section.clone(),
                status: response.status,
            });
        }

        if response.body.trim().is_empty() {
            return Err(ContentError::Empty {
                section: section.clone(),
            });
        }

        let html: Arc<str> = Arc::from(response.body);
        self.cache.insert(section.clone(), Arc::clone(&html));
        tracing::debug!("Cached {} ({} bytes)", section, html.len());
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticContentSource;

    fn id(raw: &str) -> SectionId {
        SectionId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_second_resolve_is_served_from_cache() {
        let store = ContentStore::new(StaticContentSource::new().with_page("part1", "<p>1</p>"));

        let first = store.resolve(&id("part1")).await.unwrap();
        let second = store.resolve(&id("part1")).await.unwrap();

        assert_eq!(&*first, "<p>1</p>");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.source().request_count("part1"), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_a_fetch_error() {
        let store = ContentStore::new(StaticContentSource::new());
        let err = store.resolve(&id("part5")).await.unwrap_err();
        assert_eq!(
            err,
            ContentError::Fetch {
                section: id("part5"),
                status: 404
            }
        );
        assert!(!store.is_cached(&id("part5")));
    }

    #[tokio::test]
    async fn test_blank_body_is_empty_error() {
        let store = ContentStore::new(
            StaticContentSource::new()
                .with_page("part9", "")
                .with_page("part10", "  \n\t "),
        );
        for raw in ["part9", "part10"] {
            let err = store.resolve(&id(raw)).await.unwrap_err();
            assert_eq!(err, ContentError::Empty { section: id(raw) });
        }
        assert!(store.cache().is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_retried_on_next_resolve() {
        let source = StaticContentSource::new().with_status("part2", 500);
        let store = ContentStore::new(source);

        assert!(store.resolve(&id("part2")).await.is_err());
        store.source().insert_page("part2", "<p>back</p>");
        assert_eq!(&*store.resolve(&id("part2")).await.unwrap(), "<p>back</p>");
        assert_eq!(store.source().request_count("part2"), 2);
    }

    #[tokio::test]
    async fn test_resolve_fresh_bypasses_cache() {
        let store = ContentStore::new(StaticContentSource::new().with_page("part1", "old"));
        store.resolve(&id("part1")).await.unwrap();
        store.source().insert_page("part1", "new");

        assert_eq!(&*store.resolve(&id("part1")).await.unwrap(), "old");
        assert_eq!(&*store.resolve_fresh(&id("part1")).await.unwrap(), "new");
        assert_eq!(&*store.resolve(&id("part1")).await.unwrap(), "new");
    }

    #[test]
    fn test_cache_sections_sorted() {
        let cache = ContentCache::new();
        cache.insert(id("part3"), Arc::from("c"));
        cache.insert(id("part1"), Arc::from("a"));
        assert_eq!(cache.sections(), vec![id("part1"), id("part3")]);
        assert_eq!(cache.len(), 2);
    }
}
