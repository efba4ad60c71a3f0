//! The navigator's persisted reading position.

use std::sync::atomic::{AtomicBool, Ordering};

use flipbook_model::{SectionId, SectionRegistry};

use crate::store::KeyValueStore;

/// Key the last viewed section is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "lastViewedSection";

/// Reads and writes the last viewed section as a `#<id>` fragment.
///
/// Storage failures never reach the navigator. The first failed write is
/// logged and turns off further writes for the rest of the session.
pub struct PositionStore {
    store: Box<dyn KeyValueStore>,
    key: String,
    disabled: AtomicBool,
}

impl PositionStore {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        Self {
            store: Box::new(store),
            key: key.into(),
            disabled: AtomicBool::new(false),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether writes were turned off after a failure.
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// The stored section, if it names a content section of `registry`.
    pub fn load(&self, registry: &SectionRegistry) -> Option<SectionId> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Ignoring stored position: {}", e);
                return None;
            }
        };

        match registry.resolve_fragment(&raw) {
            Some((_, section)) => Some(section.clone()),
            None => {
                tracing::debug!("Stored position {:?} is not a known section", raw);
                None
            }
        }
    }

    /// Stores `section` as the last viewed one.
    pub fn save(&self, section: &SectionId) {
        if self.is_disabled() {
            return;
        }
        if let Err(e) = self.store.set(&self.key, &section.fragment()) {
            tracing::warn!(
                "Disabling position storage for this session: {}",
                e.user_message()
            );
            self.disabled.store(true, Ordering::Relaxed);
        }
    }

    /// Forgets the stored position.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!("Failed to clear stored position: {}", e);
        }
    }
}

impl std::fmt::Debug for PositionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionStore")
            .field("key", &self.key)
            .field("disabled", &self.is_disabled())
            .finish_non_exhaustive()
    }
}
