//! The navigation state machine.
//!
//! A [`Navigator`] owns everything one book needs: the registry, the content
//! store and prefetcher, the presentation adapter, the fragment surface and
//! the position store. All operations take `&self`; share it with
//! `Arc<Navigator<_, _>>` between the input loop and the [`HashRouter`].
//!
//! # Transition sequence
//!
//! 1. Gate: reject out-of-range, current, or busy requests without touching
//!    state.
//! 2. Enter `Transitioning`, render the loading placeholder.
//! 3. Run the animation and the content resolve together.
//! 4. Render content or an inline fallback.
//! 5. Commit: index, fragment (with routing suppressed), persisted position,
//!    back to `Idle`.
//! 6. Push control state and warm the neighbours.
//!
//! There is no cancellation and no timeout: a stalled fetch keeps the
//! navigator in `Transitioning` until it settles.
//!
//! [`HashRouter`]: crate::HashRouter

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use flipbook_content::{ContentSource, ContentStore, PageView, Prefetcher};
use flipbook_model::{Direction, NavigationOrigin, SectionId, SectionRegistry};
use flipbook_persistence::{KeyValueStore, PositionStore};

use crate::config::{ConfigError, NavigatorConfig, PrefetchConfig};
use crate::error::NavigationRejected;
use crate::input::InputEvent;
use crate::presentation::{Controls, PresentationAdapter};
use crate::state::NavigationState;
use crate::surface::NavigationSurface;

/// Where the first page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartSource {
    Persisted,
    Fragment,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    pub index: usize,
    pub section: SectionId,
    pub source: StartSource,
    pub view: PageView,
}

/// A committed page turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
    pub origin: NavigationOrigin,
    pub section: SectionId,
    /// What the page now shows; `None` for the cover, which has no content.
    pub view: Option<PageView>,
}

pub struct Navigator<S, A> {
    registry: SectionRegistry,
    store: Arc<ContentStore<S>>,
    prefetcher: Prefetcher<S>,
    warm_all_on_startup: bool,
    adapter: A,
    surface: Box<dyn NavigationSurface>,
    positions: Arc<PositionStore>,
    state: Mutex<NavigationState>,
}

impl<S: ContentSource, A: PresentationAdapter> Navigator<S, A> {
    pub fn new(
        registry: SectionRegistry,
        source: S,
        adapter: A,
        surface: impl NavigationSurface,
        positions: PositionStore,
    ) -> Self {
        let store = Arc::new(ContentStore::new(source));
        let prefetch = PrefetchConfig::default();
        let state = NavigationState::new(registry.first_content_index());
        Self {
            registry,
            prefetcher: Prefetcher::new(Arc::clone(&store), prefetch.radius),
            warm_all_on_startup: prefetch.warm_all_on_startup,
            store,
            adapter,
            surface: Box::new(surface),
            positions: Arc::new(positions),
            state: Mutex::new(state),
        }
    }

    /// Build a navigator for the book described by `config`.
    pub fn from_config(
        config: &NavigatorConfig,
        source: S,
        adapter: A,
        surface: impl NavigationSurface,
        storage: impl KeyValueStore + 'static,
    ) -> Result<Self, ConfigError> {
        let positions = PositionStore::with_key(storage, config.storage_key.as_str());
        let navigator = Self::new(config.registry()?, source, adapter, surface, positions)
            .with_prefetch(&config.prefetch);
        Ok(navigator)
    }

    #[must_use]
    pub fn with_prefetch(mut self, config: &PrefetchConfig) -> Self {
        self.prefetcher = Prefetcher::new(Arc::clone(&self.store), config.effective_radius());
        self.warm_all_on_startup = config.enabled && config.warm_all_on_startup;
        self
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn store(&self) -> &ContentStore<S> {
        &self.store
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn surface(&self) -> &dyn NavigationSurface {
        self.surface.as_ref()
    }

    pub fn positions(&self) -> &PositionStore {
        &self.positions
    }

    pub fn prefetcher(&self) -> &Prefetcher<S> {
        &self.prefetcher
    }

    pub fn snapshot(&self) -> NavigationState {
        *self.lock_state()
    }

    pub fn current_index(&self) -> usize {
        self.lock_state().current_index
    }

    pub fn current_section(&self) -> Option<&SectionId> {
        self.registry.id_at(self.current_index())
    }

    pub(crate) fn lock_state(&self) -> MutexGuard<'_, NavigationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Show the first page.
    ///
    /// The persisted position wins over the URL fragment, which wins over the
    /// first content section. Fragment notifications are ignored until this
    /// returns.
    pub async fn start(&self) -> Result<StartupReport, NavigationRejected> {
        let (index, section, source) = self.initial_position();

        {
            let mut state = self.lock_state();
            if state.closed {
                return Err(NavigationRejected::Closed);
            }
            if state.is_animating() {
                return Err(NavigationRejected::Busy);
            }
            state.current_index = index;
            self.write_fragment(&mut state, &section);
        }
        tracing::info!("Starting at {} (page {}, from {:?})", section, index, source);

        self.adapter.render(index, &PageView::Loading);
        let resolved = self.store.resolve(&section).await;
        let view = self.present(index, &section, &resolved);
        self.push_controls(index);

        let closed = {
            let mut state = self.lock_state();
            state.initializing = false;
            state.closed
        };

        if resolved.is_ok() && !closed {
            if self.warm_all_on_startup {
                self.prefetcher.schedule_all(&self.registry, &section);
            } else {
                self.prefetcher.schedule(&self.registry, &section);
            }
        }

        Ok(StartupReport {
            index,
            section,
            source,
            view,
        })
    }

    fn initial_position(&self) -> (usize, SectionId, StartSource) {
        if let Some(saved) = self.positions.load(&self.registry)
            && let Some(index) = self.registry.index_of(saved.as_str())
        {
            return (index, saved, StartSource::Persisted);
        }

        if let Some(fragment) = self.surface.fragment()
            && let Some((index, section)) = self.registry.resolve_fragment(&fragment)
        {
            return (index, section.clone(), StartSource::Fragment);
        }

        (
            self.registry.first_content_index(),
            self.registry.first_section().clone(),
            StartSource::Default,
        )
    }

    /// Turn to page `target`.
    ///
    /// Requests made while another transition is running are dropped with
    /// [`NavigationRejected::Busy`]; nothing is queued.
    pub async fn request_navigation(
        &self,
        target: usize,
        origin: NavigationOrigin,
    ) -> Result<Transition, NavigationRejected> {
        let result = self.transition(target, origin).await;
        if let Err(reason) = &result {
            tracing::debug!("Dropped navigation to page {} ({}): {}", target, origin, reason);
        }
        result
    }

    async fn transition(
        &self,
        target: usize,
        origin: NavigationOrigin,
    ) -> Result<Transition, NavigationRejected> {
        let Some(section) = self.registry.id_at(target).cloned() else {
            return Err(NavigationRejected::OutOfRange {
                index: target,
                page_count: self.registry.page_count(),
            });
        };

        let (from, direction) = {
            let mut state = self.lock_state();
            let from = state.current_index;
            (from, state.begin(target)?)
        };
        tracing::debug!("Turning {} from page {} to {} ({})", direction, from, target, origin);

        let view = if target >= self.registry.first_content_index() {
            self.adapter.render(target, &PageView::Loading);
            let ((), resolved) = tokio::join!(
                self.adapter.animate(from, target, direction),
                self.store.resolve(&section),
            );
            Some(self.present(target, &section, &resolved))
        } else {
            self.adapter.animate(from, target, direction).await;
            None
        };

        let closed = self.commit(target, &section).await;

        if !closed && matches!(view, Some(PageView::Content(_))) {
            self.prefetcher.schedule(&self.registry, &section);
        }

        tracing::info!("Now showing {} (page {})", section, target);
        Ok(Transition {
            from,
            to: target,
            direction,
            origin,
            section,
            view,
        })
    }

    fn present(
        &self,
        index: usize,
        section: &SectionId,
        resolved: &flipbook_content::Result<Arc<str>>,
    ) -> PageView {
        match resolved {
            Err(e) if e.is_retryable() => tracing::warn!("Failed to load {}: {}", section, e),
            Err(e) => tracing::error!("Cannot load {}, retrying will not help: {}", section, e),
            Ok(_) => {}
        }
        let view = PageView::from_resolved(section, resolved);
        self.adapter.render(index, &view);
        view
    }

    /// Land on `index`. Returns whether the navigator was torn down while the
    /// transition ran.
    async fn commit(&self, index: usize, section: &SectionId) -> bool {
        let persist = {
            let mut state = self.lock_state();
            self.write_fragment(&mut state, section);
            !state.initializing && index >= self.registry.first_content_index()
        };

        // Still `Transitioning` here, so no other commit can interleave.
        if persist {
            self.persist(section).await;
        }

        let closed = {
            let mut state = self.lock_state();
            state.finish(index);
            state.closed
        };
        self.push_controls(index);
        closed
    }

    /// Write the position on the blocking pool; file stores sync to disk.
    async fn persist(&self, section: &SectionId) {
        let positions = Arc::clone(&self.positions);
        let section = section.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || positions.save(&section)).await {
            tracing::warn!("Position save task failed: {}", e);
        }
    }

    /// Point the fragment at `section`, counting the notification the write
    /// will cause as our own.
    ///
    /// Nothing is written when the fragment already matches, as the surface
    /// would not notify and the count would never be paid back.
    fn write_fragment(&self, state: &mut NavigationState, section: &SectionId) {
        let fragment = section.fragment();
        if self.surface.fragment().as_deref() == Some(fragment.as_str()) {
            return;
        }
        state.pending_self_writes += 1;
        self.surface.set_fragment(&fragment);
    }

    fn push_controls(&self, index: usize) {
        self.adapter
            .controls_changed(&Controls::for_index(&self.registry, index));
    }

    /// Turn one page in `direction`.
    pub async fn flip(&self, direction: Direction) -> Result<Transition, NavigationRejected> {
        let current = self.current_index();
        let Some(target) = direction.step(current, self.registry.page_count()) else {
            tracing::debug!("Already at the {} end", direction);
            return Err(NavigationRejected::AtBoundary { direction });
        };
        self.request_navigation(target, NavigationOrigin::UserAction)
            .await
    }

    /// Jump to a content section by id, as a navigation link does.
    pub async fn navigate_to(&self, section: &str) -> Result<Transition, NavigationRejected> {
        let Some((index, _)) = self.registry.resolve_fragment(section) else {
            tracing::debug!("Ignoring link to unknown section {:?}", section);
            return Err(NavigationRejected::UnknownSection);
        };
        self.request_navigation(index, NavigationOrigin::UserAction)
            .await
    }

    pub async fn handle_input(&self, event: InputEvent) -> Result<Transition, NavigationRejected> {
        match event.direction() {
            Some(direction) => self.flip(direction).await,
            None => Err(NavigationRejected::Unmapped),
        }
    }

    /// Fetch the current section again, bypassing the cache.
    ///
    /// Backs the retry button of the inline fallback.
    pub async fn retry(&self) -> Result<PageView, NavigationRejected> {
        let index = {
            let state = self.lock_state();
            if state.closed {
                return Err(NavigationRejected::Closed);
            }
            if state.is_animating() {
                return Err(NavigationRejected::Busy);
            }
            state.current_index
        };
        let Some(section) = self
            .registry
            .id_at(index)
            .filter(|_| index >= self.registry.first_content_index())
            .cloned()
        else {
            return Err(NavigationRejected::UnknownSection);
        };

        tracing::debug!("Retrying {}", section);
        self.adapter.render(index, &PageView::Loading);
        let resolved = self.store.resolve_fresh(&section).await;
        let view = self.present(index, &section, &resolved);
        if resolved.is_ok() && !self.lock_state().closed {
            self.prefetcher.schedule(&self.registry, &section);
        }
        Ok(view)
    }

    /// Wait for background prefetches to finish.
    pub async fn settle_prefetch(&self) {
        self.prefetcher.settle().await;
    }

    /// Stop accepting navigation and cancel background work.
    pub fn teardown(&self) {
        self.lock_state().closed = true;
        self.prefetcher.abort_all();
        tracing::debug!("Navigator torn down");
    }
}

impl<S, A> std::fmt::Debug for Navigator<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("registry", &self.registry)
            .field("state", &self.state)
            .field("positions", &self.positions)
            .finish_non_exhaustive()
    }
}
