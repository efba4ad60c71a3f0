//! Turning fragment-change notifications into navigation requests.

use std::sync::Arc;

use flipbook_content::ContentSource;
use flipbook_model::NavigationOrigin;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::error::NavigationRejected;
use crate::navigator::{Navigator, Transition};
use crate::presentation::PresentationAdapter;

/// Why a notification did not start a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Initializing,
    UnknownSection,
    AlreadyCurrent,
    Busy,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The navigator's own fragment write coming back.
    Suppressed,
    Ignored(IgnoreReason),
    Navigated(Transition),
}

enum Decision {
    Done(RouteOutcome),
    Navigate(usize),
}

/// Bridges the fragment surface to a [`Navigator`].
pub struct HashRouter<S, A> {
    navigator: Arc<Navigator<S, A>>,
}

impl<S: ContentSource, A: PresentationAdapter> HashRouter<S, A> {
    pub fn new(navigator: Arc<Navigator<S, A>>) -> Self {
        Self { navigator }
    }

    pub fn navigator(&self) -> &Arc<Navigator<S, A>> {
        &self.navigator
    }

    /// Classify one notification under the navigator's lock.
    ///
    /// Pending self-writes are consumed first, one per notification, so a
    /// batch of our own writes is swallowed in full and nothing else is.
    fn decide(&self, raw: &str) -> Decision {
        let mut state = self.navigator.lock_state();
        if state.suppress_routing() {
            state.pending_self_writes -= 1;
            return Decision::Done(RouteOutcome::Suppressed);
        }
        if state.closed {
            return Decision::Done(RouteOutcome::Ignored(IgnoreReason::Closed));
        }
        if state.initializing {
            return Decision::Done(RouteOutcome::Ignored(IgnoreReason::Initializing));
        }
        let Some((index, _)) = self.navigator.registry().resolve_fragment(raw) else {
            return Decision::Done(RouteOutcome::Ignored(IgnoreReason::UnknownSection));
        };
        if index == state.current_index {
            return Decision::Done(RouteOutcome::Ignored(IgnoreReason::AlreadyCurrent));
        }
        if state.is_animating() {
            return Decision::Done(RouteOutcome::Ignored(IgnoreReason::Busy));
        }
        Decision::Navigate(index)
    }

    /// Handle one notification, running the resulting transition to
    /// completion.
    pub async fn on_fragment_changed(&self, raw: &str) -> RouteOutcome {
        match self.decide(raw) {
            Decision::Done(outcome) => {
                tracing::trace!("Fragment {:?}: {:?}", raw, outcome);
                outcome
            }
            Decision::Navigate(index) => {
                match self
                    .navigator
                    .request_navigation(index, NavigationOrigin::ExternalHash)
                    .await
                {
                    Ok(transition) => RouteOutcome::Navigated(transition),
                    Err(reason) => RouteOutcome::Ignored(ignore_reason(reason)),
                }
            }
        }
    }

    /// Consume notifications until the channel closes.
    ///
    /// Navigations are spawned so the loop keeps draining notifications
    /// (and pairing suppressions) while a page turn is in flight.
    pub async fn run(&self, mut notifications: mpsc::UnboundedReceiver<String>) {
        let mut navigations = JoinSet::new();

        while let Some(raw) = notifications.recv().await {
            while navigations.try_join_next().is_some() {}

            match self.decide(&raw) {
                Decision::Done(outcome) => {
                    tracing::trace!("Fragment {:?}: {:?}", raw, outcome);
                }
                Decision::Navigate(index) => {
                    let navigator = Arc::clone(&self.navigator);
                    navigations.spawn(async move {
                        // Rejections are logged by the navigator.
                        let _ = navigator
                            .request_navigation(index, NavigationOrigin::ExternalHash)
                            .await;
                    });
                }
            }
        }

        while navigations.join_next().await.is_some() {}
        tracing::debug!("Fragment notifications closed");
    }
}

fn ignore_reason(rejected: NavigationRejected) -> IgnoreReason {
    match rejected {
        NavigationRejected::Busy => IgnoreReason::Busy,
        NavigationRejected::AlreadyCurrent { .. } => IgnoreReason::AlreadyCurrent,
        NavigationRejected::Closed => IgnoreReason::Closed,
        NavigationRejected::OutOfRange { .. }
        | NavigationRejected::AtBoundary { .. }
        | NavigationRejected::UnknownSection
        | NavigationRejected::Unmapped => IgnoreReason::UnknownSection,
    }
}
