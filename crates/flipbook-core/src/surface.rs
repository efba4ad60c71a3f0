//! The URL-fragment side of the host.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

/// Where the `#<id>` fragment lives.
///
/// Hosts deliver fragment-change notifications to
/// [`HashRouter`](crate::HashRouter) separately, one per effective change,
/// including changes caused by [`set_fragment`](Self::set_fragment).
pub trait NavigationSurface: Send + Sync + 'static {
    fn fragment(&self) -> Option<String>;

    fn set_fragment(&self, fragment: &str);
}

impl<T: NavigationSurface + ?Sized> NavigationSurface for Arc<T> {
    fn fragment(&self) -> Option<String> {
        (**self).fragment()
    }

    fn set_fragment(&self, fragment: &str) {
        (**self).set_fragment(fragment);
    }
}

/// In-process surface that reports changes on a channel, like a browser
/// firing `hashchange`.
#[derive(Debug)]
pub struct MemorySurface {
    fragment: Mutex<Option<String>>,
    notify: mpsc::UnboundedSender<String>,
}

impl MemorySurface {
    /// A surface with no fragment plus the receiving end of its notifications.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (notify, notifications) = mpsc::unbounded_channel();
        let surface = Self {
            fragment: Mutex::new(None),
            notify,
        };
        (surface, notifications)
    }

    /// Start with `fragment` already present (no notification).
    pub fn with_fragment(self, fragment: &str) -> Self {
        *self.fragment.lock().unwrap_or_else(PoisonError::into_inner) = Some(fragment.to_string());
        self
    }

    /// A change made outside the navigator: manual edit, back/forward.
    pub fn simulate_external(&self, fragment: &str) {
        self.replace(fragment);
    }

    fn replace(&self, fragment: &str) {
        let mut current = self.fragment.lock().unwrap_or_else(PoisonError::into_inner);
        if current.as_deref() == Some(fragment) {
            return;
        }
        *current = Some(fragment.to_string());
        // The router may already be gone during shutdown.
        let _ = self.notify.send(fragment.to_string());
    }
}

impl NavigationSurface for MemorySurface {
    fn fragment(&self) -> Option<String> {
        self.fragment
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_fragment(&self, fragment: &str) {
        self.replace(fragment);
    }
}
