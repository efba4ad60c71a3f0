//! What the navigator needs from whatever draws the pages.

use std::future::Future;

use flipbook_content::PageView;
use flipbook_model::{Direction, SectionId, SectionRegistry};

/// Host-side rendering hooks.
///
/// The navigator only sequences these calls; visuals are the host's business.
pub trait PresentationAdapter: Send + Sync + 'static {
    /// Play the page-turn animation. The returned future must complete exactly
    /// once.
    fn animate(
        &self,
        from: usize,
        to: usize,
        direction: Direction,
    ) -> impl Future<Output = ()> + Send;

    /// Show `view` on page `index`.
    fn render(&self, index: usize, view: &PageView);

    /// Buttons, page indicator and active navigation link changed.
    fn controls_changed(&self, controls: &Controls) {
        let _ = controls;
    }
}

/// Control state derived from the current index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub prev_enabled: bool,
    pub next_enabled: bool,
    /// 1-based page number; the cover shows as page 1.
    pub page_number: usize,
    /// Content pages; the cover is not counted.
    pub total_pages: usize,
    /// Section to highlight in the navigation menu, none on the cover.
    pub active_section: Option<SectionId>,
}

impl Controls {
    pub fn for_index(registry: &SectionRegistry, index: usize) -> Self {
        let active_section = if index >= registry.first_content_index() {
            registry.id_at(index).cloned()
        } else {
            None
        };
        Self {
            prev_enabled: index > 0,
            next_enabled: index < registry.last_index(),
            page_number: index.max(1),
            total_pages: registry.page_count() - 1,
            active_section,
        }
    }

    /// Page indicator text, e.g. `3 / 22`.
    pub fn indicator(&self) -> String {
        format!("{} / {}", self.page_number, self.total_pages)
    }
}
