//! Shared fixtures for navigator integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use flipbook_content::{PageView, StaticContentSource};
use flipbook_core::{Controls, MemorySurface, Navigator, PresentationAdapter};
use flipbook_model::{Direction, SectionRegistry};
use flipbook_persistence::{MemoryStore, PositionStore};
use tokio::sync::{Semaphore, mpsc};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Render(usize, PageView),
    Animate {
        from: usize,
        to: usize,
        direction: Direction,
    },
    Controls(Controls),
}

/// Records every presentation call. When gated, each animation waits for a
/// permit so tests can observe the `Transitioning` phase.
#[derive(Default)]
pub struct RecordingAdapter {
    events: Mutex<Vec<Event>>,
    gate: Option<Arc<Semaphore>>,
}

impl RecordingAdapter {
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let adapter = Self {
            events: Mutex::default(),
            gate: Some(Arc::clone(&gate)),
        };
        (adapter, gate)
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn animations(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::Animate { .. }))
            .count()
    }

    pub fn last_render(&self) -> Option<(usize, PageView)> {
        self.events().into_iter().rev().find_map(|event| match event {
            Event::Render(index, view) => Some((index, view)),
            _ => None,
        })
    }

    pub fn last_controls(&self) -> Option<Controls> {
        self.events().into_iter().rev().find_map(|event| match event {
            Event::Controls(controls) => Some(controls),
            _ => None,
        })
    }
}

impl PresentationAdapter for RecordingAdapter {
    async fn animate(&self, from: usize, to: usize, direction: Direction) {
        self.events.lock().unwrap().push(Event::Animate {
            from,
            to,
            direction,
        });
        if let Some(gate) = &self.gate
            && let Ok(permit) = gate.acquire().await
        {
            permit.forget();
        }
    }

    fn render(&self, index: usize, view: &PageView) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Render(index, view.clone()));
    }

    fn controls_changed(&self, controls: &Controls) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Controls(controls.clone()));
    }
}

pub type TestNavigator = Navigator<StaticContentSource, RecordingAdapter>;

/// `[cover, part1, part2, part3]`.
pub fn small_book() -> SectionRegistry {
    SectionRegistry::from_ids("cover", ["part1", "part2", "part3"]).unwrap()
}

/// Every content section of `registry` published as `<p>{id}</p>`.
pub fn published(registry: &SectionRegistry) -> StaticContentSource {
    let source = StaticContentSource::new();
    for section in registry.sections() {
        source.insert_page(section.as_str(), format!("<p>{section}</p>"));
    }
    source
}

pub struct Harness {
    pub navigator: Arc<TestNavigator>,
    pub surface: Arc<MemorySurface>,
    pub notifications: mpsc::UnboundedReceiver<String>,
    pub gate: Option<Arc<Semaphore>>,
}

pub struct HarnessBuilder {
    registry: SectionRegistry,
    source: Option<StaticContentSource>,
    storage: MemoryStore,
    fragment: Option<String>,
    gated: bool,
}

impl HarnessBuilder {
    pub fn new(registry: SectionRegistry) -> Self {
        Self {
            registry,
            source: None,
            storage: MemoryStore::new(),
            fragment: None,
            gated: false,
        }
    }

    pub fn source(mut self, source: StaticContentSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn persisted(mut self, value: &str) -> Self {
        self.storage = self.storage.with_entry("lastViewedSection", value);
        self
    }

    pub fn fragment(mut self, fragment: &str) -> Self {
        self.fragment = Some(fragment.to_string());
        self
    }

    pub fn gated(mut self) -> Self {
        self.gated = true;
        self
    }

    pub fn build(self) -> Harness {
        let source = self.source.unwrap_or_else(|| published(&self.registry));
        let (surface, notifications) = MemorySurface::new();
        let surface = Arc::new(match &self.fragment {
            Some(fragment) => surface.with_fragment(fragment),
            None => surface,
        });
        let (adapter, gate) = if self.gated {
            let (adapter, gate) = RecordingAdapter::gated();
            (adapter, Some(gate))
        } else {
            (RecordingAdapter::default(), None)
        };

        let navigator = Navigator::new(
            self.registry,
            source,
            adapter,
            Arc::clone(&surface),
            PositionStore::new(self.storage),
        );

        Harness {
            navigator: Arc::new(navigator),
            surface,
            notifications,
            gate,
        }
    }
}

impl Harness {
    /// Yield until the navigator reports an in-flight transition.
    pub async fn wait_until_animating(&self) {
        while !self.navigator.snapshot().is_animating() {
            tokio::task::yield_now().await;
        }
    }

    pub fn release_animation(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Drop every pending fragment notification.
    pub fn drain_notifications(&mut self) -> Vec<String> {
        let mut drained = Vec::new();
        while let Ok(raw) = self.notifications.try_recv() {
            drained.push(raw);
        }
        drained
    }
}
