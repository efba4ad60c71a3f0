//! Choosing and showing the first page.

mod common;

use common::{Event, HarnessBuilder, small_book};
use flipbook_content::{FallbackKind, PageView, StaticContentSource};
use flipbook_core::{MemorySurface, Navigator, NavigatorConfig, NavigationSurface, StartSource};
use flipbook_model::SectionRegistry;
use flipbook_persistence::MemoryStore;

#[tokio::test]
async fn persisted_position_wins_without_fragment() {
    let mut harness = HarnessBuilder::new(SectionRegistry::default())
        .persisted("#part4")
        .build();

    let report = harness.navigator.start().await.unwrap();

    assert_eq!(report.index, 4);
    assert_eq!(report.section.as_str(), "part4");
    assert_eq!(report.source, StartSource::Persisted);
    assert!(report.view.is_content());
    assert_eq!(harness.surface.fragment().as_deref(), Some("#part4"));
    assert_eq!(harness.drain_notifications(), vec!["#part4".to_string()]);

    let state = harness.navigator.snapshot();
    assert!(!state.initializing);
    assert_eq!(state.pending_self_writes, 1);
}

#[tokio::test]
async fn persisted_position_wins_over_fragment() {
    let harness = HarnessBuilder::new(SectionRegistry::default())
        .persisted("#part4")
        .fragment("#part10")
        .build();

    let report = harness.navigator.start().await.unwrap();
    assert_eq!(report.index, 4);
    assert_eq!(harness.surface.fragment().as_deref(), Some("#part4"));
}

#[tokio::test]
async fn fragment_used_when_nothing_persisted() {
    let mut harness = HarnessBuilder::new(SectionRegistry::default())
        .fragment("#part10")
        .build();

    let report = harness.navigator.start().await.unwrap();
    assert_eq!(report.index, 10);
    assert_eq!(report.source, StartSource::Fragment);
    // Already showing the right fragment: no write, nothing to suppress.
    assert!(harness.drain_notifications().is_empty());
    assert!(!harness.navigator.snapshot().suppress_routing());
}

#[tokio::test]
async fn invalid_inputs_fall_back_to_first_section() {
    let harness = HarnessBuilder::new(small_book())
        .persisted("#part40")
        .fragment("#nowhere")
        .build();

    let report = harness.navigator.start().await.unwrap();
    assert_eq!(report.index, 1);
    assert_eq!(report.source, StartSource::Default);
    assert_eq!(harness.surface.fragment().as_deref(), Some("#part1"));
}

#[tokio::test]
async fn startup_renders_loading_then_content_and_controls() {
    let harness = HarnessBuilder::new(small_book()).build();
    harness.navigator.start().await.unwrap();

    let events = harness.navigator.adapter().events();
    assert_eq!(events[0], Event::Render(1, PageView::Loading));
    assert!(matches!(&events[1], Event::Render(1, PageView::Content(_))));
    match &events[2] {
        Event::Controls(controls) => {
            assert!(controls.prev_enabled);
            assert!(controls.next_enabled);
            assert_eq!(controls.indicator(), "1 / 3");
        }
        other => panic!("expected controls, got {other:?}"),
    }
}

#[tokio::test]
async fn startup_failure_still_finishes_initializing() {
    let harness = HarnessBuilder::new(small_book())
        .source(StaticContentSource::new())
        .build();

    let report = harness.navigator.start().await.unwrap();
    assert_eq!(report.view.fallback_kind(), Some(FallbackKind::NotYetAvailable));
    assert!(!harness.navigator.snapshot().initializing);
}

#[tokio::test]
async fn warm_all_prefetches_every_section() {
    let config = NavigatorConfig::from_toml_str(
        r#"
        sections = ["a", "b", "c", "d", "e", "f"]

        [prefetch]
        radius = 1
        warm_all_on_startup = true
        "#,
    )
    .unwrap();
    let registry = config.registry().unwrap();
    let (surface, _notifications) = MemorySurface::new();

    let navigator = Navigator::from_config(
        &config,
        common::published(&registry),
        common::RecordingAdapter::default(),
        surface,
        MemoryStore::new(),
    )
    .unwrap();

    navigator.start().await.unwrap();
    navigator.settle_prefetch().await;

    assert_eq!(navigator.store().cached_sections().len(), 6);
    for section in registry.sections() {
        assert_eq!(
            navigator.store().source().request_count(section.as_str()),
            1,
            "{section}"
        );
    }
}

#[tokio::test]
async fn disabled_prefetch_fetches_only_the_first_page() {
    let config = NavigatorConfig::from_toml_str("[prefetch]\nenabled = false").unwrap();
    let registry = config.registry().unwrap();
    let (surface, _notifications) = MemorySurface::new();

    let navigator = Navigator::from_config(
        &config,
        common::published(&registry),
        common::RecordingAdapter::default(),
        surface,
        MemoryStore::new(),
    )
    .unwrap();

    navigator.start().await.unwrap();
    navigator.settle_prefetch().await;
    assert_eq!(navigator.store().source().requests().len(), 1);
}
