//! Store, prefetcher and sources working together.

use std::sync::Arc;

use flipbook_content::{
    ContentError, ContentStore, DirectoryContentSource, HttpContentSource, PageView, Prefetcher,
    StaticContentSource,
};
use flipbook_model::{SectionId, SectionRegistry};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn id(raw: &str) -> SectionId {
    SectionId::new(raw).unwrap()
}

#[tokio::test]
async fn prefetched_sections_are_served_from_cache() {
    let registry = SectionRegistry::default();
    let source = StaticContentSource::new();
    for section in registry.sections() {
        source.insert_page(section.as_str(), format!("<p>{section}</p>"));
    }
    let store = Arc::new(ContentStore::new(source));
    let prefetcher = Prefetcher::new(Arc::clone(&store), 2);

    store.resolve(&id("part10")).await.unwrap();
    let plan = prefetcher.schedule(&registry, &id("part10"));
    assert_eq!(
        plan.spawned,
        vec![id("part11"), id("part9"), id("part12"), id("part8")]
    );
    prefetcher.settle().await;

    for neighbour in ["part8", "part9", "part11", "part12"] {
        store.resolve(&id(neighbour)).await.unwrap();
        assert_eq!(store.source().request_count(neighbour), 1, "{neighbour}");
    }
    assert_eq!(store.source().requests().len(), 5);
}

#[tokio::test]
async fn directory_source_reports_missing_file_as_not_found() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("part1.html"), "<p>one</p>").unwrap();
    let store = ContentStore::new(DirectoryContentSource::new(dir.path()));

    assert_eq!(&*store.resolve(&id("part1")).await.unwrap(), "<p>one</p>");

    let err = store.resolve(&id("part2")).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        PageView::from_error(&id("part2"), &err).fallback_kind(),
        Some(flipbook_content::FallbackKind::NotYetAvailable)
    );
}

#[tokio::test]
async fn unreachable_origin_is_a_retryable_transport_error() {
    let source = HttpContentSource::new("http://127.0.0.1:1/chapters").unwrap();
    let store = ContentStore::new(source);

    let err = store.resolve(&id("part1")).await.unwrap_err();
    assert!(matches!(err, ContentError::Transport { .. }));
    assert!(err.is_retryable());
    assert!(!err.is_unpublished());
    assert!(!store.is_cached(&id("part1")));
}

#[tokio::test]
async fn http_requests_bypass_caches() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let origin = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let read = socket.read(&mut buf).await.unwrap();
            assert!(read > 0, "connection closed before headers ended");
            request.extend_from_slice(&buf[..read]);
        }
        let body = "<p>three</p>";
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        String::from_utf8(request).unwrap().to_ascii_lowercase()
    });

    let source = HttpContentSource::new(&format!("http://{addr}/chapters")).unwrap();
    let store = ContentStore::new(source);
    assert_eq!(&*store.resolve(&id("part3")).await.unwrap(), "<p>three</p>");

    let request = origin.await.unwrap();
    assert!(request.starts_with("get /chapters/part3.html?t="), "{request}");
    assert!(request.contains("\r\ncache-control: no-store\r\n"), "{request}");
    assert!(request.contains("\r\npragma: no-cache\r\n"), "{request}");
}
