//! Content pipeline for the flipbook navigator.
//!
//! Section bodies are HTML fragments fetched from a [`ContentSource`] and
//! kept for the rest of the session in the [`ContentStore`] cache. After a
//! page loads, the [`Prefetcher`] warms the sections around it in the
//! background.
//!
//! # Sources
//!
//! - [`HttpContentSource`]: `GET <base>/<id>.html?t=<millis>` with caching
//!   disabled at every layer
//! - [`DirectoryContentSource`]: `<root>/<id>.html` on the local disk
//! - [`StaticContentSource`]: in-memory pages, useful for embedding and tests
//!
//! # Failures
//!
//! Loading errors never escape as panics or stuck state. Callers turn a
//! failed [`ContentStore::resolve`] into a [`PageView::Fallback`] whose
//! markup carries a retry button:
//!
//! ```
//! use flipbook_content::{ContentError, FallbackKind, PageView};
//! use flipbook_model::SectionId;
//!
//! let section = SectionId::new("part5").unwrap();
//! let error = ContentError::Fetch { section: section.clone(), status: 404 };
//! let view = PageView::from_error(&section, &error);
//! assert_eq!(view.fallback_kind(), Some(FallbackKind::NotYetAvailable));
//! assert!(view.to_markup().contains("data-retry=\"part5\""));
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod markup;
pub mod prefetch;
pub mod source;
pub mod store;

pub use error::{ContentError, Result};
pub use markup::{FallbackKind, PageView};
pub use prefetch::{DEFAULT_PREFETCH_RADIUS, PrefetchPlan, Prefetcher};
pub use source::{
    ContentSource, DirectoryContentSource, HttpContentSource, SourceResponse, StaticContentSource,
};
pub use store::{ContentCache, ContentStore};
