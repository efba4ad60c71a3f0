//! Content sources: where section bodies come from.
//!
//! A source only knows how to issue one request per call. Caching, status
//! interpretation and empty-body detection live in [`crate::ContentStore`].

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};

use chrono::Utc;
use flipbook_model::SectionId;
use reqwest::Url;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA, USER_AGENT};

use crate::error::{ContentError, NOT_FOUND, Result};

/// User agent string for content requests.
const USER_AGENT_VALUE: &str = concat!("flipbook/", env!("CARGO_PKG_VERSION"));

/// Query parameter carrying the cache-busting stamp.
const CACHE_BUST_PARAM: &str = "t";

/// Raw answer from a content source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResponse {
    /// HTTP-like status code.
    pub status: u16,
    /// Response body (empty for failures).
    pub body: String,
}

impl SourceResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability to fetch one section's HTML fragment.
///
/// Implementations must always go to the origin; the store above them is the
/// only cache. Transport failures are reported as
/// [`ContentError::Transport`], anything the origin answered (including
/// errors) as a [`SourceResponse`].
pub trait ContentSource: Send + Sync + 'static {
    fn fetch(&self, section: &SectionId) -> impl Future<Output = Result<SourceResponse>> + Send;
}

// =============================================================================
// HTTP
// =============================================================================

/// Fetches `<base>/<id>.html` over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpContentSource {
    client: reqwest::Client,
    base: Url,
    cache_bust: bool,
}

impl HttpContentSource {
    /// Creates a source rooted at `base_url` (a trailing `/` is implied).
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url).map_err(|e| ContentError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ContentError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        // No request timeout: a stalled fetch delays the transition, it does not abort it.
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ContentError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base,
            cache_bust: true,
        })
    }

    /// Enable or disable the `?t=<millis>` cache-busting parameter.
    #[must_use]
    pub fn with_cache_bust(mut self, enable: bool) -> Self {
        self.cache_bust = enable;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// URL for `section`, stamped with `stamp` when cache busting is on.
    pub fn section_url(&self, section: &SectionId, stamp: i64) -> Result<Url> {
        let mut url = self
            .base
            .join(&format!("{section}.html"))
            .map_err(|e| ContentError::transport(section, e))?;
        if self.cache_bust {
            url.query_pairs_mut()
                .append_pair(CACHE_BUST_PARAM, &stamp.to_string());
        }
        Ok(url)
    }
}

impl ContentSource for HttpContentSource {
    async fn fetch(&self, section: &SectionId) -> Result<SourceResponse> {
        let url = self.section_url(section, Utc::now().timestamp_millis())?;
        tracing::debug!("Fetching {} from {}", section, url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ContentError::transport(section, e))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(SourceResponse::status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ContentError::transport(section, e))?;

        Ok(SourceResponse {
            status: status.as_u16(),
            body,
        })
    }
}

// =============================================================================
// DIRECTORY
// =============================================================================

/// Reads `<root>/<id>.html` from disk. A missing file answers 404.
#[derive(Debug, Clone)]
pub struct DirectoryContentSource {
    root: PathBuf,
}

impl DirectoryContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn section_path(&self, section: &SectionId) -> PathBuf {
        self.root.join(format!("{section}.html"))
    }
}

impl ContentSource for DirectoryContentSource {
    async fn fetch(&self, section: &SectionId) -> Result<SourceResponse> {
        let path = self.section_path(section);
        tracing::debug!("Reading {} from {}", section, path.display());

        match tokio::fs::read_to_string(&path).await {
            Ok(body) => Ok(SourceResponse::ok(body)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(SourceResponse::status(NOT_FOUND))
            }
            Err(e) => Err(ContentError::transport(
                section,
                format!("{}: {e}", path.display()),
            )),
        }
    }
}

// =============================================================================
// STATIC
// =============================================================================

/// In-memory pages keyed by section id. Unknown sections answer 404.
///
/// Records every request so callers can see how often the origin was hit.
#[derive(Debug, Default)]
pub struct StaticContentSource {
    pages: RwLock<HashMap<String, SourceResponse>>,
    requests: Mutex<Vec<SectionId>>,
}

impl StaticContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Self::insert_page`].
    #[must_use]
    pub fn with_page(self, section: &str, body: impl Into<String>) -> Self {
        self.insert_page(section, body);
        self
    }

    /// Builder form of [`Self::insert_status`].
    #[must_use]
    pub fn with_status(self, section: &str, status: u16) -> Self {
        self.insert_status(section, status);
        self
    }

    pub fn insert_page(&self, section: &str, body: impl Into<String>) {
        self.pages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(section.to_string(), SourceResponse::ok(body));
    }

    pub fn insert_status(&self, section: &str, status: u16) {
        self.pages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(section.to_string(), SourceResponse::status(status));
    }

    /// Every section requested so far, in order.
    pub fn requests(&self) -> Vec<SectionId> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times `section` was requested.
    pub fn request_count(&self, section: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|id| id.as_str() == section)
            .count()
    }
}

impl ContentSource for StaticContentSource {
    async fn fetch(&self, section: &SectionId) -> Result<SourceResponse> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(section.clone());

        let response = self
            .pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(section.as_str())
            .cloned()
            .unwrap_or_else(|| SourceResponse::status(NOT_FOUND));
        Ok(response)
    }
}
