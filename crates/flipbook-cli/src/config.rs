//! Reader configuration file.
//!
//! ```toml
//! [book]
//! sections = ["intro", "part1", "part2"]
//!
//! [content]
//! base_url = "https://example.org/book/chapters/"
//!
//! [storage]
//! state_file = "~/.local/state/flipbook.json"
//!
//! [presentation]
//! animation_ms = 600
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flipbook_core::NavigatorConfig;
use serde::{Deserialize, Serialize};

/// Directory read when neither a base URL nor a directory is configured.
pub const DEFAULT_CONTENT_DIR: &str = "chapters";

/// State file used when none is configured.
pub const DEFAULT_STATE_FILE: &str = ".flipbook-state.json";

/// Length of the simulated page-turn animation.
pub const DEFAULT_ANIMATION_MS: u64 = 600;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub book: NavigatorConfig,
    pub content: ContentConfig,
    pub storage: StorageConfig,
    pub presentation: PresentationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Fetch `<base_url>/<id>.html` over HTTP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Read `<directory>/<id>.html` from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    /// Append a `?t=<millis>` stamp to HTTP requests.
    pub cache_bust: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            directory: None,
            cache_bust: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
}

impl StorageConfig {
    pub fn state_file(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub animation_ms: u64,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            animation_ms: DEFAULT_ANIMATION_MS,
        }
    }
}

/// Where page content comes from, after defaults and overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentLocation {
    Http { base_url: String, cache_bust: bool },
    Directory(PathBuf),
}

impl AppConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))
    }

    /// A base URL wins over a directory.
    pub fn content_location(&self) -> ContentLocation {
        match (&self.content.base_url, &self.content.directory) {
            (Some(base_url), _) => ContentLocation::Http {
                base_url: base_url.clone(),
                cache_bust: self.content.cache_bust,
            },
            (None, Some(directory)) => ContentLocation::Directory(directory.clone()),
            (None, None) => ContentLocation::Directory(PathBuf::from(DEFAULT_CONTENT_DIR)),
        }
    }
}
