//! Content source chosen at runtime from configuration.

use flipbook_content::{
    ContentSource, DirectoryContentSource, HttpContentSource, Result, SourceResponse,
};
use flipbook_model::SectionId;

use crate::config::ContentLocation;

#[derive(Debug)]
pub enum ReaderSource {
    Http(HttpContentSource),
    Directory(DirectoryContentSource),
}

impl ReaderSource {
    pub fn open(location: &ContentLocation) -> Result<Self> {
        Ok(match location {
            ContentLocation::Http {
                base_url,
                cache_bust,
            } => Self::Http(HttpContentSource::new(base_url)?.with_cache_bust(*cache_bust)),
            ContentLocation::Directory(root) => {
                Self::Directory(DirectoryContentSource::new(root.clone()))
            }
        })
    }

    /// Human-readable origin, for status output.
    pub fn describe(&self) -> String {
        match self {
            Self::Http(source) => source.base_url().to_string(),
            Self::Directory(source) => source.root().display().to_string(),
        }
    }
}

impl ContentSource for ReaderSource {
    async fn fetch(&self, section: &SectionId) -> Result<SourceResponse> {
        match self {
            Self::Http(source) => source.fetch(section).await,
            Self::Directory(source) => source.fetch(section).await,
        }
    }
}
