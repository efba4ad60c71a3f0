//! Error types for content loading.

use flipbook_model::SectionId;
use thiserror::Error;

use crate::markup::FallbackKind;

/// HTTP status the content source uses for "not published yet".
pub const NOT_FOUND: u16 = 404;

/// Errors that can occur while resolving a section's content.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContentError {
    /// The source answered with a non-success status.
    #[error("fetching {section} failed with status {status}")]
    Fetch {
        /// Section that was requested.
        section: SectionId,
        /// Status code returned by the source.
        status: u16,
    },

    /// The source answered successfully but the body was blank.
    #[error("content for {section} is empty")]
    Empty {
        /// Section that was requested.
        section: SectionId,
    },

    /// The source could not be reached at all.
    #[error("could not load {section}: {message}")]
    Transport {
        /// Section that was requested.
        section: SectionId,
        /// Underlying transport failure.
        message: String,
    },

    /// The configured base URL cannot address section files.
    #[error("invalid content base URL {url}: {reason}")]
    InvalidBaseUrl {
        /// URL as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ContentError {
    pub(crate) fn transport(section: &SectionId, err: impl std::fmt::Display) -> Self {
        Self::Transport {
            section: section.clone(),
            message: err.to_string(),
        }
    }

    /// Section the failure belongs to, when there is one.
    pub fn section(&self) -> Option<&SectionId> {
        match self {
            Self::Fetch { section, .. }
            | Self::Empty { section }
            | Self::Transport { section, .. } => Some(section),
            Self::InvalidBaseUrl { .. } => None,
        }
    }

    /// Status code for [`ContentError::Fetch`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the source reported the section as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(NOT_FOUND)
    }

    /// Whether the page should read as "not yet available" rather than broken.
    #[must_use]
    pub fn is_unpublished(&self) -> bool {
        self.is_not_found() || matches!(self, Self::Empty { .. })
    }

    /// Returns a user-friendly message suitable for the inline error state.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        FallbackKind::for_error(self).message()
    }

    /// Returns whether a manual retry can plausibly succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidBaseUrl { .. })
    }
}

/// Result type alias for content operations.
pub type Result<T> = std::result::Result<T, ContentError>;
