//! Error types for section and registry construction.

use thiserror::Error;

/// Errors raised while building section identifiers or the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid section id: {0:?}")]
    InvalidSectionId(String),

    #[error("section registry must contain at least one content section")]
    EmptyRegistry,

    #[error("duplicate section id: {0}")]
    DuplicateSection(String),

    #[error("cover id {0} is also listed as a content section")]
    CoverCollision(String),
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
