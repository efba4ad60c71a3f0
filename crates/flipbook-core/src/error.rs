//! Reasons a navigation request is turned away.
//!
//! None of these are shown to the reader; callers log them at debug level.

use flipbook_model::Direction;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationRejected {
    #[error("page {index} is outside the book ({page_count} pages)")]
    OutOfRange { index: usize, page_count: usize },

    #[error("page {index} is already showing")]
    AlreadyCurrent { index: usize },

    #[error("a page turn is already in progress")]
    Busy,

    #[error("no page to turn to going {direction}")]
    AtBoundary { direction: Direction },

    #[error("no such section")]
    UnknownSection,

    #[error("input does not map to a page turn")]
    Unmapped,

    #[error("navigator has been torn down")]
    Closed,
}
