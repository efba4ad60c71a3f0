//! Transition metadata.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which way a page flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Direction of travel from `from` to `to`.
    ///
    /// Equal indices count as backward; callers reject that case before
    /// a transition starts.
    #[must_use]
    pub fn between(from: usize, to: usize) -> Self {
        if to > from {
            Self::Forward
        } else {
            Self::Backward
        }
    }

    /// Index one step away from `index`, or `None` past either end.
    #[must_use]
    pub fn step(self, index: usize, page_count: usize) -> Option<usize> {
        match self {
            Self::Forward => index.checked_add(1).filter(|next| *next < page_count),
            Self::Backward => index.checked_sub(1),
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who asked for a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationOrigin {
    /// Click, key press, swipe or navigation link.
    UserAction,
    /// URL fragment changed outside the navigator (back/forward, manual edit).
    ExternalHash,
}

impl fmt::Display for NavigationOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserAction => f.write_str("user action"),
            Self::ExternalHash => f.write_str("external hash"),
        }
    }
}
