//! What a page shows: content, a loading placeholder, or an inline fallback.

use std::borrow::Cow;
use std::sync::Arc;

use flipbook_model::SectionId;

use crate::error::ContentError;

const LOADING_MARKUP: &str = r#"<div class="loading-spinner">Loading...</div>"#;

/// Kind of inline error state shown in place of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackKind {
    /// 404 or blank body: the section simply is not published yet.
    NotYetAvailable,
    /// Anything else: network trouble, server errors.
    LoadFailed,
}

impl FallbackKind {
    pub fn for_error(error: &ContentError) -> Self {
        if error.is_unpublished() {
            Self::NotYetAvailable
        } else {
            Self::LoadFailed
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            Self::NotYetAvailable => "This section is not available yet.",
            Self::LoadFailed => "Failed to load this section. Please try again later.",
        }
    }
}

/// Renderable state of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    Loading,
    Content(Arc<str>),
    Fallback {
        section: SectionId,
        kind: FallbackKind,
    },
}

impl PageView {
    pub fn from_error(section: &SectionId, error: &ContentError) -> Self {
        Self::Fallback {
            section: section.clone(),
            kind: FallbackKind::for_error(error),
        }
    }

    /// Converts a resolve result into something the page can always render.
    pub fn from_resolved(section: &SectionId, resolved: &Result<Arc<str>, ContentError>) -> Self {
        match resolved {
            Ok(html) => Self::Content(Arc::clone(html)),
            Err(error) => Self::from_error(section, error),
        }
    }

    pub fn is_content(&self) -> bool {
        matches!(self, Self::Content(_))
    }

    pub fn fallback_kind(&self) -> Option<FallbackKind> {
        match self {
            Self::Fallback { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// HTML to place inside the page's content area.
    pub fn to_markup(&self) -> Cow<'_, str> {
        match self {
            Self::Loading => Cow::Borrowed(LOADING_MARKUP),
            Self::Content(html) => Cow::Borrowed(&**html),
            // Section ids are restricted to [A-Za-z0-9_-], safe inside the attribute.
            Self::Fallback { section, kind } => Cow::Owned(format!(
                r#"<div class="error-state"><p>{}</p><button type="button" class="retry" data-retry="{}">Retry</button></div>"#,
                kind.message(),
                section
            )),
        }
    }
}
