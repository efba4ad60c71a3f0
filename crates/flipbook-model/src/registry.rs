//! The fixed, ordered page sequence.
//!
//! Index 0 is always the cover; content sections follow in reading order.
//! The registry is the single authority for index ↔ id resolution, nothing
//! else derives page positions on its own.

use std::collections::HashMap;

use crate::{ModelError, Result, SectionId};

/// Id of the non-navigable cover page.
pub const DEFAULT_COVER: &str = "cover";

/// Number of content sections in the default document.
pub const DEFAULT_SECTION_COUNT: usize = 22;

/// Ordered registry of pages, immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRegistry {
    /// `pages[0]` is the cover.
    pages: Vec<SectionId>,
    positions: HashMap<SectionId, usize>,
}

impl SectionRegistry {
    /// Build a registry from a cover id and the content sections in order.
    pub fn new(cover: SectionId, sections: Vec<SectionId>) -> Result<Self> {
        if sections.is_empty() {
            return Err(ModelError::EmptyRegistry);
        }

        let mut pages = Vec::with_capacity(sections.len() + 1);
        let mut positions = HashMap::with_capacity(sections.len() + 1);
        positions.insert(cover.clone(), 0);
        pages.push(cover);

        for section in sections {
            if positions.contains_key(section.as_str()) {
                return Err(if pages[0] == section {
                    ModelError::CoverCollision(section.to_string())
                } else {
                    ModelError::DuplicateSection(section.to_string())
                });
            }
            positions.insert(section.clone(), pages.len());
            pages.push(section);
        }

        Ok(Self { pages, positions })
    }

    /// Build a registry from raw strings, validating every id.
    pub fn from_ids<I, T>(cover: &str, sections: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let cover = SectionId::new(cover)?;
        let sections = sections
            .into_iter()
            .map(SectionId::new)
            .collect::<Result<Vec<_>>>()?;
        Self::new(cover, sections)
    }

    /// Ids `part1`..`partN`.
    pub fn numbered_ids(count: usize) -> Vec<String> {
        (1..=count).map(|n| format!("part{n}")).collect()
    }

    /// Total number of pages including the cover.
    #[inline]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[inline]
    pub fn last_index(&self) -> usize {
        self.pages.len() - 1
    }

    /// Index of the first content section.
    #[inline]
    pub const fn first_content_index(&self) -> usize {
        1
    }

    pub fn cover(&self) -> &SectionId {
        &self.pages[0]
    }

    /// The section a fresh reader starts on.
    pub fn first_section(&self) -> &SectionId {
        &self.pages[1]
    }

    /// Content sections in reading order (cover excluded).
    pub fn sections(&self) -> &[SectionId] {
        &self.pages[1..]
    }

    /// Whether `id` names a navigable content section.
    ///
    /// The cover is registered but not navigable by fragment.
    pub fn is_valid(&self, id: &str) -> bool {
        self.positions.get(id).is_some_and(|index| *index > 0)
    }

    /// Page index of `id` (cover = 0).
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn id_at(&self, index: usize) -> Option<&SectionId> {
        self.pages.get(index)
    }

    /// Resolve a raw URL fragment to a navigable page.
    pub fn resolve_fragment(&self, fragment: &str) -> Option<(usize, &SectionId)> {
        let raw = fragment.trim();
        let id = raw.strip_prefix('#').unwrap_or(raw);
        if !self.is_valid(id) {
            return None;
        }
        let index = self.positions[id];
        Some((index, &self.pages[index]))
    }

    /// Content sections within `radius` steps of `id`, nearest first.
    ///
    /// Ordering alternates `+1, -1, +2, -2, ...`; entries beyond either end
    /// of the content sequence are skipped. The cover is never included.
    pub fn neighbors(&self, id: &str, radius: usize) -> Vec<SectionId> {
        let Some(index) = self.index_of(id) else {
            return Vec::new();
        };

        // No section lies further than the page count away.
        let radius = radius.min(self.pages.len());
        let mut out = Vec::with_capacity(radius * 2);
        for distance in 1..=radius {
            if let Some(next) = self.pages.get(index + distance) {
                out.push(next.clone());
            }
            if let Some(prev) = index
                .checked_sub(distance)
                .filter(|prev| *prev >= self.first_content_index())
            {
                out.push(self.pages[prev].clone());
            }
        }
        out
    }
}

impl Default for SectionRegistry {
    /// Cover plus `part1`..`part22`.
    fn default() -> Self {
        let pages: Vec<SectionId> = std::iter::once(DEFAULT_COVER.to_string())
            .chain(Self::numbered_ids(DEFAULT_SECTION_COUNT))
            .map(SectionId)
            .collect();
        let positions = pages
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index))
            .collect();
        Self { pages, positions }
    }
}
