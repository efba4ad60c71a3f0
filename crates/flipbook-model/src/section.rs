use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Identifier of one navigable section (`part7`, `cover`, ...).
///
/// Restricted to ASCII alphanumerics, `-` and `_` so the same token can be
/// dropped into a URL path, a fragment and an HTML attribute unescaped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionId(pub(crate) String);

impl SectionId {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        let valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ModelError::InvalidSectionId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fragment form written to the URL and to storage.
    pub fn fragment(&self) -> String {
        format!("#{}", self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SectionId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SectionId> for String {
    fn from(value: SectionId) -> Self {
        value.0
    }
}

impl Borrow<str> for SectionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_tokens() {
        let id = SectionId::new("part12").unwrap();
        assert_eq!(id.as_str(), "part12");
        assert_eq!(id.fragment(), "#part12");
        assert!(SectionId::new("intro_2-b").is_ok());
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(SectionId::new("  part1 ").unwrap().as_str(), "part1");
    }

    #[test]
    fn test_rejects_unsafe_tokens() {
        for raw in ["", "   ", "part 1", "part1\"", "<b>", "../x", "a#b"] {
            assert_eq!(
                SectionId::new(raw),
                Err(ModelError::InvalidSectionId(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_fragment_form() {
        assert_eq!(SectionId::new("part4").unwrap().fragment(), "#part4");
    }

    #[test]
    fn test_serde_goes_through_validation() {
        let id: SectionId = serde_json::from_str("\"part2\"").unwrap();
        assert_eq!(id.as_str(), "part2");
        assert!(serde_json::from_str::<SectionId>("\"bad id\"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"part2\"");
    }
}
