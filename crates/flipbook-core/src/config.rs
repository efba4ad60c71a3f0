//! Navigator configuration.
//!
//! Every field has a default, so an empty TOML document describes the stock
//! 22-section book with neighbour prefetching on.

use std::path::{Path, PathBuf};

use flipbook_content::DEFAULT_PREFETCH_RADIUS;
use flipbook_model::{DEFAULT_COVER, DEFAULT_SECTION_COUNT, ModelError, SectionRegistry};
use flipbook_persistence::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid section list: {0}")]
    Sections(#[from] ModelError),
}

/// Background warming of neighbouring sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefetchConfig {
    pub enabled: bool,
    /// Sections on each side of the current one.
    pub radius: usize,
    /// Also warm every section once the first page has loaded.
    pub warm_all_on_startup: bool,
}

impl PrefetchConfig {
    /// Prefetch radius in effect, zero when prefetching is off.
    pub fn effective_radius(&self) -> usize {
        if self.enabled {
            self.radius
        } else {
            0
        }
    }
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: DEFAULT_PREFETCH_RADIUS,
            warm_all_on_startup: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Id of the cover page.
    pub cover: String,
    /// Content sections in reading order.
    pub sections: Vec<String>,
    /// Key the last viewed section is persisted under.
    pub storage_key: String,
    pub prefetch: PrefetchConfig,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            cover: DEFAULT_COVER.to_string(),
            sections: SectionRegistry::numbered_ids(DEFAULT_SECTION_COUNT),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            prefetch: PrefetchConfig::default(),
        }
    }
}

impl NavigatorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Build the page registry described by `cover` and `sections`.
    pub fn registry(&self) -> Result<SectionRegistry, ConfigError> {
        Ok(SectionRegistry::from_ids(&self.cover, self.sections.iter().cloned())?)
    }
}
