//! Persistent storage of the reader's last viewed section.
//!
//! # Overview
//!
//! The navigator remembers one value: the fragment of the section the reader
//! last settled on. Storage is abstracted behind [`KeyValueStore`] so hosts can
//! back it with memory (tests), a JSON file (CLI), or anything else.
//!
//! # Example
//!
//! ```
//! use flipbook_model::{SectionId, SectionRegistry};
//! use flipbook_persistence::{MemoryStore, PositionStore};
//!
//! let registry = SectionRegistry::default();
//! let positions = PositionStore::new(MemoryStore::new());
//!
//! positions.save(&SectionId::new("part7").unwrap());
//! assert_eq!(positions.load(&registry).unwrap().as_str(), "part7");
//! ```

pub mod error;
pub mod position;
pub mod store;

pub use error::{PersistenceError, Result};
pub use position::{DEFAULT_STORAGE_KEY, PositionStore};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
