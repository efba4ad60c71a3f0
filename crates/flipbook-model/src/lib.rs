//! Core types shared by every flipbook crate.
//!
//! - [`SectionId`]: validated section token, also used as URL fragment
//! - [`SectionRegistry`]: fixed page sequence (cover at index 0)
//! - [`Direction`] / [`NavigationOrigin`]: transition metadata

pub mod direction;
pub mod error;
pub mod registry;
pub mod section;

pub use direction::{Direction, NavigationOrigin};
pub use error::{ModelError, Result};
pub use registry::{DEFAULT_COVER, DEFAULT_SECTION_COUNT, SectionRegistry};
pub use section::SectionId;
