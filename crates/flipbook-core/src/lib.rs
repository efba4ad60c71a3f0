//! Navigation engine for a page-flip reader.
//!
//! Keeps three views of "where the reader is" in agreement: the in-memory
//! page index, the URL fragment of the host surface and the persisted last
//! viewed section.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   InputEvent    ┌─────────────────────────────┐
//! │ host / REPL  │ ──────────────► │ Navigator                   │
//! └──────────────┘                 │  Idle ⇄ Transitioning       │
//!        ▲                         │  animate ∥ resolve → commit │
//!        │ fragment notifications  └──────┬───────────┬──────────┘
//! ┌──────┴───────┐                        │           │
//! │ HashRouter   │ ── request_navigation ─┘           ▼
//! └──────────────┘                        PresentationAdapter,
//!                                         NavigationSurface, PositionStore
//! ```
//!
//! Exactly one transition runs at a time. Requests that arrive while one is
//! in flight are dropped, never queued.

pub mod config;
pub mod error;
pub mod input;
pub mod navigator;
pub mod presentation;
pub mod router;
pub mod state;
pub mod surface;

pub use config::{ConfigError, NavigatorConfig, PrefetchConfig};
pub use error::NavigationRejected;
pub use input::{InputEvent, Key, SWIPE_THRESHOLD_PX};
pub use navigator::{Navigator, StartSource, StartupReport, Transition};
pub use presentation::{Controls, PresentationAdapter};
pub use router::{HashRouter, IgnoreReason, RouteOutcome};
pub use state::{NavigationState, Phase};
pub use surface::{MemorySurface, NavigationSurface};
