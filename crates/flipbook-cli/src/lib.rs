//! Terminal host for the flipbook navigator.

pub mod config;
pub mod logging;
pub mod presenter;
pub mod report;
pub mod repl;
pub mod source;
