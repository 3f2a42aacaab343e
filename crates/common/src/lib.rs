//! xmeml Common Utilities
//!
//! Shared infrastructure for all xmeml crates:
//! - Error types and result aliases
//! - Target-editor profiles (Premiere / Resolve)
//! - Tracing/logging initialization
//! - Configuration loading

pub mod config;
pub mod error;
pub mod logging;
pub mod target;

pub use config::*;
pub use error::*;
pub use target::*;
