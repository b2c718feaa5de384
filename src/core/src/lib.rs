//! # User Store Core
//!
//! Shared types, host traits, and error handling for user store plugins.
//! Storage backends depend on this crate; the plugin host only ever talks to
//! the [`UserStorePlugin`] trait.

pub mod types;
pub mod traits;
pub mod error;

// Re-export commonly used types
pub use error::{Result, UserStoreError};
pub use traits::{PluginContext, PluginInfo, Severity, TracingContext, UserStorePlugin};
pub use types::{Group, GroupsAndUsers, LogonResult, User};

