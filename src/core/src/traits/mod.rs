//! Traits at the boundary between a user store and its plugin host

pub mod context;
pub mod plugin;

// Re-export commonly used traits
pub use context::{PluginContext, Severity, TracingContext};
pub use plugin::{PluginInfo, UserStorePlugin};
