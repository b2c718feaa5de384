//! Host services available to a plugin

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Log severity understood by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// Services the host hands to a plugin
///
/// The host owns both the log sink and the application settings; a plugin
/// never reads environment variables or config files on its own.
pub trait PluginContext: Send + Sync {
    /// Write an entry to the host log
    fn log(&self, severity: Severity, code: i32, message: &str);

    /// Read an application setting by name
    fn setting(&self, name: &str) -> Option<String>;
}

/// Standalone context that forwards log entries to `tracing`
///
/// Used when the store runs outside a plugin host (tests, tools).
#[derive(Debug, Clone, Default)]
pub struct TracingContext {
    settings: HashMap<String, String>,
}

impl TracingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an application setting
    pub fn with_setting(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.settings.insert(name.into(), value.into());
        self
    }
}

impl PluginContext for TracingContext {
    fn log(&self, severity: Severity, code: i32, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!(code, "{}", message),
            Severity::Info => tracing::info!(code, "{}", message),
            Severity::Warning => tracing::warn!(code, "{}", message),
            Severity::Error => tracing::error!(code, "{}", message),
        }
    }

    fn setting(&self, name: &str) -> Option<String> {
        self.settings.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_context_settings() {
        let ctx = TracingContext::new().with_setting("UsersFile", "/var/lib/users.txt");

        assert_eq!(ctx.setting("UsersFile").as_deref(), Some("/var/lib/users.txt"));
        assert_eq!(ctx.setting("GroupsFile"), None);
    }

    #[test]
    fn test_tracing_context_log_does_not_panic() {
        let ctx = TracingContext::new();
        ctx.log(Severity::Error, 0, "Failed to do check");
        ctx.log(Severity::Debug, 7, "noise");
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Severity::Error.to_string(), "error");
    }
}
