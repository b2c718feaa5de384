//! Store configuration

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use userstore_core::{PluginContext, Result, UserStoreError};

/// Host setting naming the users resource
pub const USERS_FILE_SETTING: &str = "UsersFile";
/// Host setting naming the groups resource
pub const GROUPS_FILE_SETTING: &str = "GroupsFile";
/// Host setting selecting the membership traversal mode
pub const TRAVERSAL_SETTING: &str = "MembershipTraversal";
/// Host setting controlling creation of absent resources on open
pub const CREATE_MISSING_SETTING: &str = "CreateMissingFiles";

/// How the membership walk descends into subgroups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalMode {
    /// Walk every subgroup at every level
    #[default]
    Transitive,

    /// Walk only the first subgroup at each level
    ///
    /// Reproduces the legacy plugin, which returned from inside its subgroup
    /// loop on the first iteration. A qualifying group that is not the first
    /// child is never reached.
    FirstChild,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown membership traversal mode '{0}' (expected 'transitive' or 'first-child')")]
pub struct ParseTraversalModeError(String);

impl FromStr for TraversalMode {
    type Err = ParseTraversalModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transitive" => Ok(TraversalMode::Transitive),
            "first-child" | "firstchild" => Ok(TraversalMode::FirstChild),
            _ => Err(ParseTraversalModeError(s.to_string())),
        }
    }
}

impl fmt::Display for TraversalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalMode::Transitive => f.write_str("transitive"),
            TraversalMode::FirstChild => f.write_str("first-child"),
        }
    }
}

/// File store configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Users resource
    pub users_path: PathBuf,

    /// Groups resource
    pub groups_path: PathBuf,

    /// Membership traversal mode
    pub traversal: TraversalMode,

    /// Create empty resources on open when they do not exist
    pub create_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            users_path: PathBuf::from("Users.txt"),
            groups_path: PathBuf::from("Groups.txt"),
            traversal: TraversalMode::default(),
            create_missing: true,
        }
    }
}

impl StoreConfig {
    /// Keep both resources in `dir` under their default names
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            users_path: dir.join("Users.txt"),
            groups_path: dir.join("Groups.txt"),
            ..Default::default()
        }
    }

    pub fn with_traversal(mut self, traversal: TraversalMode) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn with_create_missing(mut self, create_missing: bool) -> Self {
        self.create_missing = create_missing;
        self
    }

    /// Build a configuration from host settings, falling back to defaults
    pub fn from_context(ctx: &dyn PluginContext) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = non_empty(ctx.setting(USERS_FILE_SETTING)) {
            config.users_path = PathBuf::from(path);
        }
        if let Some(path) = non_empty(ctx.setting(GROUPS_FILE_SETTING)) {
            config.groups_path = PathBuf::from(path);
        }
        if let Some(mode) = non_empty(ctx.setting(TRAVERSAL_SETTING)) {
            config.traversal = mode
                .parse()
                .map_err(|e: ParseTraversalModeError| UserStoreError::InvalidArgument(e.to_string()))?;
        }
        if let Some(flag) = non_empty(ctx.setting(CREATE_MISSING_SETTING)) {
            config.create_missing = parse_flag(&flag).ok_or_else(|| {
                UserStoreError::InvalidArgument(format!(
                    "{} must be true or false, got '{}'",
                    CREATE_MISSING_SETTING, flag
                ))
            })?;
        }

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use userstore_core::TracingContext;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.users_path, PathBuf::from("Users.txt"));
        assert_eq!(config.groups_path, PathBuf::from("Groups.txt"));
        assert_eq!(config.traversal, TraversalMode::Transitive);
        assert!(config.create_missing);
    }

    #[test]
    fn test_traversal_mode_parsing() {
        assert_eq!("transitive".parse::<TraversalMode>().unwrap(), TraversalMode::Transitive);
        assert_eq!("First-Child".parse::<TraversalMode>().unwrap(), TraversalMode::FirstChild);
        assert!("breadth-first".parse::<TraversalMode>().is_err());
    }

    #[test]
    fn test_from_context_overrides() {
        let ctx = TracingContext::new()
            .with_setting(USERS_FILE_SETTING, "/data/u.txt")
            .with_setting(GROUPS_FILE_SETTING, "/data/g.txt")
            .with_setting(TRAVERSAL_SETTING, "first-child")
            .with_setting(CREATE_MISSING_SETTING, "no");

        let config = StoreConfig::from_context(&ctx).unwrap();
        assert_eq!(config.users_path, PathBuf::from("/data/u.txt"));
        assert_eq!(config.groups_path, PathBuf::from("/data/g.txt"));
        assert_eq!(config.traversal, TraversalMode::FirstChild);
        assert!(!config.create_missing);
    }

    #[test]
    fn test_from_context_blank_settings_use_defaults() {
        let ctx = TracingContext::new().with_setting(USERS_FILE_SETTING, "  ");
        let config = StoreConfig::from_context(&ctx).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_from_context_rejects_bad_values() {
        let ctx = TracingContext::new().with_setting(TRAVERSAL_SETTING, "sideways");
        let err = StoreConfig::from_context(&ctx).unwrap_err();
        assert!(err.is_invalid_argument());

        let ctx = TracingContext::new().with_setting(CREATE_MISSING_SETTING, "maybe");
        assert!(StoreConfig::from_context(&ctx).unwrap_err().is_invalid_argument());
    }
}
