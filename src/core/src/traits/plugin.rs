//! The operation surface a user store exposes to its host

use crate::error::Result;
use crate::types::{Group, GroupsAndUsers, LogonResult, User};
use serde::{Deserialize, Serialize};

/// Plugin identification reported to the host during registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Lowest host API level the plugin works with
    pub required_api_level: u32,
    pub name: String,
    pub vendor: String,
    pub version: String,
}

/// User store plugin
///
/// Every operation is synchronous and runs to completion. Implementations
/// serialize all operations internally, so a single instance can be shared
/// across host threads.
pub trait UserStorePlugin: Send + Sync {
    /// Identification reported to the host
    fn info(&self) -> PluginInfo;

    /// Re-read persisted state and compute role flags
    ///
    /// Returns the users of `domain` that belong to at least one of the
    /// three root groups, plus every group.
    fn reload(
        &self,
        user_group: &str,
        admin_group: &str,
        player_group: &str,
        domain: &str,
    ) -> Result<GroupsAndUsers>;

    /// Verify credentials against the state loaded by the last reload
    fn logon_user(&self, username: &str, password: &str, domain: &str) -> LogonResult;

    /// Create a user, optionally placing it directly in `groupname`
    fn add_user(&self, user: User, password: &str, groupname: &str) -> Result<()>;

    /// Replace a user's attributes and password
    fn update_user(&self, user: User, password: &str) -> Result<()>;

    fn delete_user(&self, username: &str) -> Result<()>;

    fn add_group(&self, group: Group) -> Result<()>;

    fn update_group(&self, group: Group) -> Result<()>;

    fn delete_group(&self, groupname: &str) -> Result<()>;

    /// Make `username` a direct member of `groupname` (idempotent)
    fn add_to_group(&self, username: &str, groupname: &str) -> Result<()>;

    /// Remove `username` from the direct members of `groupname` (idempotent)
    fn remove_from_group(&self, username: &str, groupname: &str) -> Result<()>;

    /// Liveness probe
    fn ping(&self) -> bool {
        true
    }

    /// Readiness probe: persisted state is present and parseable
    fn check(&self) -> bool;
}
