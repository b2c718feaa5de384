//! Group identity and the reload result

use super::user::User;
use serde::{Deserialize, Serialize};

/// Group as seen by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique group name
    pub groupname: String,

    #[serde(default)]
    pub domain: String,

    #[serde(default)]
    pub is_admin: bool,

    /// Usernames seen as members during the last membership walk
    ///
    /// This is a cache filled as a side effect of resolution, not the
    /// authoritative membership list. Direct membership lives on the user.
    #[serde(default)]
    pub usernames: Vec<String>,
}

impl Group {
    pub fn new(groupname: impl Into<String>) -> Self {
        Self {
            groupname: groupname.into(),
            ..Default::default()
        }
    }

    /// Record a username in the member cache
    ///
    /// Returns `true` if the username was not cached before.
    pub fn add_member(&mut self, username: &str) -> bool {
        if self.has_member(username) {
            return false;
        }
        self.usernames.push(username.to_string());
        true
    }

    /// Drop a username from the member cache
    ///
    /// Returns `true` if the username was cached.
    pub fn remove_member(&mut self, username: &str) -> bool {
        let before = self.usernames.len();
        self.usernames.retain(|u| u != username);
        self.usernames.len() != before
    }

    pub fn has_member(&self, username: &str) -> bool {
        self.usernames.iter().any(|u| u == username)
    }
}

/// Result of a reload: the users visible to the host plus every group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupsAndUsers {
    pub users: Vec<User>,
    pub groups: Vec<Group>,
}

impl GroupsAndUsers {
    pub fn user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn group(&self, groupname: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.groupname == groupname)
    }
}
