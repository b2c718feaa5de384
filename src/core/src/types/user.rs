//! User identity

use serde::{Deserialize, Serialize};

/// User identity as seen by the host
///
/// `is_admin` and `is_player` are derived on every reload from group
/// membership and are never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique login name
    pub username: String,

    pub email: String,

    /// User principal name (e.g., "alice@corp.example")
    pub principal_name: String,

    pub given_name: String,

    pub surname: String,

    /// Owning domain; empty means the user belongs to every domain
    #[serde(default)]
    pub domain: String,

    /// Member of the configured admin root group
    #[serde(default)]
    pub is_admin: bool,

    /// Member of the configured player root group
    #[serde(default)]
    pub is_player: bool,
}

impl User {
    /// Create a user with only a username set
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_principal_name(mut self, principal_name: impl Into<String>) -> Self {
        self.principal_name = principal_name.into();
        self
    }

    /// Set given name and surname
    pub fn with_name(mut self, given_name: impl Into<String>, surname: impl Into<String>) -> Self {
        self.given_name = given_name.into();
        self.surname = surname.into();
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Check whether this user is visible to the given domain
    ///
    /// Users without a domain are visible everywhere; otherwise the domains
    /// are compared case-insensitively.
    pub fn in_domain(&self, domain: &str) -> bool {
        self.domain.is_empty() || self.domain.to_lowercase() == domain.to_lowercase()
    }
}

/// Outcome of a logon attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogonResult {
    /// Credentials matched
    pub authenticated: bool,

    /// Player flag as computed by the last reload (false when not authenticated)
    pub is_player: bool,
}

impl LogonResult {
    pub fn denied() -> Self {
        Self::default()
    }

    pub fn granted(is_player: bool) -> Self {
        Self {
            authenticated: true,
            is_player,
        }
    }
}
