//! Stored user and group records

use std::fmt::{self, Display, Formatter};
use userstore_core::{Group, Result, User, UserStoreError};

/// Field separator in both resources
pub const FIELD_SEPARATOR: char = ':';
/// List separator for group and parent names
pub const LIST_SEPARATOR: char = ',';

/// A user together with its credential and direct groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
    /// Groups the user is directly declared a member of, in file order
    pub groupnames: Vec<String>,
}

impl UserRecord {
    pub fn new(user: User, password_hash: impl Into<String>) -> Self {
        Self {
            user,
            password_hash: password_hash.into(),
            groupnames: Vec::new(),
        }
    }

    pub fn with_groups(mut self, groupnames: Vec<String>) -> Self {
        self.groupnames = groupnames;
        self
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn is_direct_member(&self, groupname: &str) -> bool {
        self.groupnames.iter().any(|g| g == groupname)
    }

    /// Returns `true` if the group was added
    pub fn join(&mut self, groupname: &str) -> bool {
        if self.is_direct_member(groupname) {
            return false;
        }
        self.groupnames.push(groupname.to_string());
        true
    }

    /// Returns `true` if the group was removed
    pub fn leave(&mut self, groupname: &str) -> bool {
        let before = self.groupnames.len();
        self.groupnames.retain(|g| g != groupname);
        self.groupnames.len() != before
    }
}

// username:passwordHash:email:principalName:givenName:surname:group1,group2
impl Display for UserRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let user = &self.user;
        write!(
            f,
            "{}:{}:{}:{}:{}:{}:",
            user.username,
            self.password_hash,
            user.email,
            user.principal_name,
            user.given_name,
            user.surname
        )?;
        write_list(f, &self.groupnames)
    }
}

/// A group together with its declared parents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    pub group: Group,
    /// Direct parent groups, in file order
    pub parent_groupnames: Vec<String>,
}

impl GroupRecord {
    pub fn new(group: Group) -> Self {
        Self {
            group,
            parent_groupnames: Vec::new(),
        }
    }

    pub fn with_parents(mut self, parents: Vec<String>) -> Self {
        self.parent_groupnames = parents;
        self
    }

    pub fn groupname(&self) -> &str {
        &self.group.groupname
    }
}

// groupname:parent1,parent2
impl Display for GroupRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.group.groupname)?;
        write_list(f, &self.parent_groupnames)
    }
}

fn write_list(f: &mut Formatter<'_>, names: &[String]) -> fmt::Result {
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", LIST_SEPARATOR)?;
        }
        f.write_str(name)?;
    }
    Ok(())
}

/// Validate a username or group name
///
/// Names are keys and list entries, so they may contain neither separator.
pub fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(UserStoreError::InvalidArgument(format!("{} name is empty", kind)));
    }
    if name.contains([FIELD_SEPARATOR, LIST_SEPARATOR, '\n', '\r']) {
        return Err(UserStoreError::InvalidArgument(format!(
            "{} name '{}' contains a reserved character",
            kind, name
        )));
    }
    Ok(())
}

/// Validate a free-text user attribute
pub fn validate_field(field: &str, value: &str) -> Result<()> {
    if value.contains([FIELD_SEPARATOR, '\n', '\r']) {
        return Err(UserStoreError::InvalidArgument(format!(
            "{} '{}' contains a reserved character",
            field, value
        )));
    }
    Ok(())
}

/// Validate every persisted attribute of a user
pub fn validate_user(user: &User) -> Result<()> {
    validate_name("User", &user.username)?;
    validate_field("email", &user.email)?;
    validate_field("principal name", &user.principal_name)?;
    validate_field("given name", &user.given_name)?;
    validate_field("surname", &user.surname)?;
    Ok(())
}
