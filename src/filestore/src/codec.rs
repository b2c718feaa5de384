//! Line-oriented text codec for the users and groups resources
//!
//! ```text
//! users:  username:passwordHash:email:principalName:givenName:surname:group1,group2
//! groups: groupname:parent1,parent2
//! ```
//!
//! One record per line, blank lines ignored. A group line without `:` has no
//! parents. Domains and role flags are not part of either format.

use crate::records::{GroupRecord, UserRecord, FIELD_SEPARATOR, LIST_SEPARATOR};
use indexmap::IndexMap;
use std::fmt::{Display, Write};
use std::fs;
use std::path::Path;
use tracing::debug;
use userstore_core::{Group, Result, User, UserStoreError};

/// Users keyed by username, in file order
pub type UserMap = IndexMap<String, UserRecord>;

/// Groups keyed by group name, in file order
pub type GroupMap = IndexMap<String, GroupRecord>;

const USER_FIELDS: usize = 7;

/// Parse the contents of a users resource
///
/// `resource` only labels errors.
pub fn decode_users(resource: &str, text: &str) -> Result<UserMap> {
    let mut users = UserMap::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;

        // Columns past the seventh are ignored
        let cols: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        let [username, hash, email, principal_name, given_name, surname, groups, ..] =
            cols.as_slice()
        else {
            return Err(UserStoreError::malformed(
                resource,
                line_no,
                format!("expected at least {} fields, found {}", USER_FIELDS, cols.len()),
            ));
        };
        if username.is_empty() {
            return Err(UserStoreError::malformed(resource, line_no, "empty username"));
        }

        let user = User {
            username: username.to_string(),
            email: email.to_string(),
            principal_name: principal_name.to_string(),
            given_name: given_name.to_string(),
            surname: surname.to_string(),
            ..Default::default()
        };
        let record = UserRecord::new(user, *hash).with_groups(split_list(groups));

        if users.insert(username.to_string(), record).is_some() {
            return Err(UserStoreError::malformed(
                resource,
                line_no,
                format!("duplicate username '{}'", username),
            ));
        }
    }

    Ok(users)
}

/// Render users in the users resource format
pub fn encode_users<'a>(records: impl IntoIterator<Item = &'a UserRecord>) -> String {
    encode_lines(records)
}

/// Parse the contents of a groups resource
pub fn decode_groups(resource: &str, text: &str) -> Result<GroupMap> {
    let mut groups = GroupMap::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;

        let mut cols = line.split(FIELD_SEPARATOR);
        let groupname = cols.next().unwrap_or_default();
        if groupname.is_empty() {
            return Err(UserStoreError::malformed(resource, line_no, "empty group name"));
        }
        let parents = cols.next().map(split_list).unwrap_or_default();

        let record = GroupRecord::new(Group::new(groupname)).with_parents(parents);
        if groups.insert(groupname.to_string(), record).is_some() {
            return Err(UserStoreError::malformed(
                resource,
                line_no,
                format!("duplicate group name '{}'", groupname),
            ));
        }
    }

    Ok(groups)
}

/// Render groups in the groups resource format
pub fn encode_groups<'a>(records: impl IntoIterator<Item = &'a GroupRecord>) -> String {
    encode_lines(records)
}

/// Read and parse a users resource
pub fn read_users(path: &Path) -> Result<UserMap> {
    let text = fs::read_to_string(path)?;
    let users = decode_users(&path.display().to_string(), &text)?;
    debug!("Read {} users from {}", users.len(), path.display());
    Ok(users)
}

/// Overwrite a users resource
pub fn write_users(path: &Path, users: &UserMap) -> Result<()> {
    fs::write(path, encode_users(users.values()))?;
    debug!("Wrote {} users to {}", users.len(), path.display());
    Ok(())
}

/// Read and parse a groups resource
pub fn read_groups(path: &Path) -> Result<GroupMap> {
    let text = fs::read_to_string(path)?;
    let groups = decode_groups(&path.display().to_string(), &text)?;
    debug!("Read {} groups from {}", groups.len(), path.display());
    Ok(groups)
}

/// Overwrite a groups resource
pub fn write_groups(path: &Path, groups: &GroupMap) -> Result<()> {
    fs::write(path, encode_groups(groups.values()))?;
    debug!("Wrote {} groups to {}", groups.len(), path.display());
    Ok(())
}

fn split_list(list: &str) -> Vec<String> {
    list.split(LIST_SEPARATOR)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn encode_lines<T: Display>(records: impl IntoIterator<Item = T>) -> String {
    let mut text = String::new();
    for record in records {
        // Writing into a String cannot fail
        let _ = writeln!(text, "{}", record);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS: &str = "\
alice:h1:alice@example.com:alice@corp:Alice:Liddell:staff,players
bob:h2:bob@example.com:bob@corp:Bob:Builder:

";

    const GROUPS: &str = "\
staff:everyone
players:everyone,gamers
everyone
";

    #[test]
    fn test_decode_users() {
        let users = decode_users("Users.txt", USERS).unwrap();
        assert_eq!(users.len(), 2);

        let alice = &users["alice"];
        assert_eq!(alice.password_hash, "h1");
        assert_eq!(alice.user.email, "alice@example.com");
        assert_eq!(alice.user.principal_name, "alice@corp");
        assert_eq!(alice.user.given_name, "Alice");
        assert_eq!(alice.user.surname, "Liddell");
        assert_eq!(alice.groupnames, vec!["staff", "players"]);
        assert!(alice.user.domain.is_empty());

        // Empty group list means no groups, not one empty group
        assert!(users["bob"].groupnames.is_empty());
    }

    #[test]
    fn test_decode_users_keeps_file_order() {
        let users = decode_users("Users.txt", USERS).unwrap();
        let names: Vec<_> = users.keys().cloned().collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn test_decode_users_too_few_fields() {
        let err = decode_users("Users.txt", "alice:h1:alice@example.com\n").unwrap_err();
        match err {
            UserStoreError::MalformedRecord { resource, line, .. } => {
                assert_eq!(resource, "Users.txt");
                assert_eq!(line, 1);
            }
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_users_ignores_extra_fields() {
        let users = decode_users("Users.txt", "alice:h1:a:b:c:d:staff:extra\n").unwrap();
        assert_eq!(users["alice"].groupnames, vec!["staff"]);
        assert_eq!(users["alice"].user.surname, "d");
    }

    #[test]
    fn test_decode_users_reports_line_number() {
        let text = "alice:h1:a:b:c:d:\n\nbroken\n";
        match decode_users("Users.txt", text).unwrap_err() {
            UserStoreError::MalformedRecord { line, .. } => assert_eq!(line, 3),
            other => panic!("Expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_users_duplicate() {
        let text = "alice:h1:a:b:c:d:\nalice:h2:a:b:c:d:\n";
        assert!(decode_users("Users.txt", text).unwrap_err().is_malformed());
    }

    #[test]
    fn test_decode_groups() {
        let groups = decode_groups("Groups.txt", GROUPS).unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups["staff"].parent_groupnames, vec!["everyone"]);
        assert_eq!(groups["players"].parent_groupnames, vec!["everyone", "gamers"]);
        assert!(groups["everyone"].parent_groupnames.is_empty());
        assert!(groups["everyone"].group.usernames.is_empty());
    }

    #[test]
    fn test_decode_groups_ignores_extra_fields() {
        let groups = decode_groups("Groups.txt", "a:b:c\n").unwrap();
        assert_eq!(groups["a"].parent_groupnames, vec!["b"]);
    }

    #[test]
    fn test_decode_groups_rejects_bad_lines() {
        assert!(decode_groups("Groups.txt", ":parent\n").unwrap_err().is_malformed());
        assert!(decode_groups("Groups.txt", "a\na:b\n").unwrap_err().is_malformed());
    }

    #[test]
    fn test_windows_line_endings() {
        let users = decode_users("Users.txt", "alice:h1:a:b:c:d:g1\r\n").unwrap();
        assert_eq!(users["alice"].groupnames, vec!["g1"]);

        let groups = decode_groups("Groups.txt", "g1:root\r\nroot\r\n").unwrap();
        assert_eq!(groups["g1"].parent_groupnames, vec!["root"]);
    }

    #[test]
    fn test_encode_users() {
        let record = UserRecord::new(
            User::new("alice")
                .with_email("alice@example.com")
                .with_principal_name("alice@corp")
                .with_name("Alice", "Liddell"),
            "h1",
        )
        .with_groups(vec!["staff".into(), "players".into()]);

        assert_eq!(
            encode_users([&record]),
            "alice:h1:alice@example.com:alice@corp:Alice:Liddell:staff,players\n"
        );
    }

    #[test]
    fn test_encode_groups() {
        let root = GroupRecord::new(Group::new("everyone"));
        let child = GroupRecord::new(Group::new("staff")).with_parents(vec!["everyone".into()]);

        assert_eq!(encode_groups([&root, &child]), "everyone:\nstaff:everyone\n");
    }

    #[test]
    fn test_text_round_trip() {
        let users = decode_users("Users.txt", USERS).unwrap();
        let again = decode_users("Users.txt", &encode_users(users.values())).unwrap();
        assert_eq!(users, again);

        let groups = decode_groups("Groups.txt", GROUPS).unwrap();
        let again = decode_groups("Groups.txt", &encode_groups(groups.values())).unwrap();
        assert_eq!(groups, again);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_users(&dir.path().join("nope.txt")).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Groups.txt");

        let groups = decode_groups("Groups.txt", GROUPS).unwrap();
        write_groups(&path, &groups).unwrap();
        assert_eq!(read_groups(&path).unwrap(), groups);
    }
}
