//! Membership resolution over the group tree
//!
//! A user belongs to a root group when one of its direct groups is the root
//! or any group below it. Resolution walks down from the root and stops at
//! the first group the user is directly declared in, recording the user in
//! that group's member cache.

use super::tree::GroupTree;
use crate::codec::{GroupMap, UserMap};
use crate::config::TraversalMode;
use crate::records::UserRecord;
use std::collections::HashSet;
use tracing::debug;

/// Resolves the members of a root group
#[derive(Debug, Clone, Copy, Default)]
pub struct MembershipResolver {
    mode: TraversalMode,
}

impl MembershipResolver {
    pub fn new(mode: TraversalMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> TraversalMode {
        self.mode
    }

    /// Usernames of every user that belongs to `root`
    ///
    /// Unknown roots resolve to an empty set. Matched users are added to
    /// the member cache of the group they matched on.
    pub fn resolve(
        &self,
        tree: &GroupTree,
        root: &str,
        users: &UserMap,
        groups: &mut GroupMap,
    ) -> HashSet<String> {
        let mut members = HashSet::new();
        if !tree.contains(root) {
            debug!("Root group '{}' is not declared", root);
            return members;
        }

        for user in users.values() {
            if self.is_member(tree, root, user, groups) {
                members.insert(user.username().to_string());
            }
        }

        debug!(
            "Resolved {} members of '{}' ({} traversal)",
            members.len(),
            root,
            self.mode
        );
        members
    }

    /// Check whether `user` belongs to `groupname` or a group below it
    pub fn is_member(
        &self,
        tree: &GroupTree,
        groupname: &str,
        user: &UserRecord,
        groups: &mut GroupMap,
    ) -> bool {
        match self.mode {
            TraversalMode::Transitive => {
                let mut visited = HashSet::new();
                walk_all(tree, groupname, user, groups, &mut visited)
            }
            TraversalMode::FirstChild => walk_first(tree, groupname, user, groups),
        }
    }
}

/// Result of testing a single node before descending
enum Step {
    /// No declared group by this name; the branch ends here
    Undeclared,
    /// The user is directly in this group
    Member,
    /// Keep looking in the subgroups
    Descend,
}

fn check_node(groupname: &str, user: &UserRecord, groups: &mut GroupMap) -> Step {
    let Some(record) = groups.get_mut(groupname) else {
        return Step::Undeclared;
    };
    if user.is_direct_member(groupname) {
        record.group.add_member(user.username());
        return Step::Member;
    }
    Step::Descend
}

fn walk_all<'t>(
    tree: &'t GroupTree,
    groupname: &'t str,
    user: &UserRecord,
    groups: &mut GroupMap,
    visited: &mut HashSet<&'t str>,
) -> bool {
    if !visited.insert(groupname) {
        return false;
    }

    match check_node(groupname, user, groups) {
        Step::Undeclared => false,
        Step::Member => true,
        Step::Descend => tree
            .subgroups(groupname)
            .iter()
            .any(|child| walk_all(tree, child, user, groups, visited)),
    }
}

// The legacy store returned from inside its subgroup loop, so only the first
// subgroup of every level was ever examined. Kept for hosts that depend on
// that narrower result.
fn walk_first(tree: &GroupTree, root: &str, user: &UserRecord, groups: &mut GroupMap) -> bool {
    let mut visited = HashSet::new();
    let mut current = root;

    loop {
        if !visited.insert(current) {
            return false;
        }
        match check_node(current, user, groups) {
            Step::Undeclared => return false,
            Step::Member => return true,
            Step::Descend => match tree.subgroups(current).first() {
                Some(child) => current = child,
                None => return false,
            },
        }
    }
}
