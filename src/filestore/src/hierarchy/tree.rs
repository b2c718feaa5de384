//! Group tree built from declared parent lists
//!
//! The persisted format stores each group's parents. Membership walks need
//! the opposite direction, so the tree inverts every `child -> parent`
//! declaration into a `parent -> child` edge. Nodes live in one map keyed by
//! group name and refer to their subgroups by name, so cyclic declarations
//! produce a cyclic graph without any ownership cycle.

use crate::codec::GroupMap;
use indexmap::IndexMap;
use std::collections::HashMap;

/// A node of the group tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    pub groupname: String,

    /// Direct subgroups, in declaration order
    pub subgroups: Vec<String>,

    /// `false` for a parent that is referenced but never declared itself
    pub declared: bool,
}

impl GroupNode {
    fn new(groupname: &str, declared: bool) -> Self {
        Self {
            groupname: groupname.to_string(),
            subgroups: Vec::new(),
            declared,
        }
    }

    fn add_subgroup(&mut self, child: &str) {
        if !self.subgroups.iter().any(|s| s == child) {
            self.subgroups.push(child.to_string());
        }
    }
}

/// Parent to child view of the declared groups
///
/// Rebuilt on every reload and dropped afterwards.
#[derive(Debug, Clone, Default)]
pub struct GroupTree {
    nodes: IndexMap<String, GroupNode>,
}

impl GroupTree {
    /// Build the tree for a set of groups
    ///
    /// Every declared group gets a node first, so groups without parents are
    /// present too. Then each group is attached under each of its parents,
    /// creating placeholder nodes for parents that were never declared.
    pub fn build(groups: &GroupMap) -> Self {
        Self::from_declarations(
            groups
                .values()
                .map(|record| (record.groupname(), record.parent_groupnames.as_slice())),
        )
    }

    /// Build the tree from `(group, parents)` pairs
    pub fn from_declarations<'a, I>(declarations: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let declarations: Vec<(&str, &[String])> = declarations.into_iter().collect();
        let mut nodes: IndexMap<String, GroupNode> = IndexMap::new();

        for (name, _) in &declarations {
            nodes
                .entry(name.to_string())
                .or_insert_with(|| GroupNode::new(name, true));
        }

        for (name, parents) in &declarations {
            for parent in parents.iter() {
                nodes
                    .entry(parent.clone())
                    .or_insert_with(|| GroupNode::new(parent, false))
                    .add_subgroup(name);
            }
        }

        Self { nodes }
    }

    pub fn node(&self, groupname: &str) -> Option<&GroupNode> {
        self.nodes.get(groupname)
    }

    pub fn contains(&self, groupname: &str) -> bool {
        self.nodes.contains_key(groupname)
    }

    /// Direct subgroups of a group (empty for unknown groups)
    pub fn subgroups(&self, groupname: &str) -> &[String] {
        self.nodes
            .get(groupname)
            .map(|node| node.subgroups.as_slice())
            .unwrap_or(&[])
    }

    /// Number of nodes, placeholders included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Names of referenced but undeclared groups
    pub fn virtual_groups(&self) -> Vec<&str> {
        self.nodes
            .values()
            .filter(|node| !node.declared)
            .map(|node| node.groupname.as_str())
            .collect()
    }

    /// Find cycles in the subgroup relation
    ///
    /// Uses depth-first search with three states:
    /// - White: unvisited
    /// - Gray: on the current DFS path
    /// - Black: fully explored
    ///
    /// Every edge into a gray node closes a cycle, reported as the path from
    /// that node back to itself (e.g. `["a", "b", "a"]`).
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        let mut state: HashMap<&str, Mark> = HashMap::with_capacity(self.nodes.len());
        let mut cycles = Vec::new();

        for start in self.nodes.keys() {
            if !state.contains_key(start.as_str()) {
                let mut path = Vec::new();
                self.visit(start, &mut state, &mut path, &mut cycles);
            }
        }

        cycles
    }

    fn visit<'a>(
        &'a self,
        node: &'a str,
        state: &mut HashMap<&'a str, Mark>,
        path: &mut Vec<&'a str>,
        cycles: &mut Vec<Vec<String>>,
    ) {
        state.insert(node, Mark::Gray);
        path.push(node);

        for child in self.subgroups(node) {
            match state.get(child.as_str()) {
                Some(Mark::Gray) => {
                    if let Some(start) = path.iter().position(|n| *n == child.as_str()) {
                        let cycle = path[start..]
                            .iter()
                            .chain(std::iter::once(&child.as_str()))
                            .map(|n| n.to_string())
                            .collect();
                        cycles.push(cycle);
                    }
                }
                Some(Mark::Black) => {}
                None => self.visit(child, state, path, cycles),
            }
        }

        path.pop();
        state.insert(node, Mark::Black);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Gray,
    Black,
}
