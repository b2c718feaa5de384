//! Group hierarchy module
//!
//! Builds the parent/child group tree from the declared parent lists and
//! walks it to find the members of a root group.
//!
//! # Features
//!
//! - **Virtual Groups**: parents that were never declared still get a node
//! - **Cycle Tolerance**: cyclic declarations are reported, never looped on
//! - **Two Traversal Modes**: full transitive walk or legacy first-child walk
//! - **Member Cache**: matched users are recorded on the group they matched
//!
//! # Example
//!
//! ```rust
//! use userstore_file::codec::{decode_groups, decode_users};
//! use userstore_file::hierarchy::{GroupTree, MembershipResolver};
//! use userstore_file::TraversalMode;
//!
//! let users = decode_users("users", "carol:h:::::c\n").unwrap();
//! let mut groups = decode_groups("groups", "a\nb:a\nc:b\n").unwrap();
//!
//! let tree = GroupTree::build(&groups);
//! let resolver = MembershipResolver::new(TraversalMode::Transitive);
//! let members = resolver.resolve(&tree, "a", &users, &mut groups);
//!
//! assert!(members.contains("carol"));
//! ```

pub mod tree;
pub mod resolver;


pub use tree::{GroupNode, GroupTree};
pub use resolver::MembershipResolver;
