//! Identity types exchanged with the plugin host

pub mod user;
pub mod group;

pub use user::{LogonResult, User};
pub use group::{Group, GroupsAndUsers};
