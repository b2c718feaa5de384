//! # File User Store
//!
//! A user store plugin that keeps users and groups in two line-oriented
//! text files and derives admin/player/user roles from a group hierarchy.
//!
//! ## Module Structure
//!
//! ```text
//! filestore/
//! ├── config/     - Resource paths and traversal mode
//! ├── hash/       - Credential hashing
//! ├── records/    - Stored user and group records
//! ├── codec/      - Text format for both resources
//! ├── hierarchy/  - Group tree and membership resolution
//! └── store/      - Locked in-memory maps and the plugin operations
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use userstore_core::{TracingContext, User, UserStorePlugin};
//! use userstore_file::{FileUserStore, StoreConfig};
//!
//! # fn main() -> userstore_core::Result<()> {
//! let store = FileUserStore::open(StoreConfig::in_dir("/var/lib/userstore"), Arc::new(TracingContext::new()))?;
//! store.add_user(User::new("alice"), "secret", "")?;
//! let visible = store.reload("Users", "Admins", "Players", "CORP")?;
//! # let _ = visible;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod hash;
pub mod hierarchy;
pub mod records;
pub mod store;

pub use config::{StoreConfig, TraversalMode};
pub use hash::{PasswordHasher, Sha3PasswordHasher};
pub use records::{GroupRecord, UserRecord};
pub use store::FileUserStore;
