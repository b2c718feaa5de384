//! File backed identity store
//!
//! Owns the user and group maps behind one mutex. Every operation holds the
//! lock for its full duration, including file I/O, so operations are
//! serializable and `add_to_group`/`remove_from_group` see both maps
//! consistently. Every mutation rewrites the whole affected resource.

use crate::codec::{self, GroupMap, UserMap};
use crate::config::StoreConfig;
use crate::hash::{PasswordHasher, Sha3PasswordHasher};
use crate::hierarchy::{GroupTree, MembershipResolver};
use crate::records::{validate_field, validate_name, validate_user, GroupRecord, UserRecord};
use parking_lot::Mutex;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use userstore_core::{
    Group, GroupsAndUsers, LogonResult, PluginContext, PluginInfo, Result, Severity, User,
    UserStoreError, UserStorePlugin,
};

/// Host API level this plugin was written against
pub const REQUIRED_API_LEVEL: u32 = 1;
pub const PLUGIN_NAME: &str = "File based user storage";
pub const PLUGIN_VENDOR: &str = "INSM";
pub const PLUGIN_VERSION: &str = "1.0";

/// Host log code used for failed checks
const CHECK_FAILED_CODE: i32 = 0;

#[derive(Debug, Default)]
struct StoreState {
    users: UserMap,
    groups: GroupMap,
}

/// User store persisted in two text files
pub struct FileUserStore {
    config: StoreConfig,
    context: Arc<dyn PluginContext>,
    hasher: Box<dyn PasswordHasher>,
    state: Mutex<StoreState>,
}

impl FileUserStore {
    /// Open the store and load the persisted state
    ///
    /// With `create_missing` set, absent resources are created empty first.
    pub fn open(config: StoreConfig, context: Arc<dyn PluginContext>) -> Result<Self> {
        if config.create_missing {
            create_if_missing(&config.users_path)?;
            create_if_missing(&config.groups_path)?;
        }

        let users = codec::read_users(&config.users_path)?;
        let groups = codec::read_groups(&config.groups_path)?;

        info!(
            "FileUserStore opened with users={}, groups={}, traversal={}",
            config.users_path.display(),
            config.groups_path.display(),
            config.traversal
        );

        Ok(Self {
            config,
            context,
            hasher: Box::new(Sha3PasswordHasher),
            state: Mutex::new(StoreState { users, groups }),
        })
    }

    /// Open the store configured from host settings
    pub fn from_context(context: Arc<dyn PluginContext>) -> Result<Self> {
        let config = StoreConfig::from_context(context.as_ref())?;
        Self::open(config, context)
    }

    /// Replace the credential hasher
    pub fn with_hasher(mut self, hasher: impl PasswordHasher + 'static) -> Self {
        self.hasher = Box::new(hasher);
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Snapshot of a user
    pub fn user(&self, username: &str) -> Option<User> {
        self.state.lock().users.get(username).map(|r| r.user.clone())
    }

    /// Direct groups of a user
    pub fn user_groups(&self, username: &str) -> Option<Vec<String>> {
        self.state.lock().users.get(username).map(|r| r.groupnames.clone())
    }

    /// Snapshot of a group, including its member cache
    pub fn group(&self, groupname: &str) -> Option<Group> {
        self.state.lock().groups.get(groupname).map(|r| r.group.clone())
    }

    /// Declared parents of a group
    pub fn group_parents(&self, groupname: &str) -> Option<Vec<String>> {
        self.state
            .lock()
            .groups
            .get(groupname)
            .map(|r| r.parent_groupnames.clone())
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().users.len()
    }

    pub fn group_count(&self) -> usize {
        self.state.lock().groups.len()
    }

    fn save_users(&self, users: &UserMap) -> Result<()> {
        codec::write_users(&self.config.users_path, users)?;
        info!("Persisted {} users", users.len());
        Ok(())
    }

    fn save_groups(&self, groups: &GroupMap) -> Result<()> {
        codec::write_groups(&self.config.groups_path, groups)?;
        info!("Persisted {} groups", groups.len());
        Ok(())
    }

    fn verify_resources(&self) -> Result<()> {
        codec::read_users(&self.config.users_path)?;
        codec::read_groups(&self.config.groups_path)?;
        Ok(())
    }
}

impl UserStorePlugin for FileUserStore {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            required_api_level: REQUIRED_API_LEVEL,
            name: PLUGIN_NAME.to_string(),
            vendor: PLUGIN_VENDOR.to_string(),
            version: PLUGIN_VERSION.to_string(),
        }
    }

    fn reload(
        &self,
        user_group: &str,
        admin_group: &str,
        player_group: &str,
        domain: &str,
    ) -> Result<GroupsAndUsers> {
        let mut state = self.state.lock();

        let mut users = codec::read_users(&self.config.users_path)?;
        let mut groups = codec::read_groups(&self.config.groups_path)?;

        let tree = GroupTree::build(&groups);
        for cycle in tree.detect_cycles() {
            warn!("Group hierarchy contains a cycle: {}", cycle.join(" -> "));
        }

        let resolver = MembershipResolver::new(self.config.traversal);
        let plain_users = resolver.resolve(&tree, user_group, &users, &mut groups);
        let admins = resolver.resolve(&tree, admin_group, &users, &mut groups);
        let players = resolver.resolve(&tree, player_group, &users, &mut groups);

        let mut result = GroupsAndUsers::default();
        for record in users.values_mut() {
            let user = &mut record.user;
            if !user.in_domain(domain) {
                continue;
            }
            user.is_admin = admins.contains(&user.username);
            user.is_player = players.contains(&user.username);
            let is_user = plain_users.contains(&user.username);

            if user.is_admin || user.is_player || is_user {
                result.users.push(user.clone());
            }
        }
        result.groups = groups.values().map(|r| r.group.clone()).collect();

        info!(
            "Reloaded {} users and {} groups; {} visible in domain '{}'",
            users.len(),
            groups.len(),
            result.users.len(),
            domain
        );

        *state = StoreState { users, groups };
        Ok(result)
    }

    // The domain is not part of the credential check.
    fn logon_user(&self, username: &str, password: &str, _domain: &str) -> LogonResult {
        let state = self.state.lock();

        match state.users.get(username) {
            Some(record) if self.hasher.verify(password, &record.password_hash) => {
                debug!("Logon succeeded for '{}'", username);
                LogonResult::granted(record.user.is_player)
            }
            _ => {
                debug!("Logon failed for '{}'", username);
                LogonResult::denied()
            }
        }
    }

    fn add_user(&self, user: User, password: &str, groupname: &str) -> Result<()> {
        validate_user(&user)?;
        if !groupname.is_empty() {
            validate_name("Group", groupname)?;
        }

        let password_hash = self.hasher.hash(password);
        validate_field("Password hash", &password_hash)?;

        let mut guard = self.state.lock();
        let StoreState { users, groups } = &mut *guard;
        if users.contains_key(&user.username) {
            return Err(UserStoreError::AlreadyExists(format!(
                "User {} is already created",
                user.username
            )));
        }

        let username = user.username.clone();
        let mut record = UserRecord::new(user, password_hash);
        if !groupname.is_empty() {
            let group = groups.get_mut(groupname).ok_or_else(|| {
                UserStoreError::NotFound(format!(
                    "Group {} does not exist on add user",
                    groupname
                ))
            })?;
            // Member cache only; the groups resource has no member column
            group.group.add_member(&username);
            record.join(groupname);
        }
        users.insert(username, record);
        self.save_users(users)
    }

    fn update_user(&self, user: User, password: &str) -> Result<()> {
        validate_user(&user)?;
        let password_hash = self.hasher.hash(password);
        validate_field("Password hash", &password_hash)?;

        let mut state = self.state.lock();
        let record = state.users.get_mut(&user.username).ok_or_else(|| {
            UserStoreError::NotFound(format!("User {} does not exist on update user", user.username))
        })?;
        record.password_hash = password_hash;
        record.user = user;
        self.save_users(&state.users)
    }

    fn delete_user(&self, username: &str) -> Result<()> {
        validate_name("User", username)?;

        let mut state = self.state.lock();
        if state.users.shift_remove(username).is_none() {
            return Err(UserStoreError::NotFound(format!(
                "User {} does not exist on delete user",
                username
            )));
        }
        self.save_users(&state.users)
    }

    fn add_group(&self, group: Group) -> Result<()> {
        validate_name("Group", &group.groupname)?;

        let mut state = self.state.lock();
        if state.groups.contains_key(&group.groupname) {
            return Err(UserStoreError::AlreadyExists(format!(
                "Group {} is already created",
                group.groupname
            )));
        }
        state
            .groups
            .insert(group.groupname.clone(), GroupRecord::new(group));
        self.save_groups(&state.groups)
    }

    fn update_group(&self, group: Group) -> Result<()> {
        validate_name("Group", &group.groupname)?;

        let mut state = self.state.lock();
        let record = state.groups.get_mut(&group.groupname).ok_or_else(|| {
            UserStoreError::NotFound(format!(
                "Group {} does not exist on update group",
                group.groupname
            ))
        })?;
        record.group = group;
        self.save_groups(&state.groups)
    }

    fn delete_group(&self, groupname: &str) -> Result<()> {
        validate_name("Group", groupname)?;

        let mut state = self.state.lock();
        if state.groups.shift_remove(groupname).is_none() {
            return Err(UserStoreError::NotFound(format!(
                "Group {} does not exist on delete group",
                groupname
            )));
        }
        self.save_groups(&state.groups)
    }

    fn add_to_group(&self, username: &str, groupname: &str) -> Result<()> {
        validate_name("User", username)?;
        validate_name("Group", groupname)?;

        let mut guard = self.state.lock();
        let StoreState { users, groups } = &mut *guard;

        let group = groups.get_mut(groupname).ok_or_else(|| {
            UserStoreError::NotFound(format!("Group {} does not exist on add to group", groupname))
        })?;
        let user = users.get_mut(username).ok_or_else(|| {
            UserStoreError::NotFound(format!("User {} does not exist on add to group", username))
        })?;

        let group_changed = group.group.add_member(username);
        let user_changed = user.join(groupname);

        if group_changed {
            self.save_groups(groups)?;
        }
        if user_changed {
            self.save_users(users)?;
        }
        Ok(())
    }

    fn remove_from_group(&self, username: &str, groupname: &str) -> Result<()> {
        validate_name("User", username)?;
        validate_name("Group", groupname)?;

        let mut guard = self.state.lock();
        let StoreState { users, groups } = &mut *guard;

        let group = groups.get_mut(groupname).ok_or_else(|| {
            UserStoreError::NotFound(format!(
                "Group {} does not exist on remove from group",
                groupname
            ))
        })?;
        let user = users.get_mut(username).ok_or_else(|| {
            UserStoreError::NotFound(format!(
                "User {} does not exist on remove from group",
                username
            ))
        })?;

        let group_changed = group.group.remove_member(username);
        let user_changed = user.leave(groupname);

        if group_changed {
            self.save_groups(groups)?;
        }
        if user_changed {
            self.save_users(users)?;
        }
        Ok(())
    }

    fn check(&self) -> bool {
        let _state = self.state.lock();

        match self.verify_resources() {
            Ok(()) => true,
            Err(e) => {
                error!("Store check failed: {}", e);
                self.context.log(
                    Severity::Error,
                    CHECK_FAILED_CODE,
                    &format!("Failed to do check {}", e),
                );
                false
            }
        }
    }
}

fn create_if_missing(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, "")?;
    info!("Created empty resource {}", path.display());
    Ok(())
}
