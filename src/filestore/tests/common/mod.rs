//! Shared helpers for store integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use userstore_core::{PluginContext, Severity};
use userstore_file::{FileUserStore, StoreConfig};

/// Host context that records every log entry
#[derive(Default)]
pub struct RecordingContext {
    entries: Mutex<Vec<(Severity, i32, String)>>,
}

impl RecordingContext {
    pub fn entries(&self) -> Vec<(Severity, i32, String)> {
        self.entries.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|(severity, _, _)| *severity == Severity::Error)
            .map(|(_, _, message)| message.clone())
            .collect()
    }
}

impl PluginContext for RecordingContext {
    fn log(&self, severity: Severity, code: i32, message: &str) {
        self.entries.lock().push((severity, code, message.to_string()));
    }

    fn setting(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Route `tracing` output to the test harness
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("userstore_file=debug")
        .with_test_writer()
        .try_init();
}

/// A store in a fresh temporary directory
pub struct TestStore {
    pub dir: TempDir,
    pub context: Arc<RecordingContext>,
    pub store: FileUserStore,
}

impl TestStore {
    pub fn new() -> Self {
        Self::with_files("", "")
    }

    /// Seed both resources before opening
    pub fn with_files(users: &str, groups: &str) -> Self {
        Self::with_config(users, groups, |config| config)
    }

    pub fn with_config(
        users: &str,
        groups: &str,
        adjust: impl FnOnce(StoreConfig) -> StoreConfig,
    ) -> Self {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Users.txt"), users).unwrap();
        fs::write(dir.path().join("Groups.txt"), groups).unwrap();

        let context = Arc::new(RecordingContext::default());
        let config = adjust(StoreConfig::in_dir(dir.path()));
        let store = FileUserStore::open(config, context.clone()).unwrap();

        Self { dir, context, store }
    }

    pub fn users_path(&self) -> std::path::PathBuf {
        self.dir.path().join("Users.txt")
    }

    pub fn groups_path(&self) -> std::path::PathBuf {
        self.dir.path().join("Groups.txt")
    }

    pub fn users_text(&self) -> String {
        read(&self.users_path())
    }

    pub fn groups_text(&self) -> String {
        read(&self.groups_path())
    }
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
