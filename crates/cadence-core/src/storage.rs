//! JSON key/value persistence under `.cadence/store/`.
//!
//! Each fixed key maps to one pretty-printed JSON file. Reads degrade:
//! a missing or unparseable file yields the empty value for that key, so a
//! damaged store resets rather than failing a command. Writes are
//! synchronous best-effort at the end of each mutating action; a failed
//! write is logged and swallowed, leaving in-memory state untouched.

use crate::error::{CadenceError, ErrorCode};
use crate::schedule::Schedule;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Store key for the ordered task list.
pub const TASKS_KEY: &str = "tasks";
/// Store key for the append-only completion log.
pub const COMPLETIONS_KEY: &str = "completions";
/// Store key for the per-task status-names map.
pub const TASK_STATUS_KEY: &str = "task_status";

const STORE_DIR: &str = ".cadence/store";

/// Handle on a project's store directory.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Open the store for a project. Fails when `.cadence/` is missing.
    pub fn open(project_root: &Path) -> Result<Self, CadenceError> {
        let root = project_root.join(STORE_DIR);
        if !root.is_dir() {
            return Err(CadenceError::new(ErrorCode::NotInitialized));
        }
        Ok(Self { root })
    }

    /// Create the store directory with empty values for every key.
    pub fn initialize(project_root: &Path) -> anyhow::Result<Self> {
        let root = project_root.join(STORE_DIR);
        std::fs::create_dir_all(&root)?;
        let store = Self { root };
        store.persist(&Schedule::default());
        Ok(store)
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Load the full schedule, repairing the due-date invariant on the way
    /// in (`Schedule::normalize_loaded`).
    #[must_use]
    pub fn load(&self) -> Schedule {
        let mut schedule = Schedule {
            tasks: self.read_key(TASKS_KEY),
            completions: self.read_key(COMPLETIONS_KEY),
            status: self.read_key(TASK_STATUS_KEY),
        };
        schedule.normalize_loaded();
        schedule
    }

    /// Write the full schedule back under the fixed keys. Failures are
    /// logged, not returned — persistence is best-effort by design.
    pub fn persist(&self, schedule: &Schedule) {
        self.write_key(TASKS_KEY, &schedule.tasks);
        self.write_key(COMPLETIONS_KEY, &schedule.completions);
        self.write_key(TASK_STATUS_KEY, &schedule.status);
    }

    fn read_key<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let path = self.key_path(key);
        let Ok(content) = std::fs::read_to_string(&path) else {
            return T::default();
        };
        match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, %err, "store key unparseable, resetting to empty");
                T::default()
            }
        }
    }

    fn write_key<T: Serialize>(&self, key: &str, value: &T) {
        let path = self.key_path(key);
        let payload = match serde_json::to_string_pretty(value) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(key, %err, "store key failed to serialize, skipping write");
                return;
            }
        };
        if let Err(err) = std::fs::write(&path, payload) {
            tracing::warn!(key, path = %path.display(), %err, "store write failed");
        }
    }
}
