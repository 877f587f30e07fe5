//! Local file-based store.
//!
//! Records are stored as JSON files under a base directory:
//!
//! ```text
//! ~/.warrant/data/
//! ├── trees/
//! │   ├── user-550e8400-e29b-41d4-a716-446655440000.json
//! │   └── group-admins.json
//! └── memberships/
//!     └── 550e8400-e29b-41d4-a716-446655440000.json
//! ```

use super::{PermissionStore, StorageError};
use std::path::{Path, PathBuf};
use tokio::fs;
use warrant_auth::TreeRecord;
use warrant_types::{GroupName, Subject, UserId};

const TREES_DIR: &str = "trees";
const MEMBERSHIPS_DIR: &str = "memberships";
const USER_PREFIX: &str = "user-";
const GROUP_PREFIX: &str = "group-";

/// Local file-based [`PermissionStore`].
///
/// # Features
///
/// - Records stored as pretty-printed JSON
/// - Atomic writes (write to temp, then rename)
/// - Automatic directory creation
///
/// # Example
///
/// ```no_run
/// use warrant_runtime::store::{LocalFileStore, PermissionStore};
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = LocalFileStore::new(PathBuf::from("~/.warrant/data"))?;
/// let groups = store.list_groups().await?;
/// println!("Found {} groups", groups.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    base_path: PathBuf,
}

impl LocalFileStore {
    /// Creates a new local file store.
    ///
    /// The directory layout is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DirectoryCreation` if a directory cannot be created.
    pub fn new(base_path: PathBuf) -> Result<Self, StorageError> {
        let expanded = expand_tilde(&base_path);

        for dir in [expanded.join(TREES_DIR), expanded.join(MEMBERSHIPS_DIR)] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)
                    .map_err(|e| StorageError::directory_creation(&dir, e))?;
            }
        }

        Ok(Self {
            base_path: expanded,
        })
    }

    /// Returns the base path.
    #[must_use]
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    fn tree_path(&self, subject: &Subject) -> PathBuf {
        self.base_path
            .join(TREES_DIR)
            .join(format!("{}.json", subject.key().file_stem()))
    }

    fn memberships_path(&self, user: &UserId) -> PathBuf {
        self.base_path
            .join(MEMBERSHIPS_DIR)
            .join(format!("{user}.json"))
    }

    async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(value)?;
        let temp_path = temp_path(path);

        fs::write(&temp_path, &json).await?;
        fs::rename(&temp_path, path).await?;

        Ok(())
    }

    async fn save_memberships(&self, user: &UserId, groups: &[GroupName]) -> Result<(), StorageError> {
        let path = self.memberships_path(user);
        if groups.is_empty() {
            if path.exists() {
                fs::remove_file(&path).await?;
            }
            return Ok(());
        }
        Self::write_json(&path, &groups).await
    }

    /// JSON file stems in `dir`, skipping temp files.
    async fn stems(dir: &Path) -> Result<Vec<String>, StorageError> {
        let mut stems = Vec::new();
        let mut entries = fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension() != Some(std::ffi::OsStr::new("json")) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|n| n.to_str()) else {
                continue;
            };
            if stem.starts_with('.') {
                continue;
            }
            stems.push(stem.to_string());
        }

        Ok(stems)
    }
}

impl PermissionStore for LocalFileStore {
    async fn load_tree(&self, subject: &Subject) -> Result<Option<TreeRecord>, StorageError> {
        let path = self.tree_path(subject);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path).await?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    async fn save_tree(&self, subject: &Subject, record: &TreeRecord) -> Result<(), StorageError> {
        Self::write_json(&self.tree_path(subject), record).await
    }

    async fn delete_tree(&self, subject: &Subject) -> Result<bool, StorageError> {
        let path = self.tree_path(subject);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).await?;
        Ok(true)
    }

    async fn load_memberships(&self, user: &UserId) -> Result<Vec<GroupName>, StorageError> {
        let path = self.memberships_path(user);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn add_membership(&self, user: &UserId, group: &GroupName) -> Result<bool, StorageError> {
        let mut groups = self.load_memberships(user).await?;
        if groups.contains(group) {
            return Ok(false);
        }
        groups.push(group.clone());
        self.save_memberships(user, &groups).await?;
        Ok(true)
    }

    async fn remove_membership(
        &self,
        user: &UserId,
        group: &GroupName,
    ) -> Result<bool, StorageError> {
        let mut groups = self.load_memberships(user).await?;
        let before = groups.len();
        groups.retain(|g| g != group);
        if groups.len() == before {
            return Ok(false);
        }
        self.save_memberships(user, &groups).await?;
        Ok(true)
    }

    async fn list_members(&self, group: &GroupName) -> Result<Vec<UserId>, StorageError> {
        let mut members = Vec::new();
        for stem in Self::stems(&self.base_path.join(MEMBERSHIPS_DIR)).await? {
            let user = match parse_user_stem(&stem) {
                Ok(user) => user,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unrecognized membership file");
                    continue;
                }
            };
            if self.load_memberships(&user).await?.contains(group) {
                members.push(user);
            }
        }
        members.sort();
        Ok(members)
    }

    async fn list_groups(&self) -> Result<Vec<GroupName>, StorageError> {
        let mut groups = Vec::new();
        for stem in Self::stems(&self.base_path.join(TREES_DIR)).await? {
            if stem.starts_with(USER_PREFIX) {
                continue;
            }
            match parse_group_stem(&stem) {
                Ok(group) => groups.push(group),
                Err(e) => tracing::warn!(error = %e, "Skipping unrecognized tree file"),
            }
        }
        groups.sort();
        Ok(groups)
    }
}

fn parse_user_stem(stem: &str) -> Result<UserId, StorageError> {
    stem.parse().map_err(|_| StorageError::invalid_key(stem))
}

fn parse_group_stem(stem: &str) -> Result<GroupName, StorageError> {
    stem.strip_prefix(GROUP_PREFIX)
        .and_then(|name| GroupName::new(name).ok())
        .ok_or_else(|| StorageError::invalid_key(stem))
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("record");
    path.with_file_name(format!(".{name}.tmp"))
}

/// Expands `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(rest) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
    }
    path.to_path_buf()
}

/// Returns the default data directory (`~/.warrant/data`).
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".warrant")
        .join("data")
}
