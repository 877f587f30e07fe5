//! Backend chosen at runtime from [`StoreConfig`].

use super::{LocalFileStore, MemoryStore, PermissionStore, StorageError};
use crate::config::{StoreBackend, StoreConfig};
use std::path::Path;
use warrant_auth::TreeRecord;
use warrant_types::{GroupName, Subject, UserId};

/// Either built-in backend behind one type, so the engine stays generic
/// while the binary picks the backend from configuration.
#[derive(Debug)]
pub enum ConfiguredStore {
    Memory(MemoryStore),
    File(LocalFileStore),
}

impl ConfiguredStore {
    /// Opens the backend named by `config`, resolving a relative data
    /// directory against `root`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DirectoryCreation` if the file backend's
    /// directories cannot be created.
    pub fn open(config: &StoreConfig, root: &Path) -> Result<Self, StorageError> {
        match config.backend {
            StoreBackend::Memory => Ok(Self::Memory(MemoryStore::new())),
            StoreBackend::File => {
                let dir = config.resolve_data_dir_in(root);
                tracing::debug!(path = %dir.display(), "Opening file store");
                Ok(Self::File(LocalFileStore::new(dir)?))
            }
        }
    }

    #[must_use]
    pub fn backend(&self) -> StoreBackend {
        match self {
            Self::Memory(_) => StoreBackend::Memory,
            Self::File(_) => StoreBackend::File,
        }
    }
}

macro_rules! delegate {
    ($self:ident, $store:ident => $call:expr) => {
        match $self {
            Self::Memory($store) => $call.await,
            Self::File($store) => $call.await,
        }
    };
}

impl PermissionStore for ConfiguredStore {
    async fn load_tree(&self, subject: &Subject) -> Result<Option<TreeRecord>, StorageError> {
        delegate!(self, s => s.load_tree(subject))
    }

    async fn save_tree(&self, subject: &Subject, record: &TreeRecord) -> Result<(), StorageError> {
        delegate!(self, s => s.save_tree(subject, record))
    }

    async fn delete_tree(&self, subject: &Subject) -> Result<bool, StorageError> {
        delegate!(self, s => s.delete_tree(subject))
    }

    async fn load_memberships(&self, user: &UserId) -> Result<Vec<GroupName>, StorageError> {
        delegate!(self, s => s.load_memberships(user))
    }

    async fn add_membership(&self, user: &UserId, group: &GroupName) -> Result<bool, StorageError> {
        delegate!(self, s => s.add_membership(user, group))
    }

    async fn remove_membership(
        &self,
        user: &UserId,
        group: &GroupName,
    ) -> Result<bool, StorageError> {
        delegate!(self, s => s.remove_membership(user, group))
    }

    async fn list_members(&self, group: &GroupName) -> Result<Vec<UserId>, StorageError> {
        delegate!(self, s => s.list_members(group))
    }

    async fn list_groups(&self) -> Result<Vec<GroupName>, StorageError> {
        delegate!(self, s => s.list_groups())
    }
}
