//! Persistence of permission trees and group memberships.
//!
//! The engine never interprets how records are stored. A backend keeps
//! two kinds of rows:
//!
//! - one [`TreeRecord`] per subject, keyed by [`Subject`]
//! - one ordered membership list per user
//!
//! A group exists exactly when its tree record exists.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              PermissionEngine               │
//! └─────────────────────────────────────────────┘
//!                       │
//!                       ▼
//! ┌─────────────────────────────────────────────┐
//! │           PermissionStore trait             │
//! └─────────────────────────────────────────────┘
//!            │                        │
//!            ▼                        ▼
//!     ┌─────────────┐         ┌───────────────┐
//!     │ MemoryStore │         │ LocalFileStore│
//!     └─────────────┘         └───────────────┘
//! ```
//!
//! [`ConfiguredStore`] wraps either one when the backend is picked from
//! configuration.

mod configured;
mod error;
mod local;
mod memory;

pub use configured::ConfiguredStore;
pub use error::StorageError;
pub use local::{default_data_dir, LocalFileStore};
pub use memory::MemoryStore;

use std::future::Future;
use warrant_auth::{PermissionTree, TreeRecord};
use warrant_types::{GroupName, Subject, UserId};

/// Storage contract for subject records.
///
/// Implementations must be thread-safe (`Send + Sync`) for use across
/// async tasks. Each write is atomic per key; serializing a
/// read-modify-write cycle is the engine's job.
///
/// # Example
///
/// ```no_run
/// use warrant_runtime::store::{PermissionStore, StorageError};
/// use warrant_types::{GroupName, Subject};
///
/// async fn has_grants(store: &impl PermissionStore, group: GroupName) -> Result<bool, StorageError> {
///     let record = store.load_tree(&Subject::Group(group)).await?;
///     Ok(record.is_some_and(|r| !r.children.is_empty()))
/// }
/// ```
pub trait PermissionStore: Send + Sync {
    /// Loads a subject's tree record, `None` if absent.
    fn load_tree(
        &self,
        subject: &Subject,
    ) -> impl Future<Output = Result<Option<TreeRecord>, StorageError>> + Send;

    /// Inserts or replaces a subject's tree record.
    fn save_tree(
        &self,
        subject: &Subject,
        record: &TreeRecord,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Deletes a subject's tree record. Returns `false` if it was absent.
    fn delete_tree(&self, subject: &Subject)
        -> impl Future<Output = Result<bool, StorageError>> + Send;

    /// Ordered group memberships of a user (empty if none).
    fn load_memberships(
        &self,
        user: &UserId,
    ) -> impl Future<Output = Result<Vec<GroupName>, StorageError>> + Send;

    /// Appends a membership. Returns `false` if it already existed.
    fn add_membership(
        &self,
        user: &UserId,
        group: &GroupName,
    ) -> impl Future<Output = Result<bool, StorageError>> + Send;

    /// Removes a membership. Returns `false` if it did not exist.
    fn remove_membership(
        &self,
        user: &UserId,
        group: &GroupName,
    ) -> impl Future<Output = Result<bool, StorageError>> + Send;

    /// Users holding a membership in `group`, ordered by id.
    fn list_members(
        &self,
        group: &GroupName,
    ) -> impl Future<Output = Result<Vec<UserId>, StorageError>> + Send;

    /// Every group with a stored record, ordered by name.
    fn list_groups(&self) -> impl Future<Output = Result<Vec<GroupName>, StorageError>> + Send;

    /// Checks if a group record exists.
    fn group_exists(
        &self,
        group: &GroupName,
    ) -> impl Future<Output = Result<bool, StorageError>> + Send {
        async move {
            let subject = Subject::Group(group.clone());
            Ok(self.load_tree(&subject).await?.is_some())
        }
    }

    /// Stores an empty tree for `group`.
    fn create_group_record(
        &self,
        group: &GroupName,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        async move {
            let subject = Subject::Group(group.clone());
            self.save_tree(&subject, &PermissionTree::new().to_record())
                .await
        }
    }

    /// Deletes the record of `group`. Returns `false` if it was absent.
    fn delete_group_record(
        &self,
        group: &GroupName,
    ) -> impl Future<Output = Result<bool, StorageError>> + Send {
        async move {
            let subject = Subject::Group(group.clone());
            self.delete_tree(&subject).await
        }
    }
}
