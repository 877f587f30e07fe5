//! In-memory store.

use super::{PermissionStore, StorageError};
use parking_lot::RwLock;
use std::collections::HashMap;
use warrant_auth::TreeRecord;
use warrant_types::{GroupName, Subject, UserId};

/// Volatile [`PermissionStore`] backed by hash maps.
///
/// Used by tests and by embedders that persist elsewhere. Cloning is not
/// supported; share it behind `Arc` instead.
#[derive(Debug, Default)]
pub struct MemoryStore {
    trees: RwLock<HashMap<Subject, TreeRecord>>,
    memberships: RwLock<HashMap<UserId, Vec<GroupName>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PermissionStore for MemoryStore {
    async fn load_tree(&self, subject: &Subject) -> Result<Option<TreeRecord>, StorageError> {
        Ok(self.trees.read().get(subject).cloned())
    }

    async fn save_tree(&self, subject: &Subject, record: &TreeRecord) -> Result<(), StorageError> {
        self.trees.write().insert(subject.clone(), record.clone());
        Ok(())
    }

    async fn delete_tree(&self, subject: &Subject) -> Result<bool, StorageError> {
        Ok(self.trees.write().remove(subject).is_some())
    }

    async fn load_memberships(&self, user: &UserId) -> Result<Vec<GroupName>, StorageError> {
        Ok(self
            .memberships
            .read()
            .get(user)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_membership(&self, user: &UserId, group: &GroupName) -> Result<bool, StorageError> {
        let mut memberships = self.memberships.write();
        let groups = memberships.entry(*user).or_default();
        if groups.contains(group) {
            return Ok(false);
        }
        groups.push(group.clone());
        Ok(true)
    }

    async fn remove_membership(
        &self,
        user: &UserId,
        group: &GroupName,
    ) -> Result<bool, StorageError> {
        let mut memberships = self.memberships.write();
        let Some(groups) = memberships.get_mut(user) else {
            return Ok(false);
        };
        let before = groups.len();
        groups.retain(|g| g != group);
        Ok(groups.len() != before)
    }

    async fn list_members(&self, group: &GroupName) -> Result<Vec<UserId>, StorageError> {
        let mut members: Vec<UserId> = self
            .memberships
            .read()
            .iter()
            .filter(|(_, groups)| groups.contains(group))
            .map(|(user, _)| *user)
            .collect();
        members.sort();
        Ok(members)
    }

    async fn list_groups(&self) -> Result<Vec<GroupName>, StorageError> {
        let mut groups: Vec<GroupName> = self
            .trees
            .read()
            .keys()
            .filter_map(|s| s.group_name().cloned())
            .collect();
        groups.sort();
        Ok(groups)
    }
}
