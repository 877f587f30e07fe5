//! The permission engine.

use super::locks::SubjectLocks;
use super::{EngineError, Inheritance, ProviderCapabilities};
use crate::store::PermissionStore;
use std::collections::HashSet;
use std::sync::Arc;
use warrant_auth::{KnownPermissions, PermissionTree, PermissionValue};
use warrant_types::{GroupName, Subject, UserId};

/// Resolves checks and applies administrative changes over a
/// [`PermissionStore`].
///
/// # Resolution
///
/// ```text
/// check(subject, permission)
///   1. record permission in KnownPermissions (unless it ends in ".?")
///   2. subject's own tree permits it        → Granted
///   3. user only: each group in membership
///      order; first group that permits it   → Granted
///   4.                                      → Default
/// ```
///
/// # Example
///
/// ```
/// use warrant_runtime::{MemoryStore, PermissionEngine};
/// use warrant_types::{Subject, UserId};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = PermissionEngine::with_store(MemoryStore::new());
/// let user = Subject::User(UserId::new());
///
/// engine.grant(&user, "chat.*").await?;
/// assert!(engine.check(&user, "chat.color").await?.is_granted());
/// # Ok(())
/// # }
/// ```
pub struct PermissionEngine<S> {
    store: S,
    known: Arc<KnownPermissions>,
    locks: SubjectLocks,
}

impl<S: PermissionStore> PermissionEngine<S> {
    /// Creates an engine sharing an existing registry.
    pub fn new(store: S, known: Arc<KnownPermissions>) -> Self {
        Self {
            store,
            known,
            locks: SubjectLocks::new(),
        }
    }

    /// Creates an engine with a fresh, empty registry.
    pub fn with_store(store: S) -> Self {
        Self::new(store, Arc::new(KnownPermissions::new()))
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the shared registry.
    pub fn known(&self) -> &Arc<KnownPermissions> {
        &self.known
    }

    async fn load(&self, subject: &Subject) -> Result<Option<PermissionTree>, EngineError> {
        match self.store.load_tree(subject).await? {
            Some(record) => Ok(Some(PermissionTree::from_record(&record)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, subject: &Subject, tree: &PermissionTree) -> Result<(), EngineError> {
        self.store.save_tree(subject, &tree.to_record()).await?;
        Ok(())
    }

    // --- Resolution ---

    /// Decides whether `subject` holds `permission`.
    ///
    /// Missing trees and memberships count as empty.
    ///
    /// # Errors
    ///
    /// Storage failures, or [`EngineError::InvalidState`] for a corrupt record.
    pub async fn check(
        &self,
        subject: &Subject,
        permission: &str,
    ) -> Result<PermissionValue, EngineError> {
        self.known.record_check(permission);

        if let Some(tree) = self.load(subject).await? {
            if tree.nodes().any(|grant| grant.permits(permission)) {
                tracing::trace!(subject = %subject, permission, "Granted directly");
                return Ok(PermissionValue::Granted);
            }
        }

        if let Subject::User(user) = subject {
            for group in self.store.load_memberships(user).await? {
                let group_subject = Subject::Group(group);
                let Some(tree) = self.load(&group_subject).await? else {
                    tracing::warn!(group = %group_subject, "Skipping membership of missing group");
                    continue;
                };
                if tree.nodes().any(|grant| grant.permits(permission)) {
                    tracing::trace!(
                        subject = %subject,
                        group = %group_subject,
                        permission,
                        "Granted through group"
                    );
                    return Ok(PermissionValue::Granted);
                }
            }
        }

        Ok(PermissionValue::Default)
    }

    /// Granted paths of `subject`, own tree first.
    ///
    /// With [`Inheritance::Inherited`] a user's list continues with each
    /// group's paths in membership order. Duplicates are kept.
    ///
    /// # Errors
    ///
    /// Storage failures or a corrupt record.
    pub async fn list_granted(
        &self,
        subject: &Subject,
        inheritance: Inheritance,
    ) -> Result<Vec<String>, EngineError> {
        let mut paths = match self.load(subject).await? {
            Some(tree) => granted_paths(&tree),
            None => Vec::new(),
        };

        if let (Subject::User(user), true) = (subject, inheritance.includes_groups()) {
            for group in self.store.load_memberships(user).await? {
                let group_subject = Subject::Group(group);
                match self.load(&group_subject).await? {
                    Some(tree) => paths.extend(granted_paths(&tree)),
                    None => {
                        tracing::warn!(group = %group_subject, "Skipping membership of missing group");
                    }
                }
            }
        }

        Ok(paths)
    }

    /// As [`list_granted`](Self::list_granted), keeping paths under
    /// `parent_prefix` with the prefix stripped.
    ///
    /// # Errors
    ///
    /// Storage failures or a corrupt record.
    pub async fn list_granted_under(
        &self,
        subject: &Subject,
        parent_prefix: &str,
        inheritance: Inheritance,
    ) -> Result<Vec<String>, EngineError> {
        Ok(self
            .list_granted(subject, inheritance)
            .await?
            .into_iter()
            .filter_map(|path| path.strip_prefix(parent_prefix).map(str::to_string))
            .collect())
    }

    // --- Grant / revoke ---

    /// Adds `permission` to the subject's tree.
    ///
    /// Granting to a group without a record creates the group.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidState`] if a numeric segment would get children.
    pub async fn grant(&self, subject: &Subject, permission: &str) -> Result<(), EngineError> {
        let _guard = self.locks.lock(subject).await;

        let existing = self.load(subject).await?;
        let created = existing.is_none();
        let mut tree = existing.unwrap_or_default();
        tree.get_or_create(permission)?;
        self.save(subject, &tree).await?;

        if created && subject.is_group() {
            tracing::info!(group = %subject, "Group created by grant");
        }
        tracing::debug!(subject = %subject, permission, "Permission granted");
        Ok(())
    }

    /// Detaches `permission` from the subject's tree.
    ///
    /// Returns `false` if the path was not present. The tree is written
    /// back either way.
    ///
    /// # Errors
    ///
    /// Storage failures or a corrupt record.
    pub async fn revoke(&self, subject: &Subject, permission: &str) -> Result<bool, EngineError> {
        let _guard = self.locks.lock(subject).await;

        let existing = self.load(subject).await?;
        let created = existing.is_none();
        let mut tree = existing.unwrap_or_default();
        let removed = tree.remove(permission);
        self.save(subject, &tree).await?;

        if created && subject.is_group() {
            tracing::info!(group = %subject, "Group created by revoke");
        }
        tracing::debug!(subject = %subject, permission, removed, "Permission revoked");
        Ok(removed)
    }

    // --- Groups ---

    /// # Errors
    ///
    /// [`EngineError::GroupExists`] if the group already has a record.
    pub async fn create_group(&self, group: &GroupName) -> Result<(), EngineError> {
        let subject = Subject::Group(group.clone());
        let _guard = self.locks.lock(&subject).await;

        if self.store.group_exists(group).await? {
            return Err(EngineError::GroupExists(group.clone()));
        }
        self.store.create_group_record(group).await?;

        tracing::info!(group = %group, "Group created");
        Ok(())
    }

    /// Deletes the group record. Membership rows are left untouched.
    ///
    /// # Errors
    ///
    /// [`EngineError::GroupNotFound`] if there is no record.
    pub async fn delete_group(&self, group: &GroupName) -> Result<(), EngineError> {
        let subject = Subject::Group(group.clone());
        let _guard = self.locks.lock(&subject).await;

        if !self.store.delete_group_record(group).await? {
            return Err(EngineError::GroupNotFound(group.clone()));
        }

        tracing::info!(group = %group, "Group deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// [`EngineError::GroupNotFound`] or [`EngineError::AlreadyMember`].
    pub async fn add_member(&self, group: &GroupName, user: &UserId) -> Result<(), EngineError> {
        let (_g, _u) = self
            .locks
            .lock_both(&Subject::Group(group.clone()), &Subject::User(*user))
            .await;

        if !self.store.group_exists(group).await? {
            return Err(EngineError::GroupNotFound(group.clone()));
        }
        if !self.store.add_membership(user, group).await? {
            return Err(EngineError::AlreadyMember {
                user: *user,
                group: group.clone(),
            });
        }

        tracing::info!(group = %group, user = %user, "Member added");
        Ok(())
    }

    /// # Errors
    ///
    /// [`EngineError::ProtectedGroup`] for `everyone` (always),
    /// then [`EngineError::GroupNotFound`] or [`EngineError::NotMember`].
    pub async fn remove_member(&self, group: &GroupName, user: &UserId) -> Result<(), EngineError> {
        if group.is_everyone() {
            return Err(EngineError::ProtectedGroup(group.clone()));
        }

        let (_g, _u) = self
            .locks
            .lock_both(&Subject::Group(group.clone()), &Subject::User(*user))
            .await;

        if !self.store.group_exists(group).await? {
            return Err(EngineError::GroupNotFound(group.clone()));
        }
        if !self.store.remove_membership(user, group).await? {
            return Err(EngineError::NotMember {
                user: *user,
                group: group.clone(),
            });
        }

        tracing::info!(group = %group, user = %user, "Member removed");
        Ok(())
    }

    /// Users holding a membership in `group`.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn members(&self, group: &GroupName) -> Result<Vec<UserId>, EngineError> {
        Ok(self.store.list_members(group).await?)
    }

    /// Ordered memberships of `user`.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn groups_of(&self, user: &UserId) -> Result<Vec<GroupName>, EngineError> {
        Ok(self.store.load_memberships(user).await?)
    }

    /// Every stored group, by name.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn list_groups(&self) -> Result<Vec<GroupName>, EngineError> {
        Ok(self.store.list_groups().await?)
    }

    // --- Lifecycle ---

    /// Ensures the `everyone` group record exists. Returns `true` if it was created.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn bootstrap(&self) -> Result<bool, EngineError> {
        let everyone = GroupName::everyone();
        let _guard = self.locks.lock(&Subject::Group(everyone.clone())).await;

        if self.store.group_exists(&everyone).await? {
            return Ok(false);
        }
        self.store.create_group_record(&everyone).await?;

        tracing::info!(group = %everyone, "Default group created");
        Ok(true)
    }

    /// Handles a user's connection: enrolls them into `everyone` if they
    /// are not a member yet. Returns `true` if the membership was added.
    ///
    /// # Errors
    ///
    /// Storage failures.
    pub async fn on_connect(&self, user: &UserId) -> Result<bool, EngineError> {
        let everyone = GroupName::everyone();
        let _guard = self.locks.lock(&Subject::User(*user)).await;

        let added = self.store.add_membership(user, &everyone).await?;
        if added {
            tracing::info!(user = %user, group = %everyone, "Enrolled on first connection");
        }
        Ok(added)
    }

    // --- Registry ---

    /// Registers permissions so they appear in suggestions before anyone
    /// checks them. Returns how many were new.
    pub fn register_permissions<I, P>(&self, permissions: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.known.register_all(permissions)
    }

    /// Known permissions starting with `prefix`, sorted.
    #[must_use]
    pub fn suggestions(&self, prefix: &str) -> Vec<String> {
        self.known.matching(prefix)
    }

    /// Known permissions starting with `prefix` that the subject does not
    /// hold directly yet.
    ///
    /// # Errors
    ///
    /// Storage failures or a corrupt record.
    pub async fn grant_suggestions(
        &self,
        subject: &Subject,
        prefix: &str,
    ) -> Result<Vec<String>, EngineError> {
        let held: HashSet<String> = self
            .list_granted(subject, Inheritance::Direct)
            .await?
            .into_iter()
            .collect();
        Ok(self
            .known
            .matching(prefix)
            .into_iter()
            .filter(|p| !held.contains(p))
            .collect())
    }

    /// Paths the subject holds directly that start with `prefix`, sorted.
    ///
    /// # Errors
    ///
    /// Storage failures or a corrupt record.
    pub async fn revoke_suggestions(
        &self,
        subject: &Subject,
        prefix: &str,
    ) -> Result<Vec<String>, EngineError> {
        let mut held: Vec<String> = self
            .list_granted(subject, Inheritance::Direct)
            .await?
            .into_iter()
            .filter(|p| p.starts_with(prefix))
            .collect();
        held.sort();
        held.dedup();
        Ok(held)
    }

    /// Feature flags of this provider.
    #[must_use]
    pub fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::default()
    }
}

/// Granted paths of one tree in reverse pre-order.
fn granted_paths(tree: &PermissionTree) -> Vec<String> {
    let mut paths: Vec<String> = tree
        .nodes()
        .filter_map(|grant| grant.path().map(str::to_string))
        .collect();
    paths.reverse();
    paths
}
