//! Subjects: the owners of permission trees.

use crate::{GroupName, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user or a named group.
///
/// | Variant | Identity | Inherits from groups |
/// |---------|----------|----------------------|
/// | `User`  | [`UserId`] | Yes, in membership order |
/// | `Group` | [`GroupName`] | No |
///
/// # Example
///
/// ```
/// use warrant_types::{GroupName, Subject, UserId};
///
/// let user = Subject::User(UserId::new());
/// assert!(user.is_user());
///
/// let group = Subject::Group(GroupName::everyone());
/// assert_eq!(group.key().as_str(), "group:everyone");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    User(UserId),
    Group(GroupName),
}

impl Subject {
    #[must_use]
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User(_))
    }

    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Returns the [`UserId`] if this is a user.
    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::User(id) => Some(id),
            Self::Group(_) => None,
        }
    }

    /// Returns the [`GroupName`] if this is a group.
    #[must_use]
    pub fn group_name(&self) -> Option<&GroupName> {
        match self {
            Self::Group(name) => Some(name),
            Self::User(_) => None,
        }
    }

    /// Returns the storage key of this subject's record.
    #[must_use]
    pub fn key(&self) -> SubjectKey {
        SubjectKey::from(self)
    }
}

impl From<UserId> for Subject {
    fn from(id: UserId) -> Self {
        Self::User(id)
    }
}

impl From<GroupName> for Subject {
    fn from(name: GroupName) -> Self {
        Self::Group(name)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Group(name) => write!(f, "group:{name}"),
        }
    }
}

/// Storage key of a subject record (`user:<uuid>` or `group:<name>`).
///
/// Users and groups share one keyspace; the prefix keeps them apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectKey(String);

impl SubjectKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a file-name-safe rendering (`user-<uuid>` / `group-<name>`).
    #[must_use]
    pub fn file_stem(&self) -> String {
        self.0.replacen(':', "-", 1)
    }
}

impl From<&Subject> for SubjectKey {
    fn from(subject: &Subject) -> Self {
        Self(subject.to_string())
    }
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
