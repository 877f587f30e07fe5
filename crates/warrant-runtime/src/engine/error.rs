//! Engine layer errors.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`EngineError::GroupNotFound`] | `ENGINE_GROUP_NOT_FOUND` | Yes |
//! | [`EngineError::GroupExists`] | `ENGINE_GROUP_EXISTS` | Yes |
//! | [`EngineError::AlreadyMember`] | `ENGINE_ALREADY_MEMBER` | Yes |
//! | [`EngineError::NotMember`] | `ENGINE_NOT_MEMBER` | Yes |
//! | [`EngineError::ProtectedGroup`] | `ENGINE_PROTECTED_GROUP` | Yes |
//! | [`EngineError::InvalidState`] | `ENGINE_INVALID_STATE` | No |
//! | [`EngineError::Storage`] | `ENGINE_STORAGE` | Backend-dependent |
//!
//! # Recoverability
//!
//! Not-found and conflict errors are ordinary outcomes reported to the
//! operator; nothing was mutated. `InvalidState` means a corrupt or
//! hand-edited tree and aborts the operation.

use crate::store::StorageError;
use thiserror::Error;
use warrant_auth::TreeError;
use warrant_types::{ErrorCode, GroupName, UserId};

/// Engine layer error.
///
/// # Example
///
/// ```
/// use warrant_runtime::EngineError;
/// use warrant_types::{ErrorCode, GroupName};
///
/// let err = EngineError::GroupExists(GroupName::everyone());
/// assert_eq!(err.code(), "ENGINE_GROUP_EXISTS");
/// assert!(err.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("group '{0}' does not exist")]
    GroupNotFound(GroupName),

    #[error("group '{0}' already exists")]
    GroupExists(GroupName),

    #[error("user '{user}' is already in group '{group}'")]
    AlreadyMember { user: UserId, group: GroupName },

    #[error("user '{user}' is not in group '{group}'")]
    NotMember { user: UserId, group: GroupName },

    /// Members can never be removed from this group.
    #[error("cannot remove user from group '{0}'")]
    ProtectedGroup(GroupName),

    /// A tree invariant was violated.
    #[error("invalid state: {0}")]
    InvalidState(#[from] TreeError),

    /// Propagated unchanged from the backend.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ErrorCode for EngineError {
    fn code(&self) -> &'static str {
        match self {
            Self::GroupNotFound(_) => "ENGINE_GROUP_NOT_FOUND",
            Self::GroupExists(_) => "ENGINE_GROUP_EXISTS",
            Self::AlreadyMember { .. } => "ENGINE_ALREADY_MEMBER",
            Self::NotMember { .. } => "ENGINE_NOT_MEMBER",
            Self::ProtectedGroup(_) => "ENGINE_PROTECTED_GROUP",
            Self::InvalidState(_) => "ENGINE_INVALID_STATE",
            Self::Storage(_) => "ENGINE_STORAGE",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidState(_) => false,
            Self::Storage(e) => e.is_recoverable(),
            _ => true,
        }
    }
}
