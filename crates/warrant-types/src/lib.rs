//! Core types for warrant.
//!
//! Foundational identifiers shared by every layer of the permission engine.
//!
//! # Crate Architecture
//!
//! ```text
//! warrant-types    : UserId, GroupName, Subject, ErrorCode   ◄── HERE
//!     ↑
//! warrant-auth     : PermissionTree, Grant, KnownPermissions
//!     ↑
//! warrant-runtime  : PermissionStore, PermissionEngine, config
//!     ↑
//! warrant-cli      : command tree, `warrant` binary
//! ```
//!
//! # Example
//!
//! ```
//! use warrant_types::{GroupName, Subject, UserId};
//!
//! let user = Subject::User(UserId::new());
//! let everyone = Subject::Group(GroupName::everyone());
//! assert_ne!(user.key(), everyone.key());
//! ```

pub mod error;
pub mod id;
pub mod subject;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::{GroupName, IdError, UserId, EVERYONE};
pub use subject::{Subject, SubjectKey};
