//! warrant runtime: resolution engine, storage and configuration.
//!
//! # Crate Architecture
//!
//! ```text
//! warrant-types    : UserId, GroupName, Subject, ErrorCode
//!     ↑
//! warrant-auth     : PermissionTree, Grant, KnownPermissions
//!     ↑
//! warrant-runtime  : PermissionStore, PermissionEngine, config   ◄── HERE
//!     ↑
//! warrant-cli      : command tree, `warrant` binary
//! ```
//!
//! # Modules
//!
//! ## [`engine`]
//!
//! - [`PermissionEngine`]: `check`, `list_granted`, grant/revoke, group
//!   administration, lifecycle events and suggestions
//! - [`SubjectLocks`]: per-subject serialization of writes
//!
//! ## [`store`]
//!
//! - [`PermissionStore`](store::PermissionStore): async storage contract
//! - [`MemoryStore`], [`LocalFileStore`], [`ConfiguredStore`]
//!
//! ## [`config`]
//!
//! - [`WarrantConfig`](config::WarrantConfig) loaded by
//!   [`ConfigLoader`](config::ConfigLoader): defaults, global file,
//!   project file, then `WARRANT_*` environment variables

pub mod config;
pub mod engine;
pub mod store;

pub use engine::{
    EngineError, Inheritance, PermissionEngine, ProviderCapabilities, SubjectGuard, SubjectLocks,
};
pub use store::{ConfiguredStore, LocalFileStore, MemoryStore, PermissionStore, StorageError};
