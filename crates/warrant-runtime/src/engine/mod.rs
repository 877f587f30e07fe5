//! Resolution engine and administrative operations.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    PermissionEngine                      │
//! │                                                          │
//! │  check / list_granted          (no locks, read only)     │
//! │  grant / revoke / groups       (per-subject lock)        │
//! │                                                          │
//! │  ┌────────────────┐  ┌──────────────┐  ┌──────────────┐  │
//! │  │KnownPermissions│  │ SubjectLocks │  │PermissionStore│ │
//! │  └────────────────┘  └──────────────┘  └──────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Precedence: a direct grant wins, then the first group in membership
//! order that grants. There is no explicit deny.

#[allow(clippy::module_inception)]
mod engine;
mod error;
mod locks;
mod types;

pub use engine::PermissionEngine;
pub use error::EngineError;
pub use locks::{SubjectGuard, SubjectLocks};
pub use types::{Inheritance, ProviderCapabilities};
