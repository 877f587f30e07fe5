//! Permission primitives for warrant.
//!
//! This crate holds everything that decides *what a grant means*,
//! independent of where grants are stored:
//!
//! - [`PermissionTree`]: arena-backed tree of one subject's grants
//! - [`Grant`]: one granted node and its match predicate
//! - [`matcher`]: exact, trailing-wildcard and existence-query matching
//! - [`PermissionString`]: the parser applied to operator input
//! - [`KnownPermissions`]: append-only registry driving suggestions
//!
//! # Example
//!
//! ```
//! use warrant_auth::{PermissionTree, PermissionValue};
//!
//! let mut tree = PermissionTree::new();
//! tree.get_or_create("a.b.*").unwrap();
//!
//! let value: PermissionValue = tree.nodes().any(|g| g.permits("a.b.c.d")).into();
//! assert!(value.is_granted());
//! ```

pub mod error;
pub mod matcher;
pub mod node;
pub mod permission;
pub mod record;
pub mod registry;
pub mod tree;
pub mod value;

pub use error::{ParseError, TreeError};
pub use node::Grant;
pub use permission::PermissionString;
pub use record::TreeRecord;
pub use registry::KnownPermissions;
pub use tree::{Grants, PermissionTree};
pub use value::PermissionValue;
