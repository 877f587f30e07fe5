//! Resolved grants of a permission tree.

use crate::matcher;
use std::fmt;

/// One resolved grant, produced by [`PermissionTree::nodes`](crate::PermissionTree::nodes).
///
/// A tree that holds nothing but its root resolves to [`Grant::Root`].
/// The root sentinel permits no query: a subject that should hold
/// everything is granted `*`.
///
/// # Example
///
/// ```
/// use warrant_auth::Grant;
///
/// let grant = Grant::Path("chat.*".into());
/// assert_eq!(grant.path(), Some("chat.*"));
/// assert!(grant.permits("chat.color"));
/// assert!(!Grant::Root.permits("chat.color"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Grant {
    /// The stored-but-empty tree.
    Root,
    /// A node below the root and its dotted path.
    Path(String),
}

impl Grant {
    /// Dotted path, `None` for the root sentinel.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Root => None,
            Self::Path(path) => Some(path),
        }
    }

    /// Returns `true` if this grant authorizes `query`.
    #[must_use]
    pub fn permits(&self, query: &str) -> bool {
        match self {
            Self::Root => false,
            Self::Path(path) => matcher::permits(path, query),
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str(crate::tree::ROOT_NAME),
            Self::Path(path) => f.write_str(path),
        }
    }
}
