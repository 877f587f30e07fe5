//! Storage shape of a permission tree.

use serde::{Deserialize, Serialize};

/// Generic nested form of a [`PermissionTree`](crate::PermissionTree):
/// a name and an ordered list of children of the same shape.
///
/// This is the blob a storage backend persists; it knows nothing about
/// grants or matching.
///
/// ```json
/// { "name": "root", "children": [
///     { "name": "chat", "children": [ { "name": "*", "children": [] } ] }
/// ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRecord {
    pub name: String,
    #[serde(default)]
    pub children: Vec<TreeRecord>,
}

impl TreeRecord {
    /// A record with no children.
    #[must_use]
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }
}
