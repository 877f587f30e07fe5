//! Arena-backed permission tree.
//!
//! Every subject owns one tree. Each dot-delimited segment of a granted
//! permission is a node, and every node below the root is a grant: the
//! path from the root to it is granted.
//!
//! ```text
//! root
//! ├── chat             "chat"
//! │   └── *            "chat.*"
//! └── home             "home"
//!     └── limit        "home.limit"
//!         └── 5        "home.limit.5"
//! ```
//!
//! A node whose name parses as a 32-bit integer is a numeric parameter and
//! must stay a leaf. Both [`PermissionTree::get_or_create`] and
//! [`PermissionTree::from_record`] reject anything that would put a child
//! under it.
//!
//! Removing a grant detaches its node together with everything below it.
//! Ancestors stay in place and keep granting their own paths.

use crate::{Grant, TreeError, TreeRecord};

/// Name of the sentinel root node.
pub const ROOT_NAME: &str = "root";

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
struct Node {
    name: String,
    children: Vec<NodeId>,
}

impl Node {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }
}

/// Returns `true` if `segment` is a 32-bit integer literal.
#[must_use]
pub fn is_numeric(segment: &str) -> bool {
    segment.parse::<i32>().is_ok()
}

/// Hierarchical store of one subject's grants.
///
/// Nodes live in a flat arena addressed by index. Detached nodes keep their
/// slot until the tree is rebuilt from its record; they are unreachable and
/// ignored by every read and by equality.
///
/// # Example
///
/// ```
/// use warrant_auth::{Grant, PermissionTree};
///
/// let mut tree = PermissionTree::new();
/// tree.get_or_create("chat.*").unwrap();
///
/// let grants: Vec<Grant> = tree.nodes().collect();
/// assert_eq!(
///     grants,
///     vec![Grant::Path("chat".into()), Grant::Path("chat.*".into())]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PermissionTree {
    arena: Vec<Node>,
}

impl PermissionTree {
    /// Creates a tree holding only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: vec![Node::new(ROOT_NAME)],
        }
    }

    /// Ensures a node exists for every segment of `path`.
    ///
    /// The tree is untouched on error. An empty `path` is a no-op.
    ///
    /// # Errors
    ///
    /// [`TreeError::NumericParent`] if a segment other than the last is numeric.
    pub fn get_or_create(&mut self, path: &str) -> Result<(), TreeError> {
        if path.is_empty() {
            return Ok(());
        }
        let segments: Vec<&str> = path.split('.').collect();
        if let Some(numeric) = segments[..segments.len() - 1]
            .iter()
            .find(|s| is_numeric(s))
        {
            return Err(TreeError::NumericParent {
                segment: (*numeric).to_string(),
                path: path.to_string(),
            });
        }

        let mut current = ROOT;
        for segment in segments {
            current = match self.child(current, segment) {
                Some(id) => id,
                None => self.attach(current, segment),
            };
        }
        Ok(())
    }

    /// Detaches the node at `path`, and its subtree, from its parent.
    ///
    /// Walks existing nodes only. Returns `false` (and changes nothing) when
    /// the path is absent.
    pub fn remove(&mut self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        let mut segments = path.split('.').peekable();
        let mut parent = ROOT;
        while let Some(segment) = segments.next() {
            let Some(id) = self.child(parent, segment) else {
                return false;
            };
            if segments.peek().is_none() {
                self.arena[parent].children.retain(|&c| c != id);
                return true;
            }
            parent = id;
        }
        false
    }

    /// Returns `true` if a node exists at `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        let mut current = ROOT;
        for segment in path.split('.') {
            match self.child(current, segment) {
                Some(id) => current = id,
                None => return false,
            }
        }
        true
    }

    /// Every node below the root as a grant, in pre-order with children in
    /// insertion order.
    ///
    /// A tree with only its root yields a single [`Grant::Root`].
    pub fn nodes(&self) -> Grants<'_> {
        Grants::new(self)
    }

    /// Returns `true` if the root has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arena[ROOT].children.is_empty()
    }

    /// Number of reachable nodes, root excluded.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<NodeId> = self.arena[ROOT].children.clone();
        while let Some(id) = stack.pop() {
            count += 1;
            stack.extend_from_slice(&self.arena[id].children);
        }
        count
    }

    /// Converts to the nested storage shape.
    #[must_use]
    pub fn to_record(&self) -> TreeRecord {
        self.record_of(ROOT)
    }

    fn record_of(&self, id: NodeId) -> TreeRecord {
        let node = &self.arena[id];
        TreeRecord {
            name: node.name.clone(),
            children: node.children.iter().map(|&c| self.record_of(c)).collect(),
        }
    }

    /// Rebuilds a tree from its storage shape.
    ///
    /// The record's own name is ignored; its children become the root's.
    /// Duplicate sibling names are merged.
    ///
    /// # Errors
    ///
    /// [`TreeError::NumericParent`] if a numeric node in `record` has children.
    pub fn from_record(record: &TreeRecord) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        let mut stack: Vec<(&TreeRecord, NodeId, String)> = record
            .children
            .iter()
            .rev()
            .map(|child| (child, ROOT, child.name.clone()))
            .collect();

        while let Some((rec, parent, path)) = stack.pop() {
            if is_numeric(&rec.name) && !rec.children.is_empty() {
                return Err(TreeError::NumericParent {
                    segment: rec.name.clone(),
                    path,
                });
            }
            let id = match tree.child(parent, &rec.name) {
                Some(id) => id,
                None => tree.attach(parent, &rec.name),
            };
            for child in rec.children.iter().rev() {
                stack.push((child, id, format!("{path}.{}", child.name)));
            }
        }
        Ok(tree)
    }

    fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.arena[parent]
            .children
            .iter()
            .copied()
            .find(|&id| self.arena[id].name == name)
    }

    fn attach(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.arena.len();
        self.arena.push(Node::new(name));
        self.arena[parent].children.push(id);
        id
    }
}

impl Default for PermissionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PermissionTree {
    fn eq(&self, other: &Self) -> bool {
        self.to_record() == other.to_record()
    }
}

impl Eq for PermissionTree {}

impl From<&PermissionTree> for TreeRecord {
    fn from(tree: &PermissionTree) -> Self {
        tree.to_record()
    }
}

impl TryFrom<&TreeRecord> for PermissionTree {
    type Error = TreeError;

    fn try_from(record: &TreeRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}

/// Iterator over the resolved grants of a [`PermissionTree`].
///
/// Walks the arena with an explicit stack. Each call to
/// [`PermissionTree::nodes`] starts a fresh walk.
pub struct Grants<'a> {
    tree: &'a PermissionTree,
    stack: Vec<(NodeId, usize)>,
    segments: Vec<&'a str>,
    root_pending: bool,
}

impl<'a> Grants<'a> {
    fn new(tree: &'a PermissionTree) -> Self {
        let root = &tree.arena[ROOT];
        Self {
            tree,
            stack: root.children.iter().rev().map(|&id| (id, 0)).collect(),
            segments: Vec::new(),
            root_pending: root.children.is_empty(),
        }
    }
}

impl Iterator for Grants<'_> {
    type Item = Grant;

    fn next(&mut self) -> Option<Grant> {
        if self.root_pending {
            self.root_pending = false;
            return Some(Grant::Root);
        }
        let tree = self.tree;
        let (id, depth) = self.stack.pop()?;
        let node = &tree.arena[id];
        self.segments.truncate(depth);
        self.segments.push(&node.name);
        self.stack
            .extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
        Some(Grant::Path(self.segments.join(".")))
    }
}
