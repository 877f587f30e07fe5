//! Process-wide set of known permissions.
//!
//! Every permission ever checked (existence queries aside) or explicitly
//! registered lands here. The set only grows and is never persisted; it
//! feeds autocomplete and grant suggestions.

use crate::matcher::is_existence_query;
use parking_lot::RwLock;
use std::collections::HashSet;

/// Append-only registry of permission strings.
///
/// Shared across tasks via `Arc`. Inserting a string twice is a no-op.
///
/// # Example
///
/// ```
/// use warrant_auth::KnownPermissions;
///
/// let known = KnownPermissions::new();
/// known.record_check("chat.color");
/// known.record_check("chat.?");
/// assert_eq!(known.snapshot(), vec!["chat.color".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct KnownPermissions {
    inner: RwLock<HashSet<String>>,
}

impl KnownPermissions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with `seed`.
    pub fn with_seed<I, S>(seed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let known = Self::new();
        known.register_all(seed);
        known
    }

    /// Adds `permission`. Returns `true` if it was not known before.
    pub fn register(&self, permission: impl Into<String>) -> bool {
        let permission = permission.into();
        {
            let set = self.inner.read();
            if set.contains(&permission) {
                return false;
            }
        }
        let inserted = self.inner.write().insert(permission.clone());
        if inserted {
            tracing::debug!(permission = %permission, "Registered known permission");
        }
        inserted
    }

    /// Adds every permission in `permissions`, returning how many were new.
    pub fn register_all<I, S>(&self, permissions: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        permissions
            .into_iter()
            .map(|p| self.register(p))
            .filter(|added| *added)
            .count()
    }

    /// Records a checked permission. Existence queries are skipped.
    pub fn record_check(&self, query: &str) -> bool {
        if is_existence_query(query) {
            return false;
        }
        self.register(query)
    }

    #[must_use]
    pub fn contains(&self, permission: &str) -> bool {
        self.inner.read().contains(permission)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Sorted copy of every known permission.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        let mut all: Vec<String> = self.inner.read().iter().cloned().collect();
        all.sort();
        all
    }

    /// Sorted known permissions starting with `prefix`.
    #[must_use]
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        let mut found: Vec<String> = self
            .inner
            .read()
            .iter()
            .filter(|p| p.starts_with(prefix))
            .cloned()
            .collect();
        found.sort();
        found
    }
}
