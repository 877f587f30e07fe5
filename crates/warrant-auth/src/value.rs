//! Result of an authorization check.

use serde::{Deserialize, Serialize};

/// Effective outcome of a check.
///
/// There is no explicit deny: a permission that nothing grants reports
/// [`PermissionValue::Default`], and the caller decides what "default"
/// means (usually a fallback to operator level).
///
/// # Example
///
/// ```
/// use warrant_auth::PermissionValue;
///
/// assert!(PermissionValue::Granted.is_granted());
/// assert_eq!(PermissionValue::Default.status_str(), "default");
/// assert_eq!(PermissionValue::from(true), PermissionValue::Granted);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionValue {
    /// Some grant permits the query.
    Granted,
    /// Nothing grants the query.
    #[default]
    Default,
}

impl PermissionValue {
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Returns "granted" or "default".
    #[must_use]
    pub fn status_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Default => "default",
        }
    }
}

impl From<bool> for PermissionValue {
    fn from(granted: bool) -> Self {
        if granted {
            Self::Granted
        } else {
            Self::Default
        }
    }
}

impl std::fmt::Display for PermissionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status_str())
    }
}
