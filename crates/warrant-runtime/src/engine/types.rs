//! Small value types used by the engine API.

use serde::{Deserialize, Serialize};

/// Whether a listing includes grants inherited from groups.
///
/// Groups never inherit, so both modes list the same paths for a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inheritance {
    /// Only the subject's own tree.
    #[default]
    Direct,
    /// Own tree, then each group's tree in membership order.
    Inherited,
}

impl Inheritance {
    #[must_use]
    pub fn includes_groups(&self) -> bool {
        matches!(self, Self::Inherited)
    }
}

/// Feature flags a permission provider advertises to its host.
///
/// # Example
///
/// ```
/// use warrant_runtime::ProviderCapabilities;
///
/// let caps = ProviderCapabilities::default();
/// assert!(caps.supports_groups);
/// assert!(!caps.supports_temporary);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    pub supports_groups: bool,
    pub supports_temporary: bool,
    pub supports_timed_groups: bool,
    pub supports_per_world: bool,
}

impl Default for ProviderCapabilities {
    fn default() -> Self {
        Self {
            supports_groups: true,
            supports_temporary: false,
            supports_timed_groups: false,
            supports_per_world: false,
        }
    }
}
