//! Configuration resolver trait for layered overrides.
//!
//! ```text
//! ConfigLoader.load()  →  WarrantConfig (files + env)
//!                              │
//!                              ▼
//!                     ConfigResolver.apply()   (CLI flags)
//!                              │
//!                              ▼
//!                     WarrantConfig (final)
//! ```

use super::WarrantConfig;

/// Applies runtime overrides on top of a loaded config.
///
/// Only values the caller actually specified should be applied.
pub trait ConfigResolver {
    fn apply(&self, config: &mut WarrantConfig);
}

/// Resolver that changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpResolver;

impl ConfigResolver for NoOpResolver {
    fn apply(&self, _config: &mut WarrantConfig) {}
}
