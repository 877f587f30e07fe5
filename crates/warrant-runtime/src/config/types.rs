//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use crate::store::default_data_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
///
/// # Example
///
/// ```
/// use warrant_runtime::config::{StoreBackend, WarrantConfig};
///
/// let config = WarrantConfig::default();
/// assert!(!config.debug);
/// assert_eq!(config.store.backend, StoreBackend::File);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WarrantConfig {
    /// Enable debug logging.
    pub debug: bool,

    /// Storage backend selection.
    pub store: StoreConfig,

    /// Known-permission registry seeding.
    pub registry: RegistryConfig,
}

impl WarrantConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values in `other` override `self` only where they differ from the
    /// defaults.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.store.merge(&other.store);
        self.registry.merge(&other.registry);
    }
}

/// Which [`PermissionStore`](crate::store::PermissionStore) to open.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON files under `data_dir`.
    #[default]
    File,
    /// Volatile, process-local.
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend '{other}', expected 'file' or 'memory'")),
        }
    }
}

/// Storage configuration.
///
/// ```toml
/// [store]
/// backend = "file"
/// data_dir = "~/.warrant/data"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Data directory for the file backend (default: `~/.warrant/data`).
    pub data_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// Returns the configured data directory or the default one.
    #[must_use]
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Resolves a relative `data_dir` against `root`.
    #[must_use]
    pub fn resolve_data_dir_in(&self, root: &Path) -> PathBuf {
        let dir = self.resolve_data_dir();
        if dir.is_absolute() || dir.starts_with("~") {
            dir
        } else {
            root.join(dir)
        }
    }

    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.backend != default.backend {
            self.backend = other.backend;
        }
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir.clone();
        }
    }
}

/// Registry configuration.
///
/// ```toml
/// [registry]
/// seed = ["chat.color", "server.stop"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    /// Permissions registered at startup.
    pub seed: Vec<String>,
}

impl RegistryConfig {
    fn merge(&mut self, other: &Self) {
        // Accumulate across layers
        for permission in &other.seed {
            if !self.seed.contains(permission) {
                self.seed.push(permission.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_partial_toml() {
        let toml = r#"
[store]
backend = "memory"
"#;
        let config = WarrantConfig::from_toml(toml).expect("should parse partial TOML");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.store.data_dir.is_none());
        assert!(!config.debug);
    }

    #[test]
    fn toml_round_trip() {
        let config = WarrantConfig {
            debug: true,
            store: StoreConfig {
                backend: StoreBackend::File,
                data_dir: Some(PathBuf::from("/srv/warrant")),
            },
            registry: RegistryConfig {
                seed: vec!["server.stop".into()],
            },
        };
        let toml = config.to_toml().expect("serialize");
        assert_eq!(WarrantConfig::from_toml(&toml).expect("parse"), config);
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(WarrantConfig::from_toml("[store]\nbackend = \"sql\"").is_err());
        assert!("sql".parse::<StoreBackend>().is_err());
        assert_eq!("MEMORY".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
    }

    #[test]
    fn merge_overrides_non_default() {
        let mut base = WarrantConfig {
            registry: RegistryConfig {
                seed: vec!["a".into()],
            },
            ..Default::default()
        };
        let overlay = WarrantConfig {
            debug: true,
            store: StoreConfig {
                backend: StoreBackend::Memory,
                data_dir: None,
            },
            registry: RegistryConfig {
                seed: vec!["a".into(), "b".into()],
            },
        };

        base.merge(&overlay);

        assert!(base.debug);
        assert_eq!(base.store.backend, StoreBackend::Memory);
        assert_eq!(base.registry.seed, vec!["a", "b"]);
    }

    #[test]
    fn merge_keeps_base_when_overlay_is_default() {
        let mut base = WarrantConfig {
            debug: true,
            store: StoreConfig {
                backend: StoreBackend::Memory,
                data_dir: Some(PathBuf::from("/data")),
            },
            ..Default::default()
        };
        base.merge(&WarrantConfig::default());

        assert!(base.debug);
        assert_eq!(base.store.backend, StoreBackend::Memory);
        assert_eq!(base.store.data_dir, Some(PathBuf::from("/data")));
    }

    #[test]
    fn relative_data_dir_resolves_against_root() {
        let store = StoreConfig {
            data_dir: Some(PathBuf::from("data")),
            ..Default::default()
        };
        assert_eq!(
            store.resolve_data_dir_in(Path::new("/project")),
            PathBuf::from("/project/data")
        );
        assert_eq!(StoreConfig::default().resolve_data_dir(), default_data_dir());
    }
}
