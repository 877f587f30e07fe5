//! Configuration management with hierarchical layering.
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌────────────────────────────────────────────┐
//! │  1. CLI flags (ConfigResolver)             │
//! ├────────────────────────────────────────────┤
//! │  2. Environment Variables (WARRANT_*)      │
//! ├────────────────────────────────────────────┤
//! │  3. Project Config (.warrant/config.toml)  │
//! ├────────────────────────────────────────────┤
//! │  4. Global Config (~/.warrant/config.toml) │
//! ├────────────────────────────────────────────┤
//! │  5. Default Values                         │
//! └────────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `WARRANT_DEBUG` | `debug` | bool |
//! | `WARRANT_STORE` | `store.backend` | `file` \| `memory` |
//! | `WARRANT_DATA_DIR` | `store.data_dir` | PathBuf |
//!
//! # Example Configuration
//!
//! ```toml
//! # ~/.warrant/config.toml
//! debug = false
//!
//! [store]
//! backend = "file"
//! data_dir = "~/.warrant/data"
//!
//! [registry]
//! seed = ["chat.color", "server.stop"]
//! ```

mod error;
mod loader;
mod resolver;
mod types;

pub use error::ConfigError;
pub use loader::{save_config, ConfigLoader};
pub use resolver::{ConfigResolver, NoOpResolver};
pub use types::{RegistryConfig, StoreBackend, StoreConfig, WarrantConfig};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".warrant")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Project config directory name.
pub const PROJECT_CONFIG_DIR: &str = ".warrant";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "config.toml";
