//! Layered configuration loading.
//!
//! # Load Order
//!
//! 1. `WarrantConfig::default()`
//! 2. Global config (`~/.warrant/config.toml`)
//! 3. Project config (`.warrant/config.toml`)
//! 4. Environment variables (`WARRANT_*`)
//!
//! Later layers win; registry seeds accumulate.

use super::{
    default_config_path, ConfigError, StoreBackend, WarrantConfig, PROJECT_CONFIG_DIR,
    PROJECT_CONFIG_FILE,
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Overwrites `$field` when the boolean variable `$var` is set.
macro_rules! parse_env_bool {
    ($field:expr, $var:literal) => {
        if let Ok(val) = std::env::var($var) {
            $field = parse_bool(&val)
                .ok_or_else(|| ConfigError::invalid_env_var($var, "expected bool"))?;
        }
    };
}

/// Builder selecting which layers [`load`](Self::load) merges.
///
/// # Example
///
/// ```no_run
/// use warrant_runtime::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_project_root("/path/to/project")
///     .load()?;
/// # Ok::<(), warrant_runtime::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to ~/.warrant/config.toml).
    global_config_path: Option<PathBuf>,

    project_root: Option<PathBuf>,

    skip_env: bool,
    skip_global: bool,
    skip_project: bool,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Sets the project root directory.
    ///
    /// Project config will be loaded from `<project_root>/.warrant/config.toml`.
    #[must_use]
    pub fn with_project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    #[must_use]
    pub fn skip_project_config(mut self) -> Self {
        self.skip_project = true;
        self
    }

    /// Merges every enabled layer over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unreadable or malformed config file,
    /// or an environment variable with an invalid value. Absent files are
    /// skipped.
    pub fn load(&self) -> Result<WarrantConfig, ConfigError> {
        let mut config = WarrantConfig::default();

        for (layer, path) in self.file_layers() {
            if let Some(found) = load_file(&path)? {
                debug!(layer, path = %path.display(), "Config layer applied");
                config.merge(&found);
            }
        }

        if !self.skip_env {
            apply_env_vars(&mut config)?;
        }

        Ok(config)
    }

    /// Config files in merge order, lowest priority first.
    fn file_layers(&self) -> Vec<(&'static str, PathBuf)> {
        let mut layers = Vec::with_capacity(2);
        if !self.skip_global {
            let global = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);
            layers.push(("global", global));
        }
        if let (false, Some(root)) = (self.skip_project, &self.project_root) {
            layers.push((
                "project",
                root.join(PROJECT_CONFIG_DIR).join(PROJECT_CONFIG_FILE),
            ));
        }
        layers
    }
}

/// Reads one layer. `None` when the file does not exist.
fn load_file(path: &Path) -> Result<Option<WarrantConfig>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::read_file(path, e)),
    };
    WarrantConfig::from_toml(&content)
        .map(Some)
        .map_err(|e| ConfigError::parse_toml(path, e))
}

fn apply_env_vars(config: &mut WarrantConfig) -> Result<(), ConfigError> {
    parse_env_bool!(config.debug, "WARRANT_DEBUG");

    if let Ok(val) = std::env::var("WARRANT_STORE") {
        config.store.backend = val
            .parse::<StoreBackend>()
            .map_err(|message| ConfigError::invalid_env_var("WARRANT_STORE", message))?;
    }

    if let Ok(val) = std::env::var("WARRANT_DATA_DIR") {
        config.store.data_dir = Some(PathBuf::from(val));
    }

    Ok(())
}

/// `true/1/yes/on` or `false/0/no/off`, any case.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Writes `config` to `path` as TOML, creating missing parent directories.
///
/// # Errors
///
/// [`ConfigError::CreateDir`], [`ConfigError::Serialize`] or
/// [`ConfigError::WriteFile`].
pub fn save_config(config: &WarrantConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::create_dir(dir, e))?;
    }
    std::fs::write(path, config.to_toml()?).map_err(|e| ConfigError::write_file(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_config_file(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.toml");
        std::fs::write(&path, content).expect("write config");
        path
    }

    #[test]
    fn load_defaults_only() {
        let config = ConfigLoader::new()
            .skip_global_config()
            .skip_project_config()
            .skip_env_vars()
            .load()
            .expect("load");

        assert_eq!(config, WarrantConfig::default());
    }

    #[test]
    fn load_global_config() {
        let temp = TempDir::new().expect("temp dir");
        let config_path = create_config_file(
            temp.path(),
            r#"
debug = true

[store]
data_dir = "/srv/warrant"
"#,
        );

        let config = ConfigLoader::new()
            .with_global_config(&config_path)
            .skip_project_config()
            .skip_env_vars()
            .load()
            .expect("load");

        assert!(config.debug);
        assert_eq!(config.store.data_dir, Some(PathBuf::from("/srv/warrant")));
    }

    #[test]
    fn load_project_overrides_global() {
        let global_temp = TempDir::new().expect("temp dir");
        let project_temp = TempDir::new().expect("temp dir");

        let project_dir = project_temp.path().join(PROJECT_CONFIG_DIR);
        std::fs::create_dir_all(&project_dir).expect("create project dir");

        let global_path = create_config_file(
            global_temp.path(),
            r#"
debug = true

[store]
data_dir = "/global"

[registry]
seed = ["server.stop"]
"#,
        );
        create_config_file(
            &project_dir,
            r#"
[store]
backend = "memory"
data_dir = "/project"

[registry]
seed = ["chat.color"]
"#,
        );

        let config = ConfigLoader::new()
            .with_global_config(&global_path)
            .with_project_root(project_temp.path())
            .skip_env_vars()
            .load()
            .expect("load");

        assert!(config.debug);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.data_dir, Some(PathBuf::from("/project")));
        assert_eq!(config.registry.seed, vec!["server.stop", "chat.color"]);
    }

    #[test]
    fn missing_config_files_ok() {
        let config = ConfigLoader::new()
            .with_global_config("/nonexistent/path/config.toml")
            .with_project_root("/nonexistent/project")
            .skip_env_vars()
            .load()
            .expect("load");

        assert_eq!(config, WarrantConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().expect("temp dir");
        let path = create_config_file(temp.path(), "debug = [");

        let err = ConfigLoader::new()
            .with_global_config(&path)
            .skip_env_vars()
            .load()
            .expect_err("malformed toml");
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("on"), Some(true));
        assert_eq!(parse_bool("no"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("invalid"), None);
    }

    #[test]
    fn save_then_load() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("nested").join("config.toml");
        let config = WarrantConfig {
            debug: true,
            ..Default::default()
        };

        save_config(&config, &path).expect("save");

        let loaded = ConfigLoader::new()
            .with_global_config(&path)
            .skip_env_vars()
            .load()
            .expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn env_var_override() {
        // Mutates process env.
        std::env::set_var("WARRANT_DEBUG", "yes");
        std::env::set_var("WARRANT_STORE", "memory");
        std::env::set_var("WARRANT_DATA_DIR", "/env/data");

        let config = ConfigLoader::new()
            .skip_global_config()
            .skip_project_config()
            .load();

        std::env::set_var("WARRANT_STORE", "sql");
        let invalid = ConfigLoader::new()
            .skip_global_config()
            .skip_project_config()
            .load();

        std::env::remove_var("WARRANT_DEBUG");
        std::env::remove_var("WARRANT_STORE");
        std::env::remove_var("WARRANT_DATA_DIR");

        let config = config.expect("load");
        assert!(config.debug);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.data_dir, Some(PathBuf::from("/env/data")));
        assert!(matches!(
            invalid,
            Err(ConfigError::InvalidEnvVar { ref name, .. }) if name == "WARRANT_STORE"
        ));
    }
}
