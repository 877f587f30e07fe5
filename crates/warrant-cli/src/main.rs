//! warrant CLI - permission administration
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`WARRANT_*`)
//! 3. Project config (`.warrant/config.toml` in the project root)
//! 4. Global config (`~/.warrant/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `WARRANT_DEBUG`: Enable debug logging (`true`/`false`)
//! - `WARRANT_STORE`: Storage backend (`file`/`memory`)
//! - `WARRANT_DATA_DIR`: Data directory of the file backend
//!
//! # Modes
//!
//! With a trailing command the binary runs it and exits; the exit status
//! is 1 if it failed. Without one it reads commands from stdin, one per
//! line, until EOF or `q`.

mod command_tree;
mod error;
mod shell;

use anyhow::Result;
use clap::Parser;
use command_tree::warrant_commands;
use shell::{Actor, Shell};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use warrant_auth::KnownPermissions;
use warrant_runtime::config::{ConfigLoader, ConfigResolver, StoreBackend, WarrantConfig};
use warrant_runtime::{ConfiguredStore, PermissionEngine};
use warrant_types::UserId;

/// warrant - hierarchical permissions for users and groups
#[derive(Parser, Debug)]
#[command(name = "warrant")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long)]
    project: Option<PathBuf>,

    /// Data directory of the file backend (also: WARRANT_DATA_DIR)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory for this run (also: WARRANT_STORE=memory)
    #[arg(long)]
    memory: bool,

    /// Run commands as this user instead of the console
    #[arg(long = "as", value_name = "UUID")]
    as_user: Option<UserId>,

    /// Operator level of the `--as` user
    #[arg(long, default_value_t = 0, requires = "as_user")]
    op_level: u8,

    /// Command to execute (optional)
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

/// CLI-based configuration resolver.
///
/// Applies CLI argument overrides on top of the file/env config loaded by
/// [`ConfigLoader`].
struct CliConfigResolver {
    project_root: PathBuf,
    debug: bool,
    memory: bool,
    data_dir: Option<PathBuf>,
}

impl CliConfigResolver {
    fn from_args(args: &Args) -> Self {
        let project_root = args.project.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to get current directory, using '.'");
                PathBuf::from(".")
            })
        });

        Self {
            project_root,
            debug: args.debug,
            memory: args.memory,
            data_dir: args.data_dir.clone(),
        }
    }

    fn resolve(&self) -> Result<WarrantConfig> {
        let mut config = ConfigLoader::new()
            .with_project_root(&self.project_root)
            .load()
            .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
        self.apply(&mut config);
        Ok(config)
    }
}

impl ConfigResolver for CliConfigResolver {
    fn apply(&self, config: &mut WarrantConfig) {
        if self.debug {
            config.debug = true;
        }
        if self.memory {
            config.store.backend = StoreBackend::Memory;
        }
        if let Some(ref dir) = self.data_dir {
            config.store.data_dir = Some(dir.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let resolver = CliConfigResolver::from_args(&args);
    let config = resolver.resolve()?;

    // Terminal filter: --debug (or config debug) > --verbose > RUST_LOG > "warn"
    let filter = if config.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();

    info!(path = %resolver.project_root.display(), "Project root");

    let store = ConfiguredStore::open(&config.store, &resolver.project_root)?;
    info!(backend = ?store.backend(), "Store opened");

    let known = Arc::new(KnownPermissions::with_seed(config.registry.seed.iter().cloned()));
    let engine = PermissionEngine::new(store, known);
    engine.bootstrap().await?;

    let commands = warrant_commands();
    let registered = engine.register_permissions(commands.required_permissions());
    info!(registered, "Command permissions registered");

    let actor = match args.as_user {
        Some(id) => {
            engine.on_connect(&id).await?;
            Actor::User {
                id,
                op_level: args.op_level,
            }
        }
        None => Actor::Console,
    };
    let shell = Shell::new(engine, commands, actor);

    if args.command.is_empty() {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let failures = shell.run_lines(stdin).await?;
        if failures > 0 {
            std::process::exit(1);
        }
    } else {
        info!(command = %args.command.join(" "), "Command mode");
        match shell.execute(&args.command).await {
            Ok(output) => println!("{output}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn resolver_in(dir: &TempDir, memory: bool, data_dir: Option<PathBuf>) -> CliConfigResolver {
        CliConfigResolver {
            project_root: dir.path().to_path_buf(),
            debug: false,
            memory,
            data_dir,
        }
    }

    #[test]
    fn apply_without_flags_changes_nothing() {
        let dir = TempDir::new().expect("temp dir");
        let mut config = WarrantConfig::default();
        resolver_in(&dir, false, None).apply(&mut config);
        assert_eq!(config, WarrantConfig::default());
    }

    #[test]
    fn apply_overrides_store() {
        let dir = TempDir::new().expect("temp dir");
        let mut config = WarrantConfig::default();
        resolver_in(&dir, true, Some(PathBuf::from("/srv/warrant"))).apply(&mut config);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.data_dir, Some(PathBuf::from("/srv/warrant")));
    }

    #[test]
    fn project_config_is_read() {
        let dir = TempDir::new().expect("temp dir");
        let config_dir = dir.path().join(".warrant");
        std::fs::create_dir_all(&config_dir).expect("create config dir");
        std::fs::write(
            config_dir.join("config.toml"),
            "[registry]\nseed = [\"chat.color\"]\n",
        )
        .expect("write config");

        let config = resolver_in(&dir, false, None)
            .resolve()
            .expect("should resolve");
        assert!(config.registry.seed.contains(&"chat.color".to_string()));
    }

    #[test]
    fn args_parse_trailing_command() {
        let args = Args::try_parse_from([
            "warrant",
            "--memory",
            "group",
            "create",
            "admins",
        ])
        .expect("should parse");
        assert!(args.memory);
        assert_eq!(args.command, vec!["group", "create", "admins"]);
    }

    #[test]
    fn op_level_requires_actor() {
        assert!(Args::try_parse_from(["warrant", "--op-level", "4", "group", "list"]).is_err());
    }
}
