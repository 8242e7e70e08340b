//! Connection settings file for rowbind.
//!
//! Lives at `~/.rowbind/config.toml` unless `--config` points elsewhere.
//! A missing file is created with the default settings on first use.

use anyhow::{Context, Result};
use rowbind_db::ConnectionParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIG_FILE: &str = "config.toml";
const DATABASE_EXTENSION: &str = "duckdb";

/// Contents of `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub connection: ConnectionParams,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionParams {
                host: "localhost".to_string(),
                database: "OdooExchangeSync".to_string(),
                user: "SA".to_string(),
                password: "<YourStrong@Passw0rd>".to_string(),
            },
        }
    }
}

/// Default config location: `<rowbind home>/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    Ok(rowbind_logging::rowbind_home()?.join(CONFIG_FILE))
}

/// Read the config file, writing the defaults first if it does not exist.
pub fn load_or_create(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        let config = AppConfig::default();
        write_config(path, &config)?;
        info!(path = %path.display(), "Created default configuration");
        return Ok(config);
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config file: {}", path.display()))
}

fn write_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }
    let text = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    fs::write(path, text)
        .with_context(|| format!("Failed to write config file: {}", path.display()))
}

/// Resolve `connection.database` to a database file.
///
/// A bare name such as `OdooExchangeSync` becomes
/// `<config dir>/OdooExchangeSync.duckdb`; anything with an extension is
/// used as given, relative paths resolving against the config directory.
pub fn database_path(config_path: &Path, database: &str) -> PathBuf {
    let mut path = PathBuf::from(database);
    if path.extension().is_none() {
        path.set_extension(DATABASE_EXTENSION);
    }
    if path.is_absolute() {
        return path;
    }
    match config_path.parent() {
        Some(dir) => dir.join(path),
        None => path,
    }
}

/// Password as asterisks, capped at eight so long passwords don't show their length.
pub fn mask_password(password: &str) -> String {
    "*".repeat(password.chars().count().min(8))
}

#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Print the resolved configuration as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the config command - shows the resolved connection settings
pub fn run(args: ConfigArgs, ctx: &super::context::CliContext) -> Result<()> {
    let conn = &ctx.config.connection;
    let db_path = ctx.database_path();

    if args.json {
        let out = serde_json::json!({
            "config_file": ctx.config_path.to_string_lossy(),
            "connection": {
                "host": conn.host,
                "database": conn.database,
                "user": conn.user,
                "password": mask_password(&conn.password),
            },
            "database_file": {
                "path": db_path.to_string_lossy(),
                "exists": db_path.exists(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("ROWBIND CONFIGURATION");
    println!("=====================");
    println!();
    println!("Config:   {}", ctx.config_path.display());
    println!();
    println!("Host:     {}", conn.host);
    println!("Database: {}", conn.database);
    println!("User:     {}", conn.user);
    println!("Password: {}", mask_password(&conn.password));
    println!();
    println!(
        "Database file: {} ({})",
        db_path.display(),
        if db_path.exists() { "exists" } else { "not found" }
    );

    Ok(())
}
