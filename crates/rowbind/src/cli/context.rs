//! Resolved settings shared by every command.

use super::config::{self, AppConfig};
use anyhow::Result;
use rowbind_db::DuckDbConnector;
use std::path::PathBuf;
use tracing::debug;

pub struct CliContext {
    pub config_path: PathBuf,
    pub config: AppConfig,
}

impl CliContext {
    /// Load (or create) the config file and apply command-line overrides.
    pub fn load(config_path: Option<PathBuf>, database: Option<String>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => config::default_config_path()?,
        };
        let mut config = config::load_or_create(&config_path)?;
        if let Some(database) = database.filter(|d| !d.trim().is_empty()) {
            debug!(database = %database, "Database overridden from command line");
            config.connection.database = database;
        }
        Ok(Self {
            config_path,
            config,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        config::database_path(&self.config_path, &self.config.connection.database)
    }

    pub fn connector(&self) -> DuckDbConnector {
        let mut params = self.config.connection.clone();
        params.database = self.database_path().to_string_lossy().into_owned();
        DuckDbConnector::from_params(&params)
    }
}
