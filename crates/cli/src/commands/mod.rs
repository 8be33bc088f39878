//! CLI command implementations.

pub mod db;
pub mod seed;
pub mod user;

use mongodb::Database;
use plantnet_server::config::{ConfigError, DatabaseConfig};
use thiserror::Error;

/// Errors shared by every command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Driver error while connecting or running a command.
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] plantnet_server::db::RepositoryError),
}

/// Load store settings from the environment and open the database.
pub(crate) async fn connect() -> Result<Database, CommandError> {
    let config = DatabaseConfig::from_env()?;
    tracing::info!(database = %config.name, "Connecting to MongoDB...");
    Ok(plantnet_server::db::connect(&config).await?)
}
