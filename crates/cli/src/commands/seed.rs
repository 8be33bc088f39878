//! Seed the store with plant listings.
//!
//! Reads a YAML list of plants and inserts them into the `plants`
//! collection. Each entry needs `name`, `category`, `price`, and
//! `quantity`; any other keys are stored unchanged.
//!
//! ```yaml
//! - name: Monstera Deliciosa
//!   category: Indoor
//!   price: 32.5
//!   quantity: 12
//!   image: https://i.ibb.co/monstera.jpg
//!   description: Split-leaf climber for bright rooms.
//!   seller:
//!     name: Greenhouse Co
//!     email: seller@plantnet.app
//! ```

use std::path::Path;

use plantnet_server::db::PlantRepository;
use plantnet_server::models::NewPlant;
use thiserror::Error;
use tracing::{error, info};

use super::{CommandError, connect};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("Failed to read {0}: {1}")]
    Read(String, std::io::Error),

    /// The seed file is not a valid plant list.
    #[error("Invalid seed file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// One or more entries failed validation.
    #[error("{0} invalid plant entries")]
    Invalid(usize),

    /// Connecting or inserting failed.
    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Parse and validate a YAML plant list.
///
/// # Errors
///
/// Returns `SeedError::Parse` for malformed YAML and `SeedError::Invalid`
/// if any entry fails validation (each failure is logged).
pub fn parse_plants(content: &str) -> Result<Vec<NewPlant>, SeedError> {
    let entries: Vec<NewPlant> = serde_yaml::from_str(content)?;

    let mut plants = Vec::with_capacity(entries.len());
    let mut invalid = 0;
    for (index, entry) in entries.into_iter().enumerate() {
        match entry.validate() {
            Ok(plant) => plants.push(plant),
            Err(e) => {
                error!(entry = index, "{e}");
                invalid += 1;
            }
        }
    }

    if invalid > 0 {
        return Err(SeedError::Invalid(invalid));
    }
    Ok(plants)
}

/// Insert plants from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or validated, or if the
/// insert fails. Nothing is inserted when any entry is invalid.
pub async fn plants(file_path: &str) -> Result<(), SeedError> {
    let path = Path::new(file_path);
    info!(path = %file_path, "Loading plants from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SeedError::Read(file_path.to_owned(), e))?;
    let plants = parse_plants(&content)?;
    info!(plants = plants.len(), "Parsed and validated seed file");

    let db = connect().await?;
    let inserted = PlantRepository::new(&db)
        .insert_many(&plants)
        .await
        .map_err(CommandError::from)?;

    info!("Seeding complete! Plants inserted: {inserted}");
    Ok(())
}
