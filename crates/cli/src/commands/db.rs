//! Store connectivity and index commands.
//!
//! # Usage
//!
//! ```bash
//! # Check that the deployment answers
//! plantnet-cli ping
//!
//! # Create indexes (safe to re-run)
//! plantnet-cli indexes
//! ```
//!
//! # Environment Variables
//!
//! - `PLANTNET_DATABASE_URL` - `MongoDB` connection string
//!   (falls back to `DATABASE_URL`, then `DB_USER`/`DB_PASS`/`DB_HOST`)
//! - `PLANTNET_DATABASE_NAME` - Database name (default: plantNet-session)

use mongodb::IndexModel;
use mongodb::bson::{Document, doc};
use mongodb::options::IndexOptions;
use plantnet_server::db::{ORDERS, USERS, ping as ping_store};

use super::{CommandError, connect};

/// Ping the configured deployment.
///
/// # Errors
///
/// Returns an error if configuration is missing or no server answers.
pub async fn ping() -> Result<(), CommandError> {
    let db = connect().await?;
    ping_store(&db).await?;
    tracing::info!("MongoDB is reachable");
    Ok(())
}

/// Create the indexes the API relies on.
///
/// - `users.email` (unique): first-login upserts converge on one record
/// - `Orders.customer.email`: customer order listing
///
/// # Errors
///
/// Returns an error if configuration is missing or index creation fails,
/// for example when `users` already holds duplicate emails.
pub async fn indexes() -> Result<(), CommandError> {
    let db = connect().await?;

    let name = db
        .collection::<Document>(USERS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?
        .index_name;
    tracing::info!(collection = USERS, index = %name, "Index ready");

    let name = db
        .collection::<Document>(ORDERS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "customer.email": 1 })
                .build(),
        )
        .await?
        .index_name;
    tracing::info!(collection = ORDERS, index = %name, "Index ready");

    Ok(())
}
