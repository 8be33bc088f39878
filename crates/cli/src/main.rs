//! PlantNet CLI - store management tools.
//!
//! # Usage
//!
//! ```bash
//! # Check connectivity
//! plantnet-cli ping
//!
//! # Create indexes
//! plantnet-cli indexes
//!
//! # Insert plants from a YAML file
//! plantnet-cli seed plants data/plants.yaml
//!
//! # Grant a role
//! plantnet-cli user set-role -e grower@example.com -r seller
//! ```
//!
//! # Commands
//!
//! - `ping` - Check that `MongoDB` answers
//! - `indexes` - Create collection indexes
//! - `seed plants` - Seed plant listings
//! - `user set-role` - Assign a user's role

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "plantnet-cli")]
#[command(author, version, about = "PlantNet CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the store is reachable
    Ping,
    /// Create collection indexes
    Indexes,
    /// Seed the store with data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert plant listings from a YAML file
    Plants {
        /// Path to the YAML file
        file: String,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Set a user's role and clear any pending request
    SetRole {
        /// User email address
        #[arg(short, long)]
        email: String,

        /// Role (`customer`, `seller`, `admin`)
        #[arg(short, long)]
        role: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Ping => commands::db::ping().await?,
        Commands::Indexes => commands::db::indexes().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Plants { file } => commands::seed::plants(&file).await?,
        },
        Commands::User { action } => match action {
            UserAction::SetRole { email, role } => {
                commands::user::set_role(&email, &role).await?;
            }
        },
    }
    Ok(())
}
