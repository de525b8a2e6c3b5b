//! RetailRadar CLI for database migrations and management.
//!
//! ```bash
//! rr-cli migrate       # apply pending migrations
//! rr-cli seed          # replace all data with the sample marketplace
//! rr-cli clear-orders  # delete orders, keep accounts and catalog
//! ```
//!
//! All commands read `RETAILRADAR_DATABASE_URL` (or `DATABASE_URL`) from the
//! environment, loading `.env` first when present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rr-cli")]
#[command(author, version, about = "RetailRadar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Replace all data with sample users, stores, and products
    Seed,
    /// Delete all orders and their line items
    ClearOrders,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::ClearOrders => commands::clear_orders::run().await?,
    }

    Ok(())
}
