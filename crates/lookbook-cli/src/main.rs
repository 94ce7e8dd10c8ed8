mod commands;
mod render;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lookbook")]
#[command(about = "Product curation toolkit: search, catalog, and bundles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the commerce endpoint for products.
    Search(commands::search::SearchArgs),
    /// Manage the durable product catalog.
    #[command(subcommand)]
    Catalog(commands::catalog::CatalogCommand),
    /// Manage saved product bundles.
    #[command(subcommand)]
    Bundle(commands::bundle::BundleCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = lookbook_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search(args) => commands::search::run(&config, args).await,
        Commands::Catalog(command) => commands::catalog::run(&config, command).await,
        Commands::Bundle(command) => commands::bundle::run(&config, command).await,
    }
}
