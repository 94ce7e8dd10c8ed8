use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};

use lookbook_core::AppConfig;
use lookbook_search::SearchClient;
use lookbook_store::catalog::{
    clear_catalog, export_catalog, import_catalog, load_catalog, save_catalog,
};
use lookbook_store::{CatalogEntry, EntrySource, FileKv};

use crate::render;

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// List every catalog entry, most recently added first.
    List,
    /// Find entries matching every term of the query.
    Search { query: String },
    /// Run a product search and add all results to the catalog.
    Add(AddArgs),
    /// Remove entries by catalog id; unknown ids are skipped.
    Remove {
        #[arg(required = true)]
        catalog_ids: Vec<String>,
    },
    /// Write the catalog to a JSON file.
    Export { path: PathBuf },
    /// Replace the catalog with the contents of a JSON export.
    Import { path: PathBuf },
    /// Delete every catalog entry.
    Clear {
        /// Required confirmation for this destructive action.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub query: String,
    /// Record the new entries as manually curated rather than api-sourced.
    #[arg(long)]
    pub manual: bool,
}

pub async fn run(config: &AppConfig, command: CatalogCommand) -> anyhow::Result<()> {
    let kv = FileKv::new(&config.data_dir);

    match command {
        CatalogCommand::List => {
            let catalog = load_catalog(&kv);
            print_entries(&catalog.entries());
        }

        CatalogCommand::Search { query } => {
            let catalog = load_catalog(&kv);
            print_entries(&catalog.search(&query));
        }

        CatalogCommand::Add(args) => {
            let client = SearchClient::from_config(config)?;
            let products = client.search(&args.query, config.search_page_size).await?;
            if products.is_empty() {
                println!("no products found for \"{}\"", args.query.trim());
                return Ok(());
            }

            let source = if args.manual {
                EntrySource::Manual
            } else {
                EntrySource::Api
            };

            let mut catalog = load_catalog(&kv);
            let inserted = catalog.add(&products, source);
            save_catalog(&kv, &mut catalog).context("failed to persist catalog")?;
            println!(
                "added {} of {} products to the catalog ({} total)",
                inserted.len(),
                products.len(),
                catalog.len()
            );
        }

        CatalogCommand::Remove { catalog_ids } => {
            let mut catalog = load_catalog(&kv);
            let removed = catalog.remove_many(&catalog_ids);
            save_catalog(&kv, &mut catalog).context("failed to persist catalog")?;
            println!("removed {removed} of {} entries", catalog_ids.len());
        }

        CatalogCommand::Export { path } => {
            let catalog = load_catalog(&kv);
            let json = export_catalog(&catalog)?;
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("exported {} entries to {}", catalog.len(), path.display());
        }

        CatalogCommand::Import { path } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let catalog = import_catalog(&kv, &raw)?;
            println!("imported catalog with {} entries", catalog.len());
        }

        CatalogCommand::Clear { yes } => {
            anyhow::ensure!(yes, "refusing to clear the catalog without --yes");
            clear_catalog(&kv)?;
            println!("catalog cleared");
        }
    }

    Ok(())
}

fn print_entries(entries: &[&CatalogEntry]) {
    if entries.is_empty() {
        println!("catalog is empty");
        return;
    }

    for entry in entries {
        println!(
            "{}  added {}  ({})  {}",
            render::product_line(&entry.product),
            render::format_timestamp(entry.added_at),
            entry.source,
            entry.catalog_id,
        );
    }
    println!("{} entries", entries.len());
}
