use anyhow::Context;
use clap::{Args, Subcommand};

use lookbook_core::{AppConfig, Product};
use lookbook_search::SearchClient;
use lookbook_store::bundle::{load_bundles, save_bundles};
use lookbook_store::catalog::load_catalog;
use lookbook_store::{Bundle, BundlePatch, FileKv};

use crate::render;

#[derive(Debug, Subcommand)]
pub enum BundleCommand {
    /// Snapshot a product selection as a named bundle.
    Create(CreateArgs),
    /// List bundles in creation order.
    List,
    /// Print one bundle with its product list.
    Show { bundle_id: String },
    /// Rename a bundle.
    Rename { bundle_id: String, name: String },
    /// Delete a bundle.
    Remove { bundle_id: String },
    /// Set the selection cursor; omit the id to clear it.
    Select { bundle_id: Option<String> },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    pub name: String,
    /// Fill the bundle from a product search.
    #[arg(long, conflicts_with = "from_catalog")]
    pub query: Option<String>,
    /// Fill the bundle from existing catalog entries (comma-separated ids).
    #[arg(long = "from-catalog", value_delimiter = ',')]
    pub from_catalog: Vec<String>,
    #[arg(long)]
    pub description: Option<String>,
}

pub async fn run(config: &AppConfig, command: BundleCommand) -> anyhow::Result<()> {
    let kv = FileKv::new(&config.data_dir);

    match command {
        BundleCommand::Create(args) => {
            // Validation faults are rejected here, before any mutation;
            // Bundle::new itself does not re-validate.
            let name = args.name.trim().to_string();
            anyhow::ensure!(!name.is_empty(), "bundle name must not be empty");

            let products = collect_products(config, &kv, &args).await?;
            anyhow::ensure!(
                !products.is_empty(),
                "a bundle needs at least one product; use --query or --from-catalog"
            );

            let description = args
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty());

            let bundle = Bundle::new(name, products, description);
            let id = bundle.id.clone();
            let count = bundle.products.len();

            let mut store = load_bundles(&kv);
            store.add(bundle);
            save_bundles(&kv, &store).context("failed to persist bundles")?;
            println!("created bundle {id} with {count} products");
        }

        BundleCommand::List => {
            let store = load_bundles(&kv);
            if store.bundles.is_empty() {
                println!("no bundles saved");
                return Ok(());
            }

            for bundle in &store.bundles {
                let marker = if store.selected_bundle_id.as_deref() == Some(bundle.id.as_str()) {
                    "* "
                } else {
                    "  "
                };
                println!(
                    "{marker}{}  {} products  updated {}  {}",
                    bundle.name,
                    bundle.products.len(),
                    render::format_timestamp(bundle.updated_at),
                    bundle.id,
                );
            }
        }

        BundleCommand::Show { bundle_id } => {
            let store = load_bundles(&kv);
            let bundle = store
                .get(&bundle_id)
                .with_context(|| format!("no bundle with id {bundle_id}"))?;

            println!("{}  ({})", bundle.name, bundle.id);
            if let Some(description) = &bundle.description {
                println!("{description}");
            }
            println!(
                "created {}  updated {}",
                render::format_timestamp(bundle.created_at),
                render::format_timestamp(bundle.updated_at),
            );
            for product in &bundle.products {
                println!("  {}", render::product_line(product));
            }
        }

        BundleCommand::Rename { bundle_id, name } => {
            let name = name.trim().to_string();
            anyhow::ensure!(!name.is_empty(), "bundle name must not be empty");

            let mut store = load_bundles(&kv);
            let renamed = store
                .get(&bundle_id)
                .with_context(|| format!("no bundle with id {bundle_id}"))?
                .apply(BundlePatch {
                    name: Some(name),
                    ..BundlePatch::default()
                });
            store.update(renamed);
            save_bundles(&kv, &store).context("failed to persist bundles")?;
            println!("renamed bundle {bundle_id}");
        }

        BundleCommand::Remove { bundle_id } => {
            let mut store = load_bundles(&kv);
            if store.remove(&bundle_id) {
                save_bundles(&kv, &store).context("failed to persist bundles")?;
                println!("removed bundle {bundle_id}");
            } else {
                println!("no bundle with id {bundle_id}");
            }
        }

        BundleCommand::Select { bundle_id } => {
            let mut store = load_bundles(&kv);
            store.select(bundle_id.clone());
            save_bundles(&kv, &store).context("failed to persist bundles")?;
            match bundle_id {
                Some(id) => println!("selected bundle {id}"),
                None => println!("selection cleared"),
            }
        }
    }

    Ok(())
}

/// Resolves the product selection for `bundle create` from either a live
/// search or existing catalog entries.
async fn collect_products(
    config: &AppConfig,
    kv: &FileKv,
    args: &CreateArgs,
) -> anyhow::Result<Vec<Product>> {
    if let Some(query) = &args.query {
        let client = SearchClient::from_config(config)?;
        return Ok(client.search(query, config.search_page_size).await?);
    }

    if args.from_catalog.is_empty() {
        return Ok(vec![]);
    }

    let catalog = load_catalog(kv);
    let mut products = Vec::with_capacity(args.from_catalog.len());
    for catalog_id in &args.from_catalog {
        let entry = catalog
            .products
            .get(catalog_id)
            .with_context(|| format!("no catalog entry with id {catalog_id}"))?;
        products.push(entry.product.clone());
    }
    Ok(products)
}
