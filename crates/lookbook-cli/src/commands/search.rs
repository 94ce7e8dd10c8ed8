use clap::Args;

use lookbook_core::AppConfig;
use lookbook_search::SearchClient;

use crate::render;

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-text query; blank falls back to the endpoint's default.
    pub query: String,
}

pub async fn run(config: &AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    let client = SearchClient::from_config(config)?;
    let products = client.search(&args.query, config.search_page_size).await?;

    if products.is_empty() {
        println!("no products found for \"{}\"", args.query.trim());
        return Ok(());
    }

    for product in &products {
        println!("{}", render::product_line(product));
        if let Some(image) = product.primary_image() {
            println!("    {image}");
        }
    }
    println!("{} products", products.len());

    Ok(())
}
