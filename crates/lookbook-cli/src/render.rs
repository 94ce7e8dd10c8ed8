//! Terminal rendering helpers for products, catalog entries, and bundles.

use lookbook_core::{Pricing, Product};

/// Presentation-layer fallback for products with no resolvable title.
pub const UNTITLED: &str = "Untitled Product";

pub fn product_line(product: &Product) -> String {
    let name = product.display_name().unwrap_or(UNTITLED);
    format!("{name} — {} [{}]", format_price(&product.pricing), product.id)
}

/// GBP price display, with the previous price shown when reduced.
pub fn format_price(pricing: &Pricing) -> String {
    match pricing.was {
        Some(was) if pricing.is_reduced() => {
            format!("£{:.2} (was £{was:.2})", pricing.price)
        }
        _ => format!("£{:.2}", pricing.price),
    }
}

/// Epoch-millisecond timestamp as a short local-free date string.
pub fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map_or_else(|| millis.to_string(), |dt| dt.format("%Y-%m-%d %H:%M").to_string())
}
