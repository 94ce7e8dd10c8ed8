//! Normalization from the search endpoint's variable response shapes into
//! canonical [`Product`] records.
//!
//! The endpoint returns its product list at one of three documented paths
//! depending on which template served the query. Resolution is an ordered
//! fallback: first matching shape wins, shapes are never merged.

use lookbook_core::{Media, Pricing, Product, Swatch, Titles};

/// Extracts canonical products from a raw search response.
///
/// Tries, in order:
/// 1. `elements.search.products.results` (entries wrap the item in `.item`)
/// 2. `elements.autocomplete.products.results` (same wrapping)
/// 3. top-level `results` (entries are the items themselves)
///
/// A response matching none of the shapes yields an empty vec; callers
/// treat that as "zero results", not as a failure. Never errors or panics.
#[must_use]
pub fn extract_products(payload: &serde_json::Value) -> Vec<Product> {
    if let Some(results) = results_at(payload, &["elements", "search", "products", "results"]) {
        return map_entries(results, true);
    }

    if let Some(results) = results_at(payload, &["elements", "autocomplete", "products", "results"])
    {
        return map_entries(results, true);
    }

    if let Some(results) = payload.get("results").and_then(serde_json::Value::as_array) {
        return map_entries(results, false);
    }

    tracing::warn!("no known product result shape in search response");
    vec![]
}

/// Returns the array at `path` if present and non-empty.
fn results_at<'a>(
    payload: &'a serde_json::Value,
    path: &[&str],
) -> Option<&'a Vec<serde_json::Value>> {
    let mut value = payload;
    for key in path {
        value = value.get(key)?;
    }
    value.as_array().filter(|results| !results.is_empty())
}

fn map_entries(entries: &[serde_json::Value], unwrap_item: bool) -> Vec<Product> {
    entries
        .iter()
        .filter_map(|entry| {
            if unwrap_item {
                entry.get("item").and_then(map_item)
            } else {
                map_item(entry)
            }
        })
        .collect()
}

/// Maps one raw item to a canonical product. Each field defaults
/// independently; only a usable `id` is mandatory.
fn map_item(item: &serde_json::Value) -> Option<Product> {
    let id = item
        .get("id")
        .and_then(value_as_string)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let Some(id) = id else {
        tracing::warn!("skipping search result with missing or empty id");
        return None;
    };

    let name = item
        .get("name")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    let titles = item
        .get("titles")
        .and_then(|value| serde_json::from_value::<Titles>(value.clone()).ok());

    let media = item
        .get("media")
        .and_then(|value| serde_json::from_value::<Media>(value.clone()).ok());

    let image_url = item
        .get("imageUrl")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    let pricing_value = item.get("pricing");
    let pricing = Pricing {
        price: pricing_value
            .and_then(|pricing| pricing.get("price"))
            .and_then(value_as_f64)
            .unwrap_or(0.0),
        was: pricing_value
            .and_then(|pricing| pricing.get("was"))
            .and_then(value_as_f64),
    };

    let swatches = item
        .get("properties")
        .and_then(|properties| properties.get("swatches"))
        .and_then(serde_json::Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| serde_json::from_value::<Swatch>(entry.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    // The source API sometimes sends a non-array sentinel here.
    let variants = item
        .get("variants")
        .and_then(serde_json::Value::as_array)
        .cloned()
        .unwrap_or_default();

    let stock = item.get("stock").filter(|value| !value.is_null()).cloned();

    Some(Product {
        id,
        name,
        titles,
        media,
        image_url,
        pricing,
        swatches,
        variants,
        stock,
    })
}

fn value_as_string(value: &serde_json::Value) -> Option<String> {
    value.as_str().map(str::to_string).or_else(|| {
        if value.is_number() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

fn value_as_f64(value: &serde_json::Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|raw| raw.trim().parse::<f64>().ok()))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
