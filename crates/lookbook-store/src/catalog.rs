//! The durable product catalog: a de-duplicated-by-insertion collection of
//! products the user has curated for reuse, independent of any one bundle
//! or creative.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use lookbook_core::Product;

use crate::clock::now_ms;
use crate::error::StoreError;
use crate::kv::KeyValue;

/// Storage key for the persisted catalog blob.
pub const CATALOG_KEY: &str = "product_catalog";

/// Persisted envelope version. A persisted blob with any other version is
/// discarded on load and replaced with a fresh catalog (no migration).
pub const CATALOG_VERSION: u32 = 1;

/// Provenance of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    Api,
    Manual,
}

impl std::fmt::Display for EntrySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntrySource::Api => write!(f, "api"),
            EntrySource::Manual => write!(f, "manual"),
        }
    }
}

/// A product plus catalog-specific metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Synthetic key, unique within the catalog. Derived from the product
    /// id and insertion timestamp, so re-adding the same product yields a
    /// fresh entry rather than overwriting the existing one.
    pub catalog_id: String,
    /// Insertion time, epoch milliseconds. Set once, never changed.
    pub added_at: i64,
    pub source: EntrySource,
    #[serde(flatten)]
    pub product: Product,
}

impl CatalogEntry {
    /// Lower-cased text the catalog search matches tokens against.
    fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(name) = self.product.name.as_deref() {
            parts.push(name);
        }
        if let Some(title) = self
            .product
            .titles
            .as_ref()
            .and_then(|titles| titles.default.as_deref())
        {
            parts.push(title);
        }
        parts.join(" ").to_lowercase()
    }
}

/// The catalog aggregate. Mutating operations work on the in-memory value;
/// callers persist afterwards with [`save_catalog`] ([`clear_catalog`] and
/// [`import_catalog`] persist internally, matching their destructive or
/// replacing semantics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub version: u32,
    /// Epoch milliseconds of the last mutation. Monotonically non-decreasing.
    pub last_updated: i64,
    pub products: HashMap<String, CatalogEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: CATALOG_VERSION,
            last_updated: now_ms(),
            products: HashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Appends one entry per input product and returns the new catalog ids.
    ///
    /// Products with an empty id are skipped with a warning rather than
    /// inserted under a blank key. Entries are always appended: adding a
    /// product that is already in the catalog creates a second entry with
    /// its own catalog id and timestamp.
    pub fn add(&mut self, products: &[Product], source: EntrySource) -> Vec<String> {
        let now = now_ms();
        let mut inserted = Vec::with_capacity(products.len());

        for product in products {
            if product.id.trim().is_empty() {
                tracing::warn!("skipping catalog add for product with empty id");
                continue;
            }

            let catalog_id = self.next_catalog_id(&product.id, now);
            self.products.insert(
                catalog_id.clone(),
                CatalogEntry {
                    catalog_id: catalog_id.clone(),
                    added_at: now,
                    source,
                    product: product.clone(),
                },
            );
            inserted.push(catalog_id);
        }

        if !inserted.is_empty() {
            self.touch(now);
        }
        inserted
    }

    /// Removes one entry. Missing ids are a silent no-op.
    pub fn remove(&mut self, catalog_id: &str) -> bool {
        let removed = self.products.remove(catalog_id).is_some();
        if removed {
            self.touch(now_ms());
        }
        removed
    }

    /// Batch remove; returns how many entries were actually deleted.
    /// Missing ids succeed silently.
    pub fn remove_many(&mut self, catalog_ids: &[String]) -> usize {
        let removed = catalog_ids
            .iter()
            .filter(|id| self.products.remove(id.as_str()).is_some())
            .count();
        if removed > 0 {
            self.touch(now_ms());
        }
        removed
    }

    /// All entries, most recently added first.
    #[must_use]
    pub fn entries(&self) -> Vec<&CatalogEntry> {
        let mut entries: Vec<&CatalogEntry> = self.products.values().collect();
        sort_newest_first(&mut entries);
        entries
    }

    /// Entries whose searchable text contains every whitespace-separated
    /// token of `query` (case-insensitive substring match per token). A
    /// blank query returns all entries. Most recently added first.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&CatalogEntry> {
        let lowered = query.to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();
        if tokens.is_empty() {
            return self.entries();
        }

        let mut matches: Vec<&CatalogEntry> = self
            .products
            .values()
            .filter(|entry| {
                let haystack = entry.searchable_text();
                tokens.iter().all(|token| haystack.contains(token))
            })
            .collect();
        sort_newest_first(&mut matches);
        matches
    }

    /// Synthesizes a catalog id from the product id and insertion time,
    /// suffixing a counter when rapid duplicate adds would collide.
    fn next_catalog_id(&self, product_id: &str, now: i64) -> String {
        let base = format!("{product_id}_{now}");
        if !self.products.contains_key(&base) {
            return base;
        }

        let mut n = 1usize;
        loop {
            let candidate = format!("{base}_{n}");
            if !self.products.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// `last_updated` never moves backwards, even if the clock does.
    fn touch(&mut self, now: i64) {
        self.last_updated = self.last_updated.max(now);
    }
}

fn sort_newest_first(entries: &mut [&CatalogEntry]) {
    entries.sort_by(|a, b| {
        b.added_at
            .cmp(&a.added_at)
            .then_with(|| a.catalog_id.cmp(&b.catalog_id))
    });
}

/// Loads the persisted catalog, or a fresh empty one when no blob exists,
/// the blob fails to parse, or its version is unsupported. Corrupt data is
/// treated as absence: logged and discarded, never fatal.
#[must_use]
pub fn load_catalog(kv: &dyn KeyValue) -> Catalog {
    let raw = match kv.get(CATALOG_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Catalog::new(),
        Err(error) => {
            tracing::warn!(%error, "failed to read persisted catalog; starting fresh");
            return Catalog::new();
        }
    };

    match serde_json::from_str::<Catalog>(&raw) {
        Ok(catalog) if catalog.version == CATALOG_VERSION => catalog,
        Ok(catalog) => {
            tracing::warn!(
                version = catalog.version,
                "discarding persisted catalog with unsupported version"
            );
            Catalog::new()
        }
        Err(error) => {
            tracing::warn!(%error, "discarding unparseable persisted catalog");
            Catalog::new()
        }
    }
}

/// Serializes the catalog and writes it to storage, refreshing
/// `last_updated` first.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the write fails; the in-memory catalog
/// stays valid and usable, only the persisted copy is stale.
pub fn save_catalog(kv: &dyn KeyValue, catalog: &mut Catalog) -> Result<(), StoreError> {
    catalog.touch(now_ms());
    let raw = serde_json::to_string(catalog)?;
    kv.set(CATALOG_KEY, &raw)
}

/// Replaces the catalog with a fresh empty one and persists it immediately.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the write fails.
pub fn clear_catalog(kv: &dyn KeyValue) -> Result<Catalog, StoreError> {
    let mut catalog = Catalog::new();
    save_catalog(kv, &mut catalog)?;
    Ok(catalog)
}

/// Pretty-printed export of the full `{version, lastUpdated, products}`
/// envelope, suitable for re-import.
///
/// # Errors
///
/// Returns [`StoreError::Json`] if serialization fails.
pub fn export_catalog(catalog: &Catalog) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(catalog)?)
}

/// Validates an exported envelope without adopting any of it. Structural
/// requirements: a `products` object, a numeric `lastUpdated`, and a
/// numeric, supported `version`.
///
/// # Errors
///
/// Returns [`StoreError::InvalidCatalogFile`] on any structural mismatch;
/// nothing is partially adopted.
pub fn parse_catalog_export(json: &str) -> Result<Catalog, StoreError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| StoreError::InvalidCatalogFile {
            reason: format!("not valid JSON: {e}"),
        })?;

    if !value
        .get("products")
        .is_some_and(serde_json::Value::is_object)
    {
        return Err(StoreError::InvalidCatalogFile {
            reason: "missing products mapping".to_string(),
        });
    }

    if !value
        .get("lastUpdated")
        .is_some_and(serde_json::Value::is_number)
    {
        return Err(StoreError::InvalidCatalogFile {
            reason: "missing numeric lastUpdated".to_string(),
        });
    }

    let version = value.get("version").and_then(serde_json::Value::as_u64);
    match version {
        None => {
            return Err(StoreError::InvalidCatalogFile {
                reason: "missing numeric version".to_string(),
            });
        }
        Some(v) if v != u64::from(CATALOG_VERSION) => {
            return Err(StoreError::InvalidCatalogFile {
                reason: format!("unsupported version {v}"),
            });
        }
        Some(_) => {}
    }

    serde_json::from_value::<Catalog>(value).map_err(|e| StoreError::InvalidCatalogFile {
        reason: e.to_string(),
    })
}

/// Validates and adopts an exported envelope, replacing the persisted
/// catalog. Persists internally, matching its wholesale-replacement
/// semantics.
///
/// # Errors
///
/// Returns [`StoreError::InvalidCatalogFile`] if validation fails (nothing
/// is adopted or written), or [`StoreError::Io`] if the write fails.
pub fn import_catalog(kv: &dyn KeyValue, json: &str) -> Result<Catalog, StoreError> {
    let mut catalog = parse_catalog_export(json)?;
    save_catalog(kv, &mut catalog)?;
    Ok(catalog)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
