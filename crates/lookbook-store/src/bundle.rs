//! Named, ordered snapshots of a product selection. A bundle captures its
//! products by value at save time; later edits to the live selection never
//! reach a saved bundle.

use serde::{Deserialize, Serialize};

use lookbook_core::Product;

use crate::clock::now_ms;
use crate::error::StoreError;
use crate::kv::KeyValue;

/// Storage key for the persisted bundle store blob.
pub const BUNDLES_KEY: &str = "product_bundles";

const ID_SUFFIX_LEN: usize = 7;
const ID_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A named, ordered product snapshot.
///
/// Name and selection preconditions (non-empty) are enforced by the calling
/// layer before construction; the constructor does not re-validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Presentation order, captured by value at save time.
    pub products: Vec<Product>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Bundle {
    /// Creates a bundle snapshot. The id combines the creation timestamp
    /// with a random suffix so two bundles created within the same
    /// millisecond still get distinct ids.
    #[must_use]
    pub fn new(name: impl Into<String>, products: Vec<Product>, description: Option<String>) -> Self {
        let now = now_ms();
        Self {
            id: new_bundle_id(now),
            name: name.into(),
            description,
            products,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy with the patch merged over it and `updated_at`
    /// refreshed. `id` and `created_at` are not patchable.
    #[must_use]
    pub fn apply(&self, patch: BundlePatch) -> Bundle {
        let mut updated = self.clone();
        if let Some(name) = patch.name {
            updated.name = name;
        }
        if let Some(description) = patch.description {
            updated.description = Some(description);
        }
        if let Some(products) = patch.products {
            updated.products = products;
        }
        updated.updated_at = now_ms().max(self.updated_at);
        updated
    }
}

/// Partial edit of a bundle; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct BundlePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub products: Option<Vec<Product>>,
}

/// The bundle aggregate: bundles in insertion order plus a UI selection
/// cursor. The cursor is not validated against the list; a dangling
/// selection simply resolves to "not found" at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BundleStore {
    pub bundles: Vec<Bundle>,
    #[serde(default)]
    pub selected_bundle_id: Option<String>,
}

impl BundleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends in insertion order. Duplicate names are allowed.
    pub fn add(&mut self, bundle: Bundle) {
        self.bundles.push(bundle);
    }

    /// Replaces the bundle with the same id in place, keeping its position
    /// in the list. Returns `false` if no bundle has that id.
    pub fn update(&mut self, updated: Bundle) -> bool {
        match self.bundles.iter_mut().find(|b| b.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    /// Deletes by id, clearing the selection cursor if it pointed at the
    /// removed bundle. Missing ids are a silent no-op.
    pub fn remove(&mut self, bundle_id: &str) -> bool {
        let before = self.bundles.len();
        self.bundles.retain(|b| b.id != bundle_id);
        let removed = self.bundles.len() != before;
        if removed && self.selected_bundle_id.as_deref() == Some(bundle_id) {
            self.selected_bundle_id = None;
        }
        removed
    }

    /// Pure cursor update; no existence check.
    pub fn select(&mut self, bundle_id: Option<String>) {
        self.selected_bundle_id = bundle_id;
    }

    #[must_use]
    pub fn get(&self, bundle_id: &str) -> Option<&Bundle> {
        self.bundles.iter().find(|b| b.id == bundle_id)
    }

    /// Resolves the selection cursor; `None` for no selection or a
    /// dangling id.
    #[must_use]
    pub fn selected(&self) -> Option<&Bundle> {
        self.selected_bundle_id
            .as_deref()
            .and_then(|id| self.get(id))
    }
}

fn new_bundle_id(now: i64) -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..ID_CHARSET.len());
            ID_CHARSET[idx] as char
        })
        .collect();

    format!("bundle_{now}_{suffix}")
}

/// Loads the persisted bundle store, or a fresh empty one when no blob
/// exists or the blob fails to parse. Same load-or-fresh discipline as the
/// catalog, independent storage key.
#[must_use]
pub fn load_bundles(kv: &dyn KeyValue) -> BundleStore {
    let raw = match kv.get(BUNDLES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return BundleStore::new(),
        Err(error) => {
            tracing::warn!(%error, "failed to read persisted bundles; starting fresh");
            return BundleStore::new();
        }
    };

    match serde_json::from_str::<BundleStore>(&raw) {
        Ok(store) => store,
        Err(error) => {
            tracing::warn!(%error, "discarding unparseable persisted bundles");
            BundleStore::new()
        }
    }
}

/// Serializes the bundle store and writes it to storage.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the write fails; the in-memory store
/// stays valid, only the persisted copy is stale.
pub fn save_bundles(kv: &dyn KeyValue, store: &BundleStore) -> Result<(), StoreError> {
    let raw = serde_json::to_string(store)?;
    kv.set(BUNDLES_KEY, &raw)
}

#[cfg(test)]
#[path = "bundle_test.rs"]
mod tests;
