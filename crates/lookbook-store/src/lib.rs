pub mod bundle;
pub mod catalog;
pub mod error;
pub mod kv;

mod clock;

pub use bundle::{Bundle, BundlePatch, BundleStore};
pub use catalog::{Catalog, CatalogEntry, EntrySource};
pub use error::StoreError;
pub use kv::{FileKv, KeyValue, MemoryKv};
