pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::SearchClient;
pub use error::SearchError;
pub use normalize::extract_products;
pub use types::SearchRequest;
