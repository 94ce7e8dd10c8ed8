pub mod app_config;
pub mod config;
pub mod product;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use product::{Media, MediaAsset, Pricing, Product, Swatch, Titles};
