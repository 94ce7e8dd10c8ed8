use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    /// Directory holding the persisted catalog and bundle stores.
    pub data_dir: PathBuf,
    pub search_endpoint: String,
    pub api_key: String,
    pub secret_key: String,
    pub search_timeout_secs: u64,
    pub search_page_size: u32,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("data_dir", &self.data_dir)
            .field("search_endpoint", &self.search_endpoint)
            .field("api_key", &"[redacted]")
            .field("secret_key", &"[redacted]")
            .field("search_timeout_secs", &self.search_timeout_secs)
            .field("search_page_size", &self.search_page_size)
            .field("log_level", &self.log_level)
            .finish()
    }
}
