use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Root directory for the local blob store (posts, profiles, model
    /// artifact, scrape cursors).
    pub data_dir: PathBuf,
    /// Account whose stored posts back `/api/stats` and startup training.
    pub default_identity: String,
    /// Static shared secret for the retrain endpoint. Optional only in
    /// development.
    pub retrain_token: Option<String>,
    pub scraper_request_timeout_secs: u64,
    /// Jittered inter-page delay bounds for the scraper, in milliseconds.
    pub scraper_min_delay_ms: u64,
    pub scraper_max_delay_ms: u64,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("data_dir", &self.data_dir)
            .field("default_identity", &self.default_identity)
            .field(
                "retrain_token",
                &self.retrain_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_min_delay_ms", &self.scraper_min_delay_ms)
            .field("scraper_max_delay_ms", &self.scraper_max_delay_ms)
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_secs",
                &self.scraper_retry_backoff_base_secs,
            )
            .finish()
    }
}
