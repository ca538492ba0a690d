use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {username}: {source}")]
    Deserialize {
        username: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("authentication rejected for {username} (HTTP 401 after retries)")]
    AuthFailed { username: String },

    #[error("profile not found: {username}")]
    ProfileNotFound { username: String },

    #[error("unexpected HTTP status {status} fetching {username}")]
    UnexpectedStatus { status: u16, username: String },

    #[error("pagination limit reached for {username}: exceeded {max_pages} pages")]
    PaginationLimit { username: String, max_pages: usize },
}
