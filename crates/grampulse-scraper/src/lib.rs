pub mod client;
pub mod error;
pub mod normalize;
mod retry;
pub mod types;

pub use client::{InstagramClient, ScrapeOutcome};
pub use error::ScraperError;
pub use normalize::{merge_posts, normalize_post};
pub use types::{PageCursor, WebProfileResponse};
