//! HTTP client for the platform's public `web_profile_info` endpoint.
//!
//! Drives cursor pagination across a profile's timeline with jittered
//! inter-page delays, a bounded page count, and exponential-backoff
//! retries on authentication rejections and network failures. Any other
//! non-2xx response aborts the scrape immediately.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::Client;
use serde_json::Value;

use grampulse_core::{AppConfig, RawPost};

use crate::error::ScraperError;
use crate::normalize::normalize_post;
use crate::retry::retry_with_backoff;
use crate::types::{PageCursor, WebProfileResponse};

/// Maximum number of pages per scrape. Prevents infinite loops on a
/// cycling cursor.
pub(crate) const MAX_PAGES: usize = 200;

pub const DEFAULT_BASE_URL: &str = "https://i.instagram.com/api/v1/users/web_profile_info";

/// Rotating User-Agent pool; one is picked at random per request.
const USER_AGENTS: [&str; 3] = [
    "Instagram 123.0.0.0 Android",
    "Mozilla/5.0 (Linux; Android 10; SM-G973F) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.124 Mobile Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 \
     (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1",
];

/// Result of a full timeline scrape: normalized posts in scrape order,
/// the raw profile object for the passthrough endpoint, and the cursor
/// to persist for the next resume.
#[derive(Debug)]
pub struct ScrapeOutcome {
    pub posts: Vec<RawPost>,
    /// Raw profile JSON from the first fetched page, timeline stripped.
    /// `Value::Null` when no page was fetched (already-exhausted cursor).
    pub profile: Value,
    pub cursor: PageCursor,
}

pub struct InstagramClient {
    client: Client,
    base_url: String,
    /// Additional attempts after the first failure, for retriable errors.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff.
    backoff_base_secs: u64,
    /// Jittered delay bounds between page requests, in milliseconds.
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl InstagramClient {
    /// Creates a client with the given timeout, retry policy, and
    /// inter-page delay bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
        min_delay_ms: u64,
        max_delay_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_owned(),
            max_retries,
            backoff_base_secs,
            min_delay_ms,
            max_delay_ms,
        })
    }

    /// Builds a client from the scraper section of the app config.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.scraper_request_timeout_secs,
            config.scraper_max_retries,
            config.scraper_retry_backoff_base_secs,
            config.scraper_min_delay_ms,
            config.scraper_max_delay_ms,
        )
    }

    /// Points the client at a different endpoint root (tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches one timeline page, with retry on 401 and network errors.
    ///
    /// Returns the raw profile object (timeline stripped) alongside the
    /// typed response.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::AuthFailed`] — HTTP 401 after all retries.
    /// - [`ScraperError::ProfileNotFound`] — HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`] — any other non-2xx (not retried).
    /// - [`ScraperError::Http`] — network failure after all retries.
    /// - [`ScraperError::Deserialize`] — body is not the expected JSON shape.
    pub async fn fetch_profile_page(
        &self,
        username: &str,
        after: Option<&str>,
    ) -> Result<(Value, WebProfileResponse), ScraperError> {
        let username = username.to_owned();
        let after = after.map(str::to_owned);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let username = username.clone();
            let after = after.clone();
            async move { self.fetch_page_once(&username, after.as_deref()).await }
        })
        .await
    }

    async fn fetch_page_once(
        &self,
        username: &str,
        after: Option<&str>,
    ) -> Result<(Value, WebProfileResponse), ScraperError> {
        let user_agent = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);

        let mut request = self
            .client
            .get(&self.base_url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .query(&[("username", username)]);
        if let Some(cursor) = after {
            request = request.query(&[("after", cursor)]);
        }

        let response = request.send().await?;
        let status = response.status();
        match status.as_u16() {
            200 => {}
            401 => {
                return Err(ScraperError::AuthFailed {
                    username: username.to_owned(),
                })
            }
            404 => {
                return Err(ScraperError::ProfileNotFound {
                    username: username.to_owned(),
                })
            }
            code => {
                return Err(ScraperError::UnexpectedStatus {
                    status: code,
                    username: username.to_owned(),
                })
            }
        }

        let body = response.text().await?;
        let raw: Value = serde_json::from_str(&body).map_err(|source| ScraperError::Deserialize {
            username: username.to_owned(),
            source,
        })?;
        let typed: WebProfileResponse =
            serde_json::from_value(raw.clone()).map_err(|source| ScraperError::Deserialize {
                username: username.to_owned(),
                source,
            })?;

        let mut profile = raw
            .get("data")
            .and_then(|d| d.get("user"))
            .cloned()
            .unwrap_or(Value::Null);
        if let Some(obj) = profile.as_object_mut() {
            // The timeline lives in the posts blob; keep the profile
            // snapshot compact.
            obj.remove("edge_owner_to_timeline_media");
        }

        Ok((profile, typed))
    }

    /// Fetches the profile's timeline from `resume` (or the top when
    /// `None`), following `end_cursor` pagination until the last page.
    ///
    /// A jittered delay is applied between page requests (never before
    /// the first). Posts are normalized as they arrive; on any page
    /// failure the whole scrape is abandoned and the error returned, so
    /// callers never persist a partially corrupt collection.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_profile_page`]; returns
    /// [`ScraperError::PaginationLimit`] after [`MAX_PAGES`] pages.
    pub async fn fetch_all_posts(
        &self,
        username: &str,
        resume: Option<PageCursor>,
    ) -> Result<ScrapeOutcome, ScraperError> {
        let mut end_cursor = resume.as_ref().and_then(|c| c.end_cursor.clone());
        let mut has_next = resume.as_ref().is_none_or(|c| c.has_next_page);

        let mut posts: Vec<RawPost> = Vec::new();
        let mut profile = Value::Null;
        let mut page_count = 0usize;

        while has_next {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(ScraperError::PaginationLimit {
                    username: username.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            if page_count > 1 {
                self.inter_page_delay().await;
            }

            let (page_profile, response) = self
                .fetch_profile_page(username, end_cursor.as_deref())
                .await?;
            if profile.is_null() {
                profile = page_profile;
            }

            let media = response.data.user.edge_owner_to_timeline_media;
            posts.extend(media.edges.into_iter().map(|edge| normalize_post(edge.node)));

            has_next = media.page_info.has_next_page && media.page_info.end_cursor.is_some();
            end_cursor = media.page_info.end_cursor;
        }

        tracing::info!(username, posts = posts.len(), pages = page_count, "scrape finished");
        Ok(ScrapeOutcome {
            posts,
            profile,
            cursor: PageCursor {
                end_cursor,
                has_next_page: has_next,
            },
        })
    }

    async fn inter_page_delay(&self) {
        if self.max_delay_ms == 0 {
            return;
        }
        let delay_ms = rand::thread_rng().gen_range(self.min_delay_ms..=self.max_delay_ms);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
