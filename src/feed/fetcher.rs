//! Subreddit listing fetcher.
//!
//! This module provides the [`ListingSource`] seam used by the poller and
//! its HTTP implementation, [`ListingFetcher`].

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::{ForumConfig, HttpConfig};
use crate::error::{AlertError, FetchError, Result};
use crate::feed::types::Listing;

/// Maximum listing body size in bytes (5MB).
pub const MAX_LISTING_SIZE: u64 = 5 * 1024 * 1024;

/// Something that can produce the current listing of a forum.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the newest posts.
    async fn fetch_listing(&self) -> std::result::Result<Listing, FetchError>;
}

/// Build the `new.json` listing URL for a subreddit.
///
/// The forum name is appended as a single path segment, so characters such
/// as `/` or `?` are percent-encoded rather than altering the request.
pub fn listing_url(base_url: &str, forum_name: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| AlertError::Config(format!("invalid forum URL: {}", e)))?;

    url.path_segments_mut()
        .map_err(|_| AlertError::Config(format!("forum URL cannot be a base: {}", base_url)))?
        .pop_if_empty()
        .extend(["r", forum_name, "new.json"]);

    Ok(url)
}

/// HTTP listing fetcher for one subreddit.
pub struct ListingFetcher {
    client: Client,
    url: Url,
}

impl ListingFetcher {
    /// Create a fetcher for `forum_name` using the given settings.
    pub fn new(forum: &ForumConfig, http: &HttpConfig, forum_name: &str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(http.connect_timeout())
            .timeout(http.total_timeout())
            .user_agent(forum.user_agent.as_str())
            .build()
            .map_err(|e| AlertError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: listing_url(&forum.base_url, forum_name)?,
        })
    }

    /// The URL this fetcher polls.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ListingSource for ListingFetcher {
    async fn fetch_listing(&self) -> std::result::Result<Listing, FetchError> {
        debug!("Fetching {}", self.url);

        let response = self.client.get(self.url.clone()).send().await?;

        // Check response status
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // Check content length if available
        if let Some(content_length) = response.content_length() {
            if content_length > MAX_LISTING_SIZE {
                return Err(FetchError::MalformedBody(format!(
                    "listing too large: {} bytes (max {} bytes)",
                    content_length, MAX_LISTING_SIZE
                )));
            }
        }

        let bytes = response.bytes().await?;

        // Check actual size
        if bytes.len() as u64 > MAX_LISTING_SIZE {
            return Err(FetchError::MalformedBody(format!(
                "listing too large: {} bytes (max {} bytes)",
                bytes.len(),
                MAX_LISTING_SIZE
            )));
        }

        Listing::from_json(&bytes).map_err(|e| FetchError::MalformedBody(e.to_string()))
    }
}
