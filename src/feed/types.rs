//! Listing types for freebie-alert.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Number of newest listing entries examined on each poll.
pub const LISTING_WINDOW: usize = 10;

/// One post from a subreddit listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedItem {
    /// Short post id (e.g. `1a2b3c`), if the forum sent one.
    #[serde(default)]
    pub id: Option<String>,
    /// Post title.
    pub title: String,
    /// Site-relative permalink, starting with `/r/`.
    pub permalink: String,
    /// Creation time in unix seconds.
    pub created_utc: f64,
}

impl FeedItem {
    /// Create an item without an id.
    pub fn new(title: impl Into<String>, permalink: impl Into<String>, created_utc: f64) -> Self {
        Self {
            id: None,
            title: title.into(),
            permalink: permalink.into(),
            created_utc,
        }
    }

    /// Set the post id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Key identifying this post across polls.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.permalink)
    }
}

/// Listing envelope: `{"kind": "Listing", "data": {"children": [...]}}`.
#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: FeedItem,
}

/// An ordered listing of posts, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    /// Posts in the order the forum returned them.
    pub items: Vec<FeedItem>,
}

impl Listing {
    /// Decode a listing from a JSON response body.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let envelope: ListingEnvelope = serde_json::from_slice(bytes)?;
        Ok(Self {
            items: envelope
                .data
                .children
                .into_iter()
                .map(|child| child.data)
                .collect(),
        })
    }

    /// The newest entries, at most [`LISTING_WINDOW`] of them.
    pub fn window(&self) -> &[FeedItem] {
        let end = self.items.len().min(LISTING_WINDOW);
        &self.items[..end]
    }

    /// Entries within the window created strictly after `now - poll_interval_secs`.
    pub fn recent(&self, now: DateTime<Utc>, poll_interval_secs: u64) -> Vec<&FeedItem> {
        let cutoff = recency_cutoff(now, poll_interval_secs);
        self.window()
            .iter()
            .filter(|item| item.created_utc > cutoff)
            .collect()
    }
}

/// Lower bound (exclusive) of the recency window, in unix seconds.
pub fn recency_cutoff(now: DateTime<Utc>, poll_interval_secs: u64) -> f64 {
    now.timestamp_millis() as f64 / 1000.0 - poll_interval_secs as f64
}
