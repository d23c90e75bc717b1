//! Subreddit feed module for freebie-alert.
//!
//! This module fetches a subreddit's newest posts, picks the ones created
//! since the previous poll, and drives the poll loop.

pub mod fetcher;
pub mod poller;
pub mod seen;
pub mod types;

pub use fetcher::{listing_url, ListingFetcher, ListingSource, MAX_LISTING_SIZE};
pub use poller::Poller;
pub use seen::SeenItems;
pub use types::{recency_cutoff, FeedItem, Listing, LISTING_WINDOW};
