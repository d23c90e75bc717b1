//! Subreddit poll loop.
//!
//! Fetches the listing, texts every post created since the previous poll,
//! sleeps, and repeats until a fetch fails. A failed fetch ends the loop
//! after one final notice.

use chrono::{DateTime, Utc};
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};

use crate::config::{Config, Subscription};
use crate::error::{AlertError, FetchError, Result};
use crate::feed::fetcher::ListingSource;
use crate::feed::seen::SeenItems;
use crate::notify::{format_item, Messenger, FAILURE_NOTICE};

/// Polls one listing and relays new posts to a messenger.
pub struct Poller<S, M> {
    source: S,
    messenger: M,
    poll_interval_secs: u64,
    link_host: String,
    seen: Option<SeenItems>,
}

impl<S: ListingSource, M: Messenger> Poller<S, M> {
    /// Create a poller from a subscription and ambient config.
    pub fn new(source: S, messenger: M, subscription: &Subscription, config: &Config) -> Self {
        let seen = config
            .poll
            .dedup
            .then(|| SeenItems::new(config.poll.seen_retention_polls));

        Self {
            source,
            messenger,
            poll_interval_secs: subscription.poll_interval_secs,
            link_host: config.forum.link_host.clone(),
            seen,
        }
    }

    /// Interval between polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Whether already-delivered posts are skipped.
    pub fn dedup_enabled(&self) -> bool {
        self.seen.is_some()
    }

    /// Run one fetch-filter-deliver cycle relative to `now`.
    ///
    /// Returns the number of messages delivered. A failed fetch is returned
    /// as [`AlertError::Fetch`]; a failed delivery as [`AlertError::Delivery`].
    pub async fn poll_once(&mut self, now: DateTime<Utc>) -> Result<usize> {
        let listing = self.source.fetch_listing().await?;
        debug!("Listing returned {} item(s)", listing.items.len());

        let mut delivered = 0;
        for item in listing.recent(now, self.poll_interval_secs) {
            if let Some(seen) = &self.seen {
                if seen.contains(item.key()) {
                    debug!("Skipping already delivered post {}", item.key());
                    continue;
                }
            }

            let text = format_item(item, &self.link_host);
            self.messenger.deliver(&text).await?;
            info!(via = self.messenger.name(), "Delivered: {}", item.title);
            delivered += 1;

            if let Some(seen) = &mut self.seen {
                seen.insert(item.key());
            }
        }

        if let Some(seen) = &mut self.seen {
            seen.advance();
        }

        Ok(delivered)
    }

    /// Poll until a fetch fails, then send the final notice.
    ///
    /// Returns the fetch failure that stopped the loop. Delivery errors,
    /// including one while sending the final notice, are returned as `Err`.
    pub async fn run(&mut self) -> Result<FetchError> {
        info!(
            "Poller started (interval: {} seconds, dedup: {})",
            self.poll_interval_secs,
            self.dedup_enabled()
        );

        loop {
            match self.poll_once(Utc::now()).await {
                Ok(0) => debug!("No new posts"),
                Ok(count) => info!("Delivered {} new post(s)", count),
                Err(AlertError::Fetch(reason)) => {
                    warn!("Polling stopped: {}", reason);
                    if let Err(e) = self.messenger.deliver(FAILURE_NOTICE).await {
                        error!("Failed to deliver final notice: {}", e);
                        return Err(e);
                    }
                    return Ok(reason);
                }
                Err(e) => {
                    error!("Delivery failed: {}", e);
                    return Err(e);
                }
            }

            sleep(self.poll_interval()).await;
        }
    }
}
