//! Notification text formatting.

use crate::feed::FeedItem;

/// Message sent once when polling stops.
pub const FAILURE_NOTICE: &str = "Something bad happened to your freebies.";

/// Format a post as `"{title} - {link_host}{permalink}"`.
///
/// The text is passed through untouched; no escaping or truncation is applied.
pub fn format_item(item: &FeedItem, link_host: &str) -> String {
    format!("{} - {}{}", item.title, link_host, item.permalink)
}
