//! freebie-alert
//!
//! Polls a subreddit's newest posts and texts each new one to a phone
//! number through Twilio.

pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod notify;

pub use cli::Cli;
pub use config::{Config, Subscription, TwilioCredentials};
pub use error::{exit_code, AlertError, FetchError, Result};
pub use feed::{FeedItem, Listing, ListingFetcher, ListingSource, Poller};
pub use notify::{format_item, Messenger, TwilioMessenger, FAILURE_NOTICE};
