//! Command-line interface for freebie-alert.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Subscription, TwilioCredentials};

/// Text yourself new posts from a subreddit.
#[derive(Parser, Debug)]
#[command(name = "freebie-alert")]
#[command(about = "Texts new subreddit posts to a phone via Twilio")]
#[command(version)]
pub struct Cli {
    /// Twilio account SID
    #[arg(long = "account-id", visible_alias = "sid")]
    pub account_id: String,

    /// Twilio auth token
    #[arg(long = "auth-token", visible_alias = "at")]
    pub auth_token: String,

    /// Twilio number messages are sent from
    #[arg(long = "twilio-num", visible_alias = "tn")]
    pub twilio_num: String,

    /// Recipient phone number
    #[arg(long = "cell-num", visible_alias = "cn")]
    pub cell_num: String,

    /// Subreddit to watch, without the r/ prefix
    #[arg(long = "sub-reddit", visible_alias = "sub")]
    pub sub_reddit: String,

    /// Poll interval in seconds
    #[arg(long = "poll-time", visible_alias = "pt", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_time: u64,

    /// Optional TOML file with logging, endpoint and dedup settings
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Split out the required subscription values.
    pub fn subscription(&self) -> Subscription {
        Subscription {
            credentials: TwilioCredentials {
                account_id: self.account_id.clone(),
                auth_token: self.auth_token.clone(),
                from_number: self.twilio_num.clone(),
                to_number: self.cell_num.clone(),
            },
            forum_name: self.sub_reddit.clone(),
            poll_interval_secs: self.poll_time,
        }
    }
}
