//! Notification module for freebie-alert.

pub mod format;
pub mod messenger;
pub mod twilio;

pub use format::{format_item, FAILURE_NOTICE};
pub use messenger::Messenger;
pub use twilio::TwilioMessenger;
