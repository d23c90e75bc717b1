//! Message delivery seam.

use async_trait::async_trait;

use crate::Result;

/// Delivers text messages to one configured recipient.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Name of the delivery channel, for logging.
    fn name(&self) -> &'static str;

    /// Deliver `body` to the recipient.
    async fn deliver(&self, body: &str) -> Result<()>;
}
