//! Twilio SMS delivery.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{HttpConfig, TwilioConfig, TwilioCredentials};
use crate::notify::messenger::Messenger;
use crate::{AlertError, Result};

/// Twilio REST API version path segment.
const API_VERSION: &str = "2010-04-01";

/// Error body returned by the Twilio API.
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

/// Sends SMS through Twilio's Messages resource.
pub struct TwilioMessenger {
    client: Client,
    endpoint: String,
    credentials: TwilioCredentials,
}

impl TwilioMessenger {
    /// Create a messenger for the given account and numbers.
    pub fn new(
        twilio: &TwilioConfig,
        http: &HttpConfig,
        credentials: TwilioCredentials,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(http.connect_timeout())
            .timeout(http.total_timeout())
            .build()
            .map_err(|e| AlertError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: messages_endpoint(&twilio.api_base, &credentials.account_id),
            credentials,
        })
    }
}

/// Build the Messages resource URL for an account.
fn messages_endpoint(api_base: &str, account_id: &str) -> String {
    format!(
        "{}/{}/Accounts/{}/Messages.json",
        api_base.trim_end_matches('/'),
        API_VERSION,
        account_id
    )
}

#[async_trait]
impl Messenger for TwilioMessenger {
    fn name(&self) -> &'static str {
        "twilio"
    }

    async fn deliver(&self, body: &str) -> Result<()> {
        debug!(to = %self.credentials.to_number, "Sending SMS ({} chars)", body.chars().count());

        let params = [
            ("To", self.credentials.to_number.as_str()),
            ("From", self.credentials.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.credentials.account_id, Some(&self.credentials.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| AlertError::Delivery(format!("failed to reach Twilio: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = match response.bytes().await {
            Ok(bytes) => match serde_json::from_slice::<TwilioErrorBody>(&bytes) {
                Ok(err) => match err.code {
                    Some(code) => format!("{} (code {})", err.message, code),
                    None => err.message,
                },
                Err(_) => String::from_utf8_lossy(&bytes).into_owned(),
            },
            Err(e) => e.to_string(),
        };

        warn!("Twilio rejected message: {} {}", status, detail);
        Err(AlertError::Delivery(format!("HTTP {}: {}", status, detail)))
    }
}
