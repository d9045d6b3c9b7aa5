//! Delivery gateway interface and the Mailjet-style HTTP implementation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::time::Duration;
use ureq::Agent;

use crate::message::ComposedMessage;

const SEND_ENDPOINT: &str = "https://api.mailjet.com/v3.1/send";
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of one send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryResult {
    Delivered,
    /// The provider or transport refused the message; `detail` is the
    /// human-readable reason recorded in the log.
    Rejected { detail: String },
}

impl DeliveryResult {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Narrow send-and-report interface the pipeline drives. Synchronous: the
/// caller blocks until the outcome of each send is known. Retry, backoff,
/// and credential handling live behind this seam.
pub trait DeliveryGateway {
    fn send(&self, message: &ComposedMessage) -> DeliveryResult;
}

/// HTTP gateway speaking the provider's v3.1 send API with basic auth.
pub struct MailjetGateway {
    agent: Agent,
    endpoint: String,
    authorization: String,
}

impl MailjetGateway {
    pub fn new(api_key: &str, api_secret: &str) -> Self {
        Self::with_endpoint(SEND_ENDPOINT, api_key, api_secret)
    }

    /// Point the gateway at a non-default endpoint (tests, regional hosts).
    pub fn with_endpoint(endpoint: &str, api_key: &str, api_secret: &str) -> Self {
        // Non-2xx replies must surface as DeliveryResult data, not as
        // transport errors; the timeout bounds every send attempt.
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(SEND_TIMEOUT))
            .build()
            .new_agent();
        let credentials = STANDARD.encode(format!("{api_key}:{api_secret}"));
        Self {
            agent,
            endpoint: endpoint.to_string(),
            authorization: format!("Basic {credentials}"),
        }
    }
}

impl DeliveryGateway for MailjetGateway {
    fn send(&self, message: &ComposedMessage) -> DeliveryResult {
        let payload = serde_json::json!({ "Messages": [message] });
        match self
            .agent
            .post(self.endpoint.as_str())
            .header("Authorization", self.authorization.as_str())
            .send_json(&payload)
        {
            Ok(mut response) => {
                let status = response.status();
                if status.is_success() {
                    DeliveryResult::Delivered
                } else {
                    let body = response.body_mut().read_to_string().unwrap_or_default();
                    DeliveryResult::Rejected {
                        detail: format!("status {status}: {}", body.trim()),
                    }
                }
            }
            Err(err) => DeliveryResult::Rejected {
                detail: err.to_string(),
            },
        }
    }
}
