//! Generic HTTP delivery provider
//!
//! Posts `{to, body}` as JSON with bearer-token auth to a configurable
//! endpoint (UltraMsg/Fonnte-style APIs). Transport errors and non-success
//! statuses are captured in the outcome, never raised.

use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use async_trait::async_trait;

use crate::{DeliveryProvider, SendOutcome};

/// Delivery backend speaking a generic JSON send API
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    api_url: String,
    token: String,
}

/// Outgoing send payload
#[derive(Debug, Serialize)]
struct SendPayload<'a> {
    to: &'a str,
    body: &'a str,
}

impl HttpProvider {
    /// Create a provider for the given endpoint and bearer token
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl DeliveryProvider for HttpProvider {
    async fn send_message(&self, to: &str, body: &str) -> SendOutcome {
        info!("POST to {}", self.api_url);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .json(&SendPayload { to, body })
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                error!("Provider request failed: {}", e);
                return SendOutcome::failed(json!({ "error": e.to_string() }));
            }
        };

        let status = response.status();
        let data: serde_json::Value = response.json().await.unwrap_or_default();

        if !status.is_success() {
            error!("Provider returned {}: {}", status, data);
            return SendOutcome::failed(json!({
                "status": status.as_u16(),
                "body": data,
            }));
        }

        let id = data
            .get("id")
            .and_then(|id| id.as_str())
            .unwrap_or("unknown")
            .to_string();

        info!("Provider accepted message, id {}", id);
        SendOutcome::ok(id).with_raw(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = HttpProvider::new("https://api.example.com/send", "token123");
        assert_eq!(provider.api_url, "https://api.example.com/send");
        assert_eq!(provider.token, "token123");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_failure() {
        // Nothing listens on this port; the outcome must be a failure value,
        // not an error.
        let provider = HttpProvider::new("http://127.0.0.1:1/send", "token123");
        let outcome = provider.send_message("628123", "hello").await;
        assert!(!outcome.success);
        assert!(outcome.id.is_empty());
        assert!(outcome.raw.is_some());
    }
}
