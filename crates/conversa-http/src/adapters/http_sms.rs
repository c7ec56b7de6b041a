use async_trait::async_trait;
use conversa_core::{GatewayError, Result};
use conversa_fulfillment::SmsSender;

/// POSTs `{to, body}` to a configured SMS gateway HTTP API (SNS, Twilio, a
/// relay, …) — the transport is an external collaborator (spec §9 `SMSSender`).
pub struct HttpSmsSender {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSmsSender {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    async fn send(&self, to: &str, body: &str) -> Result<()> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "to": to, "body": body }))
            .send()
            .await
            .map_err(|e| GatewayError::Channel {
                channel: "sms".to_string(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(GatewayError::Channel {
                channel: "sms".to_string(),
                reason: format!("sms endpoint returned {}", resp.status()),
            });
        }
        Ok(())
    }
}

/// Stands in when no SMS endpoint is configured.
pub struct UnconfiguredSmsSender;

#[async_trait]
impl SmsSender for UnconfiguredSmsSender {
    async fn send(&self, _to: &str, _body: &str) -> Result<()> {
        Err(GatewayError::Channel {
            channel: "sms".to_string(),
            reason: "no sms endpoint configured".to_string(),
        })
    }
}
