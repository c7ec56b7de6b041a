use async_trait::async_trait;
use conversa_core::{GatewayError, Result};
use conversa_fulfillment::EmailSender;

/// POSTs `{from, to, subject, html_body}` to a configured transactional-mail
/// HTTP API (SES HTTP endpoint, a relay, …) — the transport itself is an
/// external collaborator (spec §9 `Mailer`).
pub struct HttpEmailSender {
    client: reqwest::Client,
    endpoint: String,
    from: Option<String>,
}

impl HttpEmailSender {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, from: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            from,
        }
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({
                "from": self.from,
                "to": to,
                "subject": subject,
                "html_body": html_body,
            }))
            .send()
            .await
            .map_err(|e| GatewayError::Channel {
                channel: "email".to_string(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(GatewayError::Channel {
                channel: "email".to_string(),
                reason: format!("mail endpoint returned {}", resp.status()),
            });
        }
        Ok(())
    }
}

/// Stands in when no mail endpoint is configured.
pub struct UnconfiguredEmailSender;

#[async_trait]
impl EmailSender for UnconfiguredEmailSender {
    async fn send(&self, _to: &str, _subject: &str, _html_body: &str) -> Result<()> {
        Err(GatewayError::Channel {
            channel: "email".to_string(),
            reason: "no mail endpoint configured".to_string(),
        })
    }
}
