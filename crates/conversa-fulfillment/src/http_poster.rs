use async_trait::async_trait;
use conversa_core::config::OUTBOUND_HTTP_TIMEOUT_SECS;
use conversa_core::{GatewayError, Result};

/// Outcome of a single outbound HTTP call, independent of success/failure
/// classification — callers decide what a non-2xx status means for their
/// channel.
#[derive(Debug, Clone)]
pub struct PostOutcome {
    pub status: u16,
    pub body: String,
}

/// Abstracts outbound HTTP posting for the fulfillment channels that speak
/// to arbitrary tenant-configured endpoints (Bubble, generic webhook). Kept
/// as a trait seam (spec §9 Design Notes lists `HTTPPoster` alongside
/// `Mailer`/`SMSSender`/`NestedInvoker`) so tests substitute a fake instead
/// of making real network calls.
#[async_trait]
pub trait HttpPoster: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        body: serde_json::Value,
    ) -> Result<PostOutcome>;

    async fn put_json(&self, url: &str, body: serde_json::Value) -> Result<PostOutcome>;
}

/// Real implementation over a shared `reqwest::Client`, matching the
/// teacher's single-shared-client convention (`skynet-discord`, webhook
/// forwarding). 10s timeout per call (spec §5, §6.4).
pub struct ReqwestHttpPoster {
    client: reqwest::Client,
}

impl ReqwestHttpPoster {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn with_default_client() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(OUTBOUND_HTTP_TIMEOUT_SECS))
            .build()
            .expect("building default reqwest client");
        Self::new(client)
    }
}

#[async_trait]
impl HttpPoster for ReqwestHttpPoster {
    async fn post_json(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        body: serde_json::Value,
    ) -> Result<PostOutcome> {
        let mut req = self
            .client
            .post(url)
            .timeout(std::time::Duration::from_secs(OUTBOUND_HTTP_TIMEOUT_SECS))
            .json(&body);
        if let Some(token) = bearer_token {
            req = req.bearer_auth(token);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| GatewayError::Channel {
                channel: "http".to_string(),
                reason: e.to_string(),
            })?;
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Ok(PostOutcome { status, body })
    }

    async fn put_json(&self, url: &str, body: serde_json::Value) -> Result<PostOutcome> {
        let resp = self
            .client
            .put(url)
            .timeout(std::time::Duration::from_secs(OUTBOUND_HTTP_TIMEOUT_SECS))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Channel {
                channel: "http".to_string(),
                reason: e.to_string(),
            })?;
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Ok(PostOutcome { status, body })
    }
}
