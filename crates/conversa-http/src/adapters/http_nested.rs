use async_trait::async_trait;
use conversa_core::{GatewayError, Result};
use conversa_fulfillment::NestedInvoker;

/// POSTs `{function_name, payload}` to a configured function-invocation
/// gateway (Lambda behind an HTTP front door, a sibling service, …) — the
/// transport is an external collaborator (spec §9 `NestedInvoker`).
pub struct HttpNestedInvoker {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpNestedInvoker {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl NestedInvoker for HttpNestedInvoker {
    async fn invoke(&self, function_name: &str, payload: serde_json::Value) -> Result<()> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "function_name": function_name, "payload": payload }))
            .send()
            .await
            .map_err(|e| GatewayError::Channel {
                channel: "lambda".to_string(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(GatewayError::Channel {
                channel: "lambda".to_string(),
                reason: format!("nested function endpoint returned {}", resp.status()),
            });
        }
        Ok(())
    }
}

/// Stands in when no nested-function endpoint is configured.
pub struct UnconfiguredNestedInvoker;

#[async_trait]
impl NestedInvoker for UnconfiguredNestedInvoker {
    async fn invoke(&self, _function_name: &str, _payload: serde_json::Value) -> Result<()> {
        Err(GatewayError::Channel {
            channel: "lambda".to_string(),
            reason: "no nested function endpoint configured".to_string(),
        })
    }
}
