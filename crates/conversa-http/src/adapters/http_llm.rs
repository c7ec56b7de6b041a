//! HTTP-backed `ModelStreamer` (C4's external collaborator). The hosted LLM
//! itself is out of scope (spec Non-goals); this adapter POSTs the composed
//! prompt to whatever streaming-capable endpoint is configured and forwards
//! the response body's chunks as text deltas, one chunk per delta, the
//! simplest uniform translation that satisfies the `ModelStreamer` contract.

use async_trait::async_trait;
use conversa_llm::{ChatRequest, ModelStreamer, StreamEvent};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::warn;

pub struct HttpModelStreamer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpModelStreamer {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ModelStreamer for HttpModelStreamer {
    async fn stream(&self, req: ChatRequest, tx: mpsc::Sender<StreamEvent>) {
        let body = serde_json::json!({
            "prompt": req.prompt,
            "model_id": req.model_id,
            "max_tokens": req.max_tokens,
            "temperature": req.temperature,
        });

        let resp = match self.client.post(&self.endpoint).json(&body).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                let _ = tx
                    .send(StreamEvent::Error {
                        message: format!("model endpoint returned {}", r.status()),
                    })
                    .await;
                return;
            }
            Err(e) => {
                warn!(error = %e, "model streaming request failed");
                let _ = tx
                    .send(StreamEvent::Error {
                        message: e.to_string(),
                    })
                    .await;
                return;
            }
        };

        let mut byte_stream = resp.bytes_stream();
        let mut total_deltas = 0usize;

        while let Some(chunk) = byte_stream.next().await {
            match chunk {
                Ok(bytes) => {
                    if bytes.is_empty() {
                        continue;
                    }
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    total_deltas += 1;
                    if tx.send(StreamEvent::TextDelta { text }).await.is_err() {
                        return;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "model stream body read failed mid-stream");
                    let _ = tx
                        .send(StreamEvent::Error {
                            message: e.to_string(),
                        })
                        .await;
                    return;
                }
            }
        }

        let _ = tx.send(StreamEvent::Done { total_deltas }).await;
    }
}

/// Stands in when no model endpoint is configured — every call fails fast
/// with a single `Error` event rather than hanging or panicking.
pub struct UnconfiguredModelStreamer;

#[async_trait]
impl ModelStreamer for UnconfiguredModelStreamer {
    async fn stream(&self, _req: ChatRequest, tx: mpsc::Sender<StreamEvent>) {
        let _ = tx
            .send(StreamEvent::Error {
                message: "no model endpoint configured".to_string(),
            })
            .await;
    }
}
