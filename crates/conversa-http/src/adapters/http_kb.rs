//! HTTP-backed `KnowledgeBase` (C2's external collaborator). The vector
//! store itself is out of scope (spec Non-goals); this adapter speaks a
//! minimal JSON contract to whatever service is configured, the same way
//! `HttpObjectStore` speaks a minimal GET contract to the config bucket.

use async_trait::async_trait;
use conversa_core::Result;
use conversa_knowledge::{KnowledgeBase, Passage};
use serde::Deserialize;

pub struct HttpKnowledgeBase {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpKnowledgeBase {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[derive(Deserialize)]
struct KbResponse {
    #[serde(default)]
    passages: Vec<KbPassage>,
}

#[derive(Deserialize)]
struct KbPassage {
    text: String,
}

#[async_trait]
impl KnowledgeBase for HttpKnowledgeBase {
    async fn query(&self, kb_id: &str, query: &str) -> Result<Vec<Passage>> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "kb_id": kb_id, "query": query }))
            .send()
            .await
            .map_err(|e| conversa_core::GatewayError::KnowledgeBase(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(conversa_core::GatewayError::KnowledgeBase(format!(
                "knowledge base returned {}",
                resp.status()
            )));
        }

        let body: KbResponse = resp
            .json()
            .await
            .map_err(|e| conversa_core::GatewayError::KnowledgeBase(e.to_string()))?;

        Ok(body.passages.into_iter().map(|p| Passage { text: p.text }).collect())
    }
}

/// Stands in when no knowledge base endpoint is configured — every query
/// degrades to zero passages, which `KnowledgeRetriever::retrieve` already
/// renders as an empty context string.
pub struct NullKnowledgeBase;

#[async_trait]
impl KnowledgeBase for NullKnowledgeBase {
    async fn query(&self, _kb_id: &str, _query: &str) -> Result<Vec<Passage>> {
        Ok(Vec::new())
    }
}
