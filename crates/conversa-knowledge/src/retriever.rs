use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use conversa_core::config::KB_CACHE_TTL_SECS;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

const MAX_PASSAGES: usize = 5;
const MAX_CACHE_ENTRIES: usize = 256;

#[derive(Debug, Clone)]
pub struct Passage {
    pub text: String,
}

/// Abstracts the vector knowledge base. Consumed via an opaque client
/// interface, per the spec's Non-goals — the gateway never runs retrieval
/// itself.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn query(&self, kb_id: &str, query: &str) -> conversa_core::Result<Vec<Passage>>;
}

struct CacheEntry {
    context: String,
    cached_at: DateTime<Utc>,
}

/// `retrieve(query, knowledge_base_id) -> string` (C2).
///
/// Caches the rendered context string by `(kb_id, hash(query))`. A cache
/// key hash stands in for the query text itself purely to bound memory use
/// under long queries; it carries no cryptographic requirement.
pub struct KnowledgeRetriever {
    kb: Box<dyn KnowledgeBase>,
    cache: Mutex<HashMap<(String, String), CacheEntry>>,
    order: Mutex<Vec<(String, String)>>,
}

impl KnowledgeRetriever {
    pub fn new(kb: Box<dyn KnowledgeBase>) -> Self {
        Self {
            kb,
            cache: Mutex::new(HashMap::new()),
            order: Mutex::new(Vec::new()),
        }
    }

    /// Returns up to 5 top passages joined as `**Context N:**` blocks
    /// separated by `\n\n---\n\n`; empty string when no KB is configured or
    /// the call yields zero results. Never propagates a failure.
    pub async fn retrieve(&self, query: &str, knowledge_base_id: Option<&str>) -> String {
        let kb_id = match knowledge_base_id {
            Some(id) if !id.is_empty() => id,
            _ => return String::new(),
        };

        let key = (kb_id.to_string(), query_hash(query));
        if let Some(context) = self.cached(&key) {
            debug!(kb_id, "knowledge retrieval cache hit");
            return context;
        }

        let passages = match self.kb.query(kb_id, query).await {
            Ok(p) => p,
            Err(e) => {
                warn!(kb_id, error = %e, "knowledge base retrieval failed");
                return String::new();
            }
        };

        if passages.is_empty() {
            return String::new();
        }

        let context = render_context(&passages);
        self.insert(key, context.clone());
        context
    }

    fn cached(&self, key: &(String, String)) -> Option<String> {
        let cache = self.cache.lock().unwrap();
        let entry = cache.get(key)?;
        let age = Utc::now().signed_duration_since(entry.cached_at).num_seconds();
        if age < KB_CACHE_TTL_SECS {
            Some(entry.context.clone())
        } else {
            None
        }
    }

    fn insert(&self, key: (String, String), context: String) {
        let mut cache = self.cache.lock().unwrap();
        let mut order = self.order.lock().unwrap();

        if !cache.contains_key(&key) {
            if cache.len() >= MAX_CACHE_ENTRIES {
                let evict_count = MAX_CACHE_ENTRIES / 2;
                for k in order.drain(..evict_count.min(order.len())) {
                    cache.remove(&k);
                }
            }
            order.push(key.clone());
        }

        cache.insert(
            key,
            CacheEntry {
                context,
                cached_at: Utc::now(),
            },
        );
    }
}

fn query_hash(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hex::encode(hasher.finalize())
}

fn render_context(passages: &[Passage]) -> String {
    passages
        .iter()
        .take(MAX_PASSAGES)
        .enumerate()
        .map(|(i, p)| format!("**Context {}:**\n{}", i + 1, p.text))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}
