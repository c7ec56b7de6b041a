use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use conversa_core::config::TENANT_CONFIG_CACHE_TTL_SECS;
use conversa_core::model::TenantConfig;
use tracing::{debug, warn};

use crate::store::ObjectStore;

/// Cap on the in-process tenant-config cache. When full, the oldest half of
/// entries (by insertion order) is evicted to make room — the same
/// insertion-order eviction `skynet-users::UserResolver` uses for its
/// identity cache, since a true LRU crate buys nothing at this scale.
const MAX_CACHE_ENTRIES: usize = 256;

struct CacheEntry {
    config: TenantConfig,
    cached_at: DateTime<Utc>,
}

/// Read-through cache over the tenant mapping/config object store (C1).
///
/// Resolution is two-step: `mappings/<tenant_hash>` yields `tenant_id`, then
/// `tenants/<tenant_id>/<tenant_id>-config` (falling back to
/// `tenants/<tenant_id>/config`) yields the config document. Entries are
/// snapshots: a refresh replaces the whole entry, it never mutates one in
/// place, so concurrent readers never observe a half-written config.
pub struct TenantConfigStore {
    store: Box<dyn ObjectStore>,
    cache: Mutex<HashMap<String, CacheEntry>>,
    order: Mutex<Vec<String>>,
}

#[derive(serde::Deserialize)]
struct MappingDoc {
    tenant_id: String,
}

impl TenantConfigStore {
    pub fn new(store: Box<dyn ObjectStore>) -> Self {
        Self {
            store,
            cache: Mutex::new(HashMap::new()),
            order: Mutex::new(Vec::new()),
        }
    }

    /// `load_config(tenant_hash) -> TenantConfig | null`. Never propagates an
    /// error: any failure is logged and surfaced as `None`, leaving the
    /// caller to substitute `TenantConfig::default()`.
    pub async fn load_config(&self, tenant_hash: &str) -> Option<TenantConfig> {
        if let Some(config) = self.cached(tenant_hash) {
            debug!(tenant_hash, "tenant config cache hit");
            return Some(config);
        }

        match self.load_uncached(tenant_hash).await {
            Ok(Some(config)) => {
                self.insert(tenant_hash.to_string(), config.clone());
                Some(config)
            }
            Ok(None) => {
                warn!(tenant_hash, "tenant config not found");
                None
            }
            Err(e) => {
                warn!(tenant_hash, error = %e, "tenant config retrieval failed");
                None
            }
        }
    }

    async fn load_uncached(&self, tenant_hash: &str) -> conversa_core::Result<Option<TenantConfig>> {
        let mapping_key = format!("mappings/{}", tenant_hash);
        let mapping_bytes = match self.store.get(&mapping_key).await? {
            Some(b) => b,
            None => return Ok(None),
        };
        let mapping: MappingDoc = serde_json::from_slice(&mapping_bytes)?;

        let primary_key = format!("tenants/{}/{}-config", mapping.tenant_id, mapping.tenant_id);
        if let Some(bytes) = self.store.get(&primary_key).await? {
            let config: TenantConfig = serde_json::from_slice(&bytes)?;
            return Ok(Some(config));
        }

        let fallback_key = format!("tenants/{}/config", mapping.tenant_id);
        if let Some(bytes) = self.store.get(&fallback_key).await? {
            let config: TenantConfig = serde_json::from_slice(&bytes)?;
            return Ok(Some(config));
        }

        Ok(None)
    }

    fn cached(&self, tenant_hash: &str) -> Option<TenantConfig> {
        let cache = self.cache.lock().unwrap();
        let entry = cache.get(tenant_hash)?;
        let age = Utc::now().signed_duration_since(entry.cached_at).num_seconds();
        if age < TENANT_CONFIG_CACHE_TTL_SECS {
            Some(entry.config.clone())
        } else {
            None
        }
    }

    fn insert(&self, tenant_hash: String, config: TenantConfig) {
        let mut cache = self.cache.lock().unwrap();
        let mut order = self.order.lock().unwrap();

        if !cache.contains_key(&tenant_hash) {
            if cache.len() >= MAX_CACHE_ENTRIES {
                let evict_count = MAX_CACHE_ENTRIES / 2;
                for k in order.drain(..evict_count.min(order.len())) {
                    cache.remove(&k);
                }
            }
            order.push(tenant_hash.clone());
        }

        cache.insert(
            tenant_hash,
            CacheEntry {
                config,
                cached_at: Utc::now(),
            },
        );
    }

    /// Force the next read for `tenant_hash` to bypass the cache.
    pub fn invalidate(&self, tenant_hash: &str) {
        let mut cache = self.cache.lock().unwrap();
        let mut order = self.order.lock().unwrap();
        cache.remove(tenant_hash);
        order.retain(|k| k != tenant_hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeStore {
        hits: AtomicUsize,
    }

    #[async_trait]
    impl ObjectStore for FakeStore {
        async fn get(&self, key: &str) -> conversa_core::Result<Option<Vec<u8>>> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            match key {
                "mappings/abc" => Ok(Some(br#"{"tenant_id":"acme"}"#.to_vec())),
                "tenants/acme/acme-config" => Ok(Some(
                    br#"{"tenant_id":"acme","role_instructions":"Be helpful"}"#.to_vec(),
                )),
                _ => Ok(None),
            }
        }
    }

    #[tokio::test]
    async fn resolves_two_step_and_caches() {
        let fake = FakeStore {
            hits: AtomicUsize::new(0),
        };
        let store = TenantConfigStore::new(Box::new(fake));

        let cfg = store.load_config("abc").await.expect("config present");
        assert_eq!(cfg.tenant_id, "acme");

        // Second call should hit the cache, not the store.
        let cfg2 = store.load_config("abc").await.expect("config present");
        assert_eq!(cfg2.tenant_id, "acme");
    }

    #[tokio::test]
    async fn missing_mapping_returns_none() {
        let fake = FakeStore {
            hits: AtomicUsize::new(0),
        };
        let store = TenantConfigStore::new(Box::new(fake));
        assert!(store.load_config("nonexistent").await.is_none());
    }
}
