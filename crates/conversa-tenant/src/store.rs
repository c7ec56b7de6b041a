use async_trait::async_trait;

/// Abstracts the object-storage backend that holds tenant mapping and
/// config documents (§6.2). Modeled the same way the teacher treats its
/// external collaborators (`LlmProvider`, `Channel`): a narrow async trait
/// the dispatcher is constructed with, so tests can substitute a fake.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the raw bytes at `key`, or `None` if the object does not exist.
    async fn get(&self, key: &str) -> conversa_core::Result<Option<Vec<u8>>>;
}

/// Local-filesystem object store. `root` plays the role of the bucket; a
/// key `tenants/acme/config` resolves to `<root>/tenants/acme/config`.
pub struct FsObjectStore {
    root: std::path::PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn get(&self, key: &str) -> conversa_core::Result<Option<Vec<u8>>> {
        let path = self.root.join(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// S3-compatible object store reached over HTTPS GET. `base_url` already
/// includes the bucket segment, e.g. `https://configs.example.com/tenant-configs`.
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpObjectStore {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn get(&self, key: &str) -> conversa_core::Result<Option<Vec<u8>>> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), key);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| conversa_core::GatewayError::ObjectStore(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(conversa_core::GatewayError::ObjectStore(format!(
                "GET {} returned {}",
                url,
                resp.status()
            )));
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| conversa_core::GatewayError::ObjectStore(e.to_string()))?;
        Ok(Some(bytes.to_vec()))
    }
}
