use async_trait::async_trait;
use conversa_core::{GatewayError, Result};
use conversa_fulfillment::ArchiveStore;

/// Local-filesystem submission archive, mirroring `conversa_tenant::FsObjectStore`'s
/// "root plays the role of the bucket" convention for local/dev use.
pub struct FsArchiveStore {
    root: std::path::PathBuf,
}

impl FsArchiveStore {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ArchiveStore for FsArchiveStore {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| GatewayError::ObjectStore(e.to_string()))?;
        }
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| GatewayError::ObjectStore(e.to_string()))?;
        Ok(())
    }
}

/// HTTP-backed archive (S3-compatible PUT) for production deployments.
pub struct HttpArchiveStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpArchiveStore {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ArchiveStore for HttpArchiveStore {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), key);
        let resp = self
            .client
            .put(&url)
            .body(body)
            .send()
            .await
            .map_err(|e| GatewayError::ObjectStore(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(GatewayError::ObjectStore(format!(
                "PUT {} returned {}",
                url,
                resp.status()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fs_archive_writes_nested_key_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArchiveStore::new(dir.path());
        store
            .put("submissions/tenant-a/contact/sub_1.json", b"{}".to_vec())
            .await
            .unwrap();
        let written = tokio::fs::read(dir.path().join("submissions/tenant-a/contact/sub_1.json"))
            .await
            .unwrap();
        assert_eq!(written, b"{}");
    }
}
