use async_trait::async_trait;
use conversa_core::Result;

/// Write side of object-store archival — a separate trait from
/// `conversa_tenant::ObjectStore` because the config store contract is
/// read-only from the core's perspective (§6.2) while the submission
/// archive channel only ever writes.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()>;
}
