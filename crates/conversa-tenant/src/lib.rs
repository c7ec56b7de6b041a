pub mod cache;
pub mod store;

pub use cache::TenantConfigStore;
pub use store::{FsObjectStore, HttpObjectStore, ObjectStore};
