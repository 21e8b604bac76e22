use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod azure;

pub use azure::AzureBlobStore;

/// Metadata for a single object in the certificate container. The store
/// owns the object lifecycle; this system only reads.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    /// Full key, including the `<nit>/` folder prefix.
    pub key: String,
    pub size: Option<u64>,
    pub content_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Faults raised by a storage backend, pre-classified so the listing
/// service can map them onto the error taxonomy without inspecting
/// transport details.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage endpoint unreachable: {detail}")]
    Unreachable { detail: String },
    #[error("storage request timed out")]
    Timeout,
    #[error("storage access denied (status {status})")]
    Denied { status: u16 },
    #[error("storage returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to decode storage listing: {detail}")]
    Decode { detail: String },
}

/// Seam between the listing service and the object store, so the service
/// can be exercised against in-memory fakes.
///
/// `prefix` is a hint: backends that can scope the enumeration server-side
/// should, but callers must not rely on it. The service filters keys
/// client-side either way.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    async fn list_objects(&self, prefix: Option<&str>) -> Result<Vec<StoredObject>, StorageError>;

    /// Public read URL for an object key, credential included.
    fn object_url(&self, key: &str) -> String;
}
