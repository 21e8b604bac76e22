use async_trait::async_trait;
use certificados::documents::{StorageError, StorageGateway, StoredObject};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// How the in-memory store behaves when enumerated. Used by the demo and
/// the route tests to exercise every branch of the error mapping.
pub(crate) enum StoreFixture {
    Objects(Vec<StoredObject>),
    Denied,
    Unreachable,
    Broken,
}

/// Storage gateway backed by a fixed object list, standing in for the
/// blob container.
pub(crate) struct InMemoryStorageGateway {
    fixture: StoreFixture,
}

impl InMemoryStorageGateway {
    pub(crate) fn new(fixture: StoreFixture) -> Self {
        Self { fixture }
    }

    pub(crate) fn with_keys(keys: &[&str]) -> Self {
        let objects = keys
            .iter()
            .map(|key| StoredObject {
                key: (*key).to_string(),
                size: Some(1024),
                content_type: Some("application/pdf".to_string()),
                created_at: None,
            })
            .collect();
        Self::new(StoreFixture::Objects(objects))
    }
}

#[async_trait]
impl StorageGateway for InMemoryStorageGateway {
    async fn list_objects(&self, prefix: Option<&str>) -> Result<Vec<StoredObject>, StorageError> {
        match &self.fixture {
            StoreFixture::Objects(objects) => Ok(objects
                .iter()
                .filter(|object| prefix.map_or(true, |prefix| object.key.starts_with(prefix)))
                .cloned()
                .collect()),
            StoreFixture::Denied => Err(StorageError::Denied { status: 403 }),
            StoreFixture::Unreachable => Err(StorageError::Unreachable {
                detail: "connection refused".to_string(),
            }),
            StoreFixture::Broken => Err(StorageError::Api {
                status: 500,
                body: "unexpected storage response".to_string(),
            }),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("https://demo.blob.local/certificadostributarios/{key}?sig=demo")
    }
}
