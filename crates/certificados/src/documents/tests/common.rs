use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::documents::storage::{StorageError, StorageGateway, StoredObject};

/// What the fake storage backend should do when enumerated.
pub(crate) enum FakeBehavior {
    Objects(Vec<StoredObject>),
    Denied,
    Unreachable,
    BadResponse,
}

/// In-memory gateway recording every enumeration call and the prefix
/// hints it was given.
pub(crate) struct FakeStorage {
    behavior: FakeBehavior,
    calls: AtomicUsize,
    prefixes: Mutex<Vec<Option<String>>>,
}

impl FakeStorage {
    pub(crate) fn new(behavior: FakeBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            prefixes: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_objects(keys: &[&str]) -> Self {
        let objects = keys
            .iter()
            .map(|key| StoredObject {
                key: (*key).to_string(),
                size: None,
                content_type: None,
                created_at: None,
            })
            .collect();
        Self::new(FakeBehavior::Objects(objects))
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn seen_prefixes(&self) -> Vec<Option<String>> {
        self.prefixes.lock().expect("prefix mutex poisoned").clone()
    }
}

#[async_trait]
impl StorageGateway for FakeStorage {
    async fn list_objects(&self, prefix: Option<&str>) -> Result<Vec<StoredObject>, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prefixes
            .lock()
            .expect("prefix mutex poisoned")
            .push(prefix.map(str::to_string));

        match &self.behavior {
            FakeBehavior::Objects(objects) => Ok(objects.clone()),
            FakeBehavior::Denied => Err(StorageError::Denied { status: 403 }),
            FakeBehavior::Unreachable => Err(StorageError::Unreachable {
                detail: "connection refused".to_string(),
            }),
            FakeBehavior::BadResponse => Err(StorageError::Api {
                status: 500,
                body: "internal storage failure".to_string(),
            }),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("https://files.test/certificadostributarios/{key}?sig=fake")
    }
}
