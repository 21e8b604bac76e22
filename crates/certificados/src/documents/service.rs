use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{
    DocumentDescriptor, DocumentListing, ListingError, Nit, DEFAULT_CONTENT_TYPE,
};
use super::storage::{StorageError, StorageGateway};

/// The listing service: validates an identifier, enumerates the
/// certificate container through the gateway, and reshapes matching
/// objects into document descriptors.
///
/// `storage` is `None` when the deployment lacks read credentials; every
/// request then resolves to a configuration error without touching the
/// network.
pub struct DocumentListingService<S> {
    storage: Option<Arc<S>>,
}

impl<S> DocumentListingService<S>
where
    S: StorageGateway,
{
    pub fn new(storage: Option<Arc<S>>) -> Self {
        Self { storage }
    }

    /// List certificate documents for a raw identifier string.
    ///
    /// Invalid identifiers and missing credentials fail fast with zero
    /// storage calls. Zero matching objects is a not-found outcome, not a
    /// call failure. Document order is the store's enumeration order.
    pub async fn list_documents(&self, raw: &str) -> Result<DocumentListing, ListingError> {
        let nit = Nit::parse(raw)?;

        let Some(storage) = self.storage.as_ref() else {
            warn!(%nit, "storage credentials missing, rejecting request");
            return Err(ListingError::MissingCredentials);
        };

        let prefix = nit.folder_prefix();
        debug!(%nit, "listing certificate documents");

        let objects = storage
            .list_objects(Some(&prefix))
            .await
            .map_err(classify_storage_error)?;

        // Gateways that ignore the prefix hint still get filtered here.
        let documents: Vec<DocumentDescriptor> = objects
            .into_iter()
            .filter(|object| object.key.starts_with(&prefix))
            .map(|object| DocumentDescriptor {
                name: object.key[prefix.len()..].to_string(),
                url: storage.object_url(&object.key),
                size: object.size.unwrap_or(0),
                content_type: object
                    .content_type
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
                created_at: object.created_at,
            })
            .collect();

        if documents.is_empty() {
            info!(%nit, "no certificate documents found");
            return Err(ListingError::NotFound { nit });
        }

        info!(%nit, count = documents.len(), "certificate documents listed");
        Ok(DocumentListing { nit, documents })
    }
}

fn classify_storage_error(error: StorageError) -> ListingError {
    match error {
        StorageError::Unreachable { .. } | StorageError::Timeout => ListingError::Unreachable {
            detail: error.to_string(),
        },
        StorageError::Denied { status } => ListingError::AccessDenied { status },
        StorageError::Api { .. } | StorageError::Decode { .. } => ListingError::Internal {
            detail: error.to_string(),
        },
    }
}
