//! Document listing over blob storage: given a validated company NIT,
//! enumerate the certificate container, reshape matching objects into
//! document descriptors, and classify every failure into the fixed
//! five-kind taxonomy before it crosses into the presentation layer.

pub mod domain;
pub mod service;
pub mod storage;

#[cfg(test)]
mod tests;

pub use domain::{
    DocumentDescriptor, DocumentListing, ErrorKind, InvalidNit, ListingError, ListingView, Nit,
    DEFAULT_CONTENT_TYPE, MAX_NIT_DIGITS, MIN_NIT_DIGITS,
};
pub use service::DocumentListingService;
pub use storage::{AzureBlobStore, StorageError, StorageGateway, StoredObject};
