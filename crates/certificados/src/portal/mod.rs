//! Presentation adapter: classifies HTTP outcomes into the fixed error
//! taxonomy and maps listing results onto deterministic view states for
//! the portal pages.

pub mod client;
pub mod view;

use serde::{Deserialize, Serialize};

use crate::documents::ErrorKind;

pub use client::PortalClient;
pub use view::{
    render, DocumentView, ErrorIcon, ErrorPresentation, FileKind, PortalView, RetryAction, Tone,
};

/// Map a transport status code onto the domain taxonomy. This table is the
/// seam between HTTP statuses and the error kinds the pages key off; it
/// decides which state the user sees.
pub fn classify_http_error(status: u16) -> ErrorKind {
    match status {
        400 => ErrorKind::InvalidIdentifier,
        404 => ErrorKind::NotFound,
        403 => ErrorKind::ConfigError,
        500 | 503 => ErrorKind::ServerError,
        _ => ErrorKind::ServerError,
    }
}

/// Classified error half of the result envelope: `{type, message,
/// details?}`. Success and error are disjoint by construction; the
/// success half is [`crate::documents::ListingView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalError {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl PortalError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
