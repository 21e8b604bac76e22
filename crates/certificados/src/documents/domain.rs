use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_NIT_DIGITS: usize = 8;
pub const MAX_NIT_DIGITS: usize = 11;

/// Content type substituted when the store omits one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Company tax identifier: 8 to 11 decimal digits, the portal's sole
/// query key. Validation happens before any storage call; there is no
/// deserializing constructor that could bypass it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Nit(String);

impl Nit {
    pub fn parse(raw: &str) -> Result<Self, InvalidNit> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidNit::Empty);
        }
        if !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(InvalidNit::NotNumeric);
        }
        if trimmed.len() < MIN_NIT_DIGITS || trimmed.len() > MAX_NIT_DIGITS {
            return Err(InvalidNit::WrongLength {
                digits: trimmed.len(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The logical folder holding this company's blobs: `<nit>/`.
    pub fn folder_prefix(&self) -> String {
        format!("{}/", self.0)
    }
}

impl fmt::Display for Nit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Nit {
    type Err = InvalidNit;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidNit {
    #[error("a company NIT is required")]
    Empty,
    #[error("invalid NIT: it must contain only digits")]
    NotNumeric,
    #[error("invalid NIT: it must contain between 8 and 11 digits")]
    WrongLength { digits: usize },
}

/// Per-file record exposed to the presentation layer. The name never
/// includes the `<nit>/` folder prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    pub name: String,
    pub url: String,
    pub size: u64,
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Successful listing outcome. Success and error are disjoint: an empty
/// filtered list never reaches this type (the service substitutes a
/// not-found error).
#[derive(Debug, Clone)]
pub struct DocumentListing {
    pub nit: Nit,
    pub documents: Vec<DocumentDescriptor>,
}

impl DocumentListing {
    pub fn count(&self) -> usize {
        self.documents.len()
    }

    pub fn message(&self) -> String {
        let count = self.count();
        let noun = if count == 1 { "document" } else { "documents" };
        format!("Found {count} {noun} for NIT {}", self.nit)
    }

    /// Wire projection of the success envelope.
    pub fn view(&self) -> ListingView {
        ListingView {
            success: true,
            identifier: self.nit.as_str().to_string(),
            documents: self.documents.clone(),
            count: self.count(),
            message: self.message(),
        }
    }
}

/// Success envelope as serialized over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingView {
    pub success: bool,
    pub identifier: String,
    pub documents: Vec<DocumentDescriptor>,
    pub count: usize,
    pub message: String,
}

/// The five-kind error taxonomy shared by the listing service and the
/// presentation adapter. Fixed and mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidIdentifier,
    NotFound,
    ServerError,
    NetworkError,
    ConfigError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidIdentifier => "invalid_identifier",
            Self::NotFound => "not_found",
            Self::ServerError => "server_error",
            Self::NetworkError => "network_error",
            Self::ConfigError => "config_error",
        }
    }

    /// Parse a wire `type` tag. Unknown tags return `None` so callers can
    /// fall back to a neutral presentation.
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "invalid_identifier" => Some(Self::InvalidIdentifier),
            "not_found" => Some(Self::NotFound),
            "server_error" => Some(Self::ServerError),
            "network_error" => Some(Self::NetworkError),
            "config_error" => Some(Self::ConfigError),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified listing failure. Every storage-layer fault is converted to
/// one of these before crossing into the presentation adapter.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error(transparent)]
    InvalidNit(#[from] InvalidNit),
    #[error("no documents found for NIT {nit}")]
    NotFound { nit: Nit },
    #[error("storage credentials are not configured")]
    MissingCredentials,
    #[error("no permission to access document storage")]
    AccessDenied { status: u16 },
    #[error("could not reach document storage: {detail}")]
    Unreachable { detail: String },
    #[error("failed to list documents: {detail}")]
    Internal { detail: String },
}

impl ListingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidNit(_) => ErrorKind::InvalidIdentifier,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::MissingCredentials | Self::AccessDenied { .. } => ErrorKind::ConfigError,
            Self::Unreachable { .. } => ErrorKind::NetworkError,
            Self::Internal { .. } => ErrorKind::ServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_identifiers_between_8_and_11_digits() {
        for raw in ["90012345", "900123456", "9001234567", "90012345678"] {
            let nit = Nit::parse(raw).expect("valid NIT");
            assert_eq!(nit.as_str(), raw);
        }
    }

    #[test]
    fn rejects_wrong_lengths_and_non_digits() {
        assert_eq!(
            Nit::parse("123"),
            Err(InvalidNit::WrongLength { digits: 3 })
        );
        assert_eq!(
            Nit::parse("900123456789"),
            Err(InvalidNit::WrongLength { digits: 12 })
        );
        assert_eq!(Nit::parse("90012345a"), Err(InvalidNit::NotNumeric));
        assert_eq!(Nit::parse("9001-2345"), Err(InvalidNit::NotNumeric));
        assert_eq!(Nit::parse(""), Err(InvalidNit::Empty));
        assert_eq!(Nit::parse("   "), Err(InvalidNit::Empty));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let nit = Nit::parse(" 90012345 ").expect("valid after trim");
        assert_eq!(nit.as_str(), "90012345");
        assert_eq!(nit.folder_prefix(), "90012345/");
    }

    #[test]
    fn descriptor_serializes_with_wire_field_names() {
        let descriptor = DocumentDescriptor {
            name: "retencion_2024.pdf".to_string(),
            url: "https://files.test/retencion_2024.pdf?sig=abc".to_string(),
            size: 2048,
            content_type: "application/pdf".to_string(),
            created_at: None,
        };
        let value = serde_json::to_value(&descriptor).expect("serializes");
        assert_eq!(value["name"], "retencion_2024.pdf");
        assert_eq!(value["size"], 2048);
        assert_eq!(value["contentType"], "application/pdf");
        assert!(value.get("createdAt").is_none());
    }

    #[test]
    fn listing_view_carries_count_aware_message() {
        let nit = Nit::parse("900123456").expect("valid NIT");
        let one = DocumentListing {
            nit: nit.clone(),
            documents: vec![DocumentDescriptor {
                name: "a.pdf".to_string(),
                url: "https://files.test/900123456/a.pdf".to_string(),
                size: 10,
                content_type: DEFAULT_CONTENT_TYPE.to_string(),
                created_at: None,
            }],
        };
        assert_eq!(one.message(), "Found 1 document for NIT 900123456");

        let view = one.view();
        assert!(view.success);
        assert_eq!(view.identifier, "900123456");
        assert_eq!(view.count, 1);
    }

    #[test]
    fn error_kind_round_trips_wire_tags() {
        for kind in [
            ErrorKind::InvalidIdentifier,
            ErrorKind::NotFound,
            ErrorKind::ServerError,
            ErrorKind::NetworkError,
            ErrorKind::ConfigError,
        ] {
            assert_eq!(ErrorKind::from_wire(kind.as_str()), Some(kind));
        }
        assert_eq!(ErrorKind::from_wire("weird"), None);

        let tag = serde_json::to_value(ErrorKind::InvalidIdentifier).expect("serializes");
        assert_eq!(tag, "invalid_identifier");
    }
}
