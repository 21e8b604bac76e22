use chrono::{DateTime, Utc};

use super::PortalError;
use crate::documents::{DocumentDescriptor, ErrorKind, ListingView};

/// File family derived from the document name, used to pick the list icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Word,
    Excel,
    Other,
}

impl FileKind {
    pub fn from_name(name: &str) -> Self {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Self::Pdf,
            "doc" | "docx" => Self::Word,
            "xls" | "xlsx" => Self::Excel,
            _ => Self::Other,
        }
    }

    pub fn asset(self) -> &'static str {
        match self {
            Self::Pdf => "/assets/pdf.svg",
            Self::Word => "/assets/docx.svg",
            Self::Excel => "/assets/xlsx.svg",
            Self::Other => "/assets/file.svg",
        }
    }
}

/// Humanize a byte count for the document card.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size == 0 {
        return "unknown size".to_string();
    }
    if size >= GB {
        return format!("{:.2} GB", size as f64 / GB as f64);
    }
    if size >= MB {
        return format!("{:.2} MB", size as f64 / MB as f64);
    }
    if size >= KB {
        return format!("{:.2} KB", size as f64 / KB as f64);
    }
    format!("{size} bytes")
}

/// Human-readable creation date for the document card.
pub fn format_created(created_at: &DateTime<Utc>) -> String {
    created_at.format("%-d %B %Y").to_string()
}

/// Icon shown by the failure state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorIcon {
    FileMissing,
    Wifi,
    Server,
    Warning,
    Help,
}

/// Accent color of the failure state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Orange,
    Blue,
    Red,
    Yellow,
    Purple,
    Gray,
}

/// Visual treatment of a failure state, selected solely by error kind.
/// `urgent` marks the kinds that get the attention badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPresentation {
    pub icon: ErrorIcon,
    pub tone: Tone,
    pub urgent: bool,
}

impl ErrorPresentation {
    pub fn for_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => Self {
                icon: ErrorIcon::FileMissing,
                tone: Tone::Orange,
                urgent: false,
            },
            ErrorKind::NetworkError => Self {
                icon: ErrorIcon::Wifi,
                tone: Tone::Blue,
                urgent: true,
            },
            ErrorKind::ServerError => Self {
                icon: ErrorIcon::Server,
                tone: Tone::Red,
                urgent: true,
            },
            ErrorKind::InvalidIdentifier => Self {
                icon: ErrorIcon::Warning,
                tone: Tone::Yellow,
                urgent: false,
            },
            ErrorKind::ConfigError => Self {
                icon: ErrorIcon::Help,
                tone: Tone::Purple,
                urgent: true,
            },
        }
    }

    /// Neutral fallback for wire tags the taxonomy does not recognize.
    pub fn neutral() -> Self {
        Self {
            icon: ErrorIcon::Help,
            tone: Tone::Gray,
            urgent: false,
        }
    }

    /// Presentation for a raw wire `type` tag; unknown tags get the
    /// neutral fallback.
    pub fn for_wire_type(raw: &str) -> Self {
        ErrorKind::from_wire(raw)
            .map(Self::for_kind)
            .unwrap_or_else(Self::neutral)
    }
}

/// Action offered alongside a failure state. Never triggered
/// automatically; retries are user-initiated re-invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAction {
    /// Send the user back to the identifier form.
    TryAnotherIdentifier,
    /// Re-issue the same request.
    Retry,
    /// Config faults are operator-fixable, not user-fixable: no retry.
    ContactOperator,
}

impl RetryAction {
    pub fn for_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidIdentifier | ErrorKind::NotFound => Self::TryAnotherIdentifier,
            ErrorKind::NetworkError | ErrorKind::ServerError => Self::Retry,
            ErrorKind::ConfigError => Self::ContactOperator,
        }
    }
}

/// Per-document card data.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentView {
    pub name: String,
    pub url: String,
    pub kind: FileKind,
    pub size_label: String,
    pub created_label: Option<String>,
}

impl DocumentView {
    pub fn from_descriptor(descriptor: &DocumentDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            url: descriptor.url.clone(),
            kind: FileKind::from_name(&descriptor.name),
            size_label: format_file_size(descriptor.size),
            created_label: descriptor.created_at.as_ref().map(format_created),
        }
    }
}

/// The three states a portal page renders.
#[derive(Debug, Clone, PartialEq)]
pub enum PortalView {
    Documents {
        identifier: String,
        documents: Vec<DocumentView>,
        count: usize,
        message: String,
    },
    /// Success with zero documents. The listing service substitutes a
    /// not-found error for empty lists, so this state is currently
    /// unreachable from it; the adapter supports it anyway because the
    /// envelope contract allows it.
    Empty { identifier: String },
    Failure {
        kind: ErrorKind,
        message: String,
        details: Option<String>,
        presentation: ErrorPresentation,
        retry: RetryAction,
    },
}

/// Deterministic mapping from a fetch outcome to a view state.
pub fn render(outcome: Result<ListingView, PortalError>) -> PortalView {
    match outcome {
        Ok(listing) if listing.documents.is_empty() => PortalView::Empty {
            identifier: listing.identifier,
        },
        Ok(listing) => PortalView::Documents {
            identifier: listing.identifier,
            documents: listing
                .documents
                .iter()
                .map(DocumentView::from_descriptor)
                .collect(),
            count: listing.count,
            message: listing.message,
        },
        Err(error) => PortalView::Failure {
            kind: error.kind,
            message: error.message,
            details: error.details,
            presentation: ErrorPresentation::for_kind(error.kind),
            retry: RetryAction::for_kind(error.kind),
        },
    }
}
