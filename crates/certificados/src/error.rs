use crate::config::ConfigError;
use crate::telemetry::TelemetryError;

/// Infrastructure-level failures surfaced by the binary: configuration,
/// telemetry, socket, and client-construction errors. Per-request listing
/// failures use [`crate::documents::ListingError`] instead so they carry
/// the classification taxonomy across the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
