use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Failure detail from the storage layer is only surfaced to HTTP
    /// callers outside production.
    pub fn exposes_error_detail(self) -> bool {
        !matches!(self, Self::Production)
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig::load()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Logical container holding every certificate blob across all companies,
/// partitioned by `<nit>/` key prefixes.
pub const DEFAULT_CONTAINER: &str = "certificadostributarios";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Blob storage account settings. The account name and SAS token are the
/// two read credentials; either may be absent, in which case the listing
/// service reports a configuration error per request instead of the
/// process refusing to start.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub account: Option<String>,
    pub sas_token: Option<String>,
    pub container: String,
    pub endpoint: Option<String>,
    pub timeout: Duration,
}

impl StorageConfig {
    fn load() -> Result<Self, ConfigError> {
        let account = env::var("AZURE_STORAGE_ACCOUNT_NAME")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let sas_token = env::var("AZURE_STORAGE_SAS_TOKEN")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let container = env::var("AZURE_STORAGE_CONTAINER")
            .unwrap_or_else(|_| DEFAULT_CONTAINER.to_string());
        let endpoint = env::var("AZURE_STORAGE_ENDPOINT").ok();

        let timeout_secs = match env::var("AZURE_STORAGE_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout { value: raw })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            account,
            sas_token,
            container,
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Both credentials, when the account is fully configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.account.as_deref(), self.sas_token.as_deref()) {
            (Some(account), Some(token)) => Some((account, token)),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("AZURE_STORAGE_TIMEOUT_SECS must be a whole number of seconds, got '{value}'")]
    InvalidTimeout { value: String },
}
