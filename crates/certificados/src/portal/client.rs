use std::time::Duration;

use serde_json::Value;

use super::{classify_http_error, PortalError};
use crate::documents::{ErrorKind, ListingView};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP consumer of the listing endpoint. Every failure mode collapses
/// into the classified error envelope; callers never see a raw transport
/// exception.
pub struct PortalClient {
    http: reqwest::Client,
    base_url: String,
}

impl PortalClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the document listing for an identifier and classify the
    /// outcome into the result envelope.
    pub async fn fetch_documents(&self, nit: &str) -> Result<ListingView, PortalError> {
        let url = format!("{}/api/companies/{nit}", self.base_url);

        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(err) if err.is_timeout() || err.is_connect() => {
                return Err(
                    PortalError::new(ErrorKind::NetworkError, "connection error")
                        .with_details("could not connect to the server"),
                );
            }
            Err(err) => {
                return Err(PortalError::new(ErrorKind::ServerError, "system error")
                    .with_details(err.to_string()));
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                return Err(PortalError::new(ErrorKind::ServerError, "server error")
                    .with_details(err.to_string()));
            }
        };

        if !content_type.contains("application/json") {
            return Err(PortalError::new(ErrorKind::ServerError, "server error")
                .with_details(format!(
                    "expected a JSON response, got '{content_type}'"
                )));
        }

        let payload: Value = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(_) => {
                return Err(PortalError::new(ErrorKind::ServerError, "server error")
                    .with_details("response body was not valid JSON"));
            }
        };

        if !(200..300).contains(&status) {
            let message = payload
                .get("error")
                .or_else(|| payload.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP error {status}"));
            let details = payload
                .get("details")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("the API responded with status {status}"));
            return Err(PortalError::new(classify_http_error(status), message).with_details(details));
        }

        let listing: ListingView = match serde_json::from_value(payload) {
            Ok(listing) => listing,
            Err(err) => {
                return Err(PortalError::new(ErrorKind::ServerError, "server error")
                    .with_details(format!("malformed listing payload: {err}")));
            }
        };

        if !listing.success {
            return Err(PortalError::new(ErrorKind::ServerError, "server error")
                .with_details("the API returned success: false"));
        }

        Ok(listing)
    }
}
