use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::{StorageError, StorageGateway, StoredObject};
use crate::config::StorageConfig;

const MAX_ERROR_BODY: usize = 256;

/// Read-only client for the Blob service REST API. Constructed once at
/// startup and shared across requests; the underlying connection pool is
/// stateless in this system's usage.
pub struct AzureBlobStore {
    http: reqwest::Client,
    endpoint: String,
    container: String,
    sas_token: String,
}

impl AzureBlobStore {
    /// Build a store client when both read credentials are configured.
    /// Returns `Ok(None)` otherwise, so the listing service can report the
    /// missing configuration per request instead of failing startup.
    pub fn from_config(config: &StorageConfig) -> Result<Option<Self>, reqwest::Error> {
        let Some((account, sas_token)) = config.credentials() else {
            return Ok(None);
        };

        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{account}.blob.core.windows.net"));
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Some(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            container: config.container.clone(),
            sas_token: sas_token.to_string(),
        }))
    }

    fn list_url(&self, prefix: Option<&str>, marker: Option<&str>) -> String {
        let mut url = format!(
            "{}/{}?restype=container&comp=list",
            self.endpoint, self.container
        );
        if let Some(prefix) = prefix {
            url.push_str("&prefix=");
            url.push_str(prefix);
        }
        if let Some(marker) = marker {
            url.push_str("&marker=");
            url.push_str(marker);
        }
        // The SAS token is a pre-encoded query-string tail.
        url.push('&');
        url.push_str(&self.sas_token);
        url
    }

    fn map_transport(err: reqwest::Error) -> StorageError {
        if err.is_timeout() {
            StorageError::Timeout
        } else {
            StorageError::Unreachable {
                detail: err.to_string(),
            }
        }
    }

    async fn fetch_page(
        &self,
        prefix: Option<&str>,
        marker: Option<&str>,
    ) -> Result<ListingPage, StorageError> {
        let url = self.list_url(prefix, marker);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(Self::map_transport)?;

        let status = response.status();
        if status.as_u16() == 403 {
            return Err(StorageError::Denied { status: 403 });
        }
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            body.truncate(MAX_ERROR_BODY);
            return Err(StorageError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(Self::map_transport)?;
        let results: EnumerationResults =
            quick_xml::de::from_str(&body).map_err(|err| StorageError::Decode {
                detail: err.to_string(),
            })?;

        Ok(results.into_page())
    }
}

#[async_trait]
impl StorageGateway for AzureBlobStore {
    async fn list_objects(&self, prefix: Option<&str>) -> Result<Vec<StoredObject>, StorageError> {
        let mut objects = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self.fetch_page(prefix, marker.as_deref()).await?;
            objects.extend(page.objects);
            match page.next_marker {
                Some(next) if !next.is_empty() => marker = Some(next),
                _ => break,
            }
        }

        debug!(
            container = %self.container,
            count = objects.len(),
            "storage enumeration complete"
        );
        Ok(objects)
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}?{}",
            self.endpoint, self.container, key, self.sas_token
        )
    }
}

struct ListingPage {
    objects: Vec<StoredObject>,
    next_marker: Option<String>,
}

// Wire model for the List Blobs `EnumerationResults` payload.

#[derive(Debug, Deserialize)]
struct EnumerationResults {
    #[serde(rename = "Blobs")]
    blobs: Option<BlobList>,
    #[serde(rename = "NextMarker")]
    next_marker: Option<String>,
}

impl EnumerationResults {
    fn into_page(self) -> ListingPage {
        let objects = self
            .blobs
            .map(|list| list.entries)
            .unwrap_or_default()
            .into_iter()
            .map(BlobEntry::into_object)
            .collect();
        ListingPage {
            objects,
            next_marker: self.next_marker,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct BlobList {
    #[serde(rename = "Blob", default)]
    entries: Vec<BlobEntry>,
}

#[derive(Debug, Deserialize)]
struct BlobEntry {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Properties")]
    properties: Option<BlobProperties>,
}

impl BlobEntry {
    fn into_object(self) -> StoredObject {
        let properties = self.properties.unwrap_or_default();
        StoredObject {
            key: self.name,
            size: properties
                .content_length
                .as_deref()
                .and_then(|raw| raw.parse::<u64>().ok()),
            content_type: properties.content_type.filter(|value| !value.is_empty()),
            created_at: properties
                .creation_time
                .as_deref()
                .and_then(parse_blob_timestamp),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct BlobProperties {
    #[serde(rename = "Content-Length")]
    content_length: Option<String>,
    #[serde(rename = "Content-Type")]
    content_type: Option<String>,
    #[serde(rename = "Creation-Time")]
    creation_time: Option<String>,
}

// Blob timestamps arrive in RFC 1123 form, e.g. "Thu, 01 Aug 2024 10:00:00 GMT".
fn parse_blob_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(endpoint: &str) -> StorageConfig {
        StorageConfig {
            account: Some("transmeralda".to_string()),
            sas_token: Some("sv=2024&sig=test".to_string()),
            container: "certificadostributarios".to_string(),
            endpoint: Some(endpoint.to_string()),
            timeout: Duration::from_secs(5),
        }
    }

    fn store_for(endpoint: &str) -> AzureBlobStore {
        AzureBlobStore::from_config(&test_config(endpoint))
            .expect("client builds")
            .expect("credentials present")
    }

    fn listing_xml(blobs: &str, next_marker: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <EnumerationResults ContainerName=\"certificadostributarios\">\
             <Blobs>{blobs}</Blobs>\
             <NextMarker>{next_marker}</NextMarker>\
             </EnumerationResults>"
        )
    }

    #[test]
    fn missing_credentials_yield_no_client() {
        let mut config = test_config("http://storage.test");
        config.sas_token = None;
        let store = AzureBlobStore::from_config(&config).expect("no build error");
        assert!(store.is_none());
    }

    #[test]
    fn object_url_joins_endpoint_container_key_and_credential() {
        let store = store_for("http://storage.test");
        assert_eq!(
            store.object_url("900123456/a.pdf"),
            "http://storage.test/certificadostributarios/900123456/a.pdf?sv=2024&sig=test"
        );
    }

    #[tokio::test]
    async fn lists_blobs_and_decodes_properties() {
        let server = MockServer::start().await;
        let blobs = "<Blob><Name>900123456/a.pdf</Name><Properties>\
                     <Creation-Time>Thu, 01 Aug 2024 10:00:00 GMT</Creation-Time>\
                     <Content-Length>2048</Content-Length>\
                     <Content-Type>application/pdf</Content-Type>\
                     </Properties></Blob>\
                     <Blob><Name>900123456/b.pdf</Name></Blob>";
        Mock::given(method("GET"))
            .and(path("/certificadostributarios"))
            .and(query_param("restype", "container"))
            .and(query_param("comp", "list"))
            .and(query_param("prefix", "900123456/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_xml(blobs, "")))
            .mount(&server)
            .await;

        let store = store_for(&server.uri());
        let objects = store
            .list_objects(Some("900123456/"))
            .await
            .expect("listing succeeds");

        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].key, "900123456/a.pdf");
        assert_eq!(objects[0].size, Some(2048));
        assert_eq!(objects[0].content_type.as_deref(), Some("application/pdf"));
        assert!(objects[0].created_at.is_some());
        assert_eq!(objects[1].key, "900123456/b.pdf");
        assert_eq!(objects[1].size, None);
        assert_eq!(objects[1].content_type, None);
        assert_eq!(objects[1].created_at, None);
    }

    #[tokio::test]
    async fn follows_next_marker_continuations() {
        let server = MockServer::start().await;
        let first = "<Blob><Name>900123456/a.pdf</Name></Blob>";
        let second = "<Blob><Name>900123456/b.pdf</Name></Blob>";
        Mock::given(method("GET"))
            .and(path("/certificadostributarios"))
            .and(query_param_is_missing("marker"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_xml(first, "page-2")))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/certificadostributarios"))
            .and(query_param("marker", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_xml(second, "")))
            .mount(&server)
            .await;

        let store = store_for(&server.uri());
        let objects = store.list_objects(None).await.expect("listing succeeds");

        let keys: Vec<&str> = objects.iter().map(|object| object.key.as_str()).collect();
        assert_eq!(keys, ["900123456/a.pdf", "900123456/b.pdf"]);
    }

    #[tokio::test]
    async fn empty_container_yields_no_objects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/certificadostributarios"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_xml("", "")))
            .mount(&server)
            .await;

        let store = store_for(&server.uri());
        let objects = store.list_objects(None).await.expect("listing succeeds");
        assert!(objects.is_empty());
    }

    #[tokio::test]
    async fn forbidden_maps_to_denied() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/certificadostributarios"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let store = store_for(&server.uri());
        let error = store.list_objects(None).await.expect_err("must fail");
        assert!(matches!(error, StorageError::Denied { status: 403 }));
    }

    #[tokio::test]
    async fn unexpected_status_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/certificadostributarios"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let store = store_for(&server.uri());
        let error = store.list_objects(None).await.expect_err("must fail");
        match error {
            StorageError::Api { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_body_maps_to_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/certificadostributarios"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<?xml version=\"1.0\"?><EnumerationResults><Blobs>"),
            )
            .mount(&server)
            .await;

        let store = store_for(&server.uri());
        let error = store.list_objects(None).await.expect_err("must fail");
        assert!(matches!(error, StorageError::Decode { .. }));
    }

    #[tokio::test]
    async fn connection_refused_maps_to_unreachable() {
        // Nothing listens on the discard port.
        let store = store_for("http://127.0.0.1:9");
        let error = store.list_objects(None).await.expect_err("must fail");
        assert!(matches!(error, StorageError::Unreachable { .. }));
    }

    #[tokio::test]
    async fn slow_store_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/certificadostributarios"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(listing_xml("", ""))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let mut config = test_config(&server.uri());
        config.timeout = Duration::from_millis(200);
        let store = AzureBlobStore::from_config(&config)
            .expect("client builds")
            .expect("credentials present");

        let error = store.list_objects(None).await.expect_err("must time out");
        assert!(matches!(error, StorageError::Timeout));
    }

    #[test]
    fn parses_rfc1123_timestamps() {
        let parsed = parse_blob_timestamp("Thu, 01 Aug 2024 10:00:00 GMT").expect("parses");
        assert_eq!(parsed.to_rfc3339(), "2024-08-01T10:00:00+00:00");
        assert!(parse_blob_timestamp("yesterday").is_none());
    }
}
