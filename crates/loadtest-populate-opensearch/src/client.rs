//! HTTP access to an OpenSearch-compatible store.
//!
//! [`SearchBackend`] is the seam between the populate/scroll logic and the
//! network. [`HttpSearchClient`] is the reqwest implementation; tests swap in
//! an in-memory recorder.

use crate::error::TransportError;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Keep-alive passed with every scroll request.
pub const SCROLL_KEEP_ALIVE: &str = "1m";

/// Timeout for everything except bulk uploads.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(240);

/// Default timeout for one bulk upload.
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`HttpSearchClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL, e.g. `http://localhost:9200`.
    pub url: String,
    pub index_name: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// PEM client certificate.
    pub client_cert: Option<PathBuf>,
    /// PEM private key matching `client_cert`.
    pub client_key: Option<PathBuf>,
    /// Reject invalid server certificates.
    pub validate_cert: bool,
    pub request_timeout: Duration,
    pub upload_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            index_name: "test".to_string(),
            username: None,
            password: None,
            client_cert: None,
            client_key: None,
            validate_cert: true,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
        }
    }
}

/// Shard and replica counts for index creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSettings {
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            number_of_shards: 1,
            number_of_replicas: 1,
        }
    }
}

impl IndexSettings {
    /// Request body for index creation.
    pub fn to_body(&self) -> Value {
        json!({
            "settings": {
                "index": {
                    "number_of_shards": self.number_of_shards,
                    "number_of_replicas": self.number_of_replicas,
                }
            }
        })
    }
}

/// Outcome of one bulk request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BulkResponse {
    /// Server-side time in milliseconds.
    pub took: u64,
    /// True when at least one item in the batch was rejected.
    pub errors: bool,
}

/// One page of a search or scroll response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub scroll_id: Option<String>,
    /// Server-side time in milliseconds.
    pub took: u64,
    /// `hits.total.value`, when the store reports it.
    pub total_hits: Option<u64>,
    /// Number of hits returned in this page.
    pub hit_count: usize,
}

impl SearchPage {
    /// Extract the fields we track from a raw search response.
    pub fn from_response(body: &Value) -> Result<Self, TransportError> {
        let took = body
            .get("took")
            .and_then(Value::as_u64)
            .ok_or(TransportError::MissingField("took"))?;
        let hits = body.get("hits");
        let total_hits = hits
            .and_then(|h| h.get("total"))
            .and_then(|t| t.get("value").or(Some(t)))
            .and_then(Value::as_u64);
        let hit_count = hits
            .and_then(|h| h.get("hits"))
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let scroll_id = body
            .get("_scroll_id")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            scroll_id,
            took,
            total_hits,
            hit_count,
        })
    }
}

/// Operations the populate and query drivers need from the store.
///
/// Every call is a single request; implementations never retry.
#[async_trait::async_trait]
pub trait SearchBackend: Send + Sync {
    /// Index the requests target.
    fn index_name(&self) -> &str;

    /// Send one NDJSON bulk body.
    async fn bulk(&self, body: String) -> Result<BulkResponse, TransportError>;

    /// Create the index with the given settings.
    async fn create_index(&self, settings: &IndexSettings) -> Result<Value, TransportError>;

    /// Delete the index.
    async fn delete_index(&self) -> Result<Value, TransportError>;

    /// Set `index.refresh_interval`, e.g. `-1` or `1s`.
    async fn set_refresh_interval(&self, interval: &str) -> Result<(), TransportError>;

    /// Run the initial search of a scroll.
    async fn open_scroll(&self, query: &Value) -> Result<SearchPage, TransportError>;

    /// Exchange a cursor for the next page.
    async fn next_scroll(&self, scroll_id: &str) -> Result<SearchPage, TransportError>;

    /// Release a cursor.
    async fn clear_scroll(&self, scroll_id: &str) -> Result<(), TransportError>;

    /// Run a one-shot search with the query forwarded as-is.
    async fn search(&self, query: &Value) -> Result<SearchPage, TransportError>;
}

/// reqwest-backed [`SearchBackend`].
pub struct HttpSearchClient {
    client: reqwest::Client,
    base_url: String,
    index_name: String,
    username: Option<String>,
    password: Option<String>,
    request_timeout: Duration,
    upload_timeout: Duration,
}

impl HttpSearchClient {
    /// Build a client, loading TLS material if configured.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let mut builder =
            reqwest::Client::builder().danger_accept_invalid_certs(!config.validate_cert);

        if let (Some(cert), Some(key)) = (&config.client_cert, &config.client_key) {
            let mut pem = std::fs::read(cert)?;
            pem.push(b'\n');
            pem.extend(std::fs::read(key)?);
            builder = builder.identity(reqwest::Identity::from_pem(&pem)?);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.url.trim_end_matches('/').to_string(),
            index_name: config.index_name,
            username: config.username,
            password: config.password,
            request_timeout: config.request_timeout,
            upload_timeout: config.upload_timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, self.url(path))
            .timeout(self.request_timeout);
        match &self.username {
            Some(user) => builder.basic_auth(user, self.password.as_deref()),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Value, TransportError> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!("Response {}: {} bytes", status, text.len());

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait::async_trait]
impl SearchBackend for HttpSearchClient {
    fn index_name(&self) -> &str {
        &self.index_name
    }

    async fn bulk(&self, body: String) -> Result<BulkResponse, TransportError> {
        let request = self
            .request(reqwest::Method::POST, "/_bulk")
            .timeout(self.upload_timeout)
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body);
        let value = self.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn create_index(&self, settings: &IndexSettings) -> Result<Value, TransportError> {
        let path = format!("/{}", self.index_name);
        self.send(
            self.request(reqwest::Method::PUT, &path)
                .json(&settings.to_body()),
        )
        .await
    }

    async fn delete_index(&self) -> Result<Value, TransportError> {
        let path = format!("/{}", self.index_name);
        self.send(self.request(reqwest::Method::DELETE, &path)).await
    }

    async fn set_refresh_interval(&self, interval: &str) -> Result<(), TransportError> {
        let path = format!("/{}/_settings", self.index_name);
        let body = json!({ "index": { "refresh_interval": interval } });
        self.send(self.request(reqwest::Method::PUT, &path).json(&body))
            .await?;
        Ok(())
    }

    async fn open_scroll(&self, query: &Value) -> Result<SearchPage, TransportError> {
        let path = format!(
            "/{}/_search?scroll={}&request_cache=false",
            self.index_name, SCROLL_KEEP_ALIVE
        );
        let value = self
            .send(self.request(reqwest::Method::POST, &path).json(query))
            .await?;
        SearchPage::from_response(&value)
    }

    async fn next_scroll(&self, scroll_id: &str) -> Result<SearchPage, TransportError> {
        let body = json!({ "scroll": SCROLL_KEEP_ALIVE, "scroll_id": scroll_id });
        let value = self
            .send(
                self.request(reqwest::Method::POST, "/_search/scroll")
                    .json(&body),
            )
            .await?;
        SearchPage::from_response(&value)
    }

    async fn clear_scroll(&self, scroll_id: &str) -> Result<(), TransportError> {
        let body = json!({ "scroll_id": scroll_id });
        self.send(
            self.request(reqwest::Method::DELETE, "/_search/scroll")
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn search(&self, query: &Value) -> Result<SearchPage, TransportError> {
        let path = format!("/{}/_search?request_cache=false", self.index_name);
        let value = self
            .send(self.request(reqwest::Method::POST, &path).json(query))
            .await?;
        SearchPage::from_response(&value)
    }
}
