//! HTTP client for the EmailListChecker API.

use std::path::Path;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::ClientConfig,
    errors::classify,
    types::{
        decode_envelope, BatchJob, BatchJobID, BatchRequest, BatchResults, CompanySearchRequest,
        DomainSearchRequest, FindEmailRequest, JsonObject, VerifyRequest, VerifyResult,
    },
    Error,
};

/// Sent as `User-Agent` on every request.
pub const USER_AGENT: &str = concat!("EmailListChecker-Rust/", env!("CARGO_PKG_VERSION"));

/// Client for the EmailListChecker API.
///
/// Every method performs exactly one HTTP round trip. No retries are made;
/// rate limits surface as [`Error::RateLimit`] with the server's back-off
/// hint. Cloning is cheap and clones share one connection pool, so a client
/// can be used from several tasks at once.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    /// Base URL without a trailing slash.
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// A buffered success response.
struct RawResponse {
    path: String,
    headers: HeaderMap,
    body: String,
}

impl RawResponse {
    fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        decode_envelope(&self.body).map_err(|e| {
            tracing::error!(
                "Failed to parse {} response: {} | body: {}",
                self.path,
                e,
                truncate_body(&self.body)
            );
            Error::Serialization(e)
        })
    }

    /// Like [`RawResponse::decode`], but an empty body yields `T::default()`.
    fn decode_or_default<T: DeserializeOwned + Default>(&self) -> Result<T, Error> {
        if self.body.trim().is_empty() {
            return Ok(T::default());
        }
        self.decode()
    }

    fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

impl Client {
    /// Creates a client for the production API.
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Creates a client against a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, api_key: impl Into<String>) -> Result<Self, Error> {
        Self::with_config(ClientConfig::new(api_key).with_base_url(base_url))
    }

    /// Creates a client from `EMAILLISTCHECKER_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Creates a client from an explicit configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self, Error> {
        let base_url = config.normalized_base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Network(e)
            })?;

        Ok(Self {
            http,
            api_key: config.api_key,
            base_url,
            timeout: config.timeout,
        })
    }

    /// Base URL in use, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Timeout applied to each request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.api_key)
    }

    /// Sends the request, buffers the body and splits success from failure.
    async fn execute(&self, req: RequestBuilder, path: &str) -> Result<RawResponse, Error> {
        let resp = req.send().await.map_err(|e| {
            tracing::error!("Request to {} failed: {}", path, e);
            Error::Network(e)
        })?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body from {}: {}", path, e);
            Error::Network(e)
        })?;
        tracing::debug!("{} -> {}", path, status);

        if status.as_u16() >= 400 {
            let err = classify(status, &headers, &body);
            tracing::warn!(
                "Request to {} failed with status {}: {}",
                path,
                status,
                truncate_body(&body)
            );
            return Err(err);
        }

        Ok(RawResponse {
            path: path.to_string(),
            headers,
            body,
        })
    }

    async fn get(&self, path: &str) -> Result<RawResponse, Error> {
        tracing::debug!("GET {}", path);
        self.execute(self.request(Method::GET, path), path).await
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<RawResponse, Error> {
        let payload = serde_json::to_vec(body)?;
        tracing::debug!("POST {}", path);
        let req = self
            .request(Method::POST, path)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        self.execute(req, path).await
    }

    async fn delete(&self, path: &str) -> Result<RawResponse, Error> {
        tracing::debug!("DELETE {}", path);
        self.execute(self.request(Method::DELETE, path), path).await
    }

    /// Verifies a single address.
    ///
    /// `timeout` is the server-side verification budget in seconds, separate
    /// from the HTTP timeout this client enforces.
    pub async fn verify(
        &self,
        email: &str,
        timeout: Option<u32>,
        smtp_check: bool,
    ) -> Result<VerifyResult, Error> {
        let req = VerifyRequest {
            email: email.to_string(),
            timeout,
            smtp_check,
        };
        self.post("/verify", &req).await?.decode_or_default()
    }

    /// Submits a list of addresses as a batch job. The list is not validated locally.
    pub async fn verify_batch<I, S>(
        &self,
        emails: I,
        name: Option<&str>,
        callback_url: Option<&str>,
        auto_start: bool,
    ) -> Result<BatchJob, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let req = BatchRequest {
            emails: emails.into_iter().map(Into::into).collect(),
            name: name.map(str::to_string),
            callback_url: callback_url.map(str::to_string),
            auto_start,
        };
        self.post("/verify/batch", &req).await?.decode_or_default()
    }

    /// Uploads a CSV, TXT or XLSX file as a batch job.
    ///
    /// The file is opened before anything is sent, so an unreadable path
    /// fails with [`Error::Io`] without touching the network. Format and size
    /// limits are enforced by the server.
    pub async fn verify_batch_file(
        &self,
        file_path: impl AsRef<Path>,
        name: Option<&str>,
        callback_url: Option<&str>,
        auto_start: bool,
    ) -> Result<BatchJob, Error> {
        let path = file_path.as_ref();
        let io_err = |source: std::io::Error| Error::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = tokio::fs::File::open(path).await.map_err(io_err)?;
        let len = file.metadata().await.map_err(io_err)?.len();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let part = Part::stream_with_length(reqwest::Body::from(file), len)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        let mut form = Form::new()
            .part("file", part)
            .text("auto_start", auto_start.to_string());
        if let Some(name) = name {
            form = form.text("name", name.to_string());
        }
        if let Some(callback_url) = callback_url {
            form = form.text("callback_url", callback_url.to_string());
        }

        let endpoint = "/verify/batch/upload";
        tracing::debug!("POST {} ({} bytes from {})", endpoint, len, path.display());
        let req = self.request(Method::POST, endpoint).multipart(form);
        self.execute(req, endpoint).await?.decode_or_default()
    }

    /// Fetches the current snapshot of a batch job. Each call is a fresh read.
    pub async fn get_batch_status(&self, batch_id: BatchJobID) -> Result<BatchJob, Error> {
        self.get(&format!("/verify/batch/{}", batch_id))
            .await?
            .decode_or_default()
    }

    /// Downloads the results of a batch job.
    ///
    /// `format` and `filter` are passed to the server as query parameters
    /// without interpretation (e.g. `json`/`csv`, `all`/`valid`). JSON
    /// responses come back as [`BatchResults::Json`], anything else as
    /// [`BatchResults::Text`].
    pub async fn get_batch_results(
        &self,
        batch_id: BatchJobID,
        format: &str,
        filter: &str,
    ) -> Result<BatchResults, Error> {
        let path = format!("/verify/batch/{}/results", batch_id);
        tracing::debug!("GET {} format={} filter={}", path, format, filter);
        let req = self
            .request(Method::GET, &path)
            .query(&[("format", format), ("filter", filter)]);
        let resp = self.execute(req, &path).await?;

        let is_text = resp
            .content_type()
            .map(|ct| !ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(false);
        if is_text {
            return Ok(BatchResults::Text(resp.body));
        }
        Ok(BatchResults::Json(resp.decode_or_default::<Value>()?))
    }

    /// Looks up the likely address of a person at a domain.
    pub async fn find_email(
        &self,
        first_name: &str,
        last_name: &str,
        domain: &str,
    ) -> Result<JsonObject, Error> {
        let req = FindEmailRequest {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            domain: domain.to_string(),
        };
        self.post("/finder/email", &req).await?.decode_or_default()
    }

    /// Lists known addresses and patterns for a domain.
    pub async fn find_by_domain(
        &self,
        domain: &str,
        limit: u32,
        offset: u32,
    ) -> Result<JsonObject, Error> {
        let req = DomainSearchRequest {
            domain: domain.to_string(),
            limit,
            offset,
        };
        self.post("/finder/domain", &req).await?.decode_or_default()
    }

    /// Lists known addresses for a company name.
    pub async fn find_by_company(&self, company: &str, limit: u32) -> Result<JsonObject, Error> {
        let req = CompanySearchRequest {
            company: company.to_string(),
            limit,
        };
        self.post("/finder/company", &req).await?.decode_or_default()
    }

    /// Current credit balance.
    pub async fn get_credits(&self) -> Result<JsonObject, Error> {
        self.get("/credits").await?.decode_or_default()
    }

    /// Usage statistics for the account.
    pub async fn get_usage(&self) -> Result<JsonObject, Error> {
        self.get("/usage").await?.decode_or_default()
    }

    /// All verification lists on the account, in server order.
    pub async fn get_lists(&self) -> Result<Vec<JsonObject>, Error> {
        self.get("/lists").await?.decode_or_default()
    }

    /// Deletes a verification list. Any success status counts, body or not.
    pub async fn delete_list(&self, list_id: u64) -> Result<(), Error> {
        self.delete(&format!("/lists/{}", list_id)).await?;
        Ok(())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = Client::with_base_url("https://x.io/api/", "key").unwrap();
        assert_eq!(client.base_url(), "https://x.io/api");
        assert_eq!(client.url("/verify"), "https://x.io/api/verify");
    }

    #[test]
    fn default_config() {
        let client = Client::new("key").unwrap();
        assert_eq!(client.base_url(), "https://platform.emaillistchecker.io/api/v1");
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn invalid_base_url_fails_construction() {
        assert!(matches!(
            Client::with_base_url("not a url", "key"),
            Err(Error::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn user_agent_names_the_sdk() {
        assert!(USER_AGENT.starts_with("EmailListChecker-Rust/"));
    }

    #[test]
    fn debug_hides_api_key() {
        let client = Client::new("super-secret").unwrap();
        assert!(!format!("{:?}", client).contains("super-secret"));
    }

    #[test]
    fn client_is_shareable_across_tasks() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<Client>();
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let short = "hello";
        assert_eq!(truncate_body(short), "hello");

        let long = "é".repeat(1500);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("...[truncated]"));
        assert!(truncated.len() <= 2000 + "...[truncated]".len());
    }
}
