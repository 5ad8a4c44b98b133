// HTTP transport for the multiMATIC API.
//
// One `Transport` = one reqwest client with one cookie jar, i.e. one
// logical session. A single `send` is a single attempt: retries live in
// the executor, not here.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;

/// Production endpoint of the multiMATIC mobile API.
pub const DEFAULT_BASE_URL: &str = "https://smart.vaillant.com/mobile/api/v4/";

const USER_AGENT: &str = concat!("multimatic/", env!("CARGO_PKG_VERSION"));

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the bundled web PKI roots.
    #[default]
    System,
    /// Trust an additional CA certificate from the given PEM file.
    CustomCa(PathBuf),
}

/// Settings used to build the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub cookie_jar: Arc<Jar>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            cookie_jar: Arc::new(Jar::default()),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` that keeps session cookies in this config's jar.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .cookie_provider(Arc::clone(&self.cookie_jar));

        if let TlsMode::CustomCa(path) = &self.tls {
            let cert_pem = std::fs::read(path)
                .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
            let cert = reqwest::Certificate::from_pem(&cert_pem)
                .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
            builder = builder.add_root_certificate(cert);
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// One logical request: a path relative to the API base, a method and an
/// optional JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub payload: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            payload: None,
        }
    }

    pub fn post(path: impl Into<String>, payload: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            payload: Some(payload),
        }
    }

    pub fn put(path: impl Into<String>, payload: Value) -> Self {
        Self {
            method: Method::PUT,
            path: path.into(),
            payload: Some(payload),
        }
    }
}

/// A successful (HTTP 200) response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON document; `Value::Null` for an empty body, a JSON
    /// string for a body that is not JSON.
    pub json: Value,
}

impl ApiResponse {
    /// The `body` member every multiMATIC response wraps its payload in.
    pub fn body(&self) -> Option<&Value> {
        self.json.get("body").filter(|v| !v.is_null())
    }

    pub fn into_body(self) -> Option<Value> {
        match self.json {
            Value::Object(mut map) => map.remove("body").filter(|v| !v.is_null()),
            _ => None,
        }
    }
}

/// Raw single-attempt HTTP access to the API.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
}

impl Transport {
    pub fn new(base_url: Url, config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self::with_client(config.build_client()?, base_url))
    }

    /// Use a pre-built client, e.g. one that already shares a cookie jar.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API-relative path against the base URL.
    ///
    /// Paths may or may not start with `/`; both resolve below the base
    /// path (`/facilities` → `{base}/facilities`).
    pub fn url_for(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Perform exactly one attempt. Anything but HTTP 200 is an error.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, Error> {
        let url = self.url_for(&request.path)?;
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self.http.request(request.method.clone(), url);
        if let Some(payload) = &request.payload {
            builder = builder.json(payload);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Status {
                status: status.as_u16(),
                path: request.path.clone(),
            });
        }

        let text = resp.text().await?;
        let json = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or_else(|e| {
                trace!(error = %e, path = %request.path, "response body is not JSON");
                Value::String(text)
            })
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            json,
        })
    }
}
