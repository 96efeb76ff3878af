use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Instant;

use crate::core::error::ApiError;
use crate::infra::config::ApiConfig;
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::{make_http_client, make_http_client_with};

/// What a tool handler may use from its host: header construction and
/// GET/POST against the agent-memory API. Shared read-only across calls.
#[async_trait]
pub trait ServerContext: Send + Sync {
    fn api_headers(&self) -> HeaderMap;
    async fn get(&self, path: &str, headers: HeaderMap) -> Result<Value, ApiError>;
    async fn post(&self, path: &str, body: &Value, headers: HeaderMap) -> Result<Value, ApiError>;
}

/// Percent-encode a single path segment, e.g. an agent id.
pub fn encode_segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

#[derive(Clone)]
pub struct MemoryApiClient {
    base: Option<String>,
    password: Option<String>,
    http: Client,
}

impl MemoryApiClient {
    /// `base` is the versioned API root, e.g. `http://localhost:8283/v1`.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: Some(base.into()),
            password: None,
            http: make_http_client(),
        }
    }

    pub fn from_config(cfg: &ApiConfig) -> Self {
        if cfg.api_root().is_none() {
            tracing::warn!("LETTA_BASE_URL not configured; memory tools will report errors");
        }
        Self {
            base: cfg.api_root(),
            password: cfg.password.clone(),
            http: make_http_client_with(cfg),
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    fn url(&self, path: &str) -> Result<String, ApiError> {
        let base = self.base.as_deref().ok_or_else(|| {
            ApiError::transport("LETTA_BASE_URL not configured; set it to enable memory tools")
        })?;
        Ok(format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/')))
    }

    async fn send(&self, op: &'static str, builder: RequestBuilder) -> Result<Value, ApiError> {
        let (builder, rid) = add_standard_headers(builder, None);
        let start = Instant::now();
        let res = dispatch(builder).await;
        let metric_key = format!("memory_api.{op}");
        match &res {
            Ok(_) => {
                let elapsed_ms = start.elapsed().as_millis() as f64;
                crate::infra::logging::log_metric(&metric_key, "remote_latency_ms", elapsed_ms);
            }
            Err(e) => {
                tracing::debug!(request_id = %rid, status = ?e.status, error = %e, "memory api call failed");
                crate::infra::logging::log_metric(&metric_key, "remote_error_total", 1.0);
            }
        }
        res
    }
}

async fn dispatch(builder: RequestBuilder) -> Result<Value, ApiError> {
    let resp = builder.send().await?;
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        return Err(ApiError::status(status.as_u16(), error_body(&bytes)));
    }
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::transport(format!("invalid JSON from upstream: {e}")))
}

// Non-JSON error bodies are kept as a plain string so 422 details survive.
fn error_body(bytes: &[u8]) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes)
        .ok()
        .or_else(|| Some(Value::String(String::from_utf8_lossy(bytes).into_owned())))
}

#[async_trait]
impl ServerContext for MemoryApiClient {
    fn api_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(pw) = self.password.as_deref() {
            if let Ok(v) = HeaderValue::from_str(&format!("Bearer {pw}")) {
                headers.insert(AUTHORIZATION, v);
            }
            if let Ok(v) = HeaderValue::from_str(&format!("password {pw}")) {
                headers.insert(HeaderName::from_static("x-bare-password"), v);
            }
        }
        headers
    }

    async fn get(&self, path: &str, headers: HeaderMap) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        tracing::debug!(endpoint = %url, "memory_api.get request");
        self.send("get", self.http.get(url).headers(headers)).await
    }

    async fn post(&self, path: &str, body: &Value, headers: HeaderMap) -> Result<Value, ApiError> {
        let url = self.url(path)?;
        tracing::debug!(endpoint = %url, "memory_api.post request");
        self.send("post", self.http.post(url).headers(headers).json(body)).await
    }
}
