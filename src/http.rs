//! HTTP Module
//!
//! The single request pipeline every backend call goes through. Every outcome,
//! including transport failures, resolves to an [`ApiResult`].

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::config::Config;
use crate::token_store::TokenStore;

pub const API_PREFIX: &str = "/api/v1";

pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error - please check your connection";

/// Called when the backend answers 401
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self);
}

/// Successful response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T = Value> {
    pub data: T,
    pub status_code: u16,
}

impl<T> ApiResponse<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            data: f(self.data),
            status_code: self.status_code,
        }
    }
}

/// Failed request, classified by where it failed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Rejected client-side before any request was built
    #[error("{0}")]
    Validation(String),

    /// The request could not be built or sent
    #[error("{0}")]
    Request(String),

    /// Sent, but no response arrived
    #[error("Network error - please check your connection")]
    Network,

    #[error("Authentication failed")]
    Unauthorized,

    /// The backend answered with an error status
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The backend answered successfully with an unexpected shape
    #[error("Unexpected response: {message}")]
    Decode { status: u16, message: String },
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(StatusCode::UNAUTHORIZED.as_u16()),
            ApiError::Server { status, .. } | ApiError::Decode { status, .. } => Some(*status),
            ApiError::Validation(_) | ApiError::Request(_) | ApiError::Network => None,
        }
    }
}

pub type ApiResult<T = Value> = Result<ApiResponse<T>, ApiError>;

/// Flat view of an [`ApiResult`] for front ends:
/// `{success, data, error, statusCode}`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub status_code: Option<u16>,
}

impl<T> Outcome<T> {
    pub fn failure(error: ApiError) -> Self {
        Self::from(Err::<ApiResponse<T>, _>(error))
    }
}

impl<T> From<ApiResult<T>> for Outcome<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(response) => Outcome {
                success: true,
                data: Some(response.data),
                error: None,
                status_code: Some(response.status_code),
            },
            Err(e) => Outcome {
                success: false,
                data: None,
                status_code: e.status_code(),
                error: Some(e.to_string()),
            },
        }
    }
}

/// Outgoing body
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(reqwest::multipart::Form),
}

/// Pre-configured HTTP pipeline
#[derive(Clone)]
pub struct HttpClient {
    api_root: String,
    client: reqwest::Client,
    tokens: TokenStore,
    unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

impl HttpClient {
    pub fn new(config: &Config, tokens: TokenStore) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_root: format!("{}{}", config.backend_base_url.trim_end_matches('/'), API_PREFIX),
            client,
            tokens,
            unauthorized: None,
        })
    }

    /// Install the hook that ends the session on 401
    pub fn with_unauthorized_handler(mut self, handler: Arc<dyn UnauthorizedHandler>) -> Self {
        self.unauthorized = Some(handler);
        self
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Build, send and normalize one request. `path` is relative to `/api/v1`.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
        extra_headers: HeaderMap,
    ) -> ApiResult {
        let url = format!("{}{}", self.api_root, path);

        let mut builder = self.client.request(method.clone(), &url).headers(extra_headers);
        if let Some(token) = self.tokens.get() {
            builder = builder.bearer_auth(token);
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(value.to_string()),
            RequestBody::Multipart(form) => builder.multipart(form),
        };

        let request = builder.build().map_err(|e| {
            warn!("{} {} could not be built: {}", method, path, e);
            ApiError::Request(e.to_string())
        })?;

        let started = Instant::now();
        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) if e.is_builder() => {
                warn!("{} {} could not be sent: {}", method, path, e);
                return Err(ApiError::Request(e.to_string()));
            }
            Err(e) => {
                warn!("{} {} failed after {:?}: {}", method, path, started.elapsed(), e);
                return Err(ApiError::Network);
            }
        };

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            warn!("{} {} body read failed: {}", method, path, e);
            ApiError::Network
        })?;
        debug!(
            "{} {} -> {} in {}ms",
            method,
            path,
            status.as_u16(),
            started.elapsed().as_millis()
        );

        let data = parse_body(&bytes);

        if status.is_success() {
            return Ok(ApiResponse {
                data,
                status_code: status.as_u16(),
            });
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("{} {} returned 401, ending session", method, path);
            if let Some(handler) = &self.unauthorized {
                handler.on_unauthorized();
            } else {
                self.tokens.remove();
            }
            return Err(ApiError::Unauthorized);
        }

        let message = error_message(&data, status);
        debug!("{} {} error: {}", method, path, message);
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

/// An empty body reads as `""` so a success always carries data.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::String(String::new());
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Human-readable message for an error response: the envelope's
/// `customerMessage`, then a plain `message`, then the bare status.
pub fn error_message(body: &Value, status: StatusCode) -> String {
    let non_empty = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    non_empty(body.pointer("/headers/customerMessage"))
        .or_else(|| non_empty(body.get("message")))
        .unwrap_or_else(|| format!("HTTP {} error", status.as_u16()))
}
