//! API client: one method per HTTP verb over [`HttpClient`].

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use crate::http::{ApiError, ApiResult, HttpClient, RequestBody};

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Verb methods, all resolving to [`ApiResult`]
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
}

impl ApiClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn get(&self, path: &str) -> ApiResult {
        self.http
            .send(Method::GET, path, RequestBody::Empty, HeaderMap::new())
            .await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult {
        self.send_json(Method::POST, path, body, HeaderMap::new()).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult {
        self.send_json(Method::PUT, path, body, HeaderMap::new()).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult {
        self.send_json(Method::PATCH, path, body, HeaderMap::new()).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult {
        self.http
            .send(Method::DELETE, path, RequestBody::Empty, HeaderMap::new())
            .await
    }

    /// POST with a fresh `Idempotency-Key` so the backend can drop replays
    pub async fn post_idempotent<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult {
        let key = uuid::Uuid::new_v4().to_string();
        debug!("Idempotency key for {}: {}", path, key);

        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&key).map_err(|e| ApiError::Request(e.to_string()))?;
        headers.insert(HeaderName::from_static("idempotency-key"), value);

        self.send_json(Method::POST, path, body, headers).await
    }

    /// Multipart upload of a single file field
    pub async fn upload(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> ApiResult {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let form = Form::new().part(field.to_string(), part);

        self.http
            .send(Method::POST, path, RequestBody::Multipart(form), HeaderMap::new())
            .await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        headers: HeaderMap,
    ) -> ApiResult {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Request(format!("Failed to encode request: {}", e)))?;
        self.http
            .send(method, path, RequestBody::Json(value), headers)
            .await
    }
}
