//! Thin HTTP client for the club's JSON REST API.
//!
//! One shared [`reqwest::Client`] issues every request. Non-success
//! responses are normalized into [`ApiError::Request`] by reading the
//! server's `{"message": ...}` error body; everything else the transport
//! can do wrong collapses into the other two [`ApiError`] variants. A
//! failed attempt is surfaced to the caller as-is, never retried.

use std::time::Duration;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::config::ApiConfig;

/// Shape of the error body the API sends on non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Client for API-relative JSON requests.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from the API section of the configuration.
    pub fn new(config: &ApiConfig) -> Self {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL requests are resolved against (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request and decode the JSON response body as `T`.
    ///
    /// `path` must be a non-empty API-relative string starting with `/`.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, body).await?;
        Ok(response.json::<T>().await?)
    }

    /// Issue a request and discard the response body (DELETE and friends).
    pub async fn request_empty<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send(method, path, body).await?;
        Ok(())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request_empty::<()>(Method::DELETE, path, None).await
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        debug_assert!(
            !path.is_empty() && path.starts_with('/'),
            "api paths are non-empty and API-relative"
        );

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, path, "api request");

        let mut builder = self.http.request(method, &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let err = match response.bytes().await {
            Ok(bytes) => error_from_body(status.as_u16(), &bytes),
            Err(_) => ApiError::request_with_status(status.as_u16()),
        };
        tracing::warn!(path, status = status.as_u16(), error = %err, "api request failed");
        Err(err)
    }
}

/// Turn a non-success response body into a `Request` error, falling back
/// to the generic message when the body is not `{"message": ...}`.
fn error_from_body(status: u16, body: &[u8]) -> ApiError {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) if !parsed.message.is_empty() => ApiError::Request {
            status,
            message: parsed.message,
        },
        _ => ApiError::request_with_status(status),
    }
}
