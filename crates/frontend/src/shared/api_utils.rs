//! API utilities for frontend-backend communication
//!
//! Resolves the base URL of the remote API and wraps `gloo-net` requests with
//! JSON encoding, bearer authentication and error mapping.

use gloo_net::http::{Request, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

const BASE_URL_STORAGE_KEY: &str = "api_base_url";
const ACCESS_TOKEN_KEY: &str = "auth_access_token";

/// Errors produced by the gateway layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("сетевая ошибка: {0}")]
    Network(String),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("не удалось разобрать ответ: {0}")]
    Decode(String),
    #[error("не удалось сформировать запрос: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

/// Where the remote API lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Resolve the base URL: build-time `ASSEMBLY_API_URL`, then
    /// `localStorage["api_base_url"]`, then the current host on port 3000.
    pub fn resolve() -> Self {
        if let Some(url) = option_env!("ASSEMBLY_API_URL").filter(|u| !u.trim().is_empty()) {
            return Self::new(url);
        }
        if let Some(url) = read_local_storage(BASE_URL_STORAGE_KEY).filter(|u| !u.trim().is_empty()) {
            return Self::new(url);
        }
        Self::new(location_base())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full API URL from a path
    ///
    /// # Example
    /// ```ignore
    /// let url = config.url("/api/users/12");
    /// ```
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// API base URL from the current window location, using port 3000 for the
/// backend server. Empty string if the window is not available.
fn location_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

fn read_local_storage(key: &str) -> Option<String> {
    web_sys::window()?.local_storage().ok()??.get_item(key).ok()?
}

enum BodyVerb {
    Post,
    Put,
}

/// Thin JSON-over-HTTP client shared by all gateways.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    fn authorize(builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("Accept", "application/json");
        match read_local_storage(ACCESS_TOKEN_KEY) {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = Self::authorize(Request::get(&self.config.url(path)))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, ApiError> {
        self.send_json(BodyVerb::Post, path, body).await
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, ApiError> {
        self.send_json(BodyVerb::Put, path, body).await
    }

    /// POST without a body, response body ignored.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        let response = Self::authorize(Request::post(&self.config.url(path)))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(response).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = Self::authorize(Request::delete(&self.config.url(path)))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(response).await.map(|_| ())
    }

    /// Sends a JSON body. An empty response body yields `Ok(None)`.
    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        verb: BodyVerb,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, ApiError> {
        let url = self.config.url(path);
        let builder = match verb {
            BodyVerb::Post => Request::post(&url),
            BodyVerb::Put => Request::put(&url),
        };
        let response = Self::authorize(builder)
            .json(body)
            .map_err(|e| ApiError::Encode(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let response = check_status(response).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        parse_optional_body(&text)
    }
}

async fn check_status(
    response: gloo_net::http::Response,
) -> Result<gloo_net::http::Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let message = response
        .text()
        .await
        .ok()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| response.status_text());
    Err(ApiError::Status { status, message })
}

fn parse_optional_body<T: DeserializeOwned>(text: &str) -> Result<Option<T>, ApiError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| ApiError::Decode(e.to_string()))
}
