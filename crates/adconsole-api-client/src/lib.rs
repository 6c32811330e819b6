//! HTTP client for the ad asset backend.
//!
//! Provides a minimal client with generic GET/JSON/multipart/DELETE helpers
//! that turn non-2xx responses into [`ConsoleError`]s carrying the backend's
//! message, domain methods in [`api`], and the polling [`watch::StatusWatcher`].

pub mod api;
pub mod watch;

use adconsole_core::{ConsoleConfig, ConsoleError, ConsoleResult, ErrorMetadata, LogLevel};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_UPLOAD_PATH: &str = "/assets/upload";

/// HTTP client for the asset backend.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    upload_path: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> ConsoleResult<Self> {
        Self::build(
            base_url.into(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            DEFAULT_UPLOAD_PATH.to_string(),
        )
    }

    pub fn from_config(config: &ConsoleConfig) -> ConsoleResult<Self> {
        Self::build(
            config.api_url.clone(),
            config.request_timeout(),
            config.upload_path.clone(),
        )
    }

    /// Create client from environment: ADCONSOLE_API_URL (or API_URL).
    pub fn from_env() -> ConsoleResult<Self> {
        Self::from_config(&ConsoleConfig::from_env()?)
    }

    fn build(base_url: String, timeout: Duration, upload_path: String) -> ConsoleResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConsoleError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            upload_path,
        })
    }

    /// Use `/assets` (or any other path) for asset uploads.
    pub fn with_upload_path(mut self, path: impl Into<String>) -> Self {
        self.upload_path = path.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn upload_path(&self) -> &str {
        &self.upload_path
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        fallback: &str,
    ) -> ConsoleResult<T> {
        let mut request = self.client.get(self.build_url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = send(request).await?;
        decode_json(check_status(response, fallback).await?).await
    }

    /// Send a JSON body with the given method and deserialize the response.
    pub async fn send_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> ConsoleResult<T> {
        let request = self.client.request(method, self.build_url(path)).json(body);
        let response = send(request).await?;
        decode_json(check_status(response, fallback).await?).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        fallback: &str,
    ) -> ConsoleResult<T> {
        let request = self.client.post(self.build_url(path)).multipart(form);
        let response = send(request).await?;
        decode_json(check_status(response, fallback).await?).await
    }

    /// DELETE request. Deserializes the confirmation body (empty bodies decode
    /// as JSON `null`).
    pub async fn delete<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> ConsoleResult<T> {
        let request = self.client.delete(self.build_url(path));
        let response = send(request).await?;
        decode_json(check_status(response, fallback).await?).await
    }
}

async fn send(request: reqwest::RequestBuilder) -> ConsoleResult<Response> {
    request.send().await.map_err(|e| {
        let error = ConsoleError::Transport(e.to_string());
        log_error(&error, "Request failed before a response was received");
        error
    })
}

/// Pass 2xx responses through; otherwise build an error from the JSON body's
/// `message` (or `error`) field, falling back to `fallback`.
async fn check_status(response: Response, fallback: &str) -> ConsoleResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let error = match error_message_from_body(&body) {
        Some(message) => ConsoleError::Api {
            status: status.as_u16(),
            message,
        },
        None => ConsoleError::Http {
            status: status.as_u16(),
            message: fallback.to_string(),
        },
    };
    log_error(&error, "API request failed");
    Err(error)
}

pub(crate) fn error_message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"].iter().find_map(|key| {
        value
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> ConsoleResult<T> {
    let text = response
        .text()
        .await
        .map_err(|e| ConsoleError::Transport(e.to_string()))?;
    let body = if text.trim().is_empty() { "null" } else { text.as_str() };
    serde_json::from_str(body).map_err(|e| {
        let error = ConsoleError::from(e);
        log_error(&error, "Failed to parse response as JSON");
        error
    })
}

/// Log an error at the level its variant asks for.
pub fn log_error(error: &ConsoleError, message: &str) {
    let error_code = error.error_code();
    let status = error.http_status();
    let recoverable = error.is_recoverable();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_code, status = ?status, recoverable, "{}", message);
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_code, status = ?status, recoverable, "{}", message);
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_code, status = ?status, recoverable, "{}", message);
        }
    }
}

// Re-export domain types for convenience.
pub use api::{AssetListing, DeleteConfirmation, TemplateUploaded, UploadFile};
pub use watch::{AssetSource, AssetState, AssetWatch, StatusWatcher};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_message_field() {
        assert_eq!(
            error_message_from_body(r#"{"message":"File too large","error":"x"}"#).as_deref(),
            Some("File too large")
        );
        assert_eq!(
            error_message_from_body(r#"{"error":"Asset not found"}"#).as_deref(),
            Some("Asset not found")
        );
    }

    #[test]
    fn error_message_absent_for_unusable_bodies() {
        assert_eq!(error_message_from_body(""), None);
        assert_eq!(error_message_from_body("<html>502</html>"), None);
        assert_eq!(error_message_from_body(r#"{"message":"  "}"#), None);
        assert_eq!(error_message_from_body(r#"{"message":42}"#), None);
    }

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:3001/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001/api");
        assert_eq!(client.build_url("/assets"), "http://localhost:3001/api/assets");
        assert_eq!(client.upload_path(), "/assets/upload");
        assert_eq!(client.with_upload_path("/assets").upload_path(), "/assets");
    }
}
