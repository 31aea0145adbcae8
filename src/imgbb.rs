//! ImgBB upload client
//!
//! Wraps the ImgBB HTTP API: takes raw image bytes and returns either
//! the direct URL or a structured failure. Exactly one attempt per
//! call; callers that need resilience must wrap this contract.

use crate::config::UPLOAD_TIMEOUT_SECS;
use reqwest::multipart::{Form, Part};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

/// Fixed multipart filename. ImgBB does not need the real source name.
const UPLOAD_FILE_NAME: &str = "image.jpg";
/// Fixed multipart MIME label, not derived from the actual content.
const UPLOAD_MIME: &str = "image/jpeg";

/// Failure taxonomy for a single upload attempt.
#[derive(Debug, Error)]
pub enum UploadError {
    /// ImgBB explicitly reported failure; the message is safe to show
    /// to the end user.
    #[error("upload API error: {0}")]
    Api(String),
    /// Transport-level failure: DNS, connect, TLS or timeout.
    #[error("network error: {0}")]
    Network(String),
    /// Anything else: error status, malformed payload, missing fields.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Successful upload outcome.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Direct link to the stored image.
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct ImgbbResponse {
    success: Option<bool>,
    data: Option<ImgbbData>,
    error: Option<ImgbbErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ImgbbData {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImgbbErrorBody {
    message: Option<String>,
}

/// Client for the ImgBB upload endpoint.
pub struct ImgbbClient {
    http: HttpClient,
    api_key: String,
    endpoint: String,
}

impl ImgbbClient {
    /// Create a client with the standard 30 s upload timeout.
    #[must_use]
    pub fn new(api_key: String, endpoint: String) -> Self {
        Self::with_timeout(api_key, endpoint, Duration::from_secs(UPLOAD_TIMEOUT_SECS))
    }

    /// Create a client with a custom timeout. Tests use this to keep
    /// the timeout scenario short.
    #[must_use]
    pub fn with_timeout(api_key: String, endpoint: String, timeout: Duration) -> Self {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| HttpClient::new());
        Self {
            http,
            api_key,
            endpoint,
        }
    }

    /// Uploads image bytes and returns the direct URL.
    ///
    /// Issues a single multipart POST with the API key as a query
    /// parameter. No size or format validation happens locally; that is
    /// delegated to the remote service. No retries.
    ///
    /// # Errors
    ///
    /// - [`UploadError::Network`] on transport failure; the low-level
    ///   detail is logged, not surfaced to the user.
    /// - [`UploadError::Api`] when ImgBB answers `success: false`.
    /// - [`UploadError::Unexpected`] for error statuses, malformed
    ///   payloads and an empty input buffer.
    pub async fn upload(&self, image: Vec<u8>) -> Result<UploadedImage, UploadError> {
        if image.is_empty() {
            return Err(UploadError::Unexpected(
                "image payload is empty".to_string(),
            ));
        }

        let part = Part::bytes(image)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(UPLOAD_MIME)
            .map_err(|e| UploadError::Unexpected(format!("invalid multipart mime: {e}")))?;
        let form = Form::new().part("image", part);

        debug!(endpoint = %self.endpoint, "uploading image to ImgBB");

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "transport failure talking to the image host");
                UploadError::Network(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, "failed to read upload response body");
            UploadError::Unexpected(format!("failed to read response body: {e}"))
        })?;

        if !status.is_success() {
            error!(status = %status, body = %body, "upload endpoint returned an error status");
            return Err(UploadError::Unexpected(format!(
                "upload endpoint returned status {status}"
            )));
        }

        let parsed: ImgbbResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, body = %body, "malformed upload response payload");
            UploadError::Unexpected(format!("malformed response payload: {e}"))
        })?;

        let outcome = interpret_response(parsed);
        if let Err(UploadError::Api(reason)) = &outcome {
            error!(reason = %reason, "image host rejected the upload");
        }
        outcome
    }
}

/// Maps a decoded ImgBB payload onto the upload outcome.
///
/// A payload without the `success` field is unexpected rather than an
/// API failure; ImgBB always sets it on well-formed answers.
fn interpret_response(response: ImgbbResponse) -> Result<UploadedImage, UploadError> {
    match response.success {
        Some(true) => response
            .data
            .and_then(|d| d.url)
            .map(|url| UploadedImage { url })
            .ok_or_else(|| UploadError::Unexpected("response is missing data.url".to_string())),
        Some(false) => {
            let message = response
                .error
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            Err(UploadError::Api(message))
        }
        None => Err(UploadError::Unexpected(
            "response is missing the success field".to_string(),
        )),
    }
}
