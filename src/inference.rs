/// Client for the remote inference service
///
/// The service is an opaque collaborator: it takes one image as multipart form
/// data and answers with an annotated image. No retries, no timeouts.
use bytes::Bytes;
use hyper::ext::ReasonPhrase;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use std::time::Instant;
use url::Url;

use crate::config::Settings;
use crate::error::DetectError;
use crate::media;
use crate::state::ResultImage;

/// Uploads images and collects the annotated result
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    field_name: String,
    upload_file_name: String,
}

impl InferenceClient {
    /// Create a client using the multipart naming from the settings
    pub fn new(settings: &Settings) -> Result<Self, DetectError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DetectError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            field_name: settings.field_name.clone(),
            upload_file_name: settings.upload_file_name.clone(),
        })
    }

    /// POST one image to `endpoint` and return the response body as the result image
    pub async fn detect(
        &self,
        endpoint: Url,
        image: Bytes,
        media_type: &str,
    ) -> Result<ResultImage, DetectError> {
        let started = Instant::now();
        tracing::info!(
            "🔬 Uploading {} ({}) to {}",
            self.upload_file_name,
            media::human_size(image.len()),
            endpoint
        );

        let len = image.len() as u64;
        let part = Part::stream_with_length(image, len)
            .file_name(self.upload_file_name.clone())
            .mime_str(media_type)
            .map_err(|e| DetectError::Transport(e.to_string()))?;
        let form = Form::new().part(self.field_name.clone(), part);

        let response = self
            .http
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("⚠️  Request failed: {}", e);
                DetectError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = reason_phrase(&response);
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("⚠️  Inference service answered {} {}: {}", status.as_u16(), reason, body);

            return Err(DetectError::Status {
                code: status.as_u16(),
                reason,
                detail: error_detail(&body),
            });
        }

        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| DetectError::Transport(e.to_string()))?;

        if body.is_empty() {
            tracing::warn!("⚠️  Inference service answered {} with an empty body", status);
            return Err(DetectError::EmptyBody);
        }

        let elapsed = started.elapsed();
        tracing::info!(
            "✅ Received {} in {:?} ({})",
            media::human_size(body.len()),
            elapsed,
            status
        );

        Ok(ResultImage::new(body, media_type, elapsed))
    }
}

/// Reason phrase the server actually sent, falling back to the canonical one.
///
/// hyper only records the phrase when it differs from the canonical reason.
fn reason_phrase(response: &reqwest::Response) -> String {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
        .or_else(|| response.status().canonical_reason())
        .unwrap_or("Unknown")
        .to_string()
}

/// Pull the `detail` message out of a FastAPI-style error document
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
