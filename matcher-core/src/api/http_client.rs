//! REST adapter for the matching service.
//!
//! One request per call, no retries: a failed upload or analysis is retried
//! by the user, not by the client.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::{MatchRequest, MatcherApi};
use crate::config::ClientConfig;
use crate::document::Document;
use crate::error::{ApiError, MatcherError, Result};
use crate::model::{FileKind, MatchResponse, UploadedFile};

/// Multipart field carrying the document.
const FILE_FIELD: &str = "file";

const ANALYZE_PATH: &str = "match/analyze";
const HEALTH_PATH: &str = "match/health";

/// HTTP client for the matching service.
pub struct HttpMatcherApi {
    client: Client,
    config: ClientConfig,
}

impl HttpMatcherApi {
    /// Create a client for the service described by `config`.
    #[instrument(level = "debug", skip_all, fields(base_url = %config.base_url))]
    pub fn new(config: ClientConfig) -> Result<Self> {
        // Fail on a bad base URL now rather than on the first call
        config.endpoint(HEALTH_PATH)?;

        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            warn!(error = %e, "Failed to create HTTP client");
            MatcherError::Config(format!("Failed to create HTTP client: {e}"))
        })?;

        debug!("Matcher HTTP client created");
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> std::result::Result<reqwest::Url, ApiError> {
        self.config
            .endpoint(path)
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<Response, ApiError> {
        let start = Instant::now();
        let response = request.send().await.map_err(|e| {
            warn!(
                error = %e,
                latency_ms = start.elapsed().as_millis() as u64,
                "Request did not complete"
            );
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        debug!(
            status = %status,
            latency_ms = start.elapsed().as_millis() as u64,
            "Received HTTP response"
        );

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            warn!(status = %status, detail = ?detail, "Service rejected request");
            Err(ApiError::Rejected {
                status: status.as_u16(),
                detail,
            })
        }
    }
}

/// Decode a JSON success body.
async fn decode<T: DeserializeOwned>(response: Response) -> std::result::Result<T, ApiError> {
    let body = response
        .bytes()
        .await
        .map_err(|e| ApiError::Network(format!("Failed to read response body: {e}")))?;
    serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Failed to parse JSON response");
        ApiError::InvalidResponse(e.to_string())
    })
}

/// Pull a human-readable `detail` out of an error body.
///
/// Only a string detail is used; validation errors carry a list there, which
/// is not fit for display.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")?
        .as_str()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl MatcherApi for HttpMatcherApi {
    #[instrument(
        level = "info",
        skip(self, document),
        fields(filename = %document.filename, bytes = document.len())
    )]
    async fn upload(
        &self,
        kind: FileKind,
        document: &Document,
    ) -> std::result::Result<UploadedFile, ApiError> {
        let url = self.url(kind.upload_path())?;
        let part = Part::bytes(document.bytes.clone())
            .file_name(document.filename.clone())
            .mime_str(document.mime_type())
            .map_err(|e| ApiError::Network(format!("Invalid MIME type: {e}")))?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self.send(self.client.post(url).multipart(form)).await?;
        let uploaded: UploadedFile = decode(response).await?;

        if uploaded.kind != kind {
            warn!(
                expected = kind.as_wire(),
                actual = uploaded.kind.as_wire(),
                "Service filed the document under another kind"
            );
            return Err(ApiError::InvalidResponse(format!(
                "expected file_type '{}', got '{}'",
                kind.as_wire(),
                uploaded.kind.as_wire()
            )));
        }

        info!(file_id = %uploaded.file_id, "Document uploaded");
        Ok(uploaded)
    }

    #[instrument(
        level = "info",
        skip(self),
        fields(resume_id = %request.resume_id, job_id = %request.job_id)
    )]
    async fn analyze(&self, request: &MatchRequest) -> std::result::Result<MatchResponse, ApiError> {
        let url = self.url(ANALYZE_PATH)?;
        let response = self.send(self.client.post(url).json(request)).await?;
        let matched: MatchResponse = decode(response).await?;

        matched.results.validate().map_err(|reason| {
            warn!(%reason, "Service returned an inconsistent match result");
            ApiError::InvalidResponse(reason)
        })?;

        info!(
            match_score = matched.results.match_score,
            matched = matched.results.matched_skills.len(),
            missing = matched.results.missing_skills.len(),
            "Match analysis completed"
        );
        Ok(matched)
    }

    #[instrument(level = "debug", skip(self))]
    async fn health(&self) -> std::result::Result<serde_json::Value, ApiError> {
        let url = self.url(HEALTH_PATH)?;
        let response = self.send(self.client.get(url)).await?;
        decode(response).await
    }
}
