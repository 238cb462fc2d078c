//! Transport port to the matching service.
//!
//! The service parses documents and computes scores; this crate only talks to
//! it through [`MatcherApi`]:
//!
//! - **HTTP** - [`HttpMatcherApi`], the REST adapter
//! - **Mock** - [`MockMatcherApi`], in-memory with call accounting
//!
//! ## Quick Start
//!
//! ```no_run
//! use matcher_core::api::{HttpMatcherApi, MatcherApi};
//! use matcher_core::{ClientConfig, Document, FileKind};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = HttpMatcherApi::new(ClientConfig::from_env()?)?;
//! let resume = Document::from_path("resume.pdf".as_ref())?;
//! let uploaded = api.upload(FileKind::Resume, &resume).await?;
//! println!("uploaded as {}", uploaded.file_id);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "network")]
mod http_client;
mod mock;

#[cfg(feature = "network")]
pub use http_client::HttpMatcherApi;
pub use mock::{MockBehavior, MockMatcherApi};

use async_trait::async_trait;
use serde::Serialize;

use crate::document::Document;
use crate::error::ApiError;
use crate::model::{FileKind, MatchResponse, UploadedFile};

/// Body of `POST /match/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRequest {
    pub resume_id: String,
    pub job_id: String,
}

/// Operations offered by the matching service.
///
/// Every call is exactly one outbound request; implementations never retry.
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait MatcherApi: Send + Sync {
    /// Upload one document into the slot named by `kind`.
    async fn upload(&self, kind: FileKind, document: &Document) -> Result<UploadedFile, ApiError>;

    /// Score a previously uploaded resume against a job description.
    async fn analyze(&self, request: &MatchRequest) -> Result<MatchResponse, ApiError>;

    /// Service health document; its shape is not part of the contract.
    async fn health(&self) -> Result<serde_json::Value, ApiError>;
}

#[async_trait]
impl<T: MatcherApi + ?Sized> MatcherApi for std::sync::Arc<T> {
    async fn upload(&self, kind: FileKind, document: &Document) -> Result<UploadedFile, ApiError> {
        (**self).upload(kind, document).await
    }

    async fn analyze(&self, request: &MatchRequest) -> Result<MatchResponse, ApiError> {
        (**self).analyze(request).await
    }

    async fn health(&self) -> Result<serde_json::Value, ApiError> {
        (**self).health().await
    }
}
