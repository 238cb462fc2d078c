use thiserror::Error;

use crate::model::FileKind;

/// Fallback message for a failed upload with no usable server detail.
pub const UPLOAD_FAILED: &str = "Upload failed";

/// Fallback message for a failed analysis with no usable server detail.
pub const MATCH_FAILED: &str = "Matching failed. Please try again.";

/// Message surfaced when analysis is requested before both uploads succeeded.
pub const MISSING_UPLOADS: &str = "Please upload both resume and job description";

/// Which remote operation a network failure interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload(FileKind),
    Analyze,
    Health,
}

impl Operation {
    /// Generic user-facing message for this operation.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::Upload(_) => UPLOAD_FAILED,
            Self::Analyze => MATCH_FAILED,
            Self::Health => "Health check failed",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload(kind) => write!(f, "{kind} upload"),
            Self::Analyze => write!(f, "match analysis"),
            Self::Health => write!(f, "health check"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatcherError {
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Upload { kind: FileKind, message: String },

    #[error("{0}")]
    Match(String),

    #[error("Network error during {operation}: {detail}")]
    Network { operation: Operation, detail: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A newer request or a reset replaced this call before it completed.
    #[error("{0} superseded by a newer request")]
    Superseded(Operation),
}

impl MatcherError {
    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Match(msg) => msg.clone(),
            Self::Upload { message, .. } => message.clone(),
            Self::Network { operation, .. } => operation.fallback_message().to_string(),
            Self::Config(_) | Self::Superseded(_) => self.to_string(),
        }
    }

    /// Reduce a transport failure to the taxonomy for `operation`.
    ///
    /// A string `detail` from the server wins; everything else falls back to
    /// the generic message of the operation.
    pub fn from_api(operation: Operation, err: ApiError) -> Self {
        match err {
            ApiError::Network(detail) => Self::Network { operation, detail },
            ApiError::Rejected { detail, .. } => {
                let message = detail.unwrap_or_else(|| operation.fallback_message().to_string());
                Self::remote(operation, message)
            }
            ApiError::InvalidResponse(reason) => {
                tracing::warn!(%operation, %reason, "Discarding malformed response");
                Self::remote(operation, operation.fallback_message().to_string())
            }
        }
    }

    fn remote(operation: Operation, message: String) -> Self {
        match operation {
            Operation::Upload(kind) => Self::Upload { kind, message },
            Operation::Analyze => Self::Match(message),
            Operation::Health => Self::Network {
                operation,
                detail: message,
            },
        }
    }
}

/// Failure reported by a [`crate::api::MatcherApi`] implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The service answered with a non-success status.
    #[error("service returned status {status}{}", detail_suffix(.detail))]
    Rejected { status: u16, detail: Option<String> },

    /// The call did not complete (connect, timeout, body transfer).
    #[error("request did not complete: {0}")]
    Network(String),

    /// The service answered 2xx but the body is unusable.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, MatcherError>;
