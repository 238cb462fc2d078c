//! Exit codes following sysexits.h conventions.
//!
//! These codes provide semantic meaning for different failure modes,
//! enabling scripts and CI systems to handle errors appropriately.

use matcher_core::MatcherError;

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// General error (catch-all).
pub const GENERAL_ERROR: i32 = 1;

/// Command line usage error (invalid arguments or configuration).
/// Maps to EX_USAGE from sysexits.h.
pub const USAGE_ERROR: i32 = 64;

/// Data format error (unsupported document, analysis requested too early).
/// Maps to EX_DATAERR from sysexits.h.
pub const VALIDATION_ERROR: i32 = 65;

/// Cannot open input file.
/// Maps to EX_NOINPUT from sysexits.h.
pub const INPUT_ERROR: i32 = 66;

/// Service unavailable or request rejected by the matching service.
/// Maps to EX_UNAVAILABLE from sysexits.h.
pub const SERVICE_ERROR: i32 = 69;

/// Represents an exit code with optional error context.
pub struct ExitCode {
    pub code: i32,
    pub message: Option<String>,
}

impl ExitCode {
    pub const fn success() -> Self {
        Self {
            code: SUCCESS,
            message: None,
        }
    }

    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");

        // Classify by the typed error in the chain, then by message
        let code = match err.chain().find_map(|e| e.downcast_ref::<MatcherError>()) {
            Some(matcher) => Self::classify(matcher),
            None if err.chain().any(|e| e.is::<std::io::Error>())
                || message.contains("Failed to read file") =>
            {
                INPUT_ERROR
            }
            None => GENERAL_ERROR,
        };

        Self {
            code,
            message: Some(message),
        }
    }

    fn classify(err: &MatcherError) -> i32 {
        match err {
            MatcherError::Validation(_) => VALIDATION_ERROR,
            MatcherError::Config(_) => USAGE_ERROR,
            MatcherError::Upload { .. } | MatcherError::Match(_) | MatcherError::Network { .. } => {
                SERVICE_ERROR
            }
            MatcherError::Superseded(_) => GENERAL_ERROR,
        }
    }
}
