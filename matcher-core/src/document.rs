//! Documents selected for upload and their local admission checks.
//!
//! A document is checked before any network call: it must be a PDF or a
//! DOCX (by declared MIME type, or by extension when no type is declared),
//! non-empty, and no larger than the configured limit.

use std::path::Path;

use tracing::debug;

use crate::error::{MatcherError, Result};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// MIME types the service accepts.
pub const ACCEPTED_MIME_TYPES: &[&str] = &[PDF_MIME, DOCX_MIME];

/// Default max document size in bytes (50 MB, the service limit).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Raw file content picked by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    /// Declared MIME type, when the source provides one.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl Document {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a document from disk; the MIME type is inferred from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();
        let content_type = mime_from_extension(&filename).map(str::to_string);
        debug!(filename = %filename, bytes = bytes.len(), content_type = ?content_type, "Loaded document");
        Ok(Self {
            filename,
            content_type,
            bytes,
        })
    }

    /// MIME type sent with the upload: the declared one, else the inferred one.
    pub fn mime_type(&self) -> &str {
        self.content_type
            .as_deref()
            .or_else(|| mime_from_extension(&self.filename))
            .unwrap_or("application/octet-stream")
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Map a filename's extension to an accepted MIME type.
pub fn mime_from_extension(filename: &str) -> Option<&'static str> {
    let ext = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some(PDF_MIME),
        "docx" => Some(DOCX_MIME),
        _ => None,
    }
}

/// Validates the declared type, or the extension when no type is declared.
pub fn validate_type(document: &Document) -> Result<()> {
    let accepted = match document.content_type.as_deref() {
        Some(ct) => {
            let essence = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
            ACCEPTED_MIME_TYPES.contains(&essence.as_str())
        }
        None => mime_from_extension(&document.filename).is_some(),
    };

    if accepted {
        Ok(())
    } else {
        Err(MatcherError::Validation(format!(
            "Unsupported file type for '{}'. Please upload a PDF or DOCX file",
            document.filename
        )))
    }
}

/// Validates the size of a document against `max_bytes`.
pub fn validate_size(document: &Document, max_bytes: usize) -> Result<()> {
    if document.is_empty() {
        return Err(MatcherError::Validation(format!(
            "File '{}' is empty",
            document.filename
        )));
    }
    if document.len() > max_bytes {
        let max_mb = max_bytes / (1024 * 1024);
        let actual_mb = document.len() / (1024 * 1024);
        return Err(MatcherError::Validation(format!(
            "File too large: {actual_mb} MB exceeds maximum of {max_mb} MB"
        )));
    }
    Ok(())
}

/// All local checks, in the order they are reported.
pub fn validate(document: &Document, max_bytes: usize) -> Result<()> {
    validate_type(document)?;
    validate_size(document, max_bytes)
}
