//! Data model shared by the sessions, the orchestrator and the report.
//!
//! Field names follow the service's snake_case wire format so the same types
//! are used for decoding responses and for `--format json` output.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which slot a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Resume,
    JobDescription,
}

impl FileKind {
    /// Path segment of the upload endpoint for this kind.
    pub fn upload_path(&self) -> &'static str {
        match self {
            Self::Resume => "upload/resume",
            Self::JobDescription => "upload/job",
        }
    }

    /// Wire value of `file_type` in upload responses.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Resume => "resume",
            Self::JobDescription => "job_description",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resume => write!(f, "resume"),
            Self::JobDescription => write!(f, "job description"),
        }
    }
}

impl std::str::FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "resume" | "cv" => Ok(Self::Resume),
            "job" | "job_description" | "job-description" | "jd" => Ok(Self::JobDescription),
            other => Err(format!(
                "Unknown file kind '{other}' (expected 'resume' or 'job')"
            )),
        }
    }
}

/// A document accepted by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub file_id: String,
    pub filename: String,
    #[serde(rename = "file_type")]
    pub kind: FileKind,
    #[serde(rename = "upload_timestamp", with = "timestamp")]
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub skill: String,
    pub matched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
}

/// Scored outcome of comparing a resume with a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Overall score in `[0, 100]`.
    pub match_score: f64,
    /// Semantic similarity in `[0, 1]`, derived independently of `match_score`.
    pub similarity_score: f64,
    pub matched_skills: Vec<SkillMatch>,
    pub missing_skills: Vec<String>,
    pub experience_match: bool,
    pub education_match: bool,
    pub explanation: String,
    #[serde(rename = "timestamp", with = "timestamp")]
    pub computed_at: DateTime<Utc>,
}

impl MatchResult {
    /// Skills reported as both matched and missing.
    pub fn overlapping_skills(&self) -> Vec<&str> {
        let missing: HashSet<&str> = self.missing_skills.iter().map(String::as_str).collect();
        self.matched_skills
            .iter()
            .map(|m| m.skill.as_str())
            .filter(|skill| missing.contains(skill))
            .collect()
    }

    /// Check the score ranges and the skill partition.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(0.0..=100.0).contains(&self.match_score) {
            return Err(format!("match_score {} outside [0, 100]", self.match_score));
        }
        if !(0.0..=1.0).contains(&self.similarity_score) {
            return Err(format!(
                "similarity_score {} outside [0, 1]",
                self.similarity_score
            ));
        }
        let overlap = self.overlapping_skills();
        if !overlap.is_empty() {
            return Err(format!(
                "skills reported as both matched and missing: {}",
                overlap.join(", ")
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(rename = "resume_id")]
    pub resume_file_id: String,
    #[serde(rename = "job_id")]
    pub job_file_id: String,
    pub results: MatchResult,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Lifecycle of one asynchronous operation.
///
/// One value per owner, so "uploading and succeeded at once" cannot be
/// expressed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OperationState<T> {
    #[default]
    Idle,
    InFlight,
    Succeeded(T),
    Failed(String),
}

impl<T> OperationState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    pub fn succeeded(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Short lowercase name of the variant, for state-change logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InFlight => "in-flight",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

/// Timestamps as emitted by the service.
///
/// The service writes naive ISO-8601 datetimes; those are taken as UTC.
/// Values carrying an offset are converted.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| format!("invalid timestamp '{raw}': {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_result;

    #[test]
    fn test_upload_response_decodes_naive_timestamp() {
        let json = r#"{
            "file_id": "r1",
            "filename": "resume.pdf",
            "file_type": "resume",
            "upload_timestamp": "2025-03-14T09:26:53.589793",
            "extracted_text": "Senior Software Engineer"
        }"#;
        let file: UploadedFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.file_id, "r1");
        assert_eq!(file.kind, FileKind::Resume);
        assert_eq!(file.uploaded_at.to_rfc3339(), "2025-03-14T09:26:53.589793+00:00");
        assert_eq!(file.extracted_text.as_deref(), Some("Senior Software Engineer"));
    }

    #[test]
    fn test_upload_response_without_extracted_text() {
        let json = r#"{
            "file_id": "j1",
            "filename": "job.docx",
            "file_type": "job_description",
            "upload_timestamp": "2025-03-14T09:26:53Z"
        }"#;
        let file: UploadedFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.kind, FileKind::JobDescription);
        assert!(file.extracted_text.is_none());
    }

    #[test]
    fn test_match_response_decodes_wire_names() {
        let json = r#"{
            "resume_id": "r1",
            "job_id": "j1",
            "results": {
                "match_score": 87.5,
                "similarity_score": 0.912,
                "matched_skills": [{"skill": "python", "matched": true, "frequency": 1}],
                "missing_skills": ["kubernetes"],
                "experience_match": true,
                "education_match": false,
                "explanation": "Resume shows 50% skill match",
                "timestamp": "2025-03-14T09:30:00.000001"
            },
            "recommendations": ["Add Kubernetes experience"]
        }"#;
        let response: MatchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.resume_file_id, "r1");
        assert_eq!(response.job_file_id, "j1");
        assert_eq!(response.results.match_score, 87.5);
        assert_eq!(response.results.matched_skills[0].skill, "python");
        assert!(!response.results.education_match);
        assert_eq!(response.recommendations.len(), 1);
        assert!(response.results.validate().is_ok());
    }

    #[test]
    fn test_recommendations_default_to_empty() {
        let json = r#"{
            "resume_id": "r1",
            "job_id": "j1",
            "results": {
                "match_score": 10.0,
                "similarity_score": 0.1,
                "matched_skills": [],
                "missing_skills": [],
                "experience_match": false,
                "education_match": false,
                "explanation": "",
                "timestamp": "2025-03-14T09:30:00"
            }
        }"#;
        let response: MatchResponse = serde_json::from_str(json).unwrap();
        assert!(response.recommendations.is_empty());
    }

    #[test]
    fn test_validate_rejects_overlapping_skills() {
        let result = sample_result(&["python", "rust"], &["rust", "go"], 50.0);
        assert_eq!(result.overlapping_skills(), vec!["rust"]);
        assert!(result.validate().unwrap_err().contains("rust"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_scores() {
        assert!(sample_result(&[], &[], 100.5).validate().is_err());
        assert!(sample_result(&[], &[], -1.0).validate().is_err());
        assert!(sample_result(&[], &[], f64::NAN).validate().is_err());

        let mut result = sample_result(&[], &[], 50.0);
        result.similarity_score = 1.2;
        assert!(result.validate().is_err());
    }

    #[test]
    fn test_file_kind_parsing_and_paths() {
        assert_eq!("resume".parse::<FileKind>().unwrap(), FileKind::Resume);
        assert_eq!("JOB".parse::<FileKind>().unwrap(), FileKind::JobDescription);
        assert!("cover-letter".parse::<FileKind>().is_err());
        assert_eq!(FileKind::Resume.upload_path(), "upload/resume");
        assert_eq!(FileKind::JobDescription.upload_path(), "upload/job");
        assert_eq!(FileKind::JobDescription.as_wire(), "job_description");
    }

    #[test]
    fn test_operation_state_accessors() {
        let state: OperationState<u8> = OperationState::default();
        assert!(state.is_idle());
        assert_eq!(state.label(), "idle");

        let state = OperationState::Succeeded(7u8);
        assert_eq!(state.succeeded(), Some(&7));
        assert!(state.failure().is_none());

        let state: OperationState<u8> = OperationState::Failed("boom".into());
        assert_eq!(state.failure(), Some("boom"));
        assert_eq!(state.label(), "failed");
    }
}
