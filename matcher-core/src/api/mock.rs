//! In-memory matching service for tests and offline runs.
//!
//! Mirrors the service contract closely enough to exercise the orchestration:
//! identifiers are issued per kind (`r1`, `r2`, ... and `j1`, `j2`, ...),
//! analysis of unknown identifiers is rejected, and failures can be scripted.
//! WARNING: the scores are canned, not computed from the documents.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Semaphore;

use super::{MatchRequest, MatcherApi};
use crate::document::{mime_from_extension, Document};
use crate::error::ApiError;
use crate::model::{FileKind, MatchResponse, MatchResult, SkillMatch, UploadedFile};

/// Scripted outcomes; `None` means "behave like a healthy service".
#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    pub resume_upload_failure: Option<ApiError>,
    pub job_upload_failure: Option<ApiError>,
    pub analyze_failure: Option<ApiError>,
    /// Result returned by analysis instead of the canned one.
    pub result: Option<MatchResult>,
    pub recommendations: Option<Vec<String>>,
}

#[derive(Default)]
struct Ledger {
    issued: HashSet<String>,
    uploads: Vec<(FileKind, String)>,
    analyses: Vec<MatchRequest>,
}

/// Mock matching service.
#[derive(Default)]
pub struct MockMatcherApi {
    behavior: Mutex<MockBehavior>,
    ledger: Mutex<Ledger>,
    resume_seq: AtomicUsize,
    job_seq: AtomicUsize,
    /// When set, every call waits for a permit before answering.
    gate: Option<Arc<Semaphore>>,
}

impl MockMatcherApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            ..Default::default()
        }
    }

    /// A mock whose calls stay in flight until [`release`](Self::release)d.
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Default::default()
        }
    }

    /// Let `n` pending or future calls complete.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn fail_analyze_with(&self, err: Option<ApiError>) {
        lock(&self.behavior).analyze_failure = err;
    }

    pub fn fail_upload_with(&self, kind: FileKind, err: Option<ApiError>) {
        let mut behavior = lock(&self.behavior);
        match kind {
            FileKind::Resume => behavior.resume_upload_failure = err,
            FileKind::JobDescription => behavior.job_upload_failure = err,
        }
    }

    /// Number of upload requests received for `kind`.
    pub fn upload_calls(&self, kind: FileKind) -> usize {
        lock(&self.ledger)
            .uploads
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    pub fn analyze_calls(&self) -> usize {
        lock(&self.ledger).analyses.len()
    }

    pub fn last_analysis(&self) -> Option<MatchRequest> {
        lock(&self.ledger).analyses.last().cloned()
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }

    fn next_id(&self, kind: FileKind) -> String {
        match kind {
            FileKind::Resume => format!("r{}", self.resume_seq.fetch_add(1, Ordering::SeqCst) + 1),
            FileKind::JobDescription => {
                format!("j{}", self.job_seq.fetch_add(1, Ordering::SeqCst) + 1)
            }
        }
    }
}

/// Canned analysis, shaped like the service's demo output.
pub fn canned_result() -> MatchResult {
    let matched = ["python", "javascript", "react", "machine learning"];
    MatchResult {
        match_score: 87.5,
        similarity_score: 0.912,
        matched_skills: matched
            .iter()
            .map(|skill| SkillMatch {
                skill: skill.to_string(),
                matched: true,
                frequency: Some(1),
            })
            .collect(),
        missing_skills: vec!["fastapi".to_string()],
        experience_match: true,
        education_match: true,
        explanation: "Resume shows 80% skill match with semantic similarity of 0.91".to_string(),
        computed_at: Utc::now(),
    }
}

fn canned_recommendations() -> Vec<String> {
    vec![
        "Excellent match! Your profile aligns well with this position.".to_string(),
        "Consider developing skills in: fastapi".to_string(),
    ]
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking test thread must not wedge the other assertions
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl MatcherApi for MockMatcherApi {
    async fn upload(&self, kind: FileKind, document: &Document) -> Result<UploadedFile, ApiError> {
        lock(&self.ledger)
            .uploads
            .push((kind, document.filename.clone()));
        self.wait_for_gate().await;

        let scripted = {
            let behavior = lock(&self.behavior);
            match kind {
                FileKind::Resume => behavior.resume_upload_failure.clone(),
                FileKind::JobDescription => behavior.job_upload_failure.clone(),
            }
        };
        if let Some(err) = scripted {
            return Err(err);
        }

        if mime_from_extension(&document.filename).is_none() {
            return Err(ApiError::Rejected {
                status: 400,
                detail: Some("File type not allowed. Allowed types: {'pdf', 'docx'}".to_string()),
            });
        }

        let file_id = self.next_id(kind);
        lock(&self.ledger).issued.insert(file_id.clone());

        Ok(UploadedFile {
            file_id,
            filename: document.filename.clone(),
            kind,
            uploaded_at: Utc::now(),
            extracted_text: Some(String::from_utf8_lossy(&document.bytes).chars().take(500).collect()),
        })
    }

    async fn analyze(&self, request: &MatchRequest) -> Result<MatchResponse, ApiError> {
        lock(&self.ledger).analyses.push(request.clone());
        self.wait_for_gate().await;

        let behavior = lock(&self.behavior).clone();
        if let Some(err) = behavior.analyze_failure {
            return Err(err);
        }

        {
            let ledger = lock(&self.ledger);
            for id in [&request.resume_id, &request.job_id] {
                if !ledger.issued.contains(id) {
                    return Err(ApiError::Rejected {
                        status: 404,
                        detail: Some(format!("Document {id} not found")),
                    });
                }
            }
        }

        Ok(MatchResponse {
            resume_file_id: request.resume_id.clone(),
            job_file_id: request.job_id.clone(),
            results: behavior.result.unwrap_or_else(canned_result),
            recommendations: behavior
                .recommendations
                .unwrap_or_else(canned_recommendations),
        })
    }

    async fn health(&self) -> Result<serde_json::Value, ApiError> {
        Ok(serde_json::json!({
            "status": "operational",
            "services": { "nlp": "mock", "ml": "mock", "file_processor": "mock" }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str) -> Document {
        Document::new(name, b"%PDF-1.7".to_vec())
    }

    #[tokio::test]
    async fn test_mock_issues_sequential_ids_per_kind() {
        let api = MockMatcherApi::new();
        let r1 = api.upload(FileKind::Resume, &pdf("a.pdf")).await.unwrap();
        let j1 = api.upload(FileKind::JobDescription, &pdf("b.pdf")).await.unwrap();
        let r2 = api.upload(FileKind::Resume, &pdf("c.pdf")).await.unwrap();

        assert_eq!(r1.file_id, "r1");
        assert_eq!(j1.file_id, "j1");
        assert_eq!(r2.file_id, "r2");
        assert_eq!(api.upload_calls(FileKind::Resume), 2);
        assert_eq!(api.upload_calls(FileKind::JobDescription), 1);
    }

    #[tokio::test]
    async fn test_mock_rejects_unknown_ids() {
        let api = MockMatcherApi::new();
        let err = api
            .analyze(&MatchRequest {
                resume_id: "r9".into(),
                job_id: "j9".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_mock_canned_result_is_consistent() {
        let api = MockMatcherApi::new();
        let r = api.upload(FileKind::Resume, &pdf("a.pdf")).await.unwrap();
        let j = api.upload(FileKind::JobDescription, &pdf("b.pdf")).await.unwrap();
        let response = api
            .analyze(&MatchRequest {
                resume_id: r.file_id,
                job_id: j.file_id,
            })
            .await
            .unwrap();

        assert_eq!(response.resume_file_id, "r1");
        assert_eq!(response.job_file_id, "j1");
        assert!(response.results.validate().is_ok());
        assert_eq!(api.analyze_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_scripted_failure() {
        let api = MockMatcherApi::new();
        api.fail_upload_with(FileKind::Resume, Some(ApiError::Network("reset".into())));
        let err = api.upload(FileKind::Resume, &pdf("a.pdf")).await.unwrap_err();
        assert_eq!(err, ApiError::Network("reset".into()));

        api.fail_upload_with(FileKind::Resume, None);
        assert!(api.upload(FileKind::Resume, &pdf("a.pdf")).await.is_ok());
    }
}
