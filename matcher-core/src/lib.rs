//! Matcher Core - upload and match orchestration for the resume/job matcher
//!
//! This crate drives the client side of the matching service: two document
//! uploads that must both succeed before the match analysis can run, with
//! per-operation state, a single user-facing error slot, and a report derived
//! from the result.
//!
//! # Features
//!
//! - Local PDF/DOCX admission checks before any network call
//! - Independent upload slots that may be in flight concurrently
//! - Analysis gated on both uploads, never sent half-formed
//! - Atomic reset back to the initial state
//! - Pure report presentation (score bands, skill ratio, placeholders)
//!
//! # Example
//!
//! ```no_run
//! use matcher_core::api::HttpMatcherApi;
//! use matcher_core::{ClientConfig, Document, MatchOrchestrator, ReportView};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let orchestrator = MatchOrchestrator::new(HttpMatcherApi::new(config)?);
//!
//! let resume = Document::from_path("resume.pdf".as_ref())?;
//! let job = Document::from_path("job.docx".as_ref())?;
//! let (resume_result, job_result) = orchestrator.upload_both(&resume, &job).await;
//! resume_result?;
//! job_result?;
//!
//! let response = orchestrator.analyze().await?;
//! let report = ReportView::from_response(&response);
//! println!("{} match ({})", report.score_label(), report.band);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod document;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod report;
pub mod upload;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use config::ClientConfig;
pub use document::{Document, ACCEPTED_MIME_TYPES, DOCX_MIME, PDF_MIME};
pub use error::{ApiError, MatcherError, Operation, Result};
pub use model::{
    FileKind, MatchResponse, MatchResult, OperationState, SkillMatch, UploadedFile,
};
pub use orchestrator::MatchOrchestrator;
pub use report::{presentation, skill_ratio, ReportView, ScoreBand, SkillList};
pub use upload::UploadSession;
pub use view::{Screen, SlotView, UploadScreen};

#[cfg(test)]
mod tests {
    use super::*;
    use api::MockMatcherApi;

    /// Integration test: upload both documents, analyze, present, start over.
    #[tokio::test]
    async fn test_full_match_workflow() {
        let orchestrator = MatchOrchestrator::new(MockMatcherApi::new());

        // Step 1: Upload both documents concurrently
        let resume = Document::new("resume.pdf", b"%PDF-1.7 Senior Engineer".to_vec());
        let job = Document::new("job.docx", b"PK\x03\x04 Software Engineer".to_vec());
        let (resume_file, job_file) = orchestrator.upload_both(&resume, &job).await;
        let resume_file = resume_file.expect("Resume upload should succeed");
        let job_file = job_file.expect("Job upload should succeed");
        assert_eq!(resume_file.kind, FileKind::Resume);
        assert_eq!(job_file.kind, FileKind::JobDescription);

        // Step 2: Analyze
        assert!(orchestrator.can_analyze());
        let response = orchestrator.analyze().await.expect("Analysis should succeed");
        assert_eq!(response.resume_file_id, resume_file.file_id);
        assert_eq!(response.job_file_id, job_file.file_id);

        // Step 3: The report is derived from the stored result
        let report = match orchestrator.screen() {
            Screen::Report(report) => report,
            other => panic!("expected report screen, got {other:?}"),
        };
        let results = &response.results;
        assert_eq!(report.band, ScoreBand::from_score(results.match_score));
        assert_eq!(
            report.skill_ratio,
            skill_ratio(results.matched_skills.len(), results.missing_skills.len())
        );
        assert!(results.overlapping_skills().is_empty());

        // Step 4: Analyze another
        let screen = orchestrator.analyze_another();
        assert!(!screen.is_report());
        assert!(orchestrator.response().is_none());
        assert!(!orchestrator.can_analyze());
    }
}
