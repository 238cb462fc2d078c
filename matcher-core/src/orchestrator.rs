//! Match orchestration: both upload slots, the gated analysis call, the
//! shared error slot, and the all-or-nothing reset.
//!
//! # Example
//!
//! ```
//! use matcher_core::api::MockMatcherApi;
//! use matcher_core::{Document, FileKind, MatchOrchestrator, ScoreBand};
//!
//! # async fn example() -> matcher_core::Result<()> {
//! let orchestrator = MatchOrchestrator::new(MockMatcherApi::new());
//! assert!(!orchestrator.can_analyze());
//!
//! let resume = Document::new("resume.pdf", b"%PDF-1.7".to_vec());
//! let job = Document::new("job.docx", b"PK".to_vec());
//! orchestrator.upload(FileKind::Resume, &resume).await?;
//! orchestrator.upload(FileKind::JobDescription, &job).await?;
//!
//! let response = orchestrator.analyze().await?;
//! assert_eq!(ScoreBand::from_score(response.results.match_score), ScoreBand::Strong);
//! # Ok(())
//! # }
//! ```

use std::cell::{Cell, Ref, RefCell};

use tracing::{debug, info, instrument, warn};

use crate::api::{MatchRequest, MatcherApi};
use crate::document::{Document, DEFAULT_MAX_UPLOAD_BYTES};
use crate::error::{MatcherError, Operation, Result, MISSING_UPLOADS};
use crate::model::{FileKind, MatchResponse, OperationState, UploadedFile};
use crate::upload::UploadSession;

/// Gates and issues the match analysis once both documents are uploaded.
///
/// Owns the two [`UploadSession`]s, its own analysis state and the single
/// user-facing error slot. All mutation happens through `&self` on the owning
/// task, with no borrow held across an await, so a UI on the same task can
/// render state while calls are suspended.
pub struct MatchOrchestrator<A> {
    api: A,
    resume: UploadSession,
    job: UploadSession,
    matching: RefCell<OperationState<MatchResponse>>,
    ticket: Cell<u64>,
    error: RefCell<Option<String>>,
}

impl<A: MatcherApi> MatchOrchestrator<A> {
    pub fn new(api: A) -> Self {
        Self::with_limit(api, DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// Orchestrator whose sessions reject documents above `max_upload_bytes`.
    pub fn with_limit(api: A, max_upload_bytes: usize) -> Self {
        Self {
            api,
            resume: UploadSession::with_limit(FileKind::Resume, max_upload_bytes),
            job: UploadSession::with_limit(FileKind::JobDescription, max_upload_bytes),
            matching: RefCell::new(OperationState::Idle),
            ticket: Cell::new(0),
            error: RefCell::new(None),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self, kind: FileKind) -> &UploadSession {
        match kind {
            FileKind::Resume => &self.resume,
            FileKind::JobDescription => &self.job,
        }
    }

    /// Borrow the analysis state. Do not hold the guard across an await.
    pub fn matching(&self) -> Ref<'_, OperationState<MatchResponse>> {
        self.matching.borrow()
    }

    /// The result of the last successful analysis, if any.
    pub fn response(&self) -> Option<MatchResponse> {
        self.matching.borrow().succeeded().cloned()
    }

    /// The message currently shown to the user.
    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn clear_error(&self) {
        *self.error.borrow_mut() = None;
    }

    /// Whether the analyze action is enabled.
    ///
    /// True iff both sessions succeeded and no analysis is in flight.
    pub fn can_analyze(&self) -> bool {
        self.resume.is_succeeded() && self.job.is_succeeded() && !self.matching.borrow().is_in_flight()
    }

    /// Upload `document` into the slot for `kind`.
    ///
    /// Clears the error slot first; a failure is surfaced there. A completion
    /// superseded by a newer submission or a reset surfaces nothing.
    pub async fn upload(&self, kind: FileKind, document: &Document) -> Result<UploadedFile> {
        self.clear_error();
        let result = self.session(kind).submit(&self.api, document).await;
        if let Err(err) = &result {
            self.surface(err);
        }
        result
    }

    /// Upload both documents concurrently.
    ///
    /// The two calls are independent; each outcome is reported separately.
    /// When both fail, the job description's message is the one left in the
    /// error slot.
    pub async fn upload_both(
        &self,
        resume: &Document,
        job: &Document,
    ) -> (Result<UploadedFile>, Result<UploadedFile>) {
        self.clear_error();
        let (resume_result, job_result) = tokio::join!(
            self.resume.submit(&self.api, resume),
            self.job.submit(&self.api, job)
        );
        for result in [&resume_result, &job_result] {
            if let Err(err) = result {
                self.surface(err);
            }
        }
        (resume_result, job_result)
    }

    /// Run the match analysis over both uploaded documents.
    ///
    /// Rejected locally, without a network call, unless
    /// [`can_analyze`](Self::can_analyze) holds. A remote failure leaves both
    /// uploads intact so the call can be repeated as is.
    #[instrument(level = "info", skip(self))]
    pub async fn analyze(&self) -> Result<MatchResponse> {
        self.clear_error();

        let request = match (self.resume.file_id(), self.job.file_id()) {
            (Some(resume_id), Some(job_id)) => MatchRequest { resume_id, job_id },
            _ => {
                let err = MatcherError::Validation(MISSING_UPLOADS.to_string());
                warn!("Analysis requested before both uploads succeeded");
                self.surface(&err);
                return Err(err);
            }
        };
        if self.matching.borrow().is_in_flight() {
            let err = MatcherError::Validation("Analysis already in progress".to_string());
            self.surface(&err);
            return Err(err);
        }

        let ticket = self.next_ticket();
        self.set_matching(OperationState::InFlight);
        debug!(resume_id = %request.resume_id, job_id = %request.job_id, "Analysis in flight");

        let outcome = self
            .api
            .analyze(&request)
            .await
            .map_err(|e| MatcherError::from_api(Operation::Analyze, e));

        if self.ticket.get() != ticket {
            debug!("Discarding analysis completion after reset");
            return Err(MatcherError::Superseded(Operation::Analyze));
        }

        match outcome {
            Ok(response) => {
                info!(
                    match_score = response.results.match_score,
                    "Analysis succeeded"
                );
                self.set_matching(OperationState::Succeeded(response.clone()));
                Ok(response)
            }
            Err(err) => {
                warn!(error = %err, "Analysis failed");
                self.set_matching(OperationState::Failed(err.user_message()));
                self.surface(&err);
                Err(err)
            }
        }
    }

    /// Return every slot to its initial state in one step.
    ///
    /// Contains no await point, so no observer on the owning task can see a
    /// partially reset orchestrator. Calls still in flight become stale.
    pub fn reset(&self) {
        self.resume.reset();
        self.job.reset();
        self.next_ticket();
        self.set_matching(OperationState::Idle);
        self.clear_error();
        info!("Orchestrator reset");
    }

    fn surface(&self, err: &MatcherError) {
        if matches!(err, MatcherError::Superseded(_)) {
            return;
        }
        *self.error.borrow_mut() = Some(err.user_message());
    }

    fn next_ticket(&self) -> u64 {
        let ticket = self.ticket.get() + 1;
        self.ticket.set(ticket);
        ticket
    }

    fn set_matching(&self, state: OperationState<MatchResponse>) {
        debug!(state = state.label(), "Analysis state changed");
        *self.matching.borrow_mut() = state;
    }
}
