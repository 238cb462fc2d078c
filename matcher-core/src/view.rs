//! View state: which screen is shown, derived on demand.
//!
//! There is no stored screen flag. The report screen exists exactly when the
//! orchestrator holds a match result; leaving it goes through a full reset.

use serde::Serialize;

use crate::api::MatcherApi;
use crate::model::{FileKind, OperationState, UploadedFile};
use crate::orchestrator::MatchOrchestrator;
use crate::report::ReportView;

/// What one upload slot shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotView {
    Empty,
    Uploading,
    Uploaded { filename: String, file_id: String },
    Failed { message: String },
}

impl SlotView {
    fn from_state(state: &OperationState<UploadedFile>) -> Self {
        match state {
            OperationState::Idle => Self::Empty,
            OperationState::InFlight => Self::Uploading,
            OperationState::Succeeded(file) => Self::Uploaded {
                filename: file.filename.clone(),
                file_id: file.file_id.clone(),
            },
            OperationState::Failed(message) => Self::Failed {
                message: message.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadScreen {
    pub resume: SlotView,
    pub job: SlotView,
    pub analyze_enabled: bool,
    pub analyzing: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Upload(UploadScreen),
    Report(ReportView),
}

impl Screen {
    pub fn is_report(&self) -> bool {
        matches!(self, Self::Report(_))
    }
}

impl<A: MatcherApi> MatchOrchestrator<A> {
    /// The screen for the current state.
    pub fn screen(&self) -> Screen {
        if let Some(response) = self.matching().succeeded() {
            return Screen::Report(ReportView::from_response(response));
        }

        Screen::Upload(UploadScreen {
            resume: SlotView::from_state(&self.session(FileKind::Resume).state()),
            job: SlotView::from_state(&self.session(FileKind::JobDescription).state()),
            analyze_enabled: self.can_analyze(),
            analyzing: self.matching().is_in_flight(),
            error: self.error(),
        })
    }

    /// Leave the report for a fresh upload screen.
    pub fn analyze_another(&self) -> Screen {
        self.reset();
        self.screen()
    }
}
