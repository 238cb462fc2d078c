//! Upload session: the state and the call for one document slot.

use std::cell::{Cell, Ref, RefCell};

use tracing::{debug, info, instrument, warn};

use crate::api::MatcherApi;
use crate::document::{self, Document, DEFAULT_MAX_UPLOAD_BYTES};
use crate::error::{MatcherError, Operation, Result};
use crate::model::{FileKind, OperationState, UploadedFile};

/// State and upload call for one slot (resume or job description).
///
/// Sessions are owned by a single task and mutated only through `&self`
/// methods that never hold a borrow across an await point, so observers on the
/// same task can read the state while an upload is suspended.
///
/// Every submission takes a ticket. Only the completion holding the newest
/// ticket writes the slot; an older completion is reported to its caller as
/// [`MatcherError::Superseded`] and leaves the state alone.
#[derive(Debug)]
pub struct UploadSession {
    kind: FileKind,
    max_upload_bytes: usize,
    state: RefCell<OperationState<UploadedFile>>,
    ticket: Cell<u64>,
}

impl UploadSession {
    pub fn new(kind: FileKind) -> Self {
        Self::with_limit(kind, DEFAULT_MAX_UPLOAD_BYTES)
    }

    pub fn with_limit(kind: FileKind, max_upload_bytes: usize) -> Self {
        Self {
            kind,
            max_upload_bytes,
            state: RefCell::new(OperationState::Idle),
            ticket: Cell::new(0),
        }
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Borrow the current state. Do not hold the guard across an await.
    pub fn state(&self) -> Ref<'_, OperationState<UploadedFile>> {
        self.state.borrow()
    }

    /// The uploaded file, once the session succeeded.
    pub fn uploaded(&self) -> Option<UploadedFile> {
        self.state.borrow().succeeded().cloned()
    }

    pub fn file_id(&self) -> Option<String> {
        self.state
            .borrow()
            .succeeded()
            .map(|file| file.file_id.clone())
    }

    pub fn is_succeeded(&self) -> bool {
        self.state.borrow().succeeded().is_some()
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.borrow().is_in_flight()
    }

    /// Validate `document` locally, then upload it into this slot.
    ///
    /// A document failing the local checks never reaches the network. On
    /// failure the session is `Failed` with the user-facing message.
    #[instrument(
        level = "info",
        skip(self, api, document),
        fields(kind = self.kind.as_wire(), filename = %document.filename)
    )]
    pub async fn submit<A: MatcherApi + ?Sized>(
        &self,
        api: &A,
        document: &Document,
    ) -> Result<UploadedFile> {
        let ticket = self.next_ticket();

        if let Err(err) = document::validate(document, self.max_upload_bytes) {
            warn!(error = %err, "Document rejected locally");
            self.set(OperationState::Failed(err.user_message()));
            return Err(err);
        }

        self.set(OperationState::InFlight);
        debug!(ticket, "Upload in flight");

        let outcome = api
            .upload(self.kind, document)
            .await
            .map_err(|e| MatcherError::from_api(Operation::Upload(self.kind), e))
            .and_then(|file| self.check_kind(file));

        if self.ticket.get() != ticket {
            debug!(ticket, latest = self.ticket.get(), "Discarding stale upload completion");
            return Err(MatcherError::Superseded(Operation::Upload(self.kind)));
        }

        match outcome {
            Ok(file) => {
                info!(file_id = %file.file_id, "Upload succeeded");
                self.set(OperationState::Succeeded(file.clone()));
                Ok(file)
            }
            Err(err) => {
                warn!(error = %err, "Upload failed");
                self.set(OperationState::Failed(err.user_message()));
                Err(err)
            }
        }
    }

    /// Back to `Idle`; any upload still in flight becomes stale.
    pub fn reset(&self) {
        self.next_ticket();
        self.set(OperationState::Idle);
    }

    fn check_kind(&self, file: UploadedFile) -> Result<UploadedFile> {
        if file.kind == self.kind {
            Ok(file)
        } else {
            Err(MatcherError::Upload {
                kind: self.kind,
                message: crate::error::UPLOAD_FAILED.to_string(),
            })
        }
    }

    fn next_ticket(&self) -> u64 {
        let ticket = self.ticket.get() + 1;
        self.ticket.set(ticket);
        ticket
    }

    fn set(&self, state: OperationState<UploadedFile>) {
        debug!(kind = self.kind.as_wire(), state = state.label(), "Upload state changed");
        *self.state.borrow_mut() = state;
    }
}
