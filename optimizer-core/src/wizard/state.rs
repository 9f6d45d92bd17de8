use crate::models::{InputRecord, MAX_UPLOAD_BYTES, ResultRecord};

use super::steps::{self, RESULTS_STEP, StepDefinition};

/// Everything the wizard knows about one session.
///
/// Only [`transition`](super::transition) produces new states; callers read
/// the fields to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    /// `0..STEP_COUNT` while editing, [`RESULTS_STEP`] when showing results.
    pub step: usize,
    pub input: InputRecord,
    /// Transient message shown above the current step.
    pub error: Option<String>,
    /// Set while a document is processed or a calculation runs.
    pub busy: bool,
    pub result: Option<ResultRecord>,
    /// Display name of the last successfully processed document.
    pub uploaded_document: Option<String>,
    pub document_processed: bool,
    pub upload_limit_bytes: u64,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: 0,
            input: InputRecord::default(),
            error: None,
            busy: false,
            result: None,
            uploaded_document: None,
            document_processed: false,
            upload_limit_bytes: MAX_UPLOAD_BYTES,
        }
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_upload_limit(limit_bytes: u64) -> Self {
        Self {
            upload_limit_bytes: limit_bytes,
            ..Self::default()
        }
    }

    /// Definition of the step being edited; `None` on the results view.
    pub fn current_step(&self) -> Option<&'static StepDefinition> {
        steps::step(self.step)
    }

    pub fn is_showing_results(&self) -> bool {
        self.step == RESULTS_STEP
    }

    /// The last editable step submits instead of advancing.
    pub fn is_last_input_step(&self) -> bool {
        self.step + 1 == RESULTS_STEP
    }

    pub fn can_go_back(&self) -> bool {
        self.step > 0 && !self.busy
    }
}
