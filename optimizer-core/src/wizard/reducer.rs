//! Pure state transitions for the wizard.
//!
//! [`transition`] never performs I/O. Work that has to happen outside the
//! reducer (document processing, the calculation) is returned as an
//! [`Effect`]; its outcome comes back in as another [`WizardAction`].

use tracing::{debug, warn};

use crate::models::{DocumentReceipt, DocumentRef, FieldName, InputRecord, ResultRecord};
use crate::notifications::Notification;

use super::WizardError;
use super::state::WizardState;
use super::steps::RESULTS_STEP;

pub const CALCULATION_COMPLETE: &str = "Tax calculation complete";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    Next,
    Previous,
    Submit,
    Reset,
    EditField { field: FieldName, value: String },
    SelectFile(DocumentRef),
    DocumentProcessed(DocumentReceipt),
    CalculationFinished(ResultRecord),
    OperationFailed(String),
}

impl WizardAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Submit => "submit",
            Self::Reset => "reset",
            Self::EditField { .. } => "edit field",
            Self::SelectFile(_) => "select file",
            Self::DocumentProcessed(_) => "document processed",
            Self::CalculationFinished(_) => "calculation finished",
            Self::OperationFailed(_) => "operation failed",
        }
    }

    fn changes_step(&self) -> bool {
        matches!(
            self,
            Self::Next | Self::Previous | Self::Submit | Self::Reset | Self::SelectFile(_)
        )
    }

    fn completes_operation(&self) -> bool {
        matches!(
            self,
            Self::DocumentProcessed(_) | Self::CalculationFinished(_) | Self::OperationFailed(_)
        )
    }
}

/// Work the caller must run before the wizard can continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ProcessDocument(DocumentRef),
    Calculate(InputRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: WizardState,
    pub effect: Option<Effect>,
    pub notification: Option<Notification>,
}

impl Transition {
    fn to(state: WizardState) -> Self {
        Self {
            state,
            effect: None,
            notification: None,
        }
    }

    fn with_effect(
        mut self,
        effect: Effect,
    ) -> Self {
        self.effect = Some(effect);
        self
    }

    fn with_notification(
        mut self,
        notification: Notification,
    ) -> Self {
        self.notification = Some(notification);
        self
    }
}

/// Applies one action to a state.
///
/// A failed required-field check is not an `Err`: the returned state carries
/// the message and the step is unchanged.
///
/// # Errors
///
/// * [`WizardError::OversizedFile`] when a selected document is over the
///   upload limit. The state is left as it was.
/// * [`WizardError::Field`] when an edit names an unknown filing status.
/// * [`WizardError::NotAllowed`] when the action makes no sense in the
///   current state (for example Previous on the first step, or Next while
///   an operation is in progress).
pub fn transition(
    state: &WizardState,
    action: WizardAction,
) -> Result<Transition, WizardError> {
    let action_name = action.name();

    if state.busy && action.changes_step() {
        return Err(not_allowed(action_name, "an operation is in progress"));
    }
    if !state.busy && action.completes_operation() {
        return Err(not_allowed(action_name, "no operation is in progress"));
    }

    let mut next = state.clone();

    let outcome = match action {
        WizardAction::Next => {
            if state.is_showing_results() {
                return Err(not_allowed(action_name, "results are already shown"));
            }
            if state.is_last_input_step() {
                return Err(not_allowed(action_name, "the last step is submitted instead"));
            }
            match validate_current_step(state) {
                Err(failure) => return Ok(validation_failed(next, failure)),
                Ok(()) => {
                    next.error = None;
                    next.step += 1;
                    Transition::to(next)
                }
            }
        }

        WizardAction::Submit => {
            if !state.is_last_input_step() {
                return Err(not_allowed(action_name, "only the last step can be submitted"));
            }
            match validate_current_step(state) {
                Err(failure) => return Ok(validation_failed(next, failure)),
                Ok(()) => {
                    next.error = None;
                    next.busy = true;
                    let input = next.input.clone();
                    Transition::to(next).with_effect(Effect::Calculate(input))
                }
            }
        }

        WizardAction::Previous => {
            if state.step == 0 {
                return Err(not_allowed(action_name, "already on the first step"));
            }
            next.step -= 1;
            next.error = None;
            Transition::to(next)
        }

        WizardAction::Reset => {
            if !state.is_showing_results() {
                return Err(not_allowed(action_name, "results are not shown yet"));
            }
            next.step = 0;
            next.result = None;
            next.error = None;
            next.uploaded_document = None;
            next.document_processed = false;
            Transition::to(next)
        }

        WizardAction::EditField { field, value } => {
            next.input.set(field, &value)?;
            next.error = None;
            Transition::to(next)
        }

        WizardAction::SelectFile(document) => {
            if !state.current_step().is_some_and(|step| step.accepts_upload) {
                return Err(not_allowed(
                    action_name,
                    "documents are only accepted on the upload step",
                ));
            }
            if document.exceeds(state.upload_limit_bytes) {
                return Err(WizardError::OversizedFile {
                    name: document.name,
                    size_bytes: document.size_bytes,
                    limit_bytes: state.upload_limit_bytes,
                });
            }
            next.busy = true;
            next.error = None;
            Transition::to(next).with_effect(Effect::ProcessDocument(document))
        }

        WizardAction::DocumentProcessed(receipt) => {
            next.busy = false;
            next.uploaded_document = Some(receipt.name);
            next.document_processed = true;
            Transition::to(next).with_notification(Notification::success(receipt.message))
        }

        WizardAction::CalculationFinished(result) => {
            next.busy = false;
            next.result = Some(result);
            next.step = RESULTS_STEP;
            Transition::to(next).with_notification(Notification::success(CALCULATION_COMPLETE))
        }

        WizardAction::OperationFailed(message) => {
            next.busy = false;
            next.error = Some(message.clone());
            Transition::to(next).with_notification(Notification::error(message))
        }
    };

    debug!(
        action = action_name,
        from = state.step,
        to = outcome.state.step,
        busy = outcome.state.busy,
        "wizard transition"
    );

    Ok(outcome)
}

fn validate_current_step(state: &WizardState) -> Result<(), WizardError> {
    match state
        .current_step()
        .and_then(|step| step.first_missing_field(&state.input))
    {
        Some(field) => Err(WizardError::Validation { label: field.label }),
        None => Ok(()),
    }
}

fn validation_failed(
    mut state: WizardState,
    failure: WizardError,
) -> Transition {
    let message = failure.to_string();
    warn!(step = state.step, %message, "required field missing");
    state.error = Some(message.clone());
    Transition::to(state).with_notification(Notification::error(message))
}

fn not_allowed(
    action: &'static str,
    reason: &'static str,
) -> WizardError {
    WizardError::NotAllowed { action, reason }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{FilingStatusCode, MAX_UPLOAD_BYTES};

    const MB: u64 = 1024 * 1024;

    fn at_step(step: usize) -> WizardState {
        WizardState {
            step,
            ..WizardState::default()
        }
    }

    fn with_basic_info(mut state: WizardState) -> WizardState {
        state.input.zip_code = "94103".to_string();
        state.input.annual_income = "85000".to_string();
        state.input.filing_status = FilingStatusCode::MarriedJoint;
        state.input.dependents = Some(2);
        state
    }

    fn apply(
        state: &WizardState,
        action: WizardAction,
    ) -> WizardState {
        transition(state, action)
            .unwrap_or_else(|e| panic!("transition failed: {e}"))
            .state
    }

    fn sample_result() -> ResultRecord {
        ResultRecord {
            estimated_tax: dec!(25000),
            potential_savings: dec!(5000),
            local_tax_rate: dec!(0.25),
            recommendations: vec!["Consider bunching itemized deductions".to_string()],
            insights: None,
        }
    }

    // =========================================================================
    // Next
    // =========================================================================

    #[test]
    fn next_from_upload_step_needs_no_input() {
        let outcome = transition(&WizardState::new(), WizardAction::Next).unwrap();

        assert_eq!(outcome.state.step, 1);
        assert_eq!(outcome.state.error, None);
        assert_eq!(outcome.effect, None);
        assert_eq!(outcome.notification, None);
    }

    #[test]
    fn next_with_missing_income_stays_and_reports_label() {
        let mut state = at_step(1);
        state.input.zip_code = "94103".to_string();

        let outcome = transition(&state, WizardAction::Next).unwrap();

        assert_eq!(outcome.state.step, 1);
        let error = outcome.state.error.expect("error should be set");
        assert!(error.contains("Annual Income"), "got {error}");
        assert_eq!(error, "Please fill in Annual Income ($)");
        assert_eq!(outcome.notification, Some(Notification::error(error)));
    }

    #[test]
    fn next_reports_first_missing_field_only() {
        let outcome = transition(&at_step(1), WizardAction::Next).unwrap();

        assert_eq!(
            outcome.state.error.as_deref(),
            Some("Please fill in ZIP Code")
        );
    }

    #[test]
    fn next_treats_untouched_dependents_as_missing() {
        let mut state = with_basic_info(at_step(1));
        state.input.dependents = None;

        let outcome = transition(&state, WizardAction::Next).unwrap();

        assert_eq!(outcome.state.step, 1);
        assert_eq!(
            outcome.state.error.as_deref(),
            Some("Please fill in Number of Dependents")
        );
    }

    #[test]
    fn next_accepts_typed_zero_dependents() {
        let mut state = at_step(1);
        for (field, value) in [
            (FieldName::ZipCode, "94103"),
            (FieldName::AnnualIncome, "50000"),
            (FieldName::Dependents, "0"),
        ] {
            state = apply(
                &state,
                WizardAction::EditField {
                    field,
                    value: value.to_string(),
                },
            );
        }

        let next = apply(&state, WizardAction::Next);

        assert_eq!(next.step, 2);
        assert_eq!(next.error, None);
    }

    #[test]
    fn next_with_complete_step_clears_previous_error() {
        let mut state = with_basic_info(at_step(1));
        state.error = Some("Please fill in ZIP Code".to_string());

        let next = apply(&state, WizardAction::Next);

        assert_eq!(next.step, 2);
        assert_eq!(next.error, None);
    }

    #[test]
    fn next_does_not_validate_formats() {
        let mut state = with_basic_info(at_step(1));
        state.input.zip_code = "not a zip".to_string();
        state.input.annual_income = "lots".to_string();

        assert_eq!(apply(&state, WizardAction::Next).step, 2);
    }

    #[test]
    fn next_on_last_input_step_is_not_allowed() {
        let err = transition(&at_step(3), WizardAction::Next).unwrap_err();

        assert!(matches!(err, WizardError::NotAllowed { action: "next", .. }));
    }

    #[test]
    fn next_on_results_is_not_allowed() {
        assert!(transition(&at_step(RESULTS_STEP), WizardAction::Next).is_err());
    }

    // =========================================================================
    // Submit and calculation completion
    // =========================================================================

    #[test]
    fn submit_on_last_step_requests_calculation() {
        let state = with_basic_info(at_step(3));

        let outcome = transition(&state, WizardAction::Submit).unwrap();

        assert!(outcome.state.busy);
        assert_eq!(outcome.state.step, 3);
        assert_eq!(outcome.effect, Some(Effect::Calculate(state.input.clone())));
    }

    #[test]
    fn submit_before_last_step_is_not_allowed() {
        let err = transition(&with_basic_info(at_step(1)), WizardAction::Submit).unwrap_err();

        assert!(matches!(err, WizardError::NotAllowed { action: "submit", .. }));
    }

    #[test]
    fn calculation_finished_moves_to_results() {
        let busy = apply(&with_basic_info(at_step(3)), WizardAction::Submit);

        let outcome = transition(&busy, WizardAction::CalculationFinished(sample_result())).unwrap();

        assert_eq!(outcome.state.step, RESULTS_STEP);
        assert!(!outcome.state.busy);
        assert_eq!(outcome.state.result, Some(sample_result()));
        assert_eq!(
            outcome.notification,
            Some(Notification::success(CALCULATION_COMPLETE))
        );
    }

    #[test]
    fn operation_failure_clears_busy_and_keeps_step() {
        let busy = apply(&with_basic_info(at_step(3)), WizardAction::Submit);

        let outcome = transition(
            &busy,
            WizardAction::OperationFailed("service unavailable".to_string()),
        )
        .unwrap();

        assert_eq!(outcome.state.step, 3);
        assert!(!outcome.state.busy);
        assert_eq!(outcome.state.error.as_deref(), Some("service unavailable"));
        assert!(outcome.notification.is_some_and(|n| n.is_error()));
    }

    #[test]
    fn completions_without_pending_operation_are_rejected() {
        let err = transition(
            &at_step(3),
            WizardAction::CalculationFinished(sample_result()),
        )
        .unwrap_err();

        assert!(matches!(err, WizardError::NotAllowed { .. }));
    }

    // =========================================================================
    // Busy gating
    // =========================================================================

    #[test]
    fn navigation_while_busy_is_rejected() {
        let busy = apply(&with_basic_info(at_step(3)), WizardAction::Submit);

        for action in [WizardAction::Next, WizardAction::Previous, WizardAction::Submit] {
            assert!(
                matches!(
                    transition(&busy, action.clone()),
                    Err(WizardError::NotAllowed {
                        reason: "an operation is in progress",
                        ..
                    })
                ),
                "{} should be rejected while busy",
                action.name()
            );
        }
    }

    #[test]
    fn edits_while_busy_are_still_applied() {
        let busy = apply(&with_basic_info(at_step(3)), WizardAction::Submit);

        let edited = apply(
            &busy,
            WizardAction::EditField {
                field: FieldName::OtherIncome,
                value: "1200".to_string(),
            },
        );

        assert!(edited.busy);
        assert_eq!(edited.input.other_income, "1200");
    }

    // =========================================================================
    // Previous and Reset
    // =========================================================================

    #[test]
    fn previous_moves_back_without_validation() {
        let state = at_step(2);

        assert_eq!(apply(&state, WizardAction::Previous).step, 1);
    }

    #[test]
    fn previous_from_results_returns_to_last_input_step_and_keeps_result() {
        let mut state = with_basic_info(at_step(RESULTS_STEP));
        state.result = Some(sample_result());

        let outcome = transition(&state, WizardAction::Previous).unwrap();

        assert_eq!(outcome.state.step, RESULTS_STEP - 1);
        assert!(outcome.state.is_last_input_step());
        assert_eq!(outcome.state.result, Some(sample_result()));
        assert_eq!(outcome.state.error, None);
        assert!(outcome.effect.is_none());
    }

    #[test]
    fn previous_on_first_step_is_not_allowed() {
        let err = transition(&WizardState::new(), WizardAction::Previous).unwrap_err();

        assert_eq!(
            err,
            WizardError::NotAllowed {
                action: "previous",
                reason: "already on the first step",
            }
        );
    }

    #[test]
    fn reset_returns_to_first_step_and_keeps_input() {
        let mut state = with_basic_info(at_step(RESULTS_STEP));
        state.result = Some(sample_result());
        state.uploaded_document = Some("w2.pdf".to_string());
        state.document_processed = true;

        let reset = apply(&state, WizardAction::Reset);

        assert_eq!(reset.step, 0);
        assert_eq!(reset.result, None);
        assert_eq!(reset.uploaded_document, None);
        assert!(!reset.document_processed);
        assert_eq!(reset.input, state.input);
    }

    #[test]
    fn reset_before_results_is_not_allowed() {
        assert!(transition(&at_step(2), WizardAction::Reset).is_err());
    }

    // =========================================================================
    // Field edits
    // =========================================================================

    #[test]
    fn edit_updates_one_field_and_clears_error() {
        let mut state = at_step(1);
        state.error = Some("Please fill in ZIP Code".to_string());

        let edited = apply(
            &state,
            WizardAction::EditField {
                field: FieldName::ZipCode,
                value: "10001".to_string(),
            },
        );

        assert_eq!(edited.input.zip_code, "10001");
        assert_eq!(edited.error, None);
        assert_eq!(edited.step, 1);
    }

    #[test]
    fn edit_with_unknown_filing_status_fails() {
        let err = transition(
            &at_step(1),
            WizardAction::EditField {
                field: FieldName::FilingStatus,
                value: "widowed".to_string(),
            },
        )
        .unwrap_err();

        assert!(matches!(err, WizardError::Field(_)));
    }

    // =========================================================================
    // File selection
    // =========================================================================

    #[test]
    fn oversized_file_is_rejected_and_state_untouched() {
        let state = WizardState::new();
        let document = DocumentRef::new("scan.pdf", 11 * MB);

        let err = transition(&state, WizardAction::SelectFile(document)).unwrap_err();

        assert_eq!(
            err,
            WizardError::OversizedFile {
                name: "scan.pdf".to_string(),
                size_bytes: 11 * MB,
                limit_bytes: MAX_UPLOAD_BYTES,
            }
        );
        assert_eq!(err.to_string(), "File size must be less than 10MB");
    }

    #[test]
    fn file_at_limit_is_accepted() {
        let document = DocumentRef::new("scan.pdf", MAX_UPLOAD_BYTES);

        let outcome = transition(&WizardState::new(), WizardAction::SelectFile(document.clone()))
            .unwrap();

        assert!(outcome.state.busy);
        assert_eq!(outcome.effect, Some(Effect::ProcessDocument(document)));
    }

    #[test]
    fn custom_upload_limit_is_honoured() {
        let state = WizardState::with_upload_limit(MB);

        let err = transition(
            &state,
            WizardAction::SelectFile(DocumentRef::new("w2.png", MB + 1)),
        )
        .unwrap_err();

        assert!(matches!(err, WizardError::OversizedFile { limit_bytes, .. } if limit_bytes == MB));
    }

    #[test]
    fn file_selection_outside_upload_step_is_not_allowed() {
        let err = transition(
            &at_step(1),
            WizardAction::SelectFile(DocumentRef::new("w2.pdf", MB)),
        )
        .unwrap_err();

        assert!(matches!(err, WizardError::NotAllowed { action: "select file", .. }));
    }

    #[test]
    fn processed_document_is_recorded() {
        let busy = apply(
            &WizardState::new(),
            WizardAction::SelectFile(DocumentRef::new("w2.pdf", MB)),
        );

        let outcome = transition(
            &busy,
            WizardAction::DocumentProcessed(DocumentReceipt {
                name: "w2.pdf".to_string(),
                message: "Document processed successfully".to_string(),
            }),
        )
        .unwrap();

        assert!(!outcome.state.busy);
        assert_eq!(outcome.state.uploaded_document.as_deref(), Some("w2.pdf"));
        assert!(outcome.state.document_processed);
        assert_eq!(outcome.state.step, 0);
        assert_eq!(
            outcome.notification,
            Some(Notification::success("Document processed successfully"))
        );
    }
}
