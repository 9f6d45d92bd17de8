use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::TaxBackend;
use crate::models::{DocumentRef, FieldName};
use crate::notifications::{Notification, NotificationSink};

use super::WizardError;
use super::reducer::{Effect, Transition, WizardAction, transition};
use super::state::WizardState;

/// Drives a [`WizardState`] through the reducer and runs the effects it
/// asks for.
///
/// Each dispatch finishes any effect it starts before returning, so one
/// controller never has two operations in flight. Operations cannot be
/// cancelled once started.
pub struct WizardController {
    state: WizardState,
    backend: Arc<dyn TaxBackend>,
    sink: Arc<dyn NotificationSink>,
}

impl WizardController {
    pub fn new(
        backend: Arc<dyn TaxBackend>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self::with_state(WizardState::new(), backend, sink)
    }

    pub fn with_state(
        state: WizardState,
        backend: Arc<dyn TaxBackend>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            state,
            backend,
            sink,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Applies an action, then runs and completes any effect it produced.
    ///
    /// A failed required-field check is reported through the state's error
    /// and the sink; it is not an `Err`.
    ///
    /// # Errors
    ///
    /// Whatever [`transition`] rejects. An oversized document is also sent
    /// to the sink.
    pub async fn dispatch(
        &mut self,
        action: WizardAction,
    ) -> Result<(), WizardError> {
        let effect = self.apply(action)?;

        if let Some(effect) = effect {
            let completion = self.run_effect(effect).await;
            self.apply(completion)?;
        }

        Ok(())
    }

    pub async fn next(&mut self) -> Result<(), WizardError> {
        self.dispatch(WizardAction::Next).await
    }

    pub async fn previous(&mut self) -> Result<(), WizardError> {
        self.dispatch(WizardAction::Previous).await
    }

    pub async fn submit(&mut self) -> Result<(), WizardError> {
        self.dispatch(WizardAction::Submit).await
    }

    pub async fn reset(&mut self) -> Result<(), WizardError> {
        self.dispatch(WizardAction::Reset).await
    }

    pub async fn edit_field(
        &mut self,
        field: FieldName,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.dispatch(WizardAction::EditField {
            field,
            value: value.into(),
        })
        .await
    }

    pub async fn select_file(
        &mut self,
        document: DocumentRef,
    ) -> Result<(), WizardError> {
        self.dispatch(WizardAction::SelectFile(document)).await
    }

    fn apply(
        &mut self,
        action: WizardAction,
    ) -> Result<Option<Effect>, WizardError> {
        let action_name = action.name();

        match transition(&self.state, action) {
            Ok(Transition {
                state,
                effect,
                notification,
            }) => {
                self.state = state;
                if let Some(notification) = notification {
                    self.sink.notify(&notification);
                }
                Ok(effect)
            }
            Err(error) => {
                warn!(action = action_name, %error, "action rejected");
                if matches!(error, WizardError::OversizedFile { .. }) {
                    self.sink.notify(&Notification::error(error.to_string()));
                }
                Err(error)
            }
        }
    }

    async fn run_effect(
        &self,
        effect: Effect,
    ) -> WizardAction {
        match effect {
            Effect::ProcessDocument(document) => {
                match self.backend.process_document(&document).await {
                    Ok(receipt) => WizardAction::DocumentProcessed(receipt),
                    Err(error) => {
                        warn!(name = %document.name, %error, "document processing failed");
                        WizardAction::OperationFailed(error.to_string())
                    }
                }
            }
            Effect::Calculate(input) => match self.backend.calculate(&input).await {
                Ok(result) => {
                    info!(backend = self.backend.name(), "calculation received");
                    WizardAction::CalculationFinished(result)
                }
                Err(error) => {
                    warn!(%error, "calculation failed");
                    WizardAction::OperationFailed(error.to_string())
                }
            },
        }
    }
}
