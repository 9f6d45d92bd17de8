//! Runs pre-filled answers through the wizard without a prompt.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use optimizer_core::notifications::TracingSink;
use optimizer_core::{InputRecord, ResultRecord, TaxBackend, WizardController, WizardState};
use tracing::{info, warn};

use crate::render::render_summary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub completed: usize,
    pub failed: usize,
}

/// Walks every record through each step and submits it, writing one
/// summary (or one failure line) per record. Rows are numbered from 1.
pub async fn run_batch<W: Write>(
    records: Vec<InputRecord>,
    backend: Arc<dyn TaxBackend>,
    upload_limit_bytes: u64,
    output: &mut W,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    let sink = Arc::new(TracingSink);

    for (idx, record) in records.into_iter().enumerate() {
        let row = idx + 1;
        let state = WizardState {
            input: record,
            ..WizardState::with_upload_limit(upload_limit_bytes)
        };
        let mut wizard = WizardController::with_state(state, backend.clone(), sink.clone());

        match complete(&mut wizard).await {
            Ok(result) => {
                info!(row, "row calculated");
                summary.completed += 1;
                writeln!(output, "--- Row {row} ---")?;
                write!(output, "{}", render_summary(&result))?;
            }
            Err(reason) => {
                warn!(row, %reason, "row failed");
                summary.failed += 1;
                writeln!(output, "--- Row {row} ---")?;
                writeln!(output, "[error] {reason}")?;
            }
        }
    }

    writeln!(
        output,
        "{} calculated, {} failed",
        summary.completed, summary.failed
    )?;
    Ok(summary)
}

async fn complete(wizard: &mut WizardController) -> Result<ResultRecord, String> {
    while !wizard.state().is_last_input_step() {
        let step = wizard.state().step;
        wizard.next().await.map_err(|e| e.to_string())?;
        if wizard.state().step == step {
            return Err(failure_reason(wizard.state()));
        }
    }

    wizard.submit().await.map_err(|e| e.to_string())?;
    wizard
        .state()
        .result
        .clone()
        .ok_or_else(|| failure_reason(wizard.state()))
}

fn failure_reason(state: &WizardState) -> String {
    state
        .error
        .clone()
        .unwrap_or_else(|| format!("stopped at step {}", state.step + 1))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use optimizer_core::FilingStatusCode;
    use optimizer_core::backend::SimulatedBackend;

    fn filled(zip: &str) -> InputRecord {
        InputRecord {
            zip_code: zip.to_string(),
            annual_income: "85000".to_string(),
            filing_status: FilingStatusCode::MarriedJoint,
            dependents: Some(2),
            ..InputRecord::default()
        }
    }

    async fn run(records: Vec<InputRecord>) -> (BatchSummary, String) {
        let backend = Arc::new(SimulatedBackend::new(Duration::ZERO));
        let mut output = Vec::new();
        let summary = run_batch(records, backend, 10 * 1024 * 1024, &mut output)
            .await
            .unwrap();
        (summary, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn complete_rows_produce_summaries() {
        let (summary, output) = run(vec![filled("94103"), filled("10001")]).await;

        assert_eq!(
            summary,
            BatchSummary {
                completed: 2,
                failed: 0
            }
        );
        assert_eq!(output.matches("== Your Tax Summary ==").count(), 2);
        assert!(output.ends_with("2 calculated, 0 failed\n"));
    }

    #[tokio::test]
    async fn incomplete_row_reports_first_missing_field() {
        let mut missing_income = filled("60614");
        missing_income.annual_income.clear();

        let (summary, output) = run(vec![missing_income, filled("94103")]).await;

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.completed, 1);
        assert!(output.contains("--- Row 1 ---\n[error] Please fill in Annual Income ($)\n"));
        assert!(output.contains("--- Row 2 ---\n== Your Tax Summary =="));
    }

    #[tokio::test]
    async fn missing_dependents_fails_but_zero_is_calculated() {
        let mut unset = filled("94103");
        unset.dependents = None;
        let mut none_claimed = filled("10001");
        none_claimed.dependents = Some(0);

        let (summary, output) = run(vec![unset, none_claimed]).await;

        assert_eq!(
            summary,
            BatchSummary {
                completed: 1,
                failed: 1
            }
        );
        assert!(output.contains("--- Row 1 ---\n[error] Please fill in Number of Dependents\n"));
        assert!(output.contains("--- Row 2 ---\n== Your Tax Summary =="));
    }

    #[tokio::test]
    async fn empty_batch_writes_only_the_totals() {
        let (summary, output) = run(Vec::new()).await;

        assert_eq!(summary, BatchSummary::default());
        assert_eq!(output, "0 calculated, 0 failed\n");
    }
}
