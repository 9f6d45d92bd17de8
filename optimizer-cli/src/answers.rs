//! CSV loader for batch answers.
//!
//! ## CSV Format
//!
//! One row per wizard run. Headers are matched by name, so column order does
//! not matter. Header names are the wizard's field names.
//!
//! | Column                     | Required | Notes                                   |
//! |----------------------------|----------|-----------------------------------------|
//! | `zip_code`                 | yes      | kept verbatim                           |
//! | `annual_income`            | yes      | kept verbatim                           |
//! | `filing_status`            | yes      | `single`, `married_joint`, `married_separate`, `head_household` |
//! | `dependents`               | yes*     | whole number, 0 allowed                 |
//! | `mortgage_interest`        | no       | missing column or empty cell means empty |
//! | `property_tax`             | no       |                                         |
//! | `charitable_donations`     | no       |                                         |
//! | `medical_expenses`         | no       |                                         |
//! | `retirement_contributions` | no       |                                         |
//! | `student_loan_interest`    | no       |                                         |
//! | `self_employed_expenses`   | no       |                                         |
//! | `investment_income`        | no       |                                         |
//! | `other_income`             | no       |                                         |
//!
//! \* A missing `dependents` column or an empty cell loads fine but leaves
//! the count unset, so the wizard rejects that row at the basic
//! information step.
//!
//! ### Minimal example
//!
//! ```csv
//! zip_code,annual_income,filing_status,dependents
//! 94103,85000,married_joint,2
//! ```
use std::path::Path;

use anyhow::Context;
use optimizer_core::{FilingStatusCode, InputRecord};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AnswerRow {
    zip_code: String,
    annual_income: String,
    filing_status: String,
    dependents: Option<u32>,
    #[serde(default)]
    mortgage_interest: String,
    #[serde(default)]
    property_tax: String,
    #[serde(default)]
    charitable_donations: String,
    #[serde(default)]
    medical_expenses: String,
    #[serde(default)]
    retirement_contributions: String,
    #[serde(default)]
    student_loan_interest: String,
    #[serde(default)]
    self_employed_expenses: String,
    #[serde(default)]
    investment_income: String,
    #[serde(default)]
    other_income: String,
}

/// Errors that can occur while loading or converting answers.
#[derive(Debug, thiserror::Error)]
pub enum AnswersError {
    /// Bad structure, missing required column, or a type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based, counting data rows only.
    #[error("unrecognised filing status '{status}' on row {row}")]
    InvalidFilingStatus { status: String, row: usize },
}

fn convert_row(
    row: AnswerRow,
    row_number: usize,
) -> Result<InputRecord, AnswersError> {
    let filing_status = FilingStatusCode::parse(&row.filing_status).ok_or_else(|| {
        AnswersError::InvalidFilingStatus {
            status: row.filing_status,
            row: row_number,
        }
    })?;

    Ok(InputRecord {
        zip_code: row.zip_code,
        annual_income: row.annual_income,
        filing_status,
        dependents: row.dependents,
        mortgage_interest: row.mortgage_interest,
        property_tax: row.property_tax,
        charitable_donations: row.charitable_donations,
        medical_expenses: row.medical_expenses,
        retirement_contributions: row.retirement_contributions,
        student_loan_interest: row.student_loan_interest,
        self_employed_expenses: row.self_employed_expenses,
        investment_income: row.investment_income,
        other_income: row.other_income,
    })
}

/// Parses CSV text into input records, in file order.
///
/// # Errors
///
/// * [`AnswersError::Parse`] when the CSV is structurally invalid or a
///   required column is missing.
/// * [`AnswersError::InvalidFilingStatus`] when a row names an unknown
///   filing status.
pub fn load_from_str(input: &str) -> Result<Vec<InputRecord>, AnswersError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<AnswerRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1))
        .collect()
}

/// Reads a file from disk and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> anyhow::Result<Vec<InputRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file: {}", path.display()))?;
    load_from_str(&contents)
        .with_context(|| format!("Failed to parse answers file: {}", path.display()))
}
