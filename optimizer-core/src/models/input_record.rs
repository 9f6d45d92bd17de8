use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::FilingStatusCode;

/// Errors raised when a field is addressed or assigned by name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("unknown filing status '{0}'")]
    UnknownFilingStatus(String),
}

/// Every field the wizard collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    ZipCode,
    AnnualIncome,
    FilingStatus,
    Dependents,
    MortgageInterest,
    PropertyTax,
    CharitableDonations,
    MedicalExpenses,
    RetirementContributions,
    StudentLoanInterest,
    SelfEmployedExpenses,
    InvestmentIncome,
    OtherIncome,
}

impl FieldName {
    pub fn all() -> &'static [FieldName] {
        &[
            Self::ZipCode,
            Self::AnnualIncome,
            Self::FilingStatus,
            Self::Dependents,
            Self::MortgageInterest,
            Self::PropertyTax,
            Self::CharitableDonations,
            Self::MedicalExpenses,
            Self::RetirementContributions,
            Self::StudentLoanInterest,
            Self::SelfEmployedExpenses,
            Self::InvestmentIncome,
            Self::OtherIncome,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZipCode => "zip_code",
            Self::AnnualIncome => "annual_income",
            Self::FilingStatus => "filing_status",
            Self::Dependents => "dependents",
            Self::MortgageInterest => "mortgage_interest",
            Self::PropertyTax => "property_tax",
            Self::CharitableDonations => "charitable_donations",
            Self::MedicalExpenses => "medical_expenses",
            Self::RetirementContributions => "retirement_contributions",
            Self::StudentLoanInterest => "student_loan_interest",
            Self::SelfEmployedExpenses => "self_employed_expenses",
            Self::InvestmentIncome => "investment_income",
            Self::OtherIncome => "other_income",
        }
    }

    pub fn parse(s: &str) -> Result<Self, FieldError> {
        Self::all()
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for FieldName {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The values collected across all wizard steps.
///
/// Amounts are kept exactly as typed; nothing here parses them. Every field
/// has a value from construction onwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub zip_code: String,
    pub annual_income: String,
    pub filing_status: FilingStatusCode,
    /// `None` until a count has been entered; an explicit 0 is a value.
    pub dependents: Option<u32>,
    pub mortgage_interest: String,
    pub property_tax: String,
    pub charitable_donations: String,
    pub medical_expenses: String,
    pub retirement_contributions: String,
    pub student_loan_interest: String,
    pub self_employed_expenses: String,
    pub investment_income: String,
    pub other_income: String,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the field holds a value: a non-empty string, or a
    /// dependents count that has been entered (0 included). Filing status
    /// always counts as filled.
    pub fn is_filled(
        &self,
        field: FieldName,
    ) -> bool {
        match field {
            FieldName::FilingStatus => true,
            FieldName::Dependents => self.dependents.is_some(),
            other => self.text(other).is_some_and(|value| !value.is_empty()),
        }
    }

    /// Assigns one field from its raw textual form.
    ///
    /// No range or format checks happen here. A dependents value that is not
    /// a whole number is logged and leaves the count unset, as does an empty
    /// one.
    pub fn set(
        &mut self,
        field: FieldName,
        raw: &str,
    ) -> Result<(), FieldError> {
        match field {
            FieldName::FilingStatus => {
                self.filing_status = FilingStatusCode::parse(raw.trim())
                    .ok_or_else(|| FieldError::UnknownFilingStatus(raw.to_string()))?;
            }
            FieldName::Dependents => {
                let trimmed = raw.trim();
                self.dependents = if trimmed.is_empty() {
                    None
                } else {
                    trimmed
                        .parse::<u32>()
                        .map_err(|e| warn!(input = %raw, "invalid dependents count: {}", e))
                        .ok()
                };
            }
            other => {
                if let Some(slot) = self.text_mut(other) {
                    *slot = raw.to_string();
                }
            }
        }
        Ok(())
    }

    /// Renders the current value of a field for display.
    pub fn display_value(
        &self,
        field: FieldName,
    ) -> String {
        match field {
            FieldName::FilingStatus => self.filing_status.label().to_string(),
            FieldName::Dependents => self.dependents.unwrap_or_default().to_string(),
            other => self.text(other).unwrap_or_default().to_string(),
        }
    }

    fn text(
        &self,
        field: FieldName,
    ) -> Option<&str> {
        let value = match field {
            FieldName::ZipCode => &self.zip_code,
            FieldName::AnnualIncome => &self.annual_income,
            FieldName::MortgageInterest => &self.mortgage_interest,
            FieldName::PropertyTax => &self.property_tax,
            FieldName::CharitableDonations => &self.charitable_donations,
            FieldName::MedicalExpenses => &self.medical_expenses,
            FieldName::RetirementContributions => &self.retirement_contributions,
            FieldName::StudentLoanInterest => &self.student_loan_interest,
            FieldName::SelfEmployedExpenses => &self.self_employed_expenses,
            FieldName::InvestmentIncome => &self.investment_income,
            FieldName::OtherIncome => &self.other_income,
            FieldName::FilingStatus | FieldName::Dependents => return None,
        };
        Some(value.as_str())
    }

    fn text_mut(
        &mut self,
        field: FieldName,
    ) -> Option<&mut String> {
        let value = match field {
            FieldName::ZipCode => &mut self.zip_code,
            FieldName::AnnualIncome => &mut self.annual_income,
            FieldName::MortgageInterest => &mut self.mortgage_interest,
            FieldName::PropertyTax => &mut self.property_tax,
            FieldName::CharitableDonations => &mut self.charitable_donations,
            FieldName::MedicalExpenses => &mut self.medical_expenses,
            FieldName::RetirementContributions => &mut self.retirement_contributions,
            FieldName::StudentLoanInterest => &mut self.student_loan_interest,
            FieldName::SelfEmployedExpenses => &mut self.self_employed_expenses,
            FieldName::InvestmentIncome => &mut self.investment_income,
            FieldName::OtherIncome => &mut self.other_income,
            FieldName::FilingStatus | FieldName::Dependents => return None,
        };
        Some(value)
    }
}
