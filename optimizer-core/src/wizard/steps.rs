//! The fixed sequence of wizard steps.
//!
//! Steps are configuration, not data: the table below is the single source
//! for titles, field order, labels and required flags.

use crate::models::{FieldName, InputRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: FieldName,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Allowed values for [`FieldKind::Select`]; empty otherwise.
    pub options: &'static [SelectOption],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub title: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldSpec],
    /// Whether a document can be selected while this step is active.
    pub accepts_upload: bool,
}

impl StepDefinition {
    /// First required field that is not filled, in display order.
    pub fn first_missing_field(
        &self,
        record: &InputRecord,
    ) -> Option<&'static FieldSpec> {
        self.fields
            .iter()
            .find(|field| field.required && !record.is_filled(field.name))
    }
}

/// Number of editable steps; also the index of the results view.
pub const STEP_COUNT: usize = 4;
pub const RESULTS_STEP: usize = STEP_COUNT;

pub const FILING_STATUS_OPTIONS: &[SelectOption] = &[
    SelectOption {
        value: "single",
        label: "Single",
    },
    SelectOption {
        value: "married_joint",
        label: "Married Filing Jointly",
    },
    SelectOption {
        value: "married_separate",
        label: "Married Filing Separately",
    },
    SelectOption {
        value: "head_household",
        label: "Head of Household",
    },
];

const fn field(
    name: FieldName,
    label: &'static str,
    kind: FieldKind,
    required: bool,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required,
        options: &[],
    }
}

const BASIC_FIELDS: &[FieldSpec] = &[
    field(FieldName::ZipCode, "ZIP Code", FieldKind::Text, true),
    field(FieldName::AnnualIncome, "Annual Income ($)", FieldKind::Number, true),
    FieldSpec {
        name: FieldName::FilingStatus,
        label: "Filing Status",
        kind: FieldKind::Select,
        required: true,
        options: FILING_STATUS_OPTIONS,
    },
    field(FieldName::Dependents, "Number of Dependents", FieldKind::Number, true),
];

const DEDUCTION_FIELDS: &[FieldSpec] = &[
    field(FieldName::MortgageInterest, "Mortgage Interest ($)", FieldKind::Number, false),
    field(FieldName::PropertyTax, "Property Tax ($)", FieldKind::Number, false),
    field(FieldName::CharitableDonations, "Charitable Donations ($)", FieldKind::Number, false),
    field(FieldName::MedicalExpenses, "Medical Expenses ($)", FieldKind::Number, false),
];

const ADDITIONAL_FIELDS: &[FieldSpec] = &[
    field(
        FieldName::RetirementContributions,
        "Retirement Contributions ($)",
        FieldKind::Number,
        false,
    ),
    field(FieldName::StudentLoanInterest, "Student Loan Interest ($)", FieldKind::Number, false),
    field(FieldName::SelfEmployedExpenses, "Self-employed Expenses ($)", FieldKind::Number, false),
    field(FieldName::InvestmentIncome, "Investment Income ($)", FieldKind::Number, false),
    field(FieldName::OtherIncome, "Other Income ($)", FieldKind::Number, false),
];

pub static STEPS: [StepDefinition; STEP_COUNT] = [
    StepDefinition {
        title: "Document Upload",
        description: "Upload your tax documents for automatic processing (optional)",
        fields: &[],
        accepts_upload: true,
    },
    StepDefinition {
        title: "Basic Information",
        description: "Let's start with your basic tax information",
        fields: BASIC_FIELDS,
        accepts_upload: false,
    },
    StepDefinition {
        title: "Deductions & Expenses",
        description: "Tell us about your deductible expenses",
        fields: DEDUCTION_FIELDS,
        accepts_upload: false,
    },
    StepDefinition {
        title: "Additional Income & Contributions",
        description: "Let's review your other income sources and contributions",
        fields: ADDITIONAL_FIELDS,
        accepts_upload: false,
    },
];

/// Looks up a step by index; `None` for the results view and beyond.
pub fn step(index: usize) -> Option<&'static StepDefinition> {
    STEPS.get(index)
}

/// Finds the definition of a field, wherever it appears.
pub fn field_spec(name: FieldName) -> Option<&'static FieldSpec> {
    STEPS
        .iter()
        .flat_map(|step| step.fields.iter())
        .find(|spec| spec.name == name)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::FilingStatusCode;

    #[test]
    fn upload_step_has_no_fields() {
        assert!(STEPS[0].fields.is_empty());
        assert!(STEPS[0].accepts_upload);
    }

    #[test]
    fn only_basic_information_has_required_fields() {
        let required: Vec<_> = STEPS
            .iter()
            .enumerate()
            .flat_map(|(idx, step)| {
                step.fields
                    .iter()
                    .filter(|f| f.required)
                    .map(move |f| (idx, f.name))
            })
            .collect();

        assert_eq!(
            required,
            vec![
                (1, FieldName::ZipCode),
                (1, FieldName::AnnualIncome),
                (1, FieldName::FilingStatus),
                (1, FieldName::Dependents),
            ]
        );
    }

    #[test]
    fn every_field_appears_exactly_once() {
        for name in FieldName::all() {
            let count = STEPS
                .iter()
                .flat_map(|step| step.fields.iter())
                .filter(|spec| spec.name == *name)
                .count();
            assert_eq!(count, 1, "{name}");
        }
    }

    #[test]
    fn filing_status_options_match_status_codes() {
        let values: Vec<_> = FILING_STATUS_OPTIONS.iter().map(|o| o.value).collect();
        let codes: Vec<_> = FilingStatusCode::all().iter().map(|c| c.as_str()).collect();
        assert_eq!(values, codes);

        for option in FILING_STATUS_OPTIONS {
            let code = FilingStatusCode::parse(option.value).unwrap();
            assert_eq!(option.label, code.label());
        }
    }

    #[test]
    fn first_missing_field_follows_display_order() {
        let mut record = InputRecord::new();
        assert_eq!(
            STEPS[1].first_missing_field(&record).map(|f| f.label),
            Some("ZIP Code")
        );

        record.set(FieldName::ZipCode, "10001").unwrap();
        assert_eq!(
            STEPS[1].first_missing_field(&record).map(|f| f.label),
            Some("Annual Income ($)")
        );
    }

    #[test]
    fn optional_steps_never_report_missing_fields() {
        let record = InputRecord::new();
        assert!(STEPS[2].first_missing_field(&record).is_none());
        assert!(STEPS[3].first_missing_field(&record).is_none());
    }

    #[test]
    fn lookups_outside_the_table_return_none() {
        assert!(step(RESULTS_STEP).is_none());
        assert_eq!(field_spec(FieldName::OtherIncome).map(|f| f.label), Some("Other Income ($)"));
    }
}
