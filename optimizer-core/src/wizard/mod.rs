//! The step wizard: static step definitions, the state record, a pure
//! reducer over that record, and an async controller that runs the
//! reducer's effects against a [`TaxBackend`](crate::TaxBackend).

mod controller;
mod reducer;
mod state;
pub mod steps;

use thiserror::Error;

use crate::models::FieldError;

pub use controller::WizardController;
pub use reducer::{Effect, Transition, WizardAction, transition};
pub use state::WizardState;
pub use steps::{FieldKind, FieldSpec, RESULTS_STEP, STEP_COUNT, STEPS, SelectOption, StepDefinition};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    /// A required field is empty at Next or Submit.
    #[error("Please fill in {label}")]
    Validation { label: &'static str },

    /// The selected document is larger than the upload limit.
    #[error("File size must be less than {}", size_limit(.limit_bytes))]
    OversizedFile {
        name: String,
        size_bytes: u64,
        limit_bytes: u64,
    },

    #[error(transparent)]
    Field(#[from] FieldError),

    /// The action has no meaning in the current state.
    #[error("{action} is not available: {reason}")]
    NotAllowed {
        action: &'static str,
        reason: &'static str,
    },
}

/// `10MB` for whole mebibytes, `512KB` for whole kibibytes, bytes otherwise.
fn size_limit(bytes: &u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;

    match *bytes {
        b if b >= MB && b % MB == 0 => format!("{}MB", b / MB),
        b if b >= KB && b % KB == 0 => format!("{}KB", b / KB),
        b => format!("{b} bytes"),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn oversized(limit_bytes: u64) -> String {
        WizardError::OversizedFile {
            name: "scan.pdf".to_string(),
            size_bytes: limit_bytes + 1,
            limit_bytes,
        }
        .to_string()
    }

    #[test]
    fn default_limit_reads_in_megabytes() {
        assert_eq!(
            oversized(crate::models::MAX_UPLOAD_BYTES),
            "File size must be less than 10MB"
        );
    }

    #[test]
    fn small_limits_are_not_rounded_down_to_zero() {
        assert_eq!(oversized(512 * 1024), "File size must be less than 512KB");
        assert_eq!(oversized(1000), "File size must be less than 1000 bytes");
        assert_eq!(
            oversized(1024 * 1024 + 1),
            "File size must be less than 1048577 bytes"
        );
        assert_eq!(oversized(1536 * 1024), "File size must be less than 1536KB");
    }
}
