use crate::models::{CalculationResponse, ResultRecord};

use super::BackendError;

/// Parses a JSON calculation response and checks it before it reaches the
/// wizard.
///
/// # Errors
///
/// * [`BackendError::MalformedResponse`] when the payload is not JSON of the
///   expected shape.
/// * [`BackendError::RejectedResponse`] when the shape is right but the
///   values are out of range.
pub fn parse_calculation_response(payload: &str) -> Result<ResultRecord, BackendError> {
    let response: CalculationResponse = serde_json::from_str(payload)
        .map_err(|e| BackendError::MalformedResponse(e.to_string()))?;

    Ok(ResultRecord::try_from(response)?)
}
