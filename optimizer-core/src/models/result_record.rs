use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a calculation response is refused at the boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },

    #[error("local tax rate must be between 0 and 1, got {0}")]
    RateOutOfRange(Decimal),

    #[error("response carries no recommendations")]
    NoRecommendations,
}

/// Untrusted shape of a calculation response, as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub estimated_tax: Decimal,
    pub potential_savings: Decimal,
    pub local_tax_rate: Decimal,
    pub recommendations: Vec<String>,
    #[serde(default, rename = "ai_insights")]
    pub insights: Option<String>,
}

/// The tax summary shown after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub estimated_tax: Decimal,
    pub potential_savings: Decimal,
    /// Fraction in `[0, 1]`.
    pub local_tax_rate: Decimal,
    pub recommendations: Vec<String>,
    pub insights: Option<String>,
}

impl TryFrom<CalculationResponse> for ResultRecord {
    type Error = ResponseError;

    fn try_from(response: CalculationResponse) -> Result<Self, Self::Error> {
        if response.estimated_tax.is_sign_negative() && !response.estimated_tax.is_zero() {
            return Err(ResponseError::NegativeAmount {
                field: "estimated_tax",
                value: response.estimated_tax,
            });
        }
        if response.potential_savings.is_sign_negative() && !response.potential_savings.is_zero()
        {
            return Err(ResponseError::NegativeAmount {
                field: "potential_savings",
                value: response.potential_savings,
            });
        }
        if response.local_tax_rate < Decimal::ZERO || response.local_tax_rate > Decimal::ONE {
            return Err(ResponseError::RateOutOfRange(response.local_tax_rate));
        }
        if response.recommendations.is_empty() {
            return Err(ResponseError::NoRecommendations);
        }

        Ok(Self {
            estimated_tax: response.estimated_tax,
            potential_savings: response.potential_savings,
            local_tax_rate: response.local_tax_rate,
            recommendations: response.recommendations,
            insights: response.insights.filter(|text| !text.trim().is_empty()),
        })
    }
}
