//! Coarse marginal-rate labels derived from a fixed threshold table.
//!
//! | Amount               | Label |
//! |----------------------|-------|
//! | below 10,000         | 0%    |
//! | 10,000 to < 50,000   | 10%   |
//! | 50,000 to < 100,000  | 15%   |
//! | 100,000 to < 200,000 | 25%   |
//! | 200,000 and above    | 35%   |
//!
//! Lower bounds are inclusive. The table is a display heuristic, not tax law.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ClassificationError {
    #[error("amount must be non-negative, got {0}")]
    NegativeAmount(Decimal),

    #[error("amount must be a finite number, got {0}")]
    NonFinite(f64),

    /// Finite, but beyond what a `Decimal` can hold.
    #[error("amount {0} is outside the supported range")]
    OutOfRange(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaxBracketLabel {
    Zero,
    Ten,
    Fifteen,
    TwentyFive,
    ThirtyFive,
}

impl TaxBracketLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "0%",
            Self::Ten => "10%",
            Self::Fifteen => "15%",
            Self::TwentyFive => "25%",
            Self::ThirtyFive => "35%",
        }
    }
}

impl fmt::Display for TaxBracketLabel {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds, highest first.
const BRACKET_FLOORS: [(i64, TaxBracketLabel); 4] = [
    (200_000, TaxBracketLabel::ThirtyFive),
    (100_000, TaxBracketLabel::TwentyFive),
    (50_000, TaxBracketLabel::Fifteen),
    (10_000, TaxBracketLabel::Ten),
];

/// Classifies a non-negative amount into its bracket label.
///
/// # Errors
///
/// [`ClassificationError::NegativeAmount`] for amounts below zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use optimizer_core::calculations::{tax_bracket, TaxBracketLabel};
///
/// assert_eq!(tax_bracket(dec!(25000)).unwrap(), TaxBracketLabel::Ten);
/// assert_eq!(tax_bracket(dec!(200000)).unwrap().as_str(), "35%");
/// ```
pub fn tax_bracket(amount: Decimal) -> Result<TaxBracketLabel, ClassificationError> {
    if amount < Decimal::ZERO {
        return Err(ClassificationError::NegativeAmount(amount));
    }

    Ok(BRACKET_FLOORS
        .iter()
        .find(|(floor, _)| amount >= Decimal::from(*floor))
        .map(|(_, label)| *label)
        .unwrap_or(TaxBracketLabel::Zero))
}

/// Float entry point for [`tax_bracket`]. NaN and infinities are
/// `NonFinite`; finite values too large for `Decimal` are `OutOfRange`.
pub fn tax_bracket_f64(amount: f64) -> Result<TaxBracketLabel, ClassificationError> {
    if !amount.is_finite() {
        return Err(ClassificationError::NonFinite(amount));
    }
    let amount = Decimal::try_from(amount).map_err(|_| ClassificationError::OutOfRange(amount))?;
    tax_bracket(amount)
}
