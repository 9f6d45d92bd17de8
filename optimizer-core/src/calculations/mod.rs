//! Pure helpers behind the tax summary: bracket classification and
//! currency/percentage formatting.

pub mod classification;
pub mod common;
pub mod currency;

pub use classification::{ClassificationError, TaxBracketLabel, tax_bracket, tax_bracket_f64};
pub use currency::{format_currency, format_currency_f64, format_percent};
