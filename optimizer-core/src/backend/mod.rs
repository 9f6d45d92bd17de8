//! The computation backend seam.
//!
//! The wizard never computes anything itself. It hands documents and the
//! collected input to a [`TaxBackend`], chosen by name through a
//! [`BackendRegistry`].

mod factory;
mod response;
mod simulated;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DocumentReceipt, DocumentRef, InputRecord, ResponseError, ResultRecord};

pub use factory::{BackendConfig, BackendFactory, BackendRegistry};
pub use response::parse_calculation_response;
pub use simulated::{SimulatedBackend, SimulatedBackendFactory};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Rejected response: {0}")]
    RejectedResponse(#[from] ResponseError),

    #[error("Service error: {0}")]
    Service(String),
}

#[async_trait]
pub trait TaxBackend: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn name(&self) -> &'static str;

    /// Extracts what it can from an uploaded document.
    async fn process_document(
        &self,
        document: &DocumentRef,
    ) -> Result<DocumentReceipt, BackendError>;

    /// Produces the tax summary for the collected input.
    async fn calculate(
        &self,
        input: &InputRecord,
    ) -> Result<ResultRecord, BackendError>;
}
