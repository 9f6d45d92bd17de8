//! A stand-in backend that waits a fixed delay and returns a canned summary.
//!
//! The input record is ignored. The canned payload goes through the same
//! response parser a real service would use.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::models::{DocumentReceipt, DocumentRef, InputRecord, ResultRecord};

use super::factory::{BackendConfig, BackendFactory};
use super::response::parse_calculation_response;
use super::{BackendError, TaxBackend};

pub const SIMULATED_BACKEND: &str = "simulated";

pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);

pub const DOCUMENT_PROCESSED: &str = "Document processed successfully";

const CANNED_RESPONSE: &str = r#"{
    "estimated_tax": 25000,
    "potential_savings": 5000,
    "local_tax_rate": 0.25,
    "recommendations": [
        "Consider maximizing your 401(k) contributions",
        "Look into tax-advantaged investment options",
        "Track your charitable donations more carefully",
        "Consider bunching itemized deductions",
        "Explore health savings account (HSA) options"
    ],
    "ai_insights": "Based on your income and deductions, you might qualify for additional tax credits. Consider speaking with a tax professional about education credits and retirement account contributions. Your current tax efficiency score is 75%, which suggests room for optimization."
}"#;

#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

#[async_trait]
impl TaxBackend for SimulatedBackend {
    fn name(&self) -> &'static str {
        SIMULATED_BACKEND
    }

    async fn process_document(
        &self,
        document: &DocumentRef,
    ) -> Result<DocumentReceipt, BackendError> {
        debug!(name = %document.name, size = document.size_bytes, "processing document");
        tokio::time::sleep(self.delay).await;
        info!(name = %document.name, "document processed");

        Ok(DocumentReceipt {
            name: document.name.clone(),
            message: DOCUMENT_PROCESSED.to_string(),
        })
    }

    async fn calculate(
        &self,
        _input: &InputRecord,
    ) -> Result<ResultRecord, BackendError> {
        debug!(delay_ms = self.delay.as_millis() as u64, "running simulated calculation");
        tokio::time::sleep(self.delay).await;
        let result = parse_calculation_response(CANNED_RESPONSE)?;
        info!(estimated_tax = %result.estimated_tax, "calculation complete");
        Ok(result)
    }
}

/// Registers [`SimulatedBackend`] under the name `simulated`.
pub struct SimulatedBackendFactory;

#[async_trait]
impl BackendFactory for SimulatedBackendFactory {
    fn backend_name(&self) -> &'static str {
        SIMULATED_BACKEND
    }

    async fn create(
        &self,
        config: &BackendConfig,
    ) -> Result<Arc<dyn TaxBackend>, BackendError> {
        Ok(Arc::new(SimulatedBackend::new(Duration::from_millis(
            config.delay_ms,
        ))))
    }
}
