use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::simulated::{DEFAULT_DELAY, SIMULATED_BACKEND, SimulatedBackendFactory};
use super::{BackendError, TaxBackend};

/// Backend-agnostic selection settings.
///
/// `name` must match the [`BackendFactory::backend_name`] of a registered
/// factory. `delay_ms` is only meaningful to backends that simulate latency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub name: String,
    pub delay_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            name: SIMULATED_BACKEND.to_string(),
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
        }
    }
}

/// One implementation per backend kind, registered with a
/// [`BackendRegistry`] at startup.
#[async_trait]
pub trait BackendFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    async fn create(
        &self,
        config: &BackendConfig,
    ) -> Result<Arc<dyn TaxBackend>, BackendError>;
}

/// Registry of [`BackendFactory`] instances, keyed by backend name.
pub struct BackendRegistry {
    factories: HashMap<&'static str, Box<dyn BackendFactory>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry with every backend this crate ships.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SimulatedBackendFactory));
        registry
    }

    /// Register a backend factory. A factory with the same name is replaced.
    pub fn register(
        &mut self,
        factory: Box<dyn BackendFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of every registered backend, sorted alphabetically.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Dispatch to the factory matching `config.name`.
    ///
    /// # Errors
    /// * [`BackendError::Configuration`] when no factory has that name.
    /// * Any error the chosen factory returns.
    pub async fn create(
        &self,
        config: &BackendConfig,
    ) -> Result<Arc<dyn TaxBackend>, BackendError> {
        let factory = self.factories.get(config.name.as_str()).ok_or_else(|| {
            BackendError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.name,
                self.available_backends()
            ))
        })?;

        factory.create(config).await
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tokio::time::Instant;

    use super::*;
    use crate::models::InputRecord;

    fn simulated(delay_ms: u64) -> BackendConfig {
        BackendConfig {
            name: SIMULATED_BACKEND.to_string(),
            delay_ms,
        }
    }

    #[test]
    fn default_config_is_simulated_with_two_second_delay() {
        let cfg = BackendConfig::default();
        assert_eq!(cfg.name, "simulated");
        assert_eq!(cfg.delay_ms, 2000);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let cfg: BackendConfig = serde_json::from_str(r#"{"delay_ms": 0}"#).unwrap();

        assert_eq!(cfg, simulated(0));
    }

    #[test]
    fn builtin_registry_offers_simulated() {
        assert_eq!(
            BackendRegistry::with_builtin().available_backends(),
            vec!["simulated"]
        );
    }

    #[tokio::test]
    async fn builtin_registry_builds_a_working_simulated_backend() {
        let backend = BackendRegistry::with_builtin()
            .create(&simulated(0))
            .await
            .unwrap();

        assert_eq!(backend.name(), "simulated");
        let result = backend.calculate(&InputRecord::default()).await.unwrap();
        assert_eq!(result.estimated_tax, dec!(25000));
    }

    #[tokio::test(start_paused = true)]
    async fn configured_delay_reaches_the_simulated_backend() {
        let backend = BackendRegistry::with_builtin()
            .create(&simulated(750))
            .await
            .unwrap();

        let started = Instant::now();
        backend.calculate(&InputRecord::default()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(750));
    }

    #[tokio::test]
    async fn empty_registry_rejects_even_the_default_backend() {
        let result = BackendRegistry::new().create(&BackendConfig::default()).await;

        match result {
            Err(BackendError::Configuration(msg)) => {
                assert_eq!(msg, "unknown backend 'simulated'; available: []");
            }
            Err(other) => panic!("expected Configuration error, got {other:#?}"),
            Ok(_) => panic!("expected Configuration error, got a backend"),
        }
    }

    #[tokio::test]
    async fn unknown_backend_error_names_requested_and_available() {
        let cfg = BackendConfig {
            name: "irs-direct".to_string(),
            delay_ms: 0,
        };

        match BackendRegistry::with_builtin().create(&cfg).await {
            Err(BackendError::Configuration(msg)) => {
                assert!(msg.contains("irs-direct"), "should name the request");
                assert!(msg.contains("simulated"), "should list what exists");
            }
            Err(other) => panic!("expected Configuration error, got {other:#?}"),
            Ok(_) => panic!("expected Configuration error, got a backend"),
        }
    }
}
