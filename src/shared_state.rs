use std::sync::{Arc, RwLock};

use crate::config::{Configuration, SimulationUpdate};
use crate::error::GenerationError;
use crate::models::soiling::SoilingModelData;
use crate::services::soiling_model;

/// Memoized snapshot plus the hash it was generated from.
#[derive(Debug, Clone)]
struct ModelCache {
    hash: String,
    data: Arc<SoilingModelData>,
}

/// Shared application state: the live configuration (if one was loaded) and
/// a single-slot cache of the generated model, keyed by the simulation hash.
/// Reads regenerate only when the hash changed; everything else is a pure
/// cache lookup.
#[derive(Clone, Debug)]
pub struct AppState {
    config: Arc<RwLock<Option<Configuration>>>,
    cache: Arc<RwLock<Option<ModelCache>>>,
}

impl AppState {
    pub fn new(config: Option<Configuration>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config(&self) -> Option<Configuration> {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the generator-facing configuration sections. Starts from the
    /// default tree when no configuration was loaded yet. The next `model()`
    /// call regenerates if the simulation hash moved.
    pub fn update_simulation(&self, update: SimulationUpdate) -> Configuration {
        let mut guard = match self.config.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut next = guard.clone().unwrap_or_default();
        next.simulation = update.simulation;
        next.cleaning = update.cleaning;
        next.soiling = update.soiling;
        let next = next.sanitized();
        tracing::info!("[STATE] Simulation configuration updated, hash={}", next.simulation_hash());
        *guard = Some(next.clone());
        next
    }

    /// Current model snapshot, regenerating only when the simulation hash
    /// moved since the cached one.
    pub fn model(&self) -> Result<Arc<SoilingModelData>, GenerationError> {
        let config = self.config().ok_or(GenerationError::ConfigurationMissing)?;
        let hash = config.simulation_hash();

        {
            let cache = match self.cache.read() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(cached) = cache.as_ref() {
                if cached.hash == hash {
                    return Ok(Arc::clone(&cached.data));
                }
            }
        }

        tracing::info!("[MODEL] Generating soiling model, hash={}", hash);
        let data = Arc::new(soiling_model::generate(&config, &hash)?);

        let mut cache = match self.cache.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *cache = Some(ModelCache {
            hash,
            data: Arc::clone(&data),
        });
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CleaningConfig;

    #[test]
    fn test_model_is_memoized() {
        let state = AppState::new(Some(Configuration::default()));
        let a = state.model().unwrap();
        let b = state.model().unwrap();
        assert!(Arc::ptr_eq(&a, &b), "unchanged config must reuse the cached snapshot");
    }

    #[test]
    fn test_missing_configuration_is_signaled() {
        let state = AppState::new(None);
        assert_eq!(state.model().unwrap_err(), GenerationError::ConfigurationMissing);
    }

    #[test]
    fn test_simulation_update_invalidates_cache() {
        let state = AppState::new(Some(Configuration::default()));
        let before = state.model().unwrap();

        let config = state.config().unwrap();
        state.update_simulation(SimulationUpdate {
            simulation: config.simulation.clone(),
            cleaning: CleaningConfig { interval_days: 7 },
            soiling: config.soiling.clone(),
        });

        let after = state.model().unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_ne!(*before, *after);
        assert!(after.data_for_day(8).unwrap().cleaning_scheduled);
    }

    #[test]
    fn test_identical_update_keeps_cache_warm() {
        let state = AppState::new(Some(Configuration::default()));
        let before = state.model().unwrap();

        // Re-submitting identical generator sections keeps the hash, so no
        // regeneration happens.
        let config = state.config().unwrap();
        state.update_simulation(SimulationUpdate {
            simulation: config.simulation.clone(),
            cleaning: config.cleaning.clone(),
            soiling: config.soiling.clone(),
        });
        let after = state.model().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_update_bootstraps_missing_configuration() {
        let state = AppState::new(None);
        let config = state.update_simulation(SimulationUpdate {
            simulation: Default::default(),
            cleaning: Default::default(),
            soiling: Default::default(),
        });
        assert_eq!(config, Configuration::default());
        assert!(state.model().is_ok());
    }
}
