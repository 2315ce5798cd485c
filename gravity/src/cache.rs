use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::GravityErrors;
use crate::config::GravityConfig;
use crate::model::GravityCoefficients;

type CacheKey = (PathBuf, String, usize, usize);

/// Coefficient tables that have already been read from disk, keyed by data
/// directory, model and truncation. Shared between threads behind an `Arc`.
#[derive(Debug, Default)]
pub struct ModelCache {
    models: Mutex<HashMap<CacheKey, Arc<GravityCoefficients>>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(
        &self,
        model: &str,
        config: &GravityConfig,
        degree: usize,
        order: usize,
    ) -> Result<Arc<GravityCoefficients>, GravityErrors> {
        let key = (config.data_dir.clone(), model.to_string(), degree, order);
        if let Some(coefficients) = self.lock().get(&key) {
            log::debug!("gravity model cache hit for '{}' ({}x{})", model, degree, order);
            return Ok(Arc::clone(coefficients));
        }

        log::debug!("gravity model cache miss for '{}' ({}x{})", model, degree, order);
        // read outside the lock, a racing load of the same key just loses the insert
        let coefficients = Arc::new(GravityCoefficients::load(model, config, degree, order)?);
        let mut models = self.lock();
        let entry = models.entry(key).or_insert(coefficients);
        Ok(Arc::clone(entry))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<GravityCoefficients>>> {
        // the map is never left half-updated, so a poisoned lock is still usable
        self.models
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
