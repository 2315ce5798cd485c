use std::sync::Arc;

use gravity::GravityModel;
use gravity::cache::ModelCache;
use gravity::config::GravityConfig;
use gravity::egm::EgmGravity;
use nalgebra::Vector3;
use rotations::prelude::*;
use time::Epoch;

use crate::EvaluatorErrors;
use crate::frame::itrf_to_gcrf;

/// Gravitational acceleration in the rotating Earth frame.
///
/// Positions are ITRF, in metres. They are rotated into GCRF by the Earth
/// rotation angle, the field model is evaluated there, and the acceleration is
/// rotated back with the transpose of the same matrix.
///
/// Without a cache every call reads the model from disk.
#[derive(Debug, Clone)]
pub struct GravityEvaluator {
    config: GravityConfig,
    cache: Option<Arc<ModelCache>>,
}

impl GravityEvaluator {
    pub fn new(config: GravityConfig) -> Self {
        Self {
            config,
            cache: None,
        }
    }

    /// Uses the data directory found by [`GravityConfig::from_env`].
    pub fn from_env() -> Self {
        Self::new(GravityConfig::from_env())
    }

    /// Keeps loaded coefficient tables in memory, keyed by model and degree.
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(Arc::new(ModelCache::new()));
        self
    }

    /// Shares an existing cache, e.g. between evaluators on several threads.
    pub fn with_shared_cache(mut self, cache: Arc<ModelCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &GravityConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&Arc<ModelCache>> {
        self.cache.as_ref()
    }

    /// Acceleration in ITRF at `position` (ITRF, m) and Julian date `epoch_jd`,
    /// using `model` truncated to `degree` in both degree and order.
    pub fn evaluate(
        &self,
        position: &Vector3<f64>,
        epoch_jd: f64,
        degree: usize,
        model: &str,
    ) -> Result<Vector3<f64>, EvaluatorErrors> {
        // reject bad input before touching the filesystem
        check_position(position)?;
        let epoch = Epoch::from_jd(epoch_jd)?;

        let mut gravity = match &self.cache {
            Some(cache) => {
                let coefficients = cache.get_or_load(model, &self.config, degree, degree)?;
                EgmGravity::from_coefficients(coefficients)?
            }
            None => EgmGravity::load(model, &self.config, degree, degree)?,
        };
        rotate_and_evaluate(&mut gravity, position, &epoch)
    }

    /// Same frame handling as [`GravityEvaluator::evaluate`] for a model already
    /// in hand. The model sees GCRF positions and must return GCRF accelerations.
    pub fn evaluate_with<G: GravityModel>(
        gravity: &mut G,
        position: &Vector3<f64>,
        epoch_jd: f64,
    ) -> Result<Vector3<f64>, EvaluatorErrors> {
        check_position(position)?;
        let epoch = Epoch::from_jd(epoch_jd)?;
        rotate_and_evaluate(gravity, position, &epoch)
    }
}

fn check_position(position: &Vector3<f64>) -> Result<(), EvaluatorErrors> {
    if position.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(EvaluatorErrors::NonFinitePosition([
            position.x, position.y, position.z,
        ]))
    }
}

fn rotate_and_evaluate<G: GravityModel>(
    gravity: &mut G,
    position: &Vector3<f64>,
    epoch: &Epoch,
) -> Result<Vector3<f64>, EvaluatorErrors> {
    let rotation = itrf_to_gcrf(epoch);
    let position_gcrf = rotation.rotate(position);
    let acceleration_gcrf = gravity.calculate(&position_gcrf)?;
    Ok(rotation.transform(&acceleration_gcrf))
}
