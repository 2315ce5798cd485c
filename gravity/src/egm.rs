use std::path::PathBuf;
use std::sync::Arc;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize, Serializer};
use spherical_harmonics::SphericalHarmonics;

use crate::config::GravityConfig;
use crate::model::GravityCoefficients;
use crate::{GravityErrors, GravityModel};

/// Spherical harmonic gravity from a model file, e.g. EGM96 or EGM2008.
///
/// Returns the full gravitational acceleration, central term included. No
/// centrifugal term is added, so the result is frame agnostic: it is
/// expressed in whatever frame the position was given in.
///
/// Serializes as the model name, truncation and data directory, and reloads
/// the coefficients on deserialization. Tables built in memory with
/// [`EgmGravity::from_coefficients`] have no directory and fail to serialize.
#[derive(Clone, Debug, Deserialize)]
#[serde(try_from = "EgmSettings")]
pub struct EgmGravity {
    coefficients: Arc<GravityCoefficients>,
    spherical_harmonics: SphericalHarmonics,
}

impl EgmGravity {
    pub fn load(
        model: &str,
        config: &GravityConfig,
        degree: usize,
        order: usize,
    ) -> Result<Self, GravityErrors> {
        let coefficients = GravityCoefficients::load(model, config, degree, order)?;
        Self::from_coefficients(Arc::new(coefficients))
    }

    pub fn from_coefficients(coefficients: Arc<GravityCoefficients>) -> Result<Self, GravityErrors> {
        let spherical_harmonics = SphericalHarmonics::new(coefficients.degree, coefficients.order)?;
        Ok(Self {
            coefficients,
            spherical_harmonics,
        })
    }

    pub fn model(&self) -> &str {
        &self.coefficients.model
    }

    pub fn degree(&self) -> usize {
        self.coefficients.degree
    }

    pub fn order(&self) -> usize {
        self.coefficients.order
    }

    pub fn coefficients(&self) -> &GravityCoefficients {
        &self.coefficients
    }

    /// Gravitational potential at `r`, m^2/s^2.
    pub fn potential(&mut self, r: &Vector3<f64>) -> Result<f64, GravityErrors> {
        let coefficients = &self.coefficients;
        Ok(self.spherical_harmonics.potential(
            [r.x, r.y, r.z],
            &coefficients.c,
            &coefficients.s,
            coefficients.metadata.radius,
            coefficients.metadata.mu,
        )?)
    }
}

impl GravityModel for EgmGravity {
    fn calculate(&mut self, r: &Vector3<f64>) -> Result<Vector3<f64>, GravityErrors> {
        let coefficients = &self.coefficients;
        let a = self.spherical_harmonics.calculate(
            [r.x, r.y, r.z],
            &coefficients.c,
            &coefficients.s,
            coefficients.metadata.radius,
            coefficients.metadata.mu,
        )?;
        Ok(Vector3::from(a))
    }
}

/// Serialized form of an `EgmGravity`.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct EgmSettings {
    model: String,
    degree: usize,
    order: usize,
    #[serde(default)]
    data_dir: Option<PathBuf>,
}

impl TryFrom<EgmSettings> for EgmGravity {
    type Error = GravityErrors;

    fn try_from(settings: EgmSettings) -> Result<Self, Self::Error> {
        let config = match settings.data_dir {
            Some(dir) => GravityConfig::new(dir),
            None => GravityConfig::from_env(),
        };
        EgmGravity::load(&settings.model, &config, settings.degree, settings.order)
    }
}

impl Serialize for EgmGravity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(data_dir) = &self.coefficients.data_dir else {
            return Err(serde::ser::Error::custom(format!(
                "gravity model '{}' was not loaded from a file",
                self.model()
            )));
        };
        EgmSettings {
            model: self.model().to_string(),
            degree: self.degree(),
            order: self.order(),
            data_dir: Some(data_dir.clone()),
        }
        .serialize(serializer)
    }
}
