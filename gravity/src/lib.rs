use std::path::PathBuf;

use constant::ConstantGravity;
use egm::EgmGravity;
use nalgebra::Vector3;
use newtonian::NewtonianGravity;
use serde::{Deserialize, Serialize};
use spherical_harmonics::SphericalHarmonicsErrors;
use thiserror::Error;

pub mod cache;
pub mod config;
pub mod constant;
pub mod egm;
pub mod model;
pub mod newtonian;

#[derive(Debug, Error)]
pub enum GravityErrors {
    #[error("gravity model '{model}' not found at {path}")]
    ModelNotFound { model: String, path: PathBuf },
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} ended before all coefficients were read")]
    UnexpectedEof { path: PathBuf },
    #[error("{path} is not a gravity model file, expected header '{expected}'")]
    InvalidHeader { path: PathBuf, expected: &'static str },
    #[error("{path} is missing required key '{key}'")]
    MissingKey { path: PathBuf, key: &'static str },
    #[error("{path}: invalid value '{value}' for key '{key}'")]
    InvalidValue {
        path: PathBuf,
        key: String,
        value: String,
    },
    #[error("{path}: coefficient file id '{found}' does not match model id '{expected}'")]
    IdMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },
    #[error("{path}: invalid degree ({degree}) and order ({order}) in coefficient file")]
    InvalidDegreeOrder {
        path: PathBuf,
        degree: i32,
        order: i32,
    },
    #[error(
        "requested degree {degree} and order {order} exceed model '{model}' (max degree {max_degree}, max order {max_order})"
    )]
    DegreeOutOfRange {
        model: String,
        degree: usize,
        order: usize,
        max_degree: i32,
        max_order: i32,
    },
    #[error("coefficient tables must be lower triangular and of the same shape")]
    MalformedTable,
    #[error("{path}: unsupported normalization '{value}'")]
    UnsupportedNormalization { path: PathBuf, value: String },
    #[error("could not parse gravity config: {0}")]
    Config(#[from] ron::error::SpannedError),
    #[error("SphericalHarmonicsError: {0}")]
    SphericalHarmonicsErrors(#[from] SphericalHarmonicsErrors),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Gravity {
    Constant(ConstantGravity),
    Newtonian(NewtonianGravity),
    Egm(EgmGravity),
}

impl GravityModel for Gravity {
    fn calculate(&mut self, r: &Vector3<f64>) -> Result<Vector3<f64>, GravityErrors> {
        match self {
            Gravity::Constant(g) => g.calculate(r),
            Gravity::Newtonian(g) => g.calculate(r),
            Gravity::Egm(g) => g.calculate(r),
        }
    }
}

pub trait GravityModel {
    // input r is the position vector in the frame the model is evaluated in
    // returns gravitational acceleration in that same frame
    fn calculate(&mut self, r: &Vector3<f64>) -> Result<Vector3<f64>, GravityErrors>;
}
