use gravity::GravityErrors;
use thiserror::Error;
use time::TimeErrors;

pub mod epoch_gravity;
pub mod evaluator;
pub mod ffi;
pub mod frame;

pub use epoch_gravity::EpochGravity;
pub use evaluator::GravityEvaluator;
pub use frame::{earth_rotation_angle, itrf_to_gcrf};

pub mod prelude {
    pub use crate::epoch_gravity::EpochGravity;
    pub use crate::evaluator::GravityEvaluator;
    pub use crate::frame::{earth_rotation_angle, itrf_to_gcrf};
    pub use crate::EvaluatorErrors;
    pub use gravity::config::GravityConfig;
    pub use gravity::{Gravity, GravityModel};
}

#[derive(Debug, Error)]
pub enum EvaluatorErrors {
    #[error("GravityErrors: {0}")]
    GravityErrors(#[from] GravityErrors),
    #[error("position must be finite, got {0:?}")]
    NonFinitePosition([f64; 3]),
    #[error("TimeErrors: {0}")]
    TimeErrors(#[from] TimeErrors),
    #[error("harmonic degree must be non-negative, got {0}")]
    InvalidDegree(i32),
    #[error("null pointer passed for {0}")]
    NullPointer(&'static str),
    #[error("model id is not valid utf-8")]
    InvalidModelId,
}
