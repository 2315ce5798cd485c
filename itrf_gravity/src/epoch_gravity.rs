use chrono::NaiveDateTime;
use nalgebra::{SVector, Vector3};
use time::Epoch;

use crate::EvaluatorErrors;
use crate::evaluator::GravityEvaluator;

/// Gravity for a propagation that starts at a fixed date.
///
/// Holds the start epoch, degree and model so callers only pass the ITRF
/// position and the seconds elapsed since the start.
#[derive(Debug, Clone)]
pub struct EpochGravity {
    start: Epoch,
    degree: usize,
    model: String,
    evaluator: GravityEvaluator,
}

impl EpochGravity {
    pub const DEFAULT_DEGREE: usize = 10;
    pub const DEFAULT_MODEL: &'static str = "egm2008";

    pub fn new(start: Epoch, degree: usize, model: &str, evaluator: GravityEvaluator) -> Self {
        Self {
            start,
            degree,
            model: model.to_string(),
            evaluator,
        }
    }

    /// Degree 10 `egm2008` from the environment's data directory, cached.
    pub fn from_datetime(start: NaiveDateTime) -> Result<Self, EvaluatorErrors> {
        Ok(Self::new(
            Epoch::from_datetime(start)?,
            Self::DEFAULT_DEGREE,
            Self::DEFAULT_MODEL,
            GravityEvaluator::from_env().with_cache(),
        ))
    }

    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn start(&self) -> Epoch {
        self.start
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn acceleration(
        &self,
        position: &Vector3<f64>,
        seconds_since_start: f64,
    ) -> Result<Vector3<f64>, EvaluatorErrors> {
        let epoch = self.start + seconds_since_start;
        self.evaluator
            .evaluate(position, epoch.jd(), self.degree, &self.model)
    }

    /// Contribution to the derivative of an ITRF position/velocity state,
    /// `[0, 0, 0, ax, ay, az]`.
    pub fn state_derivative(
        &self,
        position: &Vector3<f64>,
        seconds_since_start: f64,
    ) -> Result<SVector<f64, 6>, EvaluatorErrors> {
        let a = self.acceleration(position, seconds_since_start)?;
        let mut dx = SVector::<f64, 6>::zeros();
        dx.fixed_rows_mut::<3>(3).copy_from(&a);
        Ok(dx)
    }
}
