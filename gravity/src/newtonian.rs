use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{GravityErrors, GravityModel};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewtonianGravity {
    pub mu: f64,
}

impl NewtonianGravity {
    pub fn new(mu: f64) -> Self {
        Self { mu }
    }
}

impl GravityModel for NewtonianGravity {
    fn calculate(&mut self, r: &Vector3<f64>) -> Result<Vector3<f64>, GravityErrors> {
        let r_mag = r.magnitude();
        if r_mag < 0.1 {
            log::warn!("newtonian gravity evaluated {} m from the origin", r_mag);
        }
        Ok(-r * self.mu / r_mag.powi(3))
    }
}
