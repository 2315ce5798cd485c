#![allow(dead_code)]

use std::path::PathBuf;

use gravity::config::GravityConfig;
use gravity::model::{GravityCoefficients, ModelMetadata};

pub const RE: f64 = 6378136.3;
pub const MU: f64 = 3.986004415e14;
/// fully normalized C20 of EGM96
pub const C20: f64 = -4.84165371736e-4;

/// A model directory under the system temp dir, removed on drop.
pub struct ModelDir {
    pub path: PathBuf,
}

impl ModelDir {
    pub fn new() -> Self {
        Self {
            path: utilities::unique_temp_dir("itrf-gravity").unwrap(),
        }
    }

    pub fn config(&self) -> GravityConfig {
        GravityConfig::new(&self.path)
    }
}

impl Drop for ModelDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn zeros(degree: usize) -> Vec<Vec<f64>> {
    (0..=degree).map(|n| vec![0.0; n + 1]).collect()
}

fn save(config: &GravityConfig, model: &str, id: &str, c: Vec<Vec<f64>>, s: Vec<Vec<f64>>) {
    let metadata = ModelMetadata::new(id, RE, MU);
    GravityCoefficients::new(model, metadata, c, s)
        .unwrap()
        .save(config)
        .unwrap();
}

/// Only the central term, padded with zeros to `degree`.
pub fn write_point_mass(config: &GravityConfig, degree: usize) {
    let mut c = zeros(degree);
    c[0][0] = 1.0;
    save(config, "point", "POINTMAS", c, zeros(degree));
}

/// Central term plus C20, padded with zeros to `degree`.
pub fn write_j2(config: &GravityConfig, degree: usize) {
    let mut c = zeros(degree);
    c[0][0] = 1.0;
    c[2][0] = C20;
    save(config, "j2", "J2ONLY00", c, zeros(degree));
}

/// EGM96 terms through degree 4, zero above, saved to degree 10.
pub fn write_egm96_low(config: &GravityConfig) {
    let mut c = zeros(10);
    let mut s = zeros(10);
    c[0][0] = 1.0;
    c[2][0] = C20;
    c[2][1] = -1.86987635955e-10;
    s[2][1] = 1.19528012031e-9;
    c[2][2] = 2.43914352398e-6;
    s[2][2] = -1.40016683654e-6;
    c[3][0] = 9.57254173792e-7;
    c[3][1] = 2.03046201047e-6;
    s[3][1] = 2.48200415856e-7;
    c[3][2] = 9.04787894809e-7;
    s[3][2] = -6.19005475177e-7;
    c[3][3] = 7.21321757121e-7;
    s[3][3] = 1.41434926192e-6;
    c[4][0] = 5.39873863789e-7;
    c[4][1] = -5.36321616971e-7;
    s[4][1] = -4.73440265853e-7;
    c[4][2] = 3.50694105785e-7;
    s[4][2] = 6.62671572540e-7;
    c[4][3] = 9.90771803829e-7;
    s[4][3] = -2.00928369177e-7;
    c[4][4] = -1.88560802735e-7;
    s[4][4] = 3.08853169333e-7;
    save(config, "egm96low", "EGM96LOW", c, s);
}

/// Closed form point mass plus J2 acceleration at `r` (any inertial frame with z
/// along the pole).
pub fn j2_acceleration(r: [f64; 3]) -> [f64; 3] {
    let j2 = -C20 * 5f64.sqrt();
    let [x, y, z] = r;
    let rn = (x * x + y * y + z * z).sqrt();
    let k = -MU / rn.powi(3);
    let f = 1.5 * j2 * (RE / rn).powi(2);
    let zz = 5.0 * z * z / (rn * rn);
    [
        k * x * (1.0 + f * (1.0 - zz)),
        k * y * (1.0 + f * (1.0 - zz)),
        k * z * (1.0 + f * (3.0 - zz)),
    ]
}
