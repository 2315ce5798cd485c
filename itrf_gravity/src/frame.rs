use std::f64::consts::TAU;

use rotations::prelude::*;
use time::Epoch;

/// Earth rotation angle at J2000.0, in revolutions.
pub const ERA_J2000: f64 = 0.7790572732640;
/// Revolutions per UT1 day.
pub const ERA_RATE: f64 = 1.00273781191135448;

/// Linear Earth rotation angle in radians, reduced to [0, 2pi).
/// The Julian date is used directly as UT1; there is no polar motion,
/// precession or nutation.
pub fn earth_rotation_angle(epoch: &Epoch) -> f64 {
    let revolutions = ERA_J2000 + ERA_RATE * epoch.days_since_j2000();
    (TAU * revolutions).rem_euclid(TAU)
}

/// Rotation taking ITRF coordinates to GCRF coordinates at `epoch`.
///
/// `rotate` maps ITRF to GCRF (x' = x cos + y sin, y' = -x sin + y cos) and
/// `transform` maps GCRF back to ITRF with the transpose of the same matrix.
pub fn itrf_to_gcrf(epoch: &Epoch) -> RotationMatrix {
    RotationMatrix::about_z(earth_rotation_angle(epoch)).inv()
}
