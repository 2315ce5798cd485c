mod common;

use std::ffi::{CStr, CString};

use common::*;
use gravity::config::GravityConfig;
use itrf_gravity::ffi::{freeArrayMemory, gravityLastError, gravityVector_ITRF};
use itrf_gravity::prelude::*;
use nalgebra::Vector3;

// Kept as the only test in this binary since it changes the process environment.
#[test]
fn c_entry_points_round_trip() {
    let dir = ModelDir::new();
    write_egm96_low(&dir.config());
    unsafe { std::env::set_var(GravityConfig::GRAVITY_PATH_VAR, &dir.path) };

    let position = [6378137.0, 0.0, 0.0];
    let model = CString::new("egm96low").unwrap();
    let buffer = unsafe { gravityVector_ITRF(position.as_ptr(), 2451545.0, 10, model.as_ptr()) };
    assert!(!buffer.is_null());
    assert!(gravityLastError().is_null());

    let values = unsafe { std::slice::from_raw_parts(buffer, 3) }.to_vec();
    unsafe { freeArrayMemory(buffer) };

    let expected = GravityEvaluator::new(dir.config())
        .evaluate(&Vector3::from_column_slice(&position), 2451545.0, 10, "egm96low")
        .unwrap();
    assert_eq!(values, expected.as_slice());
    assert!(values[0] < -9.7);

    // failures come back as null with a message
    let missing = CString::new("egm2008").unwrap();
    let buffer = unsafe { gravityVector_ITRF(position.as_ptr(), 2451545.0, 10, missing.as_ptr()) };
    assert!(buffer.is_null());
    let message = unsafe { CStr::from_ptr(gravityLastError()) }.to_str().unwrap();
    assert!(message.contains("egm2008"), "{}", message);

    let buffer = unsafe { gravityVector_ITRF(position.as_ptr(), 2451545.0, 11, model.as_ptr()) };
    assert!(buffer.is_null());
    let message = unsafe { CStr::from_ptr(gravityLastError()) }.to_str().unwrap();
    assert!(message.contains("max degree 10"), "{}", message);

    unsafe { std::env::remove_var(GravityConfig::GRAVITY_PATH_VAR) };
}
