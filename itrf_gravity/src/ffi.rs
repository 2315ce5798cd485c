//! C entry points, built into the `cdylib`.
//!
//! ```c
//! double *gravityVector_ITRF(const double *position, double epoch_jd,
//!                            int harmonic_degree, const char *model);
//! void freeArrayMemory(double *array);
//! const char *gravityLastError(void);
//! ```
//!
//! The model directory comes from the environment, see `GravityConfig::from_env`.

use std::cell::RefCell;
use std::ffi::{CStr, CString, c_char, c_int};
use std::ptr;

use nalgebra::Vector3;

use crate::EvaluatorErrors;
use crate::evaluator::GravityEvaluator;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Gravitational acceleration in ITRF at `position` (3 values, ITRF, m).
///
/// Returns a buffer of 3 values to be released with [`freeArrayMemory`], or
/// null on failure, in which case [`gravityLastError`] has the reason.
///
/// # Safety
///
/// `position` must point to 3 readable `f64` and `model` to a nul terminated
/// string, or be null.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub unsafe extern "C" fn gravityVector_ITRF(
    position: *const f64,
    epoch_jd: f64,
    harmonic_degree: c_int,
    model: *const c_char,
) -> *mut f64 {
    let result = unsafe { read_arguments(position, harmonic_degree, model) }.and_then(
        |(position, degree, model)| {
            GravityEvaluator::from_env().evaluate(&position, epoch_jd, degree, &model)
        },
    );

    match result {
        Ok(a) => {
            set_last_error(None);
            Box::into_raw(Box::new([a.x, a.y, a.z])) as *mut f64
        }
        Err(e) => {
            log::error!("gravityVector_ITRF failed: {}", e);
            set_last_error(Some(e.to_string()));
            ptr::null_mut()
        }
    }
}

/// Releases a buffer returned by [`gravityVector_ITRF`]. Null is ignored.
///
/// # Safety
///
/// `array` must come from [`gravityVector_ITRF`] and not have been released.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub unsafe extern "C" fn freeArrayMemory(array: *mut f64) {
    if !array.is_null() {
        unsafe {
            drop(Box::from_raw(array as *mut [f64; 3]));
        }
    }
}

/// Message of the last failure on this thread, or null after a success.
/// The pointer is valid until the next call into this library on the thread.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub extern "C" fn gravityLastError() -> *const c_char {
    LAST_ERROR.with(|last| {
        last.borrow()
            .as_ref()
            .map_or(ptr::null(), |message| message.as_ptr())
    })
}

unsafe fn read_arguments(
    position: *const f64,
    harmonic_degree: c_int,
    model: *const c_char,
) -> Result<(Vector3<f64>, usize, String), EvaluatorErrors> {
    if position.is_null() {
        return Err(EvaluatorErrors::NullPointer("position"));
    }
    if model.is_null() {
        return Err(EvaluatorErrors::NullPointer("model"));
    }
    let degree =
        usize::try_from(harmonic_degree).map_err(|_| EvaluatorErrors::InvalidDegree(harmonic_degree))?;

    let values = unsafe { std::slice::from_raw_parts(position, 3) };
    let model = unsafe { CStr::from_ptr(model) }
        .to_str()
        .map_err(|_| EvaluatorErrors::InvalidModelId)?;
    Ok((Vector3::from_column_slice(values), degree, model.to_string()))
}

fn set_last_error(message: Option<String>) {
    let message = message.map(|m| CString::new(m.replace('\0', " ")).unwrap_or_default());
    LAST_ERROR.with(|last| *last.borrow_mut() = message);
}
