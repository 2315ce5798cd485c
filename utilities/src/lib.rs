use std::path::PathBuf;

use uuid::Uuid;

/// Creates a fresh, empty directory under the system temp dir.
/// Callers are responsible for removing it.
pub fn unique_temp_dir(prefix: &str) -> std::io::Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("{}-{}", prefix, Uuid::new_v4()));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn assert_equal(left: f64, right: f64) {
    assert_equal_reltol(left, right, 1e-9);
}

pub fn assert_equal_reltol(left: f64, right: f64, reltol: f64) {
    let max = left.abs().max(right.abs());
    if max < f64::EPSILON {
        // If both values are close to zero, we consider them equal
        return;
    }
    let abs_diff = (left - right).abs();
    let rel_diff = abs_diff / max;

    assert!(
        rel_diff < reltol,
        "Assertion failed: left ({}) and right ({}) are not approximately equal. Relative difference: {}. Absolute difference: {}",
        left,
        right,
        rel_diff,
        abs_diff,
    );
}

/// Compares two 3-vectors component-wise, relative to the larger of the two norms.
/// Small components of a large vector are not held to a relative tolerance of their own.
pub fn assert_vector_equal(left: [f64; 3], right: [f64; 3], reltol: f64) {
    let norm = |v: [f64; 3]| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    let scale = norm(left).max(norm(right));
    if scale < f64::EPSILON {
        return;
    }
    for i in 0..3 {
        let abs_diff = (left[i] - right[i]).abs();
        assert!(
            abs_diff / scale < reltol,
            "Assertion failed at component {}: left {:?} and right {:?} differ by {} (scale {})",
            i,
            left,
            right,
            abs_diff,
            scale,
        );
    }
}
