//! Checked linear-algebra helpers layered on top of glam.
//!
//! glam's `Mat4::inverse` and `Vec3::normalize` silently produce NaN/Inf for
//! singular matrices and zero vectors. The renderer never wants that to leak
//! into a ray table, so callers go through these and decide what a failure
//! means for them.

use crate::{Mat4, Vec3};

/// Determinants with a magnitude below this are treated as singular.
pub const DETERMINANT_EPSILON: f32 = 1e-12;

/// Invert a 4x4 matrix, returning `None` if it is singular or non-finite.
///
/// The inverse itself is glam's adjugate / determinant expansion.
pub fn checked_inverse(m: &Mat4) -> Option<Mat4> {
    let det = m.determinant();
    if !det.is_finite() || det.abs() < DETERMINANT_EPSILON {
        return None;
    }

    let inverse = m.inverse();
    inverse.is_finite().then_some(inverse)
}

/// Normalize a vector, returning `None` for zero-length or non-finite input.
#[inline]
pub fn checked_normalize(v: Vec3) -> Option<Vec3> {
    v.try_normalize()
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
