pub mod consts;
pub mod error;

pub mod tuple;
pub mod ray;
pub mod color;

pub mod geometry;
pub mod shape;
pub mod intersect;
pub mod light;

pub mod world;
pub mod tracer;
pub mod camera;
pub mod parallel;

pub mod canvas;
pub mod scene;

use crate::consts::EPSILON;

/// Checks whether a value is close enough to zero to be treated as zero.
pub fn is_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Snaps values within `EPSILON` of zero to exactly `0.0`.
///
/// ```
/// # use lumen_tracer::align_zero;
/// assert_eq!(align_zero(1e-12), 0.0);
/// assert_eq!(align_zero(0.5), 0.5);
/// ```
pub fn align_zero(value: f64) -> f64 {
    if is_zero(value) { 0.0 } else { value }
}

pub fn feq(left: f64, right: f64) -> bool {
    is_zero(left - right)
}
