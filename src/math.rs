//! 2D vector math on top of `glam::Vec2`.
//!
//! glam already provides the operator set (add, subtract, scale, dot,
//! length). This module adds the fallible forms and the 2D cross products
//! used by the solver.

use glam::Vec2;

use crate::error::{PhysicsError, Result};

/// 2D vector type used throughout the crate.
pub type Vector2 = Vec2;

/// Axis substituted when a zero-length vector has to be normalized.
pub const FALLBACK_AXIS: Vector2 = Vec2::X;

/// Tolerance for contact point and distance comparisons.
pub const CONTACT_EPSILON: f32 = 5e-4;

/// Divide a vector by a scalar. Fails on a zero divisor.
#[inline]
pub fn divide(v: Vector2, scalar: f32) -> Result<Vector2> {
    if scalar == 0.0 {
        return Err(PhysicsError::DivideByZero);
    }
    Ok(v / scalar)
}

/// Normalize a vector. Fails when its magnitude is zero (or not finite).
#[inline]
pub fn normalize(v: Vector2) -> Result<Vector2> {
    v.try_normalize().ok_or(PhysicsError::DegenerateVector)
}

/// Normalize a vector, recovering from a degenerate input with [`FALLBACK_AXIS`].
#[inline]
pub fn normalize_or_fallback(v: Vector2) -> Vector2 {
    match normalize(v) {
        Ok(n) => n,
        Err(_) => {
            tracing::trace!(?v, "degenerate axis, using fallback");
            FALLBACK_AXIS
        }
    }
}

/// Scalar 2D cross product `a × b`.
#[inline]
pub fn cross(a: Vector2, b: Vector2) -> f32 {
    a.perp_dot(b)
}

/// Scalar × vector cross product, e.g. angular velocity × lever arm.
#[inline]
pub fn cross_sv(s: f32, v: Vector2) -> Vector2 {
    Vec2::new(-s * v.y, s * v.x)
}

/// Vector × scalar cross product.
#[inline]
pub fn cross_vs(v: Vector2, s: f32) -> Vector2 {
    Vec2::new(s * v.y, -s * v.x)
}

/// Rotate `v` by `angle` radians about `origin`.
#[inline]
pub fn rotate(v: Vector2, angle: f32, origin: Vector2) -> Vector2 {
    let (sin, cos) = angle.sin_cos();
    let d = v - origin;
    origin + Vec2::new(cos * d.x - sin * d.y, sin * d.x + cos * d.y)
}

#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

#[inline]
pub fn nearly_equal(a: f32, b: f32) -> bool {
    (a - b).abs() < CONTACT_EPSILON
}

#[inline]
pub fn nearly_equal_vec(a: Vector2, b: Vector2) -> bool {
    a.distance_squared(b) < CONTACT_EPSILON * CONTACT_EPSILON
}

/// Closest point to `point` on the segment `start..end`.
pub fn closest_point_on_segment(point: Vector2, start: Vector2, end: Vector2) -> Vector2 {
    let ab = end - start;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return start;
    }
    let t = (point - start).dot(ab) / len_sq;
    start + ab * clamp(t, 0.0, 1.0)
}
