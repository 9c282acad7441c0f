//! Error type for fallible construction and math operations.

use thiserror::Error;

/// Errors raised while building shapes, materials and bodies, or by the
/// fallible vector operations in [`crate::math`].
///
/// The simulation step itself never returns an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("division by zero")]
    DivideByZero,

    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    #[error("{name} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

pub type Result<T> = std::result::Result<T, PhysicsError>;

/// Check that `value` lies in `[min, max]` and is finite.
pub(crate) fn check_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<f32> {
    if value.is_finite() && value >= min && value <= max {
        Ok(value)
    } else {
        Err(PhysicsError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}
