//! World-space placement of a body.

use glam::Vec2;

use crate::math::{self, Vector2};

/// Position, rotation (radians) and uniform scale of a body.
///
/// Rotation accumulates during integration and is never wrapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector2,
    pub rotation: f32,
    pub scale: f32,
}

impl Transform {
    /// Create an identity transform.
    pub fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: 1.0,
        }
    }

    /// Create a transform from a position.
    pub fn from_position(position: Vector2) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn from_position_rotation(position: Vector2, rotation: f32) -> Self {
        Self {
            position,
            rotation,
            scale: 1.0,
        }
    }

    /// Map a local-space point into world space (scale, then rotate, then translate).
    #[inline]
    pub fn apply(&self, local: Vector2) -> Vector2 {
        math::rotate(local * self.scale, self.rotation, Vec2::ZERO) + self.position
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
