//! Contact data structures for collision response.

use crate::math::{self, Vector2};

use super::BodyHandle;

/// One or two world-space contact points. Never empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSet {
    points: [Vector2; 2],
    len: u8,
}

impl ContactSet {
    pub fn single(point: Vector2) -> Self {
        Self {
            points: [point, point],
            len: 1,
        }
    }

    /// Two contacts, collapsed to one when the points coincide.
    pub fn pair(first: Vector2, second: Vector2) -> Self {
        if math::nearly_equal_vec(first, second) {
            Self::single(first)
        } else {
            Self {
                points: [first, second],
                len: 2,
            }
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[Vector2] {
        &self.points[..self.len as usize]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector2> {
        self.as_slice().iter()
    }
}

/// Narrowphase result for a single shape pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactInfo {
    /// Contact normal (unit length, from shape A to shape B).
    pub normal: Vector2,
    /// Penetration depth, never negative.
    pub depth: f32,
    /// Contact points in world space.
    pub contacts: ContactSet,
}

impl ContactInfo {
    /// Same contact seen from the other shape.
    #[inline]
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }

    /// Whether the result can be fed to the solver.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.normal.is_finite()
            && (self.normal.length_squared() - 1.0).abs() < 1e-3
            && self.depth.is_finite()
            && self.depth >= 0.0
            && self.contacts.iter().all(|p| p.is_finite())
    }
}

/// Contact between two bodies for one step.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactManifold {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Contact normal (from A to B).
    pub normal: Vector2,
    pub depth: f32,
    pub contacts: ContactSet,
    pub(crate) index_a: usize,
    pub(crate) index_b: usize,
}

impl ContactManifold {
    pub(crate) fn new(
        (index_a, body_a): (usize, BodyHandle),
        (index_b, body_b): (usize, BodyHandle),
        info: ContactInfo,
    ) -> Self {
        Self {
            body_a,
            body_b,
            normal: info.normal,
            depth: info.depth,
            contacts: info.contacts,
            index_a,
            index_b,
        }
    }

    /// Whether `handle` is one of the two bodies.
    #[inline]
    pub fn involves(&self, handle: BodyHandle) -> bool {
        self.body_a == handle || self.body_b == handle
    }
}
