//! Collider geometry and bounding boxes.

use std::f32::consts::PI;

use glam::Vec2;

use crate::error::{PhysicsError, Result};
use crate::math::{self, Vector2};

use super::transform::Transform;

/// Axis-aligned bounding box for broadphase collision detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector2,
    pub max: Vector2,
}

impl Aabb {
    pub fn new(min: Vector2, max: Vector2) -> Self {
        Self { min, max }
    }

    /// Test whether two AABBs overlap. Boxes that only touch do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }

    #[inline]
    pub fn contains_point(&self, point: Vector2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Smallest box enclosing both boxes.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[inline]
    pub fn center(&self) -> Vector2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vector2 {
        (self.max - self.min) * 0.5
    }
}

/// Circle geometry centered on the body origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    radius: f32,
    area: f32,
}

impl Circle {
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Radius after `transform`'s scale.
    #[inline]
    pub fn world_radius(&self, transform: &Transform) -> f32 {
        self.radius * transform.scale.abs()
    }
}

/// Convex polygon geometry in body-local space.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vector2>,
    area: f32,
}

impl Polygon {
    pub const MIN_VERTICES: usize = 3;
    pub const MAX_VERTICES: usize = 25;

    #[inline]
    pub fn local_vertices(&self) -> &[Vector2] {
        &self.vertices
    }

    /// Vertices mapped into world space by `transform`, in the same order.
    pub fn transformed_vertices(&self, transform: &Transform) -> Vec<Vector2> {
        self.vertices.iter().map(|v| transform.apply(*v)).collect()
    }
}

/// Collision shape owned by a rigid body.
#[derive(Debug, Clone, PartialEq)]
pub enum Collider {
    Circle(Circle),
    Polygon(Polygon),
}

impl Collider {
    /// Create a circle collider. The radius must be positive and finite.
    pub fn circle(radius: f32) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PhysicsError::InvalidShape(format!(
                "circle radius must be positive, got {radius}"
            )));
        }
        Ok(Collider::Circle(Circle {
            radius,
            area: PI * radius * radius,
        }))
    }

    /// Create a polygon collider from local-space vertices (either winding).
    pub fn polygon(vertices: Vec<Vector2>) -> Result<Self> {
        let count = vertices.len();
        if !(Polygon::MIN_VERTICES..=Polygon::MAX_VERTICES).contains(&count) {
            return Err(PhysicsError::InvalidShape(format!(
                "polygon needs {}..={} vertices, got {count}",
                Polygon::MIN_VERTICES,
                Polygon::MAX_VERTICES
            )));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(PhysicsError::InvalidShape(
                "polygon vertices must be finite".into(),
            ));
        }
        let area = shoelace_area(&vertices);
        if area <= 0.0 {
            return Err(PhysicsError::InvalidShape(
                "polygon has zero area".into(),
            ));
        }
        Ok(Collider::Polygon(Polygon { vertices, area }))
    }

    /// Area computed at construction.
    #[inline]
    pub fn area(&self) -> f32 {
        match self {
            Collider::Circle(c) => c.area,
            Collider::Polygon(p) => p.area,
        }
    }

    /// Circle radius, `None` for polygons.
    #[inline]
    pub fn radius(&self) -> Option<f32> {
        match self {
            Collider::Circle(c) => Some(c.radius),
            Collider::Polygon(_) => None,
        }
    }

    /// Circle radius after `transform`'s scale, `None` for polygons.
    #[inline]
    pub fn world_radius(&self, transform: &Transform) -> Option<f32> {
        match self {
            Collider::Circle(c) => Some(c.world_radius(transform)),
            Collider::Polygon(_) => None,
        }
    }

    /// Polygon vertices in local space, `None` for circles.
    #[inline]
    pub fn local_vertices(&self) -> Option<&[Vector2]> {
        match self {
            Collider::Circle(_) => None,
            Collider::Polygon(p) => Some(p.local_vertices()),
        }
    }

    /// World-space polygon vertices. Empty for circles.
    pub fn transformed_vertices(&self, transform: &Transform) -> Vec<Vector2> {
        match self {
            Collider::Circle(_) => Vec::new(),
            Collider::Polygon(p) => p.transformed_vertices(transform),
        }
    }

    /// Compute the world-space AABB for this shape.
    pub fn bounds(&self, transform: &Transform) -> Aabb {
        match self {
            Collider::Circle(c) => {
                let r = Vec2::splat(c.world_radius(transform));
                Aabb {
                    min: transform.position - r,
                    max: transform.position + r,
                }
            }
            Collider::Polygon(p) => {
                let mut min = Vec2::splat(f32::MAX);
                let mut max = Vec2::splat(f32::MIN);
                for v in &p.vertices {
                    let wp = transform.apply(*v);
                    min = min.min(wp);
                    max = max.max(wp);
                }
                Aabb { min, max }
            }
        }
    }

    /// Moment of inertia about the body origin for the given mass, from the
    /// local geometry.
    pub(crate) fn inertia(&self, mass: f32) -> f32 {
        match self {
            Collider::Circle(c) => 0.5 * mass * c.radius * c.radius,
            Collider::Polygon(p) => polygon_inertia(&p.vertices, mass, p.area),
        }
    }
}

/// Unsigned polygon area from the shoelace formula.
pub(crate) fn shoelace_area(vertices: &[Vector2]) -> f32 {
    let n = vertices.len();
    let twice: f32 = (0..n)
        .map(|i| math::cross(vertices[i], vertices[(i + 1) % n]))
        .sum();
    0.5 * twice.abs()
}

/// Polygon moment of inertia about the local origin, summed over the
/// triangles fanned from the origin.
fn polygon_inertia(vertices: &[Vector2], mass: f32, area: f32) -> f32 {
    let n = vertices.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let c = math::cross(a, b);
        sum += c * (a.dot(a) + a.dot(b) + b.dot(b));
    }
    // sum / 12 is the inertia for unit density; its sign follows the winding.
    let density = mass / area;
    density * sum.abs() / 12.0
}
