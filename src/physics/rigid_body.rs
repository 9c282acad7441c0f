//! Rigid bodies: shape factories, mass properties and integration.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::error::{PhysicsError, Result};
use crate::math::{self, Vector2};

use super::collider::{Aabb, Collider, Polygon};
use super::material::Material;
use super::transform::Transform;

/// A body with a collider, a material and mass properties.
///
/// Static bodies have zero mass, inertia and inverse forms; they are never
/// moved by integration or impulses.
#[derive(Debug, Clone)]
pub struct RigidBody {
    transform: Transform,
    collider: Collider,
    material: Material,
    mass: f32,
    inverse_mass: f32,
    inertia: f32,
    inverse_inertia: f32,
    linear_velocity: Vector2,
    angular_velocity: f32,
    force: Vector2,
    torque: f32,
    is_static: bool,
}

impl RigidBody {
    /// Create a circle body centered on `position`.
    pub fn circle(
        position: Vector2,
        radius: f32,
        material: Material,
        is_static: bool,
    ) -> Result<Self> {
        let collider = Collider::circle(radius)?;
        let mass = collider.area() * material.density();
        let inertia = 0.5 * mass * radius * radius;
        Self::with_mass_properties(position, collider, material, mass, inertia, is_static)
    }

    /// Create an axis-aligned `width` x `height` box centered on `position`.
    pub fn rectangle(
        position: Vector2,
        width: f32,
        height: f32,
        material: Material,
        is_static: bool,
    ) -> Result<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(PhysicsError::InvalidShape(format!(
                "rectangle extents must be positive, got {width} x {height}"
            )));
        }
        let (hw, hh) = (0.5 * width, 0.5 * height);
        let collider = Collider::polygon(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ])?;
        let mass = collider.area() * material.density();
        let inertia = mass * (width * width + height * height) / 12.0;
        Self::with_mass_properties(position, collider, material, mass, inertia, is_static)
    }

    /// Create a regular polygon with `sides` vertices on a circle of `radius`.
    pub fn polygon(
        position: Vector2,
        radius: f32,
        sides: usize,
        material: Material,
        is_static: bool,
    ) -> Result<Self> {
        if !(Polygon::MIN_VERTICES..=Polygon::MAX_VERTICES).contains(&sides) {
            return Err(PhysicsError::InvalidShape(format!(
                "regular polygon needs {}..={} sides, got {sides}",
                Polygon::MIN_VERTICES,
                Polygon::MAX_VERTICES
            )));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PhysicsError::InvalidShape(format!(
                "polygon radius must be positive, got {radius}"
            )));
        }
        let theta = TAU / sides as f32;
        let vertices = (0..sides)
            .map(|i| {
                let (sin, cos) = (i as f32 * theta).sin_cos();
                Vec2::new(cos * radius, sin * radius)
            })
            .collect();
        let collider = Collider::polygon(vertices)?;
        let mass = collider.area() * material.density();
        let s = (PI / sides as f32).sin();
        let inertia = 0.5 * mass * radius * radius * (1.0 - (2.0 / 3.0) * s * s);
        Self::with_mass_properties(position, collider, material, mass, inertia, is_static)
    }

    /// Create a body from an arbitrary collider. Inertia is taken about the
    /// body origin, so polygon vertices should be centered on it.
    pub fn from_collider(
        position: Vector2,
        collider: Collider,
        material: Material,
        is_static: bool,
    ) -> Result<Self> {
        let mass = collider.area() * material.density();
        let inertia = collider.inertia(mass);
        Self::with_mass_properties(position, collider, material, mass, inertia, is_static)
    }

    fn with_mass_properties(
        position: Vector2,
        collider: Collider,
        material: Material,
        mass: f32,
        inertia: f32,
        is_static: bool,
    ) -> Result<Self> {
        if !position.is_finite() {
            return Err(PhysicsError::InvalidShape(format!(
                "body position must be finite, got {position}"
            )));
        }

        let (mass, inverse_mass, inertia, inverse_inertia) = if is_static {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            if !(mass.is_finite() && mass > 0.0 && inertia.is_finite() && inertia > 0.0) {
                return Err(PhysicsError::InvalidShape(format!(
                    "dynamic body needs positive mass and inertia, got m={mass} I={inertia}"
                )));
            }
            (mass, 1.0 / mass, inertia, 1.0 / inertia)
        };

        Ok(Self {
            transform: Transform::from_position(position),
            collider,
            material,
            mass,
            inverse_mass,
            inertia,
            inverse_inertia,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            is_static,
        })
    }

    /// Builder-style initial rotation.
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.transform.rotation = rotation;
        self
    }

    /// Advance one step with semi-implicit Euler, then clear the force and
    /// torque accumulators. No-op for static bodies.
    pub fn integrate(&mut self, dt: f32, gravity: Vector2) {
        if self.is_static {
            return;
        }

        self.force += gravity * self.mass;

        self.linear_velocity += self.force * self.inverse_mass * dt;
        self.angular_velocity += self.torque * self.inverse_inertia * dt;

        self.transform.position += self.linear_velocity * dt;
        self.transform.rotation += self.angular_velocity * dt;

        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }

    /// Apply an impulse at `contact`, given relative to the center of mass.
    #[inline]
    pub fn apply_impulse(&mut self, impulse: Vector2, contact: Vector2) {
        if self.is_static {
            return;
        }
        self.linear_velocity += impulse * self.inverse_mass;
        self.angular_velocity += self.inverse_inertia * math::cross(contact, impulse);
    }

    /// Accumulate a force for the next integration.
    pub fn apply_force(&mut self, force: Vector2) {
        if !self.is_static {
            self.force += force;
        }
    }

    /// Accumulate a torque for the next integration.
    pub fn apply_torque(&mut self, torque: f32) {
        if !self.is_static {
            self.torque += torque;
        }
    }

    pub fn set_linear_velocity(&mut self, velocity: Vector2) {
        if !self.is_static {
            self.linear_velocity = velocity;
        }
    }

    pub fn set_angular_velocity(&mut self, velocity: f32) {
        if !self.is_static {
            self.angular_velocity = velocity;
        }
    }

    pub fn set_position(&mut self, position: Vector2) {
        self.transform.position = position;
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.transform.rotation = rotation;
    }

    pub fn translate(&mut self, offset: Vector2) {
        self.transform.position += offset;
    }

    pub fn rotate(&mut self, angle: f32) {
        self.transform.rotation += angle;
    }

    /// World-space bounds of the collider.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.collider.bounds(&self.transform)
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[inline]
    pub fn position(&self) -> Vector2 {
        self.transform.position
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.transform.rotation
    }

    #[inline]
    pub fn collider(&self) -> &Collider {
        &self.collider
    }

    #[inline]
    pub fn material(&self) -> &Material {
        &self.material
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        self.inverse_mass
    }

    #[inline]
    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    #[inline]
    pub fn inverse_inertia(&self) -> f32 {
        self.inverse_inertia
    }

    #[inline]
    pub fn linear_velocity(&self) -> Vector2 {
        self.linear_velocity
    }

    #[inline]
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    #[inline]
    pub fn force(&self) -> Vector2 {
        self.force
    }

    #[inline]
    pub fn torque(&self) -> f32 {
        self.torque
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Velocity of the body point at `r` (relative to the center of mass).
    #[inline]
    pub(crate) fn velocity_at(&self, r: Vector2) -> Vector2 {
        self.linear_velocity + math::cross_sv(self.angular_velocity, r)
    }

    /// Positional correction; skips static bodies.
    #[inline]
    pub(crate) fn shift(&mut self, offset: Vector2) {
        if !self.is_static {
            self.transform.position += offset;
        }
    }
}
