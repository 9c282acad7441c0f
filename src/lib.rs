//! impulse2d
//!
//! A 2D rigid body physics core: integration, SAT collision detection and
//! sequential impulse contact resolution.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **math** - Vector helpers on top of `glam::Vec2`
//! 2. **error** - Construction-time error type
//! 3. **physics** - Bodies, colliders, collision pipeline and the [`World`]
//!
//! Rendering, input and the frame-rate driver are left to the caller; they
//! only read body transforms and colliders through the [`World`] API.

pub mod error;
pub mod math;
pub mod physics;

// Re-export commonly used types
pub use error::{PhysicsError, Result};

pub use math::Vector2;

pub use physics::{
    broadphase::Broadphase,
    collider::{Aabb, Circle, Collider, Polygon},
    contact::{ContactInfo, ContactManifold, ContactSet},
    material::{Material, MaterialLimits},
    rigid_body::RigidBody,
    transform::Transform,
    BodyHandle, PhysicsConfig, World,
};

// Re-export glam for convenience
pub use glam;
