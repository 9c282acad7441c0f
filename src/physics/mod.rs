//! 2D rigid body simulation with impulse-based collision response.
//!
//! # Architecture
//!
//! Each call to [`World::step`] runs `iterations` sub-steps of `dt / iterations`:
//!
//! 1. Integrate bodies (gravity, forces, velocities, positions)
//! 2. Clear force accumulators
//! 3. Broadphase collision detection (AABB overlap)
//! 4. Narrowphase collision detection (SAT)
//! 5. Resolve contacts (positional correction, then sequential impulses)
//!
//! Bodies must not be added or removed while a step is running. The borrow
//! checker enforces this since stepping takes `&mut World`.

pub mod broadphase;
pub mod collider;
pub mod contact;
pub mod material;
pub mod narrowphase;
pub mod rigid_body;
pub mod solver;
pub mod transform;

use std::fmt;

use glam::Vec2;
use tracing::{debug, trace, warn};

use crate::math::Vector2;

use self::broadphase::Broadphase;
use self::collider::Aabb;
use self::contact::ContactManifold;
use self::narrowphase::detect_collision;
use self::rigid_body::RigidBody;

/// Fewest sub-steps a single [`World::step`] will run.
pub const MIN_ITERATIONS: u32 = 1;
/// Most sub-steps a single [`World::step`] will run.
pub const MAX_ITERATIONS: u32 = 128;

/// Configuration for the physics simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    /// Gravity vector (y-up). Default: (0, -9.81).
    pub gravity: Vector2,
    /// Number of sub-steps used by [`World::tick`]. Default: 8.
    pub iterations: u32,
    /// Fraction of the penetration removed per sub-step, in (0, 1]. Default: 0.8.
    pub position_correction: f32,
    /// Penetration tolerated before positional correction kicks in. Default: 0.005.
    pub penetration_slop: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            iterations: 8,
            position_correction: 0.8,
            penetration_slop: 0.005,
        }
    }
}

impl PhysicsConfig {
    /// Clamp every field into its usable range.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if !self.gravity.is_finite() {
            warn!(gravity = ?self.gravity, "non-finite gravity, using default");
            self.gravity = defaults.gravity;
        }

        let iterations = self.iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS);
        if iterations != self.iterations {
            warn!(requested = self.iterations, iterations, "iterations clamped");
            self.iterations = iterations;
        }

        if self.position_correction.is_nan() || self.position_correction <= 0.0 {
            warn!(
                value = self.position_correction,
                "position_correction must be positive, using default"
            );
            self.position_correction = defaults.position_correction;
        } else if self.position_correction > 1.0 {
            warn!(value = self.position_correction, "position_correction clamped to 1");
            self.position_correction = 1.0;
        }

        if !self.penetration_slop.is_finite() || self.penetration_slop < 0.0 {
            warn!(value = self.penetration_slop, "penetration_slop clamped to 0");
            self.penetration_slop = 0.0;
        }

        self
    }
}

/// Stable identifier for a body in a [`World`].
///
/// Handles are never reused, so a stale handle simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(u64);

impl BodyHandle {
    pub(crate) const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Raw id, mostly useful for logging.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// The physics world owning every body and the step loop.
#[derive(Debug)]
pub struct World {
    config: PhysicsConfig,
    bodies: Vec<RigidBody>,
    /// Parallel to `bodies`. Ids only grow, so this stays sorted.
    handles: Vec<BodyHandle>,
    next_id: u64,
    broadphase: Broadphase,
    contacts: Vec<ContactManifold>,
}

impl Default for World {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl World {
    /// Create a new world. Out-of-range config values are clamped.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config: config.sanitized(),
            bodies: Vec::new(),
            handles: Vec::new(),
            next_id: 0,
            broadphase: Broadphase::new(),
            contacts: Vec::new(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn gravity(&self) -> Vector2 {
        self.config.gravity
    }

    /// Change gravity between steps. Non-finite values are ignored.
    pub fn set_gravity(&mut self, gravity: Vector2) {
        if gravity.is_finite() {
            self.config.gravity = gravity;
        } else {
            warn!(?gravity, "ignoring non-finite gravity");
        }
    }

    /// Add a body. It collides after every body added before it.
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let handle = BodyHandle::from_raw(self.next_id);
        self.next_id += 1;

        debug!(
            %handle,
            is_static = body.is_static(),
            mass = body.mass(),
            "body added"
        );

        self.bodies.push(body);
        self.handles.push(handle);
        handle
    }

    /// Remove a body, returning whether it was present.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.take_body(handle).is_some()
    }

    /// Remove a body and hand it back to the caller.
    ///
    /// Remaining bodies keep their relative order.
    pub fn take_body(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        let index = self.index_of(handle)?;
        self.handles.remove(index);
        let body = self.bodies.remove(index);
        // Cached manifolds hold indices into `bodies`
        self.contacts.clear();
        debug!(%handle, remaining = self.bodies.len(), "body removed");
        Some(body)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.index_of(handle).map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.index_of(handle).map(|i| &mut self.bodies[i])
    }

    /// Bodies in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> + '_ {
        self.handles.iter().copied().zip(self.bodies.iter())
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Remove every body. Handles keep counting up.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.handles.clear();
        self.contacts.clear();
    }

    /// Manifolds found in the last sub-step.
    pub fn contacts(&self) -> &[ContactManifold] {
        &self.contacts
    }

    /// Handles of bodies whose bounds overlap `region`.
    pub fn query_aabb<'a>(&'a self, region: &'a Aabb) -> impl Iterator<Item = BodyHandle> + 'a {
        self.bodies()
            .filter(move |(_, body)| body.bounds().overlaps(region))
            .map(|(handle, _)| handle)
    }

    /// Step the simulation forward by `dt` seconds using the configured
    /// number of sub-steps.
    pub fn tick(&mut self, dt: f32) {
        self.step(dt, self.config.iterations);
    }

    /// Step the simulation forward by `dt` seconds, split into `iterations`
    /// equal sub-steps.
    ///
    /// A non-finite or non-positive `dt` leaves the world untouched.
    pub fn step(&mut self, dt: f32, iterations: u32) {
        if !dt.is_finite() || dt <= 0.0 {
            warn!(dt, "ignoring step with invalid dt");
            return;
        }

        let iterations = iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS);
        let sub_dt = dt / iterations as f32;

        for _ in 0..iterations {
            self.sub_step(sub_dt);
        }

        trace!(
            dt,
            iterations,
            bodies = self.bodies.len(),
            contacts = self.contacts.len(),
            "world stepped"
        );
    }

    fn sub_step(&mut self, dt: f32) {
        let gravity = self.config.gravity;

        // 1-2. Integrate and clear accumulators
        for body in &mut self.bodies {
            body.integrate(dt, gravity);
        }

        // 3. Broadphase
        let pairs = self.broadphase.find_pairs(&self.bodies);
        let candidates = pairs.len();

        // 4. Narrowphase
        self.contacts.clear();
        for &(i, j) in pairs {
            let (a, b) = (&self.bodies[i], &self.bodies[j]);
            let Some(info) = detect_collision(a.collider(), a.transform(), b.collider(), b.transform())
            else {
                continue;
            };

            if !info.is_valid() {
                trace!(
                    body_a = %self.handles[i],
                    body_b = %self.handles[j],
                    ?info,
                    "skipping degenerate contact"
                );
                continue;
            }

            self.contacts.push(ContactManifold::new(
                (i, self.handles[i]),
                (j, self.handles[j]),
                info,
            ));
        }

        trace!(candidates, manifolds = self.contacts.len(), "narrowphase done");

        // 5. Resolve
        solver::resolve_contacts(&self.contacts, &mut self.bodies, &self.config);
    }

    fn index_of(&self, handle: BodyHandle) -> Option<usize> {
        self.handles.binary_search(&handle).ok()
    }
}
