//! Sequential impulse contact solver with Coulomb friction.

use crate::math;

use super::contact::ContactManifold;
use super::rigid_body::RigidBody;
use super::PhysicsConfig;

/// Combine two material coefficients. Fixed policy: simple average.
#[inline]
pub fn mix(a: f32, b: f32) -> f32 {
    0.5 * (a + b)
}

/// Resolve every manifold once, in order.
pub fn resolve_contacts(
    manifolds: &[ContactManifold],
    bodies: &mut [RigidBody],
    config: &PhysicsConfig,
) {
    for manifold in manifolds {
        let (a, b) = pair_mut(bodies, manifold.index_a, manifold.index_b);
        resolve_manifold(manifold, a, b, config);
    }
}

/// Positional correction followed by normal and friction impulses for each
/// contact point.
pub fn resolve_manifold(
    manifold: &ContactManifold,
    a: &mut RigidBody,
    b: &mut RigidBody,
    config: &PhysicsConfig,
) {
    let total_inverse_mass = a.inverse_mass() + b.inverse_mass();
    // Both static: never produced by the broadphase
    if total_inverse_mass <= 0.0 {
        return;
    }

    let normal = manifold.normal;

    // 1. Positional correction, split by inverse mass
    let penetration =
        (manifold.depth - config.penetration_slop).max(0.0) * config.position_correction;
    if penetration > 0.0 {
        let correction = normal * (penetration / total_inverse_mass);
        a.shift(-correction * a.inverse_mass());
        b.shift(correction * b.inverse_mass());
    }

    let restitution = mix(a.material().restitution(), b.material().restitution());
    let static_friction = mix(a.material().static_friction(), b.material().static_friction());
    let dynamic_friction = mix(
        a.material().dynamic_friction(),
        b.material().dynamic_friction(),
    );
    let contact_count = manifold.contacts.len() as f32;

    for &point in manifold.contacts.iter() {
        // 2. Relative velocity at the contact
        let r_a = point - a.position();
        let r_b = point - b.position();

        let relative_velocity = b.velocity_at(r_b) - a.velocity_at(r_a);
        let contact_velocity = relative_velocity.dot(normal);

        // Separating
        if contact_velocity > 0.0 {
            continue;
        }

        // 3. Normal impulse
        let ra_cross_n = math::cross(r_a, normal);
        let rb_cross_n = math::cross(r_b, normal);
        let inv_mass_sum = total_inverse_mass
            + ra_cross_n * ra_cross_n * a.inverse_inertia()
            + rb_cross_n * rb_cross_n * b.inverse_inertia();

        let j = -(1.0 + restitution) * contact_velocity / inv_mass_sum / contact_count;

        let impulse = normal * j;
        a.apply_impulse(-impulse, r_a);
        b.apply_impulse(impulse, r_b);

        // 4. Friction impulse against the post-impulse tangential velocity
        let relative_velocity = b.velocity_at(r_b) - a.velocity_at(r_a);
        let tangent_velocity = relative_velocity - normal * relative_velocity.dot(normal);
        let Ok(tangent) = math::normalize(tangent_velocity) else {
            continue;
        };

        let jt = -relative_velocity.dot(tangent) / inv_mass_sum / contact_count;

        // Coulomb: stick inside the static cone, slide otherwise
        let friction_impulse = if jt.abs() <= j * static_friction {
            tangent * jt
        } else {
            tangent * (-j * dynamic_friction)
        };

        a.apply_impulse(-friction_impulse, r_a);
        b.apply_impulse(friction_impulse, r_b);
    }
}

/// Borrow two distinct bodies mutably.
fn pair_mut(bodies: &mut [RigidBody], i: usize, j: usize) -> (&mut RigidBody, &mut RigidBody) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = bodies.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = bodies.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}
