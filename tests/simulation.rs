//! End-to-end behaviour of the public API: construction rules, collision
//! queries and multi-step simulation.

use anyhow::Result;
use impulse2d::glam::Vec2;
use impulse2d::math;
use impulse2d::physics::narrowphase::detect_collision;
use impulse2d::{
    Broadphase, Collider, Material, PhysicsConfig, PhysicsError, RigidBody, Transform, World,
};

const EPS: f32 = 1e-4;

fn inelastic() -> Result<Material> {
    Ok(Material::new(1.0, 0.0, 0.6, 0.3)?)
}

fn floor(material: Material) -> Result<RigidBody> {
    Ok(RigidBody::rectangle(Vec2::ZERO, 20.0, 1.0, material, true)?)
}

fn unit_square() -> Result<Collider> {
    Ok(Collider::polygon(vec![
        Vec2::new(-0.5, -0.5),
        Vec2::new(0.5, -0.5),
        Vec2::new(0.5, 0.5),
        Vec2::new(-0.5, 0.5),
    ])?)
}

#[test]
fn inverse_mass_is_zero_only_for_static_bodies() -> Result<()> {
    let material = Material::default();
    for is_static in [false, true] {
        let bodies = [
            RigidBody::circle(Vec2::ZERO, 0.7, material, is_static)?,
            RigidBody::rectangle(Vec2::ZERO, 2.0, 0.5, material, is_static)?,
            RigidBody::polygon(Vec2::ZERO, 1.0, 7, material, is_static)?,
            RigidBody::from_collider(Vec2::ZERO, unit_square()?, material, is_static)?,
        ];
        for body in &bodies {
            assert_eq!(body.inverse_mass() == 0.0, is_static);
            assert_eq!(body.inverse_inertia() == 0.0, is_static);
            if is_static {
                assert_eq!(body.mass(), 0.0);
                assert_eq!(body.inertia(), 0.0);
            } else {
                assert!((body.mass() * body.inverse_mass() - 1.0).abs() < EPS);
            }
        }
    }
    Ok(())
}

#[test]
fn normalize_has_unit_length() {
    for i in -10..=10 {
        for j in -10..=10 {
            let v = Vec2::new(i as f32 * 0.37, j as f32 * 1.9);
            match math::normalize(v) {
                Ok(n) => assert!((n.length() - 1.0).abs() < EPS, "{v} -> {n}"),
                Err(err) => {
                    assert_eq!(v, Vec2::ZERO);
                    assert_eq!(err, PhysicsError::DegenerateVector);
                }
            }
        }
    }
}

#[test]
fn construction_errors_are_reported() {
    assert!(matches!(
        Collider::polygon(vec![Vec2::ZERO, Vec2::X]),
        Err(PhysicsError::InvalidShape(_))
    ));
    let too_many = (0..26)
        .map(|i| Vec2::from_angle(i as f32 * 0.2))
        .collect::<Vec<_>>();
    assert!(matches!(
        Collider::polygon(too_many),
        Err(PhysicsError::InvalidShape(_))
    ));
    assert!(matches!(
        Material::new(0.1, 0.5, 0.5, 0.5),
        Err(PhysicsError::OutOfRange { name: "density", .. })
    ));
    assert!(matches!(
        Material::new(1.0, 1.5, 0.5, 0.5),
        Err(PhysicsError::OutOfRange { name: "restitution", .. })
    ));
    assert!(RigidBody::circle(Vec2::ZERO, 0.0, Material::default(), false).is_err());
}

#[test]
fn circle_pairs_match_reference_values() -> Result<()> {
    let circle = Collider::circle(1.0)?;
    let origin = Transform::identity();

    let hit = detect_collision(
        &circle,
        &origin,
        &circle,
        &Transform::from_position(Vec2::new(1.5, 0.0)),
    )
    .expect("overlapping circles");
    assert!((hit.depth - 0.5).abs() < EPS);
    assert!((hit.normal - Vec2::X).length() < EPS);

    let miss = detect_collision(
        &circle,
        &origin,
        &circle,
        &Transform::from_position(Vec2::new(3.0, 0.0)),
    );
    assert!(miss.is_none());
    Ok(())
}

#[test]
fn square_pair_matches_reference_values() -> Result<()> {
    let square = unit_square()?;
    let hit = detect_collision(
        &square,
        &Transform::identity(),
        &square,
        &Transform::from_position(Vec2::new(0.5, 0.0)),
    )
    .expect("overlapping squares");
    assert!((hit.depth - 0.5).abs() < EPS);
    assert!((hit.normal.x.abs() - 1.0).abs() < EPS);
    assert!(hit.normal.y.abs() < EPS);
    Ok(())
}

#[test]
fn resting_circle_converges() -> Result<()> {
    let material = inelastic()?;
    let mut world = World::default();
    world.add_body(floor(material)?);
    let ball = world.add_body(RigidBody::circle(Vec2::new(0.0, 1.5), 0.5, material, false)?);

    for _ in 0..180 {
        world.tick(1.0 / 60.0);
    }

    let body = world.body(ball).expect("ball");
    assert!(
        body.linear_velocity().length() < 1e-3,
        "velocity = {}",
        body.linear_velocity()
    );
    assert!((body.position().y - 1.0).abs() < 0.02, "y = {}", body.position().y);

    let max_depth = world
        .contacts()
        .iter()
        .map(|m| m.depth)
        .fold(0.0_f32, f32::max);
    assert!(max_depth < 0.02, "depth = {max_depth}");
    Ok(())
}

#[test]
fn resting_box_settles() -> Result<()> {
    let material = inelastic()?;
    let mut world = World::default();
    world.add_body(floor(material)?);
    let boxed = world.add_body(RigidBody::rectangle(
        Vec2::new(0.0, 2.0),
        1.0,
        1.0,
        material,
        false,
    )?);

    for _ in 0..240 {
        world.tick(1.0 / 60.0);
    }

    let body = world.body(boxed).expect("box");
    let y = body.position().y;
    assert!(y > 0.8 && y < 1.1, "box should rest on the floor: y = {y}");
    assert!(
        body.linear_velocity().y.abs() < 0.1,
        "vy = {}",
        body.linear_velocity().y
    );
    assert!(body.rotation().abs() < 0.2, "rotation = {}", body.rotation());
    Ok(())
}

#[test]
fn elastic_head_on_collision_swaps_velocities() -> Result<()> {
    let material = Material::new(1.0, 1.0, 0.0, 0.0)?;
    let mut world = World::new(PhysicsConfig {
        gravity: Vec2::ZERO,
        ..PhysicsConfig::default()
    });

    let a = world.add_body(RigidBody::circle(Vec2::ZERO, 1.0, material, false)?);
    let b = world.add_body(RigidBody::circle(Vec2::new(1.9, 0.0), 1.0, material, false)?);
    world
        .body_mut(a)
        .expect("a")
        .set_linear_velocity(Vec2::new(1.0, 0.0));
    world
        .body_mut(b)
        .expect("b")
        .set_linear_velocity(Vec2::new(-1.0, 0.0));

    world.step(1.0 / 60.0, 1);

    let va = world.body(a).expect("a").linear_velocity();
    let vb = world.body(b).expect("b").linear_velocity();
    assert!((va - Vec2::new(-1.0, 0.0)).length() < 1e-3, "va = {va}");
    assert!((vb - Vec2::new(1.0, 0.0)).length() < 1e-3, "vb = {vb}");
    Ok(())
}

#[test]
fn add_then_remove_round_trip() -> Result<()> {
    let material = Material::default();
    let mut world = World::default();
    world.add_body(floor(material)?);
    world.add_body(RigidBody::circle(Vec2::new(-2.0, 0.9), 0.5, material, false)?);
    world.step(1.0 / 60.0, 2);
    let before = world.len();

    let extra = world.add_body(RigidBody::rectangle(
        Vec2::new(2.0, 0.9),
        1.0,
        1.0,
        material,
        false,
    )?);
    world.step(1.0 / 60.0, 2);
    assert!(world.contacts().iter().any(|m| m.involves(extra)));

    assert!(world.remove_body(extra));
    assert_eq!(world.len(), before);

    world.step(1.0 / 60.0, 2);
    assert!(world.contacts().iter().all(|m| !m.involves(extra)));
    assert!(!world.contacts().is_empty());
    Ok(())
}

#[test]
fn broadphase_never_misses_a_sat_overlap() -> Result<()> {
    let material = Material::default();
    let mut bodies = Vec::new();
    let mut angle = 0.0_f32;
    for i in 0..8 {
        for j in 0..8 {
            angle += 0.37;
            let pos = Vec2::new(i as f32 * 0.8, j as f32 * 0.85);
            let body = match (i * 3 + j) % 4 {
                0 => RigidBody::circle(pos, 0.45, material, false)?,
                1 => RigidBody::rectangle(pos, 0.9, 0.4, material, j % 2 == 0)?,
                2 => RigidBody::polygon(pos, 0.5, 3 + (i + j) % 6, material, false)?,
                _ => RigidBody::from_collider(pos, unit_square()?, material, true)?,
            };
            bodies.push(body.with_rotation(angle));
        }
    }

    let mut broadphase = Broadphase::new();
    let pairs = broadphase.find_pairs(&bodies).to_vec();

    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (a, b) = (&bodies[i], &bodies[j]);
            if a.is_static() && b.is_static() {
                continue;
            }
            let hit = detect_collision(a.collider(), a.transform(), b.collider(), b.transform());
            if hit.is_some_and(|info| info.depth > 0.0) {
                assert!(pairs.contains(&(i, j)), "broadphase missed ({i}, {j})");
            }
        }
    }
    Ok(())
}

#[test]
fn crowded_scene_stays_finite() -> Result<()> {
    let material = Material::default();
    let mut world = World::default();
    world.add_body(floor(material)?);

    // Exactly coincident bodies hit the degenerate-axis paths
    for k in 0..3 {
        let pos = Vec2::new(0.0, 2.0 + k as f32);
        world.add_body(RigidBody::rectangle(pos, 1.0, 1.0, material, false)?);
        world.add_body(RigidBody::rectangle(pos, 1.0, 1.0, material, false)?);
        world.add_body(RigidBody::circle(pos, 0.4, material, false)?);
        world.add_body(RigidBody::circle(pos, 0.4, material, false)?);
    }

    for _ in 0..120 {
        world.tick(1.0 / 60.0);
        for manifold in world.contacts() {
            assert!((manifold.normal.length() - 1.0).abs() < 1e-3);
            assert!(manifold.depth >= 0.0);
        }
    }

    for (handle, body) in world.bodies() {
        assert!(body.position().is_finite(), "{handle} position");
        assert!(body.linear_velocity().is_finite(), "{handle} velocity");
        assert!(body.rotation().is_finite(), "{handle} rotation");
    }
    Ok(())
}
