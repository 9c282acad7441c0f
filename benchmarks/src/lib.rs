//! Scene builders shared by the physics benchmarks.

use anyhow::Result;
use glam::Vec2;
use impulse2d::{Material, PhysicsConfig, RigidBody, World};

/// Deterministic pseudo-random sequence (xorshift) so scenes are identical
/// between runs.
pub struct SceneRng(u32);

impl SceneRng {
    pub fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }

    pub fn next_f32(&mut self) -> f32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        (self.0 >> 8) as f32 / (1u32 << 24) as f32
    }

    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_f32()
    }
}

/// A mix of circles, boxes and pentagons laid out on a grid.
pub fn mixed_bodies(n: usize, spacing: f32) -> Result<Vec<RigidBody>> {
    let material = Material::default();
    let columns = (n as f32).sqrt().ceil().max(1.0) as usize;
    let mut rng = SceneRng::new(0x5eed);

    (0..n)
        .map(|i| -> Result<RigidBody> {
            let pos = Vec2::new(
                (i % columns) as f32 * spacing,
                (i / columns) as f32 * spacing,
            );
            let body = match i % 3 {
                0 => RigidBody::circle(pos, 0.5, material, false)?,
                1 => RigidBody::rectangle(pos, 1.0, 0.8, material, false)?,
                _ => RigidBody::polygon(pos, 0.6, 5, material, false)?,
            };
            Ok(body.with_rotation(rng.range(0.0, std::f32::consts::TAU)))
        })
        .collect()
}

/// Dense grid: neighbours overlap, so most pairs reach the narrowphase.
pub fn setup_dense_bodies(n: usize) -> Result<Vec<RigidBody>> {
    mixed_bodies(n, 0.9)
}

/// Sparse grid: bounds never touch.
pub fn setup_sparse_bodies(n: usize) -> Result<Vec<RigidBody>> {
    mixed_bodies(n, 5.0)
}

/// Bodies dropped in a box made of a static floor and two walls.
pub fn setup_scene(n: usize) -> Result<World> {
    let mut world = World::new(PhysicsConfig::default());
    let material = Material::default();
    let width = (n as f32).sqrt().ceil() * 1.5 + 4.0;

    world.add_body(RigidBody::rectangle(
        Vec2::new(0.0, -1.0),
        width * 2.0,
        2.0,
        material,
        true,
    )?);
    world.add_body(RigidBody::rectangle(
        Vec2::new(-width, width),
        1.0,
        width * 2.0,
        material,
        true,
    )?);
    world.add_body(RigidBody::rectangle(
        Vec2::new(width, width),
        1.0,
        width * 2.0,
        material,
        true,
    )?);

    let mut rng = SceneRng::new(42);
    for mut body in mixed_bodies(n, 1.5)? {
        body.translate(Vec2::new(-width * 0.5, 2.0 + rng.range(0.0, 0.5)));
        world.add_body(body);
    }

    Ok(world)
}
