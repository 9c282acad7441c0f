//! Broadphase collision detection using AABB overlap tests.

use super::collider::Aabb;
use super::rigid_body::RigidBody;

/// Pair-wise AABB broadphase (O(n^2)).
///
/// Keeps its bounds and pair buffers between steps to avoid reallocating.
#[derive(Debug, Default)]
pub struct Broadphase {
    bounds: Vec<Aabb>,
    pairs: Vec<(usize, usize)>,
}

impl Broadphase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find all index pairs `(i, j)` with `i < j` whose AABBs overlap.
    ///
    /// Pairs come out in body order. Static-static pairs are skipped.
    pub fn find_pairs(&mut self, bodies: &[RigidBody]) -> &[(usize, usize)] {
        self.bounds.clear();
        self.bounds.extend(bodies.iter().map(RigidBody::bounds));
        self.pairs.clear();

        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                if bodies[i].is_static() && bodies[j].is_static() {
                    continue;
                }
                if self.bounds[i].overlaps(&self.bounds[j]) {
                    self.pairs.push((i, j));
                }
            }
        }

        &self.pairs
    }
}
