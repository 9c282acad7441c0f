//! Narrowphase collision detection: SAT tests per shape pair.

use crate::math::{self, Vector2};

use super::collider::{Circle, Collider, Polygon};
use super::contact::{ContactInfo, ContactSet};
use super::transform::Transform;

/// An axis only replaces the current best when its overlap is smaller by
/// more than this, so equal overlaps keep the first axis tested.
pub const AXIS_TIE_TOLERANCE: f32 = 1e-5;

/// Projection interval `(min, max)` of a shape onto an axis.
type Projection = (f32, f32);

/// Minimum-overlap axis search shared by the SAT tests.
struct AxisSearch {
    depth: f32,
    normal: Vector2,
}

impl AxisSearch {
    fn new() -> Self {
        Self {
            depth: f32::MAX,
            normal: math::FALLBACK_AXIS,
        }
    }

    /// Record the overlap along `axis`. Returns false if it separates.
    #[inline]
    fn test(&mut self, axis: Vector2, (min_a, max_a): Projection, (min_b, max_b): Projection) -> bool {
        if min_a > max_b || min_b > max_a {
            return false;
        }
        let overlap = (max_a - min_b).min(max_b - min_a);
        if overlap < self.depth - AXIS_TIE_TOLERANCE {
            self.depth = overlap;
            self.normal = axis;
        }
        true
    }

    /// Finish with the normal oriented along `direction` (A to B).
    fn into_oriented(self, direction: Vector2) -> (Vector2, f32) {
        let normal = if direction.dot(self.normal) < 0.0 {
            -self.normal
        } else {
            self.normal
        };
        (normal, self.depth.max(0.0))
    }
}

/// Project a vertex set onto an axis.
pub fn project_vertices(vertices: &[Vector2], axis: Vector2) -> Projection {
    vertices.iter().fold((f32::MAX, f32::MIN), |(min, max), v| {
        let p = v.dot(axis);
        (min.min(p), max.max(p))
    })
}

/// Project a circle onto a unit axis.
#[inline]
pub fn project_circle(center: Vector2, radius: f32, axis: Vector2) -> Projection {
    let c = center.dot(axis);
    (c - radius, c + radius)
}

/// Unit axis perpendicular to the edge starting at vertex `i`.
#[inline]
fn edge_axis(vertices: &[Vector2], i: usize) -> Vector2 {
    let edge = vertices[(i + 1) % vertices.len()] - vertices[i];
    math::normalize_or_fallback(edge.perp())
}

/// Vertex nearest to `point` (first one on ties).
fn closest_vertex(point: Vector2, vertices: &[Vector2]) -> Vector2 {
    let mut best = vertices[0];
    let mut best_dist_sq = f32::MAX;
    for v in vertices {
        let d = v.distance_squared(point);
        if d < best_dist_sq {
            best_dist_sq = d;
            best = *v;
        }
    }
    best
}

/// Point on the polygon boundary nearest to `point`.
fn closest_boundary_point(point: Vector2, vertices: &[Vector2]) -> Vector2 {
    let n = vertices.len();
    let mut best = vertices[0];
    let mut best_dist_sq = f32::MAX;
    for i in 0..n {
        let cp = math::closest_point_on_segment(point, vertices[i], vertices[(i + 1) % n]);
        let d = cp.distance_squared(point);
        if d < best_dist_sq {
            best_dist_sq = d;
            best = cp;
        }
    }
    best
}

/// Up to two contact points between overlapping polygons: for every vertex of
/// one polygon, the closest point on the other's edges.
fn polygon_contact_points(vertices_a: &[Vector2], vertices_b: &[Vector2]) -> ContactSet {
    let mut min_dist_sq = f32::MAX;
    let mut first = vertices_a[0];
    let mut second: Option<Vector2> = None;

    for (points, edges) in [(vertices_a, vertices_b), (vertices_b, vertices_a)] {
        let n = edges.len();
        for &p in points {
            for i in 0..n {
                let cp = math::closest_point_on_segment(p, edges[i], edges[(i + 1) % n]);
                let d = cp.distance_squared(p);
                if math::nearly_equal(d, min_dist_sq) {
                    if !math::nearly_equal_vec(cp, first) {
                        second = Some(cp);
                    }
                } else if d < min_dist_sq {
                    min_dist_sq = d;
                    first = cp;
                    second = None;
                }
            }
        }
    }

    match second {
        Some(second) => ContactSet::pair(first, second),
        None => ContactSet::single(first),
    }
}

/// Specialized circle-circle intersection test.
pub fn circle_circle(
    circle_a: &Circle,
    transform_a: &Transform,
    circle_b: &Circle,
    transform_b: &Transform,
) -> Option<ContactInfo> {
    let radius_a = circle_a.world_radius(transform_a);
    let radius_b = circle_b.world_radius(transform_b);

    let delta = transform_b.position - transform_a.position;
    let distance = delta.length();
    let total_radius = radius_a + radius_b;

    if distance > total_radius {
        return None;
    }

    // Concentric circles have no preferred direction
    let normal = math::normalize_or_fallback(delta);

    Some(ContactInfo {
        normal,
        depth: total_radius - distance,
        contacts: ContactSet::single(transform_a.position + normal * radius_a),
    })
}

/// SAT test between two convex polygons.
pub fn polygon_polygon(
    polygon_a: &Polygon,
    transform_a: &Transform,
    polygon_b: &Polygon,
    transform_b: &Transform,
) -> Option<ContactInfo> {
    let vertices_a = polygon_a.transformed_vertices(transform_a);
    let vertices_b = polygon_b.transformed_vertices(transform_b);

    let mut search = AxisSearch::new();

    for vertices in [&vertices_a, &vertices_b] {
        for i in 0..vertices.len() {
            let axis = edge_axis(vertices, i);
            let proj_a = project_vertices(&vertices_a, axis);
            let proj_b = project_vertices(&vertices_b, axis);
            if !search.test(axis, proj_a, proj_b) {
                return None;
            }
        }
    }

    let (normal, depth) = search.into_oriented(transform_b.position - transform_a.position);

    Some(ContactInfo {
        normal,
        depth,
        contacts: polygon_contact_points(&vertices_a, &vertices_b),
    })
}

/// SAT test between a circle (A) and a convex polygon (B).
pub fn circle_polygon(
    circle: &Circle,
    circle_transform: &Transform,
    polygon: &Polygon,
    polygon_transform: &Transform,
) -> Option<ContactInfo> {
    let center = circle_transform.position;
    let radius = circle.world_radius(circle_transform);
    let vertices = polygon.transformed_vertices(polygon_transform);

    let mut search = AxisSearch::new();

    for i in 0..vertices.len() {
        let axis = edge_axis(&vertices, i);
        let proj_circle = project_circle(center, radius, axis);
        let proj_polygon = project_vertices(&vertices, axis);
        if !search.test(axis, proj_circle, proj_polygon) {
            return None;
        }
    }

    // Vertex region: axis from the center to the nearest vertex
    let axis = math::normalize_or_fallback(closest_vertex(center, &vertices) - center);
    let proj_circle = project_circle(center, radius, axis);
    let proj_polygon = project_vertices(&vertices, axis);
    if !search.test(axis, proj_circle, proj_polygon) {
        return None;
    }

    let (normal, depth) = search.into_oriented(polygon_transform.position - center);

    Some(ContactInfo {
        normal,
        depth,
        contacts: ContactSet::single(closest_boundary_point(center, &vertices)),
    })
}

/// Detect collision between two colliders. The normal points from A to B.
pub fn detect_collision(
    collider_a: &Collider,
    transform_a: &Transform,
    collider_b: &Collider,
    transform_b: &Transform,
) -> Option<ContactInfo> {
    match (collider_a, collider_b) {
        (Collider::Circle(a), Collider::Circle(b)) => {
            circle_circle(a, transform_a, b, transform_b)
        }
        (Collider::Circle(a), Collider::Polygon(b)) => {
            circle_polygon(a, transform_a, b, transform_b)
        }
        (Collider::Polygon(a), Collider::Circle(b)) => {
            circle_polygon(b, transform_b, a, transform_a).map(ContactInfo::flipped)
        }
        (Collider::Polygon(a), Collider::Polygon(b)) => {
            polygon_polygon(a, transform_a, b, transform_b)
        }
    }
}
