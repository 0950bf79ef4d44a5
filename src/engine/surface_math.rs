// Triangle-local geometry used by the surface walkers.
//
// All helpers are pure functions over glam vectors so the walker, the
// adjacency index and the tests share one definition of "equal", "inside"
// and "normal".

use glam::{Mat3, Quat, Vec3};

/// Two positions closer than this on every axis are the same mesh corner.
pub const POSITION_EPSILON: f32 = 1e-5;

/// Slack allowed on barycentric weights by the inside test.
pub const INSIDE_EPSILON: f32 = 1e-4;

/// Dot product above which two normals count as the same plane.
const COPLANAR_DOT: f32 = 0.999;

/// Near-equality used for every corner comparison.
#[inline]
pub fn positions_equal(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, POSITION_EPSILON)
}

/// Unit face normal of the CCW triangle (p0, p1, p2).
///
/// Degenerate (zero-area) triangles produce NaN; input meshes must not contain them.
#[inline]
pub fn triangle_normal(p0: Vec3, p1: Vec3, p2: Vec3) -> Vec3 {
    (p1 - p0).cross(p2 - p0).normalize()
}

/// Weights `w` with `p = w.x * p0 + w.y * p1 + w.z * p2`, solved by inverting the
/// 3×3 matrix whose columns are the corners.
///
/// Only well-defined when the corners are linearly independent as vectors from
/// the origin, i.e. the triangle's plane does not pass through the origin.
#[inline]
pub fn barycentric_weights(p0: Vec3, p1: Vec3, p2: Vec3, p: Vec3) -> Vec3 {
    Mat3::from_cols(p0, p1, p2).inverse() * p
}

/// Inside test: every weight ≥ -ε and the weights sum to 1 within ε.
pub fn is_inside_triangle(p0: Vec3, p1: Vec3, p2: Vec3, p: Vec3) -> bool {
    let w = barycentric_weights(p0, p1, p2, p);

    if w.x < -INSIDE_EPSILON || w.y < -INSIDE_EPSILON || w.z < -INSIDE_EPSILON {
        return false;
    }

    (w.x + w.y + w.z - 1.0).abs() <= INSIDE_EPSILON
}

/// Which edges a point outside the triangle lies beyond: entry `i` is set when
/// `p` is past the edge opposite corner `i` by more than the inside slack.
///
/// A point rejected only by the weight-sum check is put past the edge of its
/// most negative weight, so an outside point always crosses something.
pub fn crossed_edges(p0: Vec3, p1: Vec3, p2: Vec3, p: Vec3) -> [bool; 3] {
    let w = barycentric_weights(p0, p1, p2, p).to_array();
    let mut crossed = w.map(|x| x < -INSIDE_EPSILON);
    if !crossed.contains(&true) {
        let lowest = (0..3).min_by(|&i, &j| w[i].total_cmp(&w[j])).unwrap_or(0);
        crossed[lowest] = true;
    }
    crossed
}

/// Vector from `p` to its closest point on the infinite line through `a` and `b`.
pub fn displacement_to_line(a: Vec3, b: Vec3, p: Vec3) -> Vec3 {
    let dir = (b - a).normalize();
    let projected = a + dir * dir.dot(p - a);
    projected - p
}

/// True when the projection of `p` onto line `ab` falls within the segment.
pub fn is_inside_edge_bounds(a: Vec3, b: Vec3, p: Vec3) -> bool {
    if (b - a).dot(p - a) < 0.0 {
        return false;
    }
    (a - b).dot(p - b) >= 0.0
}

/// Carry tangent vector `v` from the plane with normal `n0` to the plane with
/// normal `n1` using the minimal rotation between the normals.
///
/// Near-parallel normals leave `v` untouched; near-antiparallel normals are a
/// fold and negate `v` outright.
pub fn rotate_between_normals(n0: Vec3, n1: Vec3, v: Vec3) -> Vec3 {
    let dot = n0.dot(n1);
    if dot > COPLANAR_DOT {
        return v;
    }
    if dot < -COPLANAR_DOT {
        return -v;
    }

    let half = (n0 + n1).normalize();
    let axis = n0.cross(half);
    let q = Quat::from_xyzw(axis.x, axis.y, axis.z, n0.dot(half)).normalize();
    q * v
}

/// Shortest-arc rotation taking direction `from` onto direction `to`.
#[inline]
pub fn rotation_between(from: Vec3, to: Vec3) -> Quat {
    Quat::from_rotation_arc(from.normalize(), to.normalize())
}
