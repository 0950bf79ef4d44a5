// Surface walker: one agent confined to the triangles of a mesh.
//
// Each tick the walker tries a fixed-length step inside its current triangle.
// A step that would leave the triangle is resolved in the same call by
// searching for the neighbour across the closest edge the step passes,
// snapping onto that edge and rotating the heading from the old face normal
// to the new one.
// With no neighbour the walker reverses and stays put for the tick.

use anyhow::{Result, bail};
use bevy_ecs::prelude::*;
use glam::{Mat4, Vec3};

use super::adjacency::AdjacencyIndex;
use super::mesh::RenderMesh;
use super::random::RandomSource;
use super::surface_math::{
    crossed_edges, displacement_to_line, is_inside_edge_bounds, is_inside_triangle,
    positions_equal, rotate_between_normals, rotation_between, triangle_normal,
};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Step length per tick, in mesh units.
pub const DEFAULT_SPEED: f32 = 0.005;

/// Prop axes used by `transform()`: the prop model faces -Z with +Y up.
const PROP_FORWARD: Vec3 = Vec3::NEG_Z;
const PROP_UP: Vec3 = Vec3::Y;

// ============================================================================
// WALK SURFACE
// ============================================================================

/// The mesh walkers live on plus its adjacency index.
///
/// Owned by the population (an ECS resource) and only ever borrowed by
/// walkers; nothing mutates it after construction.
#[derive(Resource, Debug)]
pub struct WalkSurface {
    mesh: RenderMesh,
    adjacency: AdjacencyIndex,
}

impl WalkSurface {
    /// Validate the mesh layout and build its adjacency index.
    ///
    /// Input meshes must be free of zero-area triangles and their triangle
    /// planes must not pass through the origin.
    pub fn new(mesh: RenderMesh) -> Result<Self> {
        mesh.validate()?;
        let adjacency = AdjacencyIndex::build(&mesh);
        Ok(Self { mesh, adjacency })
    }

    pub fn mesh(&self) -> &RenderMesh {
        &self.mesh
    }

    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }
}

// ============================================================================
// STEP RESULTS
// ============================================================================

/// What one `update()` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Stayed inside the current triangle.
    Moved,
    /// Transferred onto a neighbouring triangle.
    Crossed { from: usize, to: usize },
    /// No neighbour found; heading reversed, position kept.
    Bounced,
}

/// Result of the neighbour search run when a step leaves the triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrossingSearch {
    Found {
        triangle: usize,
        corners: [Vec3; 3],
        /// From the current position onto the shared edge.
        displacement: Vec3,
    },
    NotFound,
}

// ============================================================================
// SURFACE WALKER
// ============================================================================

#[derive(Component, Debug, Clone)]
pub struct SurfaceWalker {
    position: Vec3,
    /// Unit heading, tangent to the current triangle.
    velocity: Vec3,
    /// Corners of the occupied triangle, kept so the inside and normal tests
    /// never go back to the mesh.
    corners: [Vec3; 3],
    triangle: usize,
    speed: f32,
}

impl Default for SurfaceWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceWalker {
    /// Unplaced walker. Call `set_up` or `place` before stepping.
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: PROP_FORWARD,
            corners: [Vec3::ZERO; 3],
            triangle: 0,
            speed: DEFAULT_SPEED,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Random placement: a random triangle, a random point in it and a random
    /// heading within one radian of the direction toward its first corner.
    ///
    /// The point is drawn as `w0 = r, w1 = r' * (1 - w0), w2 = 1 - w0 - w1`,
    /// which favours the first corner rather than being uniform over the area.
    pub fn set_up(&mut self, surface: &WalkSurface, rng: &mut dyn RandomSource) -> Result<()> {
        let count = surface.triangle_count();
        if count == 0 {
            bail!("cannot place a walker on a mesh without triangles");
        }

        let triangle = rng.rand_int(count - 1);
        let [p0, p1, p2] = surface.mesh().triangle_corners(triangle);
        let normal = triangle_normal(p0, p1, p2);

        let w0 = rng.rand_float();
        let w1 = rng.rand_float() * (1.0 - w0);
        let w2 = 1.0 - w0 - w1;
        let position = p0 * w0 + p1 * w1 + p2 * w2;

        // w0 == 1 puts the point on corner 0 with no direction toward it; fall
        // back to the first edge. The final normalize absorbs rounding in cos/sin.
        let toward = (p0 - position)
            .try_normalize()
            .unwrap_or_else(|| (p1 - p0).normalize());
        let side = toward.cross(normal);
        let angle = rng.rand_float() * 2.0 - 1.0;
        let velocity = (toward * angle.cos() + side * angle.sin()).normalize();

        self.position = position;
        self.velocity = velocity;
        self.corners = [p0, p1, p2];
        self.triangle = triangle;
        Ok(())
    }

    /// Deterministic placement on `triangle` at `position` heading along `velocity`.
    pub fn place(
        &mut self,
        surface: &WalkSurface,
        triangle: usize,
        position: Vec3,
        velocity: Vec3,
    ) -> Result<()> {
        if triangle >= surface.triangle_count() {
            bail!(
                "triangle {triangle} out of range for {} triangles",
                surface.triangle_count()
            );
        }
        let Some(velocity) = velocity.try_normalize() else {
            bail!("walker heading must be non-zero");
        };
        self.corners = surface.mesh().triangle_corners(triangle);
        self.triangle = triangle;
        self.position = position;
        self.velocity = velocity;
        Ok(())
    }

    /// Advance one step.
    pub fn update(&mut self, surface: &WalkSurface) -> StepOutcome {
        let [p0, p1, p2] = self.corners;
        let next = self.position + self.velocity * self.speed;

        if is_inside_triangle(p0, p1, p2, next) {
            self.position = next;
            return StepOutcome::Moved;
        }

        match self.find_crossing(surface) {
            CrossingSearch::NotFound => {
                self.velocity = -self.velocity;
                StepOutcome::Bounced
            }
            CrossingSearch::Found { triangle, corners, displacement } => {
                let from = self.triangle;
                let n0 = self.normal();
                let n1 = triangle_normal(corners[0], corners[1], corners[2]);

                // Near-coplanar neighbours skip the rotation; drop what is left
                // of the new normal so the heading stays tangent.
                let rotated = rotate_between_normals(n0, n1, self.velocity);
                let tangent = rotated - n1 * rotated.dot(n1);
                self.velocity = tangent.try_normalize().unwrap_or_else(|| rotated.normalize());
                self.position += displacement;
                self.corners = corners;
                self.triangle = triangle;
                StepOutcome::Crossed { from, to: triangle }
            }
        }
    }

    /// Find the neighbour across the closest shared edge in the direction of
    /// travel.
    ///
    /// Only edges the attempted step passes beyond are eligible; the edge the
    /// walker already sits on after a crossing is behind it and never wins.
    /// Candidates come from the adjacency index in ascending triangle order, so
    /// ties resolve to the lowest triangle index exactly as a full scan would.
    /// A candidate only counts when the position projects inside the finite
    /// shared edge, for indexed and non-indexed meshes alike.
    pub fn find_crossing(&self, surface: &WalkSurface) -> CrossingSearch {
        let [p0, p1, p2] = self.corners;
        let crossed = crossed_edges(p0, p1, p2, self.position + self.velocity * self.speed);

        let mut best = CrossingSearch::NotFound;
        let mut best_len = f32::MAX;

        for t in surface.adjacency().triangles_around(&self.corners, self.triangle) {
            let corners = surface.mesh().triangle_corners(t);
            let Some((a, b)) = self.common_edge(&corners) else {
                continue;
            };
            match self.corner_opposite(a, b) {
                Some(i) if crossed[i] => {}
                _ => continue,
            }
            if !is_inside_edge_bounds(a, b, self.position) {
                continue;
            }

            let displacement = displacement_to_line(a, b, self.position);
            let len = displacement.length();
            if len < best_len {
                best_len = len;
                best = CrossingSearch::Found { triangle: t, corners, displacement };
            }
        }

        best
    }

    /// First corner pair of `candidate` (in order 01, 12, 20) whose corners both
    /// match one of the current triangle's corners.
    fn common_edge(&self, candidate: &[Vec3; 3]) -> Option<(Vec3, Vec3)> {
        let shared = |p: Vec3| self.corners.iter().any(|&c| positions_equal(p, c));
        let [q0, q1, q2] = *candidate;
        let (s0, s1, s2) = (shared(q0), shared(q1), shared(q2));

        if s0 && s1 {
            Some((q0, q1))
        } else if s1 && s2 {
            Some((q1, q2))
        } else if s2 && s0 {
            Some((q2, q0))
        } else {
            None
        }
    }

    /// Index of the current corner that is neither `a` nor `b`.
    fn corner_opposite(&self, a: Vec3, b: Vec3) -> Option<usize> {
        self.corners
            .iter()
            .position(|&c| !positions_equal(c, a) && !positions_equal(c, b))
    }

    /// Model matrix for a prop standing on the surface at the walker's position,
    /// facing along the heading with its up axis on the face normal.
    pub fn transform(&self) -> Mat4 {
        let normal = self.normal();
        let facing = rotation_between(PROP_FORWARD, self.velocity);
        let up_after_facing = facing * PROP_UP;
        let upright = rotation_between(up_after_facing, normal);
        Mat4::from_rotation_translation(upright * facing, self.position)
    }

    pub fn position(&self) -> Vec3 { self.position }
    pub fn velocity(&self) -> Vec3 { self.velocity }
    pub fn triangle_index(&self) -> usize { self.triangle }
    pub fn corners(&self) -> [Vec3; 3] { self.corners }
    pub fn speed(&self) -> f32 { self.speed }

    /// Unit normal of the occupied triangle.
    pub fn normal(&self) -> Vec3 {
        let [p0, p1, p2] = self.corners;
        triangle_normal(p0, p1, p2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mesh::GpuVertex;
    use crate::engine::random::ScriptedRandom;
    use crate::engine::shapes;

    #[test]
    fn set_up_places_inside_chosen_triangle() {
        let surface = WalkSurface::new(shapes::octahedron(1.0)).unwrap();
        let mut rng = ScriptedRandom::new(vec![0.5, 0.2, 0.4, 0.9]);
        let mut walker = SurfaceWalker::new();
        walker.set_up(&surface, &mut rng).unwrap();

        // rand_int(7) with 0.5 → triangle 4.
        assert_eq!(walker.triangle_index(), 4);
        let [p0, p1, p2] = walker.corners();
        assert!(is_inside_triangle(p0, p1, p2, walker.position()));
        assert!((walker.velocity().length() - 1.0).abs() < 1e-5);
        assert!(walker.velocity().dot(walker.normal()).abs() < 1e-5);
    }

    #[test]
    fn set_up_rejects_empty_mesh() {
        let surface = WalkSurface::new(RenderMesh::default()).unwrap();
        let mut rng = ScriptedRandom::new(vec![0.5]);
        assert!(SurfaceWalker::new().set_up(&surface, &mut rng).is_err());
    }

    #[test]
    fn place_rejects_bad_arguments() {
        let surface = WalkSurface::new(shapes::octahedron(1.0)).unwrap();
        let mut walker = SurfaceWalker::new();
        assert!(walker.place(&surface, 8, Vec3::ONE, Vec3::X).is_err());
        assert!(walker.place(&surface, 0, Vec3::ONE, Vec3::ZERO).is_err());
    }

    #[test]
    fn common_edge_prefers_first_pair() {
        let surface = WalkSurface::new(shapes::octahedron(1.0)).unwrap();
        let mut walker = SurfaceWalker::new();
        let corners = surface.mesh().triangle_corners(0);
        let center = (corners[0] + corners[1] + corners[2]) / 3.0;
        walker.place(&surface, 0, center, corners[0] - center).unwrap();

        // The triangle itself shares all three corners: pair 01 wins.
        assert_eq!(walker.common_edge(&corners), Some((corners[0], corners[1])));
    }

    #[test]
    fn edge_behind_the_walker_is_not_recrossed() {
        // Sitting on the quad diagonal inside triangle 1, stepping out over the
        // open rim. The diagonal is at distance zero but lies behind the step.
        let surface = WalkSurface::new(shapes::quad(1.0, 0.5)).unwrap();
        let mut walker = SurfaceWalker::new().with_speed(0.5);
        let start = Vec3::new(0.9, 0.5, -0.9);
        walker.place(&surface, 1, start, Vec3::new(-0.2, 0.0, -1.0)).unwrap();

        assert_eq!(walker.find_crossing(&surface), CrossingSearch::NotFound);
        assert_eq!(walker.update(&surface), StepOutcome::Bounced);
        assert_eq!(walker.triangle_index(), 1);
        assert_eq!(walker.position(), start);
    }

    #[test]
    fn crossing_picks_the_edge_the_step_passes() {
        // Octahedron triangle 0 is (+X, +Y, +Z) and shares its Y-Z edge with
        // triangle 1. Start on that edge and step out past the +X corner.
        let surface = WalkSurface::new(shapes::octahedron(1.0)).unwrap();
        let mut walker = SurfaceWalker::new().with_speed(1.5);
        let on_shared = (Vec3::Y + Vec3::Z) * 0.5;
        walker.place(&surface, 0, on_shared, Vec3::X - on_shared).unwrap();

        match walker.find_crossing(&surface) {
            CrossingSearch::Found { triangle, displacement, .. } => {
                assert_ne!(triangle, 1);
                assert!(displacement.length() > 0.1);
            }
            CrossingSearch::NotFound => panic!("closed surface must have a neighbour"),
        }
        assert!(matches!(walker.update(&surface), StepOutcome::Crossed { from: 0, .. }));
    }

    #[test]
    fn shallow_fold_keeps_heading_tangent() {
        // Two triangles sharing the X edge at z = 1, folded by about one degree:
        // too shallow for the normal rotation, which leaves the heading as is.
        let lift = 1.0_f32.to_radians().tan();
        let vertices = [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.5, -1.0, 1.0),
            Vec3::new(0.5, 1.0, 1.0 + lift),
        ]
        .map(|p| GpuVertex::new(p, Vec3::Z))
        .to_vec();
        let surface = WalkSurface::new(RenderMesh::new(vertices, vec![0, 2, 1, 0, 1, 3])).unwrap();

        let mut walker = SurfaceWalker::new().with_speed(0.5);
        walker.place(&surface, 0, Vec3::new(0.5, -0.1, 1.0), Vec3::Y).unwrap();

        assert_eq!(walker.update(&surface), StepOutcome::Crossed { from: 0, to: 1 });
        assert!(walker.velocity().dot(walker.normal()).abs() < 1e-6);
        assert!((walker.velocity().length() - 1.0).abs() < 1e-6);
        assert_eq!(walker.update(&surface), StepOutcome::Moved);
    }

    #[test]
    fn transform_faces_heading_with_up_on_normal() {
        let surface = WalkSurface::new(shapes::octahedron(1.0)).unwrap();
        let mut rng = ScriptedRandom::new(vec![0.1, 0.3, 0.3, 0.6]);
        let mut walker = SurfaceWalker::new();
        walker.set_up(&surface, &mut rng).unwrap();

        let m = walker.transform();
        let forward = m.transform_vector3(PROP_FORWARD);
        let up = m.transform_vector3(PROP_UP);
        assert!(m.transform_point3(Vec3::ZERO).abs_diff_eq(walker.position(), 1e-6));
        assert!(forward.abs_diff_eq(walker.velocity(), 1e-4));
        assert!(up.abs_diff_eq(walker.normal(), 1e-4));
    }
}
