// Vertex-position → incident-triangle lookup.
//
// Corners are keyed by position, not by vertex-buffer index: non-indexed
// meshes and meshes with split normals duplicate the same corner many times,
// and all of those copies must collapse to one entry. Positions are bucketed
// into a uniform hash grid so the near-equality probe only touches the 27
// cells around a query.

use std::collections::HashMap;

use glam::{IVec3, Vec3};

use super::mesh::RenderMesh;
use super::surface_math::POSITION_EPSILON;

/// Hash-grid cell edge. Must be ≥ 2 * POSITION_EPSILON so every key
/// `triangles_around` looks for is at most one cell away.
const CELL_SIZE: f32 = POSITION_EPSILON * 4.0;

/// Precomputed corner → triangles mapping for one mesh. Read-only after `build`.
#[derive(Debug, Default)]
pub struct AdjacencyIndex {
    /// Representative position of each distinct corner.
    keys: Vec<Vec3>,
    /// Ascending triangle indices incident to `keys[i]`.
    triangles: Vec<Vec<usize>>,
    cells: HashMap<IVec3, Vec<usize>>,
}

impl AdjacencyIndex {
    /// Index every triangle of `mesh` under each of its three corner positions.
    ///
    /// A corner joins the first existing key within POSITION_EPSILON, or starts
    /// a new one. Near-equality is not transitive: a run of corners drifting
    /// more than ε in total can be split over several keys even though each
    /// neighbouring pair compares equal. `triangles_at` reports a single key;
    /// `triangles_around` also gathers keys up to 2ε away so such splits never
    /// hide a neighbour from the crossing search.
    pub fn build(mesh: &RenderMesh) -> Self {
        let mut index = Self::default();

        for t in 0..mesh.triangle_count() {
            for corner in mesh.triangle_corners(t) {
                let key = match index.find_key(corner) {
                    Some(key) => key,
                    None => index.insert_key(corner),
                };
                let incident = &mut index.triangles[key];
                // A degenerate triangle may list the same corner twice.
                if incident.last() != Some(&t) {
                    incident.push(t);
                }
            }
        }

        log::debug!(
            "adjacency index: {} triangles, {} distinct corners",
            mesh.triangle_count(),
            index.keys.len()
        );
        index
    }

    /// Number of distinct corner positions.
    pub fn vertex_count(&self) -> usize {
        self.keys.len()
    }

    /// Triangles touching `position`, ascending. Empty for unknown positions.
    pub fn triangles_at(&self, position: Vec3) -> &[usize] {
        match self.find_key(position) {
            Some(key) => self.triangles[key].as_slice(),
            None => &[],
        }
    }

    /// First triangle other than `triangle` that touches both `a` and `b`.
    pub fn adjacent_triangle_by_edge(&self, triangle: usize, a: Vec3, b: Vec3) -> Option<usize> {
        let around_b = self.triangles_at(b);
        self.triangles_at(a)
            .iter()
            .copied()
            .find(|&t| t != triangle && around_b.binary_search(&t).is_ok())
    }

    /// Every triangle with a corner near one of `corners`, excluding `exclude`,
    /// ascending and without duplicates.
    ///
    /// Any corner within POSITION_EPSILON of a query corner sits under a key at
    /// most 2ε from it, so this is a superset of the triangles a pairwise
    /// corner comparison would accept.
    pub fn triangles_around(&self, corners: &[Vec3; 3], exclude: usize) -> Vec<usize> {
        let mut out: Vec<usize> = corners
            .iter()
            .flat_map(|&c| self.keys_within(c, 2.0 * POSITION_EPSILON))
            .flat_map(|key| self.triangles[key].iter().copied())
            .filter(|&t| t != exclude)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    fn find_key(&self, position: Vec3) -> Option<usize> {
        self.keys_within(position, POSITION_EPSILON).next()
    }

    /// Keys within `tolerance` of `position` on every axis, from the 27 cells
    /// around it.
    fn keys_within(&self, position: Vec3, tolerance: f32) -> impl Iterator<Item = usize> + '_ {
        let center = cell_of(position);
        (-1..=1)
            .flat_map(|dz| (-1..=1).flat_map(move |dy| (-1..=1).map(move |dx| IVec3::new(dx, dy, dz))))
            .filter_map(move |offset| self.cells.get(&(center + offset)))
            .flatten()
            .copied()
            .filter(move |&k| self.keys[k].abs_diff_eq(position, tolerance))
    }

    fn insert_key(&mut self, position: Vec3) -> usize {
        let key = self.keys.len();
        self.keys.push(position);
        self.triangles.push(Vec::new());
        self.cells.entry(cell_of(position)).or_default().push(key);
        key
    }
}

#[inline]
fn cell_of(position: Vec3) -> IVec3 {
    (position / CELL_SIZE).floor().as_ivec3()
}
