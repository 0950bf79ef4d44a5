// Procedural walkable surfaces.
//
// Every shape here keeps its triangle planes off the origin: the walker's
// inside test inverts the matrix of triangle corners, which is singular for
// a plane through the origin. Closed shapes are centred on the origin (their
// faces never contain it); flat shapes take an explicit height offset.

use std::collections::HashMap;

use glam::Vec3;
use serde::Deserialize;

use super::mesh::{GpuVertex, PolyMesh, RenderMesh, triangulate_smooth};

/// Surface selector used by the app config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceShape {
    #[default]
    Icosphere,
    Octahedron,
    Cube,
    Quad,
}

/// Build the configured surface at unit size.
pub fn surface_mesh(shape: SurfaceShape, subdivisions: u32) -> RenderMesh {
    match shape {
        SurfaceShape::Icosphere => icosphere(1.0, subdivisions),
        SurfaceShape::Octahedron => octahedron(1.0),
        SurfaceShape::Cube => cube(1.0),
        SurfaceShape::Quad => quad(1.0, -0.5),
    }
}

// ============================================================================
// PLATONIC SHAPES
// ============================================================================

/// Regular octahedron with its 6 corners on the axes at distance `radius`.
///
/// Triangle order: 0..4 are the upper faces (+Y), 4..8 the lower faces,
/// each group going around through the (+X,+Z), (-X,+Z), (-X,-Z), (+X,-Z)
/// quadrants.
pub fn octahedron(radius: f32) -> RenderMesh {
    let mut poly = PolyMesh::new();
    let px = poly.add_vertex(Vec3::X * radius);
    let nx = poly.add_vertex(Vec3::NEG_X * radius);
    let py = poly.add_vertex(Vec3::Y * radius);
    let ny = poly.add_vertex(Vec3::NEG_Y * radius);
    let pz = poly.add_vertex(Vec3::Z * radius);
    let nz = poly.add_vertex(Vec3::NEG_Z * radius);

    let quadrants = [(px, pz), (nx, pz), (nx, nz), (px, nz)];
    for pole in [py, ny] {
        for &(x, z) in &quadrants {
            // (x, pole, z) is CCW from outside when the octant has an even
            // number of negative axes; swap the last two otherwise.
            let negatives = usize::from(x == nx) + usize::from(pole == ny) + usize::from(z == nz);
            if negatives % 2 == 0 {
                poly.add_face(vec![x, pole, z]);
            } else {
                poly.add_face(vec![x, z, pole]);
            }
        }
    }

    triangulate_smooth(&poly)
}

/// Axis-aligned cube centred on the origin, 12 triangles sharing 8 corners.
pub fn cube(half_extent: f32) -> RenderMesh {
    let h = half_extent;
    let mut poly = PolyMesh::new();
    let corners = [
        Vec3::new(-h, -h, -h),
        Vec3::new( h, -h, -h),
        Vec3::new( h,  h, -h),
        Vec3::new(-h,  h, -h),
        Vec3::new(-h, -h,  h),
        Vec3::new( h, -h,  h),
        Vec3::new( h,  h,  h),
        Vec3::new(-h,  h,  h),
    ];
    for c in corners {
        poly.add_vertex(c);
    }

    poly.add_face(vec![0, 3, 2, 1]); // back
    poly.add_face(vec![4, 5, 6, 7]); // front
    poly.add_face(vec![0, 4, 7, 3]); // left
    poly.add_face(vec![1, 2, 6, 5]); // right
    poly.add_face(vec![3, 7, 6, 2]); // top
    poly.add_face(vec![0, 1, 5, 4]); // bottom

    triangulate_smooth(&poly)
}

// ============================================================================
// ICOSPHERE
// ============================================================================

/// Canonical key for an undirected edge: always (min, max).
fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Icosahedron refined `subdivisions` times by splitting every triangle into
/// four, with new points pushed out to the sphere.
///
/// Triangle count: 20 × 4^subdivisions.
pub fn icosphere(radius: f32, subdivisions: u32) -> RenderMesh {
    let t = (1.0 + 5.0_f32.sqrt()) * 0.5;
    let mut positions: Vec<Vec3> = [
        Vec3::new(-1.0,  t, 0.0), Vec3::new( 1.0,  t, 0.0),
        Vec3::new(-1.0, -t, 0.0), Vec3::new( 1.0, -t, 0.0),
        Vec3::new(0.0, -1.0,  t), Vec3::new(0.0,  1.0,  t),
        Vec3::new(0.0, -1.0, -t), Vec3::new(0.0,  1.0, -t),
        Vec3::new( t, 0.0, -1.0), Vec3::new( t, 0.0,  1.0),
        Vec3::new(-t, 0.0, -1.0), Vec3::new(-t, 0.0,  1.0),
    ]
    .into_iter()
    .map(|p| p.normalize() * radius)
    .collect();

    let mut faces: Vec<[usize; 3]> = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        // Midpoints are shared between the two faces of each edge so the
        // refined mesh stays watertight.
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        let mut midpoint = |a: usize, b: usize, positions: &mut Vec<Vec3>| -> usize {
            *midpoints.entry(edge_key(a, b)).or_insert_with(|| {
                let p = ((positions[a] + positions[b]) * 0.5).normalize() * radius;
                positions.push(p);
                positions.len() - 1
            })
        };

        let mut refined = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(a, b, &mut positions);
            let bc = midpoint(b, c, &mut positions);
            let ca = midpoint(c, a, &mut positions);
            refined.push([a, ab, ca]);
            refined.push([b, bc, ab]);
            refined.push([c, ca, bc]);
            refined.push([ab, bc, ca]);
        }
        faces = refined;
    }

    let mut poly = PolyMesh::new();
    poly.positions = positions;
    poly.faces = faces.into_iter().map(|f| f.to_vec()).collect();
    triangulate_smooth(&poly)
}

// ============================================================================
// FLAT SHAPES
// ============================================================================

/// Square of side `2 * half_extent` in the plane `y = height`, split along its
/// (-X,+Z)–(+X,-Z) diagonal into two triangles facing +Y.
///
/// Triangle 0 holds the +X/+Z corner, triangle 1 the -X/-Z corner.
pub fn quad(half_extent: f32, height: f32) -> RenderMesh {
    let h = half_extent;
    let mut poly = PolyMesh::new();
    let a = poly.add_vertex(Vec3::new(-h, height,  h));
    let b = poly.add_vertex(Vec3::new( h, height,  h));
    let c = poly.add_vertex(Vec3::new( h, height, -h));
    let d = poly.add_vertex(Vec3::new(-h, height, -h));
    poly.add_face(vec![a, b, c]);
    poly.add_face(vec![a, c, d]);
    triangulate_smooth(&poly)
}

/// One isolated triangle with no neighbours.
pub fn single_triangle(p0: Vec3, p1: Vec3, p2: Vec3) -> RenderMesh {
    let n = (p1 - p0).cross(p2 - p0).normalize_or_zero();
    RenderMesh::new(
        vec![GpuVertex::new(p0, n), GpuVertex::new(p1, n), GpuVertex::new(p2, n)],
        vec![0, 1, 2],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::surface_math::triangle_normal;

    fn assert_outward(mesh: &RenderMesh) {
        for t in 0..mesh.triangle_count() {
            let [p0, p1, p2] = mesh.triangle_corners(t);
            let centroid = (p0 + p1 + p2) / 3.0;
            assert!(
                triangle_normal(p0, p1, p2).dot(centroid) > 0.0,
                "triangle {t} faces inward"
            );
        }
    }

    #[test]
    fn octahedron_layout() {
        let mesh = octahedron(1.0);
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.triangle_count(), 8);
        assert_outward(&mesh);
    }

    #[test]
    fn cube_layout() {
        let mesh = cube(1.0);
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert_outward(&mesh);
    }

    #[test]
    fn icosphere_counts_and_radius() {
        for level in 0..3 {
            let mesh = icosphere(2.0, level);
            assert_eq!(mesh.triangle_count(), 20 * 4usize.pow(level));
            // Closed genus-0 surface: V - E + F = 2 with E = 3F / 2.
            let f = mesh.triangle_count() as i64;
            assert_eq!(mesh.vertices.len() as i64 - 3 * f / 2 + f, 2);
            for v in &mesh.vertices {
                assert!((v.position().length() - 2.0).abs() < 1e-5);
            }
            assert_outward(&mesh);
        }
    }

    #[test]
    fn quad_is_two_coplanar_triangles() {
        let mesh = quad(1.0, 0.5);
        assert_eq!(mesh.triangle_count(), 2);
        for t in 0..2 {
            let [p0, p1, p2] = mesh.triangle_corners(t);
            assert!(triangle_normal(p0, p1, p2).abs_diff_eq(Vec3::Y, 1e-6));
        }
    }
}
