// Mesh types shared by the walker simulation and the renderer.
//
// Two layers:
//   PolyMesh (n-gon faces, build time) → triangulate_*() → RenderMesh → walkers + GPU
//
// A RenderMesh with an empty index list is "non-indexed": every three
// consecutive vertices form one triangle.

use anyhow::{Result, bail};
use glam::Vec3;

// ============================================================================
// GPU VERTEX
// ============================================================================

/// GPU-ready vertex with position and normal.
///   @location(0) position: vec3<f32>
///   @location(1) normal:   vec3<f32>
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal:   [f32; 3],
}

impl GpuVertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal:   normal.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

// ============================================================================
// POLY MESH
// ============================================================================

/// Intermediate polygon mesh for procedural construction.
/// Faces use CCW winding when viewed from outside.
/// NOT GPU-ready and not walkable: triangulate into a `RenderMesh` first.
pub struct PolyMesh {
    pub positions: Vec<Vec3>,
    pub faces:     Vec<Vec<usize>>,  // each face = CCW-ordered vertex index list
}

impl PolyMesh {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            faces:     Vec::new(),
        }
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, pos: Vec3) -> usize {
        let idx = self.positions.len();
        self.positions.push(pos);
        idx
    }

    /// Add a face by vertex indices (CCW order).
    pub fn add_face(&mut self, indices: Vec<usize>) {
        debug_assert!(indices.len() >= 3, "Face must have at least 3 vertices");
        self.faces.push(indices);
    }

    pub fn vertex_count(&self) -> usize { self.positions.len() }
}

impl Default for PolyMesh {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// RENDER MESH
// ============================================================================

/// Triangle mesh consumed read-only by walkers and uploaded to the GPU.
///
/// `indices` empty → implicit triples of `vertices`.
#[derive(Clone, Debug, Default)]
pub struct RenderMesh {
    pub vertices: Vec<GpuVertex>,
    pub indices:  Vec<u32>,
}

impl RenderMesh {
    pub fn new(vertices: Vec<GpuVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Cast vertex slice to raw bytes for wgpu buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Cast index slice to raw bytes for wgpu buffer upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn index_count(&self) -> usize  { self.indices.len() }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        if self.is_indexed() {
            self.indices.len() / 3
        } else {
            self.vertices.len() / 3
        }
    }

    /// Vertex-buffer indices of triangle `t`'s three corners, for either layout.
    #[inline]
    pub fn triangle_vertex_indices(&self, t: usize) -> [usize; 3] {
        let base = t * 3;
        if self.is_indexed() {
            [
                self.indices[base] as usize,
                self.indices[base + 1] as usize,
                self.indices[base + 2] as usize,
            ]
        } else {
            [base, base + 1, base + 2]
        }
    }

    /// Corner positions of triangle `t` in winding order.
    #[inline]
    pub fn triangle_corners(&self, t: usize) -> [Vec3; 3] {
        let [i0, i1, i2] = self.triangle_vertex_indices(t);
        [
            self.vertices[i0].position(),
            self.vertices[i1].position(),
            self.vertices[i2].position(),
        ]
    }

    /// Check the layout invariants walkers rely on.
    pub fn validate(&self) -> Result<()> {
        if self.is_indexed() {
            if self.indices.len() % 3 != 0 {
                bail!("index count {} is not a multiple of 3", self.indices.len());
            }
            let vertex_count = self.vertices.len();
            if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
                bail!("index {bad} out of range for {vertex_count} vertices");
            }
        } else if self.vertices.len() % 3 != 0 {
            bail!(
                "non-indexed mesh has {} vertices, not a multiple of 3",
                self.vertices.len()
            );
        }
        Ok(())
    }

    /// Expand into implicit triples (one vertex per triangle corner).
    /// Triangle order and winding are preserved, so triangle `t` keeps its index.
    pub fn to_non_indexed(&self) -> RenderMesh {
        if !self.is_indexed() {
            return self.clone();
        }
        let vertices = self.indices.iter().map(|&i| self.vertices[i as usize]).collect();
        RenderMesh { vertices, indices: Vec::new() }
    }
}

// ============================================================================
// TRIANGULATION
// ============================================================================

/// Convert a PolyMesh to an indexed RenderMesh using smooth (area-weighted) normals.
///
/// Algorithm:
///   1. Accumulate area-weighted face normals into each vertex's normal accumulator.
///      The cross product magnitude = 2×triangle_area, giving automatic area-weighting.
///   2. Normalize each accumulated normal.
///   3. Fan-triangulate each face (from vertex 0) into the shared index buffer.
pub fn triangulate_smooth(poly: &PolyMesh) -> RenderMesh {
    let n_verts = poly.vertex_count();

    let mut normal_accum: Vec<Vec3> = vec![Vec3::ZERO; n_verts];
    for face in &poly.faces {
        for i in 1..(face.len() - 1) {
            let a = poly.positions[face[0]];
            let b = poly.positions[face[i]];
            let c = poly.positions[face[i + 1]];
            let weighted_normal = (b - a).cross(c - a);
            normal_accum[face[0]]     += weighted_normal;
            normal_accum[face[i]]     += weighted_normal;
            normal_accum[face[i + 1]] += weighted_normal;
        }
    }

    let vertices: Vec<GpuVertex> = poly.positions.iter()
        .zip(normal_accum.iter())
        .map(|(pos, n)| GpuVertex::new(*pos, n.normalize_or_zero()))
        .collect();

    let mut indices: Vec<u32> = Vec::new();
    for face in &poly.faces {
        for i in 1..(face.len() - 1) {
            indices.push(face[0]     as u32);
            indices.push(face[i]     as u32);
            indices.push(face[i + 1] as u32);
        }
    }

    RenderMesh { vertices, indices }
}

/// Convert a PolyMesh to a non-indexed RenderMesh with one face normal per triangle.
/// Corners shared between faces are duplicated bit-for-bit.
pub fn triangulate_flat(poly: &PolyMesh) -> RenderMesh {
    let mut vertices = Vec::new();
    for face in &poly.faces {
        for i in 1..(face.len() - 1) {
            let a = poly.positions[face[0]];
            let b = poly.positions[face[i]];
            let c = poly.positions[face[i + 1]];
            let n = (b - a).cross(c - a).normalize_or_zero();
            vertices.push(GpuVertex::new(a, n));
            vertices.push(GpuVertex::new(b, n));
            vertices.push(GpuVertex::new(c, n));
        }
    }
    RenderMesh { vertices, indices: Vec::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> PolyMesh {
        let mut poly = PolyMesh::new();
        let a = poly.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        let b = poly.add_vertex(Vec3::new(1.0, 1.0, 0.0));
        let c = poly.add_vertex(Vec3::new(1.0, 1.0, -1.0));
        let d = poly.add_vertex(Vec3::new(0.0, 1.0, -1.0));
        poly.add_face(vec![a, b, c, d]);
        poly
    }

    #[test]
    fn fan_triangulation_shares_vertices() {
        let mesh = triangulate_smooth(&square());
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn flat_triangulation_duplicates_corners() {
        let mesh = triangulate_flat(&square());
        assert!(!mesh.is_indexed());
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangle_vertex_indices(1), [3, 4, 5]);
    }

    #[test]
    fn expansion_keeps_triangle_order() {
        let indexed = triangulate_smooth(&square());
        let expanded = indexed.to_non_indexed();
        for t in 0..indexed.triangle_count() {
            assert_eq!(indexed.triangle_corners(t), expanded.triangle_corners(t));
        }
    }

    #[test]
    fn validate_rejects_broken_layouts() {
        let mut mesh = triangulate_smooth(&square());
        mesh.indices.push(0);
        assert!(mesh.validate().is_err());

        mesh.indices.truncate(6);
        mesh.indices[5] = 99;
        assert!(mesh.validate().is_err());

        let mut flat = triangulate_flat(&square());
        flat.vertices.pop();
        assert!(flat.validate().is_err());
    }
}
