// Surface crawlers: point agents wandering across the triangles of a mesh,
// plus the wgpu plumbing the demo binary uses to draw them.

pub mod engine;
