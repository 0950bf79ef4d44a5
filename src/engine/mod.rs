// Engine module - surface walker simulation plus the demo's render helpers

pub mod adjacency;
pub mod camera;
pub mod components;
pub mod config;
pub mod debug_overlay;
pub mod input;
pub mod mesh;
pub mod population;
pub mod random;
pub mod shapes;
pub mod surface_math;
pub mod systems;
pub mod walker;

// Re-export commonly used items
pub use adjacency::AdjacencyIndex;
pub use components::*;
pub use mesh::{GpuVertex, PolyMesh, RenderMesh};
pub use population::WalkerPopulation;
pub use random::{RandomSource, ScriptedRandom, StdRandom};
pub use walker::{CrossingSearch, StepOutcome, SurfaceWalker, WalkSurface};
