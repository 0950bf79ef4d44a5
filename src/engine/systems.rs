// ECS systems for the walker simulation.
// Each system touches only its own walkers; the surface is read-only.

use bevy_ecs::prelude::*;

use super::components::TickStats;
use super::walker::{StepOutcome, SurfaceWalker, WalkSurface};

/// Advance every walker by one step and record what happened.
pub fn step_walkers_system(
    surface: Res<WalkSurface>,
    mut walkers: Query<&mut SurfaceWalker>,
    mut stats: ResMut<TickStats>,
) {
    let mut tick = TickStats::default();
    for mut walker in walkers.iter_mut() {
        match walker.update(&surface) {
            StepOutcome::Moved => tick.moved += 1,
            StepOutcome::Crossed { .. } => tick.crossed += 1,
            StepOutcome::Bounced => tick.bounced += 1,
        }
    }
    *stats = tick;
}
