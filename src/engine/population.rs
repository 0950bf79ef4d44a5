// A crowd of surface walkers sharing one mesh.
//
// Walkers are ECS entities; the surface is a world resource that outlives
// all of them. Walkers never see each other, so the tick is one system
// iterating every SurfaceWalker once.

use anyhow::{Result, bail};
use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use glam::Mat4;

use super::components::{TickStats, WalkerTint};
use super::random::RandomSource;
use super::systems::step_walkers_system;
use super::walker::{SurfaceWalker, WalkSurface};

pub struct WalkerPopulation {
    world: World,
    schedule: Schedule,
    walkers: QueryState<(&'static SurfaceWalker, &'static WalkerTint)>,
    count: usize,
}

impl WalkerPopulation {
    /// Spawn `count` walkers at random places on `surface`.
    ///
    /// All randomness comes from `rng`; the same seed gives the same crowd.
    pub fn new(
        surface: WalkSurface,
        count: usize,
        speed: f32,
        rng: &mut dyn RandomSource,
    ) -> Result<Self> {
        if surface.triangle_count() == 0 {
            bail!("walker surface has no triangles");
        }

        log::info!(
            "spawning {count} walkers on {} triangles ({})",
            surface.triangle_count(),
            if surface.mesh().is_indexed() { "indexed" } else { "non-indexed" }
        );

        let mut world = World::new();
        for i in 0..count {
            let mut walker = SurfaceWalker::new().with_speed(speed);
            walker.set_up(&surface, rng)?;
            world.spawn((walker, WalkerTint::from_index(i)));
        }
        world.insert_resource(surface);
        world.init_resource::<TickStats>();

        let mut schedule = Schedule::default();
        // Stepping order must not depend on thread scheduling.
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(step_walkers_system);

        let walkers = world.query::<(&SurfaceWalker, &WalkerTint)>();

        Ok(Self { world, schedule, walkers, count })
    }

    /// Step every walker once.
    pub fn update(&mut self) -> TickStats {
        self.schedule.run(&mut self.world);
        *self.world.resource::<TickStats>()
    }

    /// Visit every walker in spawn order.
    pub fn for_each(&mut self, mut f: impl FnMut(&SurfaceWalker, &WalkerTint)) {
        for (walker, tint) in self.walkers.iter(&self.world) {
            f(walker, tint);
        }
    }

    /// `transform()` of every walker, in spawn order.
    pub fn transforms(&mut self) -> Vec<Mat4> {
        let mut out = Vec::with_capacity(self.count);
        self.for_each(|walker, _| out.push(walker.transform()));
        out
    }

    pub fn surface(&self) -> &WalkSurface {
        self.world.resource::<WalkSurface>()
    }

    /// Counts from the most recent `update()`.
    pub fn last_tick(&self) -> TickStats {
        *self.world.resource::<TickStats>()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
