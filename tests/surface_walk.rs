// End-to-end walker behaviour over the procedural surfaces.

use glam::Vec3;

use surface_crawlers::engine::mesh::RenderMesh;
use surface_crawlers::engine::shapes::{cube, icosphere, octahedron, quad, single_triangle};
use surface_crawlers::engine::surface_math::{is_inside_triangle, positions_equal};
use surface_crawlers::engine::walker::DEFAULT_SPEED;
use surface_crawlers::engine::{
    ScriptedRandom, StdRandom, StepOutcome, SurfaceWalker, WalkSurface, WalkerPopulation,
};

fn assert_contained(walker: &SurfaceWalker, surface: &WalkSurface, tick: usize) {
    let [p0, p1, p2] = surface.mesh().triangle_corners(walker.triangle_index());
    assert_eq!(walker.corners(), [p0, p1, p2], "tick {tick}: cached corners drifted");
    assert!(
        is_inside_triangle(p0, p1, p2, walker.position()),
        "tick {tick}: walker left triangle {}",
        walker.triangle_index()
    );
    assert!(
        (walker.velocity().length() - 1.0).abs() < 1e-4,
        "tick {tick}: heading is not unit length"
    );
    assert!(
        walker.velocity().dot(walker.normal()).abs() < 1e-3,
        "tick {tick}: heading left the plane of triangle {}",
        walker.triangle_index()
    );
}

fn walk_and_check(mesh: RenderMesh, seed: u64) {
    let surface = WalkSurface::new(mesh).expect("valid mesh");
    let mut rng = StdRandom::seeded(seed);
    let mut walkers: Vec<SurfaceWalker> = (0..16)
        .map(|_| {
            let mut walker = SurfaceWalker::new().with_speed(0.03);
            walker.set_up(&surface, &mut rng).expect("placement");
            walker
        })
        .collect();

    let mut crossings = 0;
    for tick in 0..400 {
        for walker in &mut walkers {
            if let StepOutcome::Crossed { from, to } = walker.update(&surface) {
                assert_ne!(from, to);
                crossings += 1;
            }
            assert_contained(walker, &surface, tick);
        }
    }
    assert!(crossings > 0, "no walker ever changed triangle");
}

#[test]
fn walkers_stay_on_octahedron() {
    walk_and_check(octahedron(1.0), 1);
    walk_and_check(octahedron(1.0).to_non_indexed(), 1);
}

#[test]
fn walkers_stay_on_cube() {
    walk_and_check(cube(1.0), 2);
    walk_and_check(cube(1.0).to_non_indexed(), 2);
}

#[test]
fn walkers_stay_on_icosphere() {
    walk_and_check(icosphere(1.0, 1), 3);
    walk_and_check(icosphere(1.0, 1).to_non_indexed(), 3);
}

#[test]
fn closed_surfaces_never_bounce() {
    let surface = WalkSurface::new(icosphere(1.0, 2)).expect("valid mesh");
    let mut rng = StdRandom::seeded(11);
    let mut walker = SurfaceWalker::new().with_speed(0.02);
    walker.set_up(&surface, &mut rng).expect("placement");
    for _ in 0..1000 {
        assert_ne!(walker.update(&surface), StepOutcome::Bounced);
    }
}

/// Every walker must still be making `Moved` steps after a long warm-up.
/// A walker trading places between two triangles forever only reports
/// crossings and never moves.
fn assert_keeps_moving(mesh: RenderMesh, walkers: usize, seed: u64) {
    const WARM_UP: usize = 2500;
    const WINDOW: usize = 500;

    let surface = WalkSurface::new(mesh).expect("valid mesh");
    let mut rng = StdRandom::seeded(seed);
    for w in 0..walkers {
        let mut walker = SurfaceWalker::new().with_speed(DEFAULT_SPEED);
        walker.set_up(&surface, &mut rng).expect("placement");
        for _ in 0..WARM_UP {
            walker.update(&surface);
        }
        let start = walker.position();
        let moved = (0..WINDOW)
            .filter(|_| walker.update(&surface) == StepOutcome::Moved)
            .count();
        assert!(moved > 0, "walker {w} stuck at {start} on triangle {}", walker.triangle_index());
        assert_contained(&walker, &surface, WARM_UP + WINDOW);
    }
}

#[test]
fn walkers_keep_moving_on_dense_icosphere() {
    assert_keeps_moving(icosphere(1.0, 3), 200, 99);
}

#[test]
fn walkers_keep_moving_on_coarse_shapes() {
    assert_keeps_moving(octahedron(1.0), 100, 99);
    assert_keeps_moving(cube(1.0), 100, 99);
    assert_keeps_moving(icosphere(1.0, 3).to_non_indexed(), 50, 7);
}

#[test]
fn octahedron_corner_incidence() {
    for mesh in [octahedron(1.0), octahedron(1.0).to_non_indexed()] {
        let surface = WalkSurface::new(mesh).expect("valid mesh");
        let adjacency = surface.adjacency();
        assert_eq!(adjacency.vertex_count(), 6);
        assert_eq!(adjacency.triangles_at(Vec3::Y), &[0, 1, 2, 3]);
        assert_eq!(adjacency.triangles_at(Vec3::NEG_Y), &[4, 5, 6, 7]);
        assert_eq!(adjacency.triangles_at(Vec3::X), &[0, 3, 4, 7]);
        assert_eq!(adjacency.triangles_at(Vec3::NEG_X), &[1, 2, 5, 6]);
        assert_eq!(adjacency.triangles_at(Vec3::Z), &[0, 1, 4, 5]);
        assert_eq!(adjacency.triangles_at(Vec3::NEG_Z), &[2, 3, 6, 7]);
        assert!(adjacency.triangles_at(Vec3::new(0.3, 0.3, 0.3)).is_empty());
    }
}

#[test]
fn crossing_snaps_onto_shared_edge() {
    let surface = WalkSurface::new(quad(1.0, 0.5)).expect("valid mesh");
    let mut walker = SurfaceWalker::new().with_speed(0.5);
    let heading = Vec3::new(-1.0, 0.0, -1.0);
    walker
        .place(&surface, 0, Vec3::new(0.1, 0.5, 0.0), heading)
        .expect("placement");

    assert_eq!(walker.update(&surface), StepOutcome::Crossed { from: 0, to: 1 });
    assert_eq!(walker.triangle_index(), 1);

    // The diagonal from (-1, 0.5, 1) to (1, 0.5, -1) is the line x + z = 0.
    let p = walker.position();
    assert!((p.x + p.z).abs() < 1e-5, "not on the diagonal: {p}");
    assert!((p.y - 0.5).abs() < 1e-6);
    assert!(positions_equal(p, Vec3::new(0.05, 0.5, -0.05)));

    // Coplanar neighbours keep the heading.
    assert!(positions_equal(walker.velocity(), heading.normalize()));

    // Next step continues into triangle 1.
    assert_eq!(walker.update(&surface), StepOutcome::Moved);
    assert_eq!(walker.triangle_index(), 1);
}

#[test]
fn lone_triangle_reverses_heading_in_place() {
    let mesh = single_triangle(
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(0.0, 1.0, 1.0),
    );
    let surface = WalkSurface::new(mesh).expect("valid mesh");
    let mut walker = SurfaceWalker::new().with_speed(0.5);
    let start = Vec3::new(0.2, 0.2, 1.0);
    walker.place(&surface, 0, start, Vec3::NEG_X).expect("placement");

    assert_eq!(walker.update(&surface), StepOutcome::Bounced);
    assert_eq!(walker.position(), start);
    assert_eq!(walker.velocity(), Vec3::X);

    // The reversed heading leads back inside.
    assert_eq!(walker.update(&surface), StepOutcome::Moved);
    assert!((walker.position().x - 0.7).abs() < 1e-6);
}

#[test]
fn scripted_placement_is_reproducible() {
    let surface = WalkSurface::new(octahedron(1.0)).expect("valid mesh");
    let script = vec![0.5, 0.25, 0.75, 0.5];

    let mut a = SurfaceWalker::new();
    a.set_up(&surface, &mut ScriptedRandom::new(script.clone())).expect("placement");
    let mut b = SurfaceWalker::new();
    b.set_up(&surface, &mut ScriptedRandom::new(script)).expect("placement");

    assert_eq!(a.triangle_index(), 4);
    assert_eq!(a.triangle_index(), b.triangle_index());
    assert_eq!(a.position(), b.position());
    assert_eq!(a.velocity(), b.velocity());
}

#[test]
fn seeded_walkers_follow_identical_trajectories() {
    let surface = WalkSurface::new(icosphere(1.0, 2)).expect("valid mesh");
    let spawn = || {
        let mut walker = SurfaceWalker::new().with_speed(0.02);
        walker.set_up(&surface, &mut StdRandom::seeded(1234)).expect("placement");
        walker
    };
    let mut a = spawn();
    let mut b = spawn();
    assert_eq!(a.position().to_array(), b.position().to_array());
    assert_eq!(a.velocity().to_array(), b.velocity().to_array());

    for tick in 0..100 {
        assert_eq!(a.update(&surface), b.update(&surface), "tick {tick}");
        assert_eq!(a.position().to_array(), b.position().to_array(), "tick {tick}");
        assert_eq!(a.velocity().to_array(), b.velocity().to_array(), "tick {tick}");
        assert_eq!(a.triangle_index(), b.triangle_index(), "tick {tick}");
    }
}

#[test]
fn seeded_populations_match_bit_for_bit() {
    let build = || {
        let surface = WalkSurface::new(icosphere(1.0, 1)).expect("valid mesh");
        WalkerPopulation::new(surface, 32, 0.01, &mut StdRandom::seeded(42)).expect("population")
    };
    let mut a = build();
    let mut b = build();

    for _ in 0..100 {
        assert_eq!(a.update(), b.update());
    }
    assert_eq!(a.transforms(), b.transforms());
}

#[test]
fn population_tick_accounts_for_every_walker() {
    let surface = WalkSurface::new(quad(1.0, 0.5)).expect("valid mesh");
    let mut population =
        WalkerPopulation::new(surface, 25, 0.05, &mut StdRandom::seeded(5)).expect("population");

    assert_eq!(population.len(), 25);
    let mut bounced = 0;
    for _ in 0..200 {
        let tick = population.update();
        assert_eq!(tick.total(), 25);
        assert_eq!(population.last_tick(), tick);
        bounced += tick.bounced;
    }
    // An open quad has a rim to bounce off.
    assert!(bounced > 0);
    assert_eq!(population.transforms().len(), 25);
}

#[test]
fn empty_surface_rejects_walkers() {
    let surface = WalkSurface::new(RenderMesh::default()).expect("empty layout is valid");
    assert_eq!(surface.triangle_count(), 0);

    let mut walker = SurfaceWalker::new();
    assert!(walker.set_up(&surface, &mut StdRandom::seeded(0)).is_err());
    assert!(WalkerPopulation::new(surface, 3, 0.01, &mut StdRandom::seeded(0)).is_err());
}

#[test]
fn malformed_layout_is_rejected() {
    let mut mesh = octahedron(1.0);
    mesh.indices.pop();
    assert!(WalkSurface::new(mesh).is_err());

    let mut mesh = octahedron(1.0);
    mesh.indices[0] = 99;
    assert!(WalkSurface::new(mesh).is_err());
}
