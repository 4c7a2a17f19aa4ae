use std::thread;
use std::time::{Duration, Instant};

use fdgraph::simulation::barnes_hut::pairwise_force;
use fdgraph::simulation::forces::jitter_direction;
use fdgraph::{
    bench_graph, exact_repulsion, seed_positions, spiral_position, Body, DriverOptions, Graph, LayoutDriver, NVec3,
    Octree, ParamChange, SimulationParams, Simulator, SimulatorState,
};

/// Two unit-mass bodies separated along the x-axis
pub fn two_bodies(dist: f64) -> Vec<Body> {
    vec![
        Body::at_rest(NVec3::new(-dist / 2.0, 0.0, 0.0), 1.0),
        Body::at_rest(NVec3::new(dist / 2.0, 0.0, 0.0), 1.0),
    ]
}

/// Deterministic cloud of `n` bodies, no rand needed
pub fn body_cloud(n: usize) -> Vec<Body> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = NVec3::new(
                (i_f * 0.37).sin() * 300.0,
                (i_f * 0.13).cos() * 300.0,
                (i_f * 0.71).sin() * 300.0,
            );
            Body::at_rest(x, 1.0 + (i % 3) as f64)
        })
        .collect()
}

/// A - B - C, placed by the simulator
pub fn chain_graph() -> Graph<&'static str> {
    let mut g = Graph::new();
    for id in ["A", "B", "C"] {
        g.add_node(id, ()).unwrap();
    }
    g.add_link(&"A", &"B").unwrap();
    g.add_link(&"B", &"C").unwrap();
    g
}

/// Square cycle of side 110 in the xy-plane
pub fn square_cycle() -> Graph<u32> {
    let corners = [(0.0, 0.0), (110.0, 0.0), (110.0, 110.0), (0.0, 110.0)];
    let mut g = Graph::new();
    for (i, (x, y)) in corners.iter().enumerate() {
        g.add_node_at(i as u32, (), NVec3::new(*x, *y, 0.0)).unwrap();
    }
    for i in 0..4u32 {
        g.add_link(&i, &((i + 1) % 4)).unwrap();
    }
    g
}

/// Ring of `n` nodes at their default spiral placement
pub fn ring(n: usize) -> Graph<usize> {
    let mut g = Graph::new();
    for i in 0..n {
        g.add_node(i, ()).unwrap();
    }
    for i in 0..n {
        g.add_link(&i, &((i + 1) % n)).unwrap();
    }
    g
}

fn example_params() -> SimulationParams {
    SimulationParams {
        spring_length: 110.0,
        spring_coeff: 1e-6,
        gravity: -2.0,
        theta: 0.1,
        drag_coeff: 0.3,
        time_step: 1.0,
    }
}

fn distance(sim: &Simulator, a: usize, b: usize) -> f64 {
    (sim.bodies()[a].x - sim.bodies()[b].x).norm()
}

// ==================================================================================
// Repulsion tests
// ==================================================================================

#[test]
fn repulsion_newton_third_law() {
    let bodies = two_bodies(1.0);
    let f = exact_repulsion(&bodies, -2.0);

    let net = f[0] + f[1];
    assert!(net.norm() < 1e-12, "Net force not zero: {:?}", net);
}

#[test]
fn negative_gravity_pushes_bodies_apart() {
    let bodies = two_bodies(2.0);
    let f = pairwise_force(&bodies, 0, 1, -2.0);

    let toward_other = bodies[1].x - bodies[0].x;
    assert!(f.dot(&toward_other) < 0.0, "Force on body 0 is not away from body 1");
}

#[test]
fn repulsion_inverse_square_law() {
    let near = pairwise_force(&two_bodies(1.0), 0, 1, -2.0);
    let far = pairwise_force(&two_bodies(2.0), 0, 1, -2.0);

    let ratio = near.norm() / far.norm();
    assert!((ratio - 4.0).abs() < 1e-9, "Expected 4x, got {}", ratio);
}

#[test]
fn coincident_bodies_still_repel_finitely() {
    let bodies = vec![Body::at_rest(NVec3::new(3.0, 3.0, 3.0), 1.0); 2];
    let f01 = pairwise_force(&bodies, 0, 1, -2.0);
    let f10 = pairwise_force(&bodies, 1, 0, -2.0);

    assert!(f01.iter().all(|c| c.is_finite()));
    assert!(f01.norm() > 0.0);
    assert!((f01 + f10).norm() < 1e-12, "jitter is not antisymmetric");
}

// ==================================================================================
// Barnes-Hut tests
// ==================================================================================

#[test]
fn octree_root_aggregates_mass_and_centroid() {
    let bodies = body_cloud(64);
    let tree = Octree::build(&bodies);
    let root = tree.root().expect("non-empty tree has a root");

    let total: f64 = bodies.iter().map(|b| b.m).sum();
    let centroid = bodies.iter().fold(NVec3::zeros(), |acc, b| acc + b.x * b.m) / total;

    assert!((root.mass - total).abs() < 1e-9);
    assert!((root.com - centroid).norm() < 1e-9);
    for b in &bodies {
        assert!(root.contains(&b.x), "body outside root cube");
    }
}

#[test]
fn octree_of_nothing_is_empty() {
    let tree = Octree::build(&[]);
    assert!(tree.root().is_none());
    assert_eq!(tree.repulsion_on(0, &[], -2.0, 0.5), NVec3::zeros());
}

#[test]
fn octree_leaves_hold_one_body_each() {
    let bodies = body_cloud(50);
    let tree = Octree::build(&bodies);

    let occupied = tree.cells().iter().filter(|c| c.body.is_some()).count();
    assert_eq!(occupied, bodies.len());
    assert!(tree.cells().iter().filter(|c| c.body.is_some()).all(|c| c.is_leaf()));
}

#[test]
fn octree_converges_to_exact_sum_as_theta_shrinks() {
    let bodies = body_cloud(200);
    let exact = exact_repulsion(&bodies, -2.0);
    let tree = Octree::build(&bodies);

    for (i, e) in exact.iter().enumerate() {
        let approx = tree.repulsion_on(i, &bodies, -2.0, 1e-9);
        let rel = (approx - e).norm() / e.norm();
        assert!(rel < 1e-3, "body {i}: relative error {rel}");
    }
}

#[test]
fn octree_moderate_theta_stays_close() {
    let bodies = body_cloud(300);
    let exact = exact_repulsion(&bodies, -2.0);
    let tree = Octree::build(&bodies);

    let (mut err, mut norm) = (0.0, 0.0);
    for (i, e) in exact.iter().enumerate() {
        err += (tree.repulsion_on(i, &bodies, -2.0, 0.3) - e).norm();
        norm += e.norm();
    }
    assert!(err / norm < 0.05, "aggregate relative error {}", err / norm);
}

#[test]
fn octree_handles_stacked_bodies() {
    let bodies = vec![Body::at_rest(NVec3::new(1.0, -2.0, 0.5), 1.0); 5];
    let tree = Octree::build(&bodies);

    let root = tree.root().unwrap();
    assert!((root.mass - 5.0).abs() < 1e-12);

    let mut net = NVec3::zeros();
    for i in 0..bodies.len() {
        let f = tree.repulsion_on(i, &bodies, -2.0, 0.5);
        assert!(f.iter().all(|c| c.is_finite()));
        net += f;
    }
    assert!(net.norm() < 1e-9, "stacked bodies do not cancel: {:?}", net);
}

#[test]
fn octree_never_counts_the_query_body() {
    // a single body feels nothing, whatever theta is
    let bodies = vec![Body::at_rest(NVec3::new(4.0, 5.0, 6.0), 3.0)];
    let tree = Octree::build(&bodies);
    assert_eq!(tree.repulsion_on(0, &bodies, -2.0, 1.0), NVec3::zeros());
}

// ==================================================================================
// Simulator tests
// ==================================================================================

#[test]
fn simulator_starts_uninitialized_then_runs() {
    let g = ring(5);
    let mut sim = Simulator::new(&g, SimulationParams::default()).unwrap();
    assert_eq!(sim.state(), SimulatorState::Uninitialized);
    assert_eq!(sim.step_count(), 0);

    let m = sim.step();
    assert_eq!(sim.state(), SimulatorState::Running);
    assert_eq!(m.step, 1);
    assert_eq!(sim.last_metrics(), m);
}

#[test]
fn chain_keeps_links_near_rest_length() {
    let g = chain_graph();
    let mut sim = Simulator::new(&g, example_params()).unwrap();
    sim.run(1000);

    let ab = distance(&sim, 0, 1);
    let bc = distance(&sim, 1, 2);
    let ac = distance(&sim, 0, 2);

    assert!((ab - 110.0).abs() / 110.0 < 0.05, "AB = {ab}");
    assert!((bc - 110.0).abs() / 110.0 < 0.05, "BC = {bc}");
    assert!(ac > ab && ac > bc, "triangle collapsed: AC = {ac}");
}

#[test]
fn chain_starts_one_spring_length_apart() {
    let g = chain_graph();
    let sim = Simulator::new(&g, example_params()).unwrap();

    assert!((distance(&sim, 0, 1) - 110.0).abs() < 1e-9);
    assert!((distance(&sim, 1, 2) - 110.0).abs() < 1e-9);
    assert!(distance(&sim, 0, 2) > 200.0, "chain folded back");
}

#[test]
fn seeding_follows_configured_spring_length() {
    let g = chain_graph();
    let short = SimulationParams {
        spring_length: 30.0,
        ..example_params()
    };
    let sim = Simulator::new(&g, short).unwrap();

    assert!((distance(&sim, 0, 1) - 30.0).abs() < 1e-9);
    assert!((distance(&sim, 1, 2) - 30.0).abs() < 1e-9);
}

#[test]
fn explicit_positions_are_kept_and_anchor_the_rest() {
    let mut g = Graph::new();
    g.add_node_at("fixed", (), NVec3::new(500.0, -20.0, 7.0)).unwrap();
    g.add_node("free", ()).unwrap();
    g.add_link(&"fixed", &"free").unwrap();

    let positions = seed_positions(&g, 110.0);
    assert_eq!(positions[0], NVec3::new(500.0, -20.0, 7.0));
    assert!(((positions[1] - positions[0]).norm() - 110.0).abs() < 1e-9);
}

#[test]
fn unlinked_nodes_never_share_a_seed() {
    let positions: Vec<NVec3> = (0..500).map(|i| spiral_position(i, 110.0)).collect();
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            assert!((positions[i] - positions[j]).norm() > 1e-6, "nodes {i} and {j} overlap");
        }
    }
}

#[test]
fn jitter_is_a_repeatable_unit_vector() {
    for seed in [0, 1, 42, u64::MAX] {
        let d = jitter_direction(seed);
        assert!((d.norm() - 1.0).abs() < 1e-12);
        assert_eq!(d, jitter_direction(seed));
    }
    assert_ne!(jitter_direction(1), jitter_direction(2));
}

#[test]
fn identical_runs_are_bit_for_bit_equal() {
    let g = ring(40);
    let mut a = Simulator::new(&g, SimulationParams::default()).unwrap();
    let mut b = Simulator::new(&g, SimulationParams::default()).unwrap();
    a.run(200);
    b.run(200);

    assert_eq!(a.snapshot().positions, b.snapshot().positions);
}

#[test]
fn square_cycle_displacement_decays() {
    let g = square_cycle();
    let mut sim = Simulator::new(&g, SimulationParams::default()).unwrap();

    sim.run(50);
    let mut previous = sim.last_metrics().max_displacement;
    for _ in 0..250 {
        let m = sim.step();
        assert!(
            m.max_displacement < previous,
            "step {}: displacement grew from {previous} to {}",
            m.step,
            m.max_displacement
        );
        previous = m.max_displacement;
    }
}

#[test]
fn kinetic_energy_matches_bodies() {
    let g = ring(12);
    let mut sim = Simulator::new(&g, SimulationParams::default()).unwrap();
    let m = sim.run(10);

    let expected: f64 = sim.bodies().iter().map(|b| 0.5 * b.m * b.v.norm_squared()).sum();
    assert!((m.kinetic_energy - expected).abs() < 1e-15);
    assert!(m.kinetic_energy > 0.0);
}

#[test]
fn exact_and_octree_layouts_agree_for_small_theta() {
    let g = ring(30);
    let params = SimulationParams {
        theta: 1e-6,
        ..SimulationParams::default()
    };
    let mut bh = Simulator::with_repulsion(&g, params, true).unwrap();
    let mut direct = Simulator::with_repulsion(&g, params, false).unwrap();
    bh.run(20);
    direct.run(20);

    for (p, q) in bh.bodies().iter().zip(direct.bodies()) {
        assert!((p.x - q.x).norm() < 1e-6);
    }
}

#[test]
fn coincident_link_endpoints_separate() {
    let mut g = Graph::new();
    g.add_node_at(1, (), NVec3::new(5.0, 5.0, 5.0)).unwrap();
    g.add_node_at(2, (), NVec3::new(5.0, 5.0, 5.0)).unwrap();
    g.add_link(&1, &2).unwrap();

    let mut sim = Simulator::new(&g, SimulationParams::default()).unwrap();
    sim.step();

    let d = distance(&sim, 0, 1);
    assert!(d.is_finite() && d > 0.0, "endpoints still coincide: {d}");
}

#[test]
fn invalid_reconfiguration_keeps_previous_values() {
    let g = ring(3);
    let mut sim = Simulator::new(&g, SimulationParams::default()).unwrap();
    let before = *sim.params();

    assert!(sim.set_spring_length(0.0).is_err());
    assert!(sim.set_spring_length(-5.0).is_err());
    assert!(sim.set_time_step(0.0).is_err());
    assert!(sim.set_theta(0.0).is_err());
    assert!(sim.set_theta(1.5).is_err());
    assert!(sim.set_drag_coeff(-0.1).is_err());
    assert!(sim.set_gravity(f64::NAN).is_err());
    assert!(sim.set_spring_coeff(f64::INFINITY).is_err());

    assert_eq!(*sim.params(), before);
}

#[test]
fn reconfiguration_applies_on_next_step() {
    let g = ring(6);
    let mut sim = Simulator::new(&g, SimulationParams::default()).unwrap();

    sim.set_gravity(0.0).unwrap();
    sim.set_spring_coeff(0.0).unwrap();
    sim.set_theta(1.0).unwrap();
    let start = sim.snapshot().positions;

    // no forces left and bodies at rest: nothing moves
    let m = sim.step();
    assert_eq!(m.max_displacement, 0.0);
    assert_eq!(sim.snapshot().positions, start);
}

#[test]
fn per_link_length_overrides_configured_rest() {
    let mut g = Graph::new();
    g.add_node_at("a", (), NVec3::new(0.0, 0.0, 0.0)).unwrap();
    g.add_node_at("b", (), NVec3::new(40.0, 0.0, 0.0)).unwrap();
    g.add_link_with_length(&"a", &"b", 40.0).unwrap();

    let params = SimulationParams {
        gravity: 0.0,
        ..SimulationParams::default()
    };
    let mut sim = Simulator::new(&g, params).unwrap();
    sim.run(10);

    // already at its own rest length, so the 110 default does not pull it apart
    assert!((distance(&sim, 0, 1) - 40.0).abs() < 1e-12);
}

#[test]
fn snapshot_is_a_copy() {
    let g = ring(4);
    let mut sim = Simulator::new(&g, SimulationParams::default()).unwrap();
    let before = sim.snapshot();
    sim.run(5);

    assert_eq!(before.step, 0);
    assert_ne!(before.positions, sim.snapshot().positions);
}

// ==================================================================================
// Driver tests
// ==================================================================================

#[test]
fn driver_steps_and_applies_queued_changes() {
    let g = ring(8);
    let sim = Simulator::new(&g, SimulationParams::default()).unwrap();
    let handle = LayoutDriver::spawn(
        sim,
        DriverOptions {
            tick: Duration::from_millis(1),
            settle_threshold: Some(1e-9),
        },
    );

    assert!(handle.reconfigure(ParamChange::Theta(2.0)).is_err());
    handle.reconfigure(ParamChange::Gravity(-5.0)).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while handle.snapshot().step < 5 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(2));
    }
    assert!(handle.snapshot().step >= 5, "driver did not step");
    assert_eq!(handle.snapshot().positions.len(), 8);

    let sim = handle.stop().expect("worker finished cleanly");
    assert_eq!(sim.params().gravity, -5.0);
    assert_eq!(sim.params().theta, SimulationParams::default().theta);
}

#[test]
fn bench_graph_is_a_ring_with_chords() {
    let g = bench_graph(14).unwrap();
    assert_eq!(g.node_count(), 14);
    assert_eq!(g.link_count(), 16);

    let mut sim = Simulator::with_repulsion(&g, SimulationParams::default(), true).unwrap();
    sim.run(3);
    assert!(sim.snapshot().positions.iter().all(|p| p.iter().all(|c| c.is_finite())));
}
