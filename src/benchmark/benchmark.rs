use std::time::Instant;

use crate::error::GraphError;
use crate::graph::Graph;
use crate::simulation::barnes_hut::Octree;
use crate::simulation::engine::Simulator;
use crate::simulation::forces::exact_repulsion;
use crate::simulation::params::SimulationParams;
use crate::simulation::states::{Body, NVec3};

/// Deterministic bodies spread through a cube, no rand needed
fn make_bodies(n: usize) -> Vec<Body> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = NVec3::new(
                (i_f * 0.37).sin() * 500.0,
                (i_f * 0.13).cos() * 500.0,
                (i_f * 0.07).sin() * 500.0,
            );
            Body::at_rest(x, 1.0)
        })
        .collect()
}

/// A ring with chords, so springs and repulsion both matter
pub fn bench_graph(n: usize) -> Result<Graph<usize>, GraphError> {
    let mut graph = Graph::new();
    for i in 0..n {
        graph.add_node(i, ())?;
    }
    for i in 0..n {
        graph.add_link(&i, &((i + 1) % n))?;
        if i % 7 == 0 {
            graph.add_link(&i, &((i * 31 + 5) % n))?;
        }
    }
    Ok(graph)
}

/// Time one full repulsion evaluation, exact vs octree
pub fn bench_repulsion() {
    let ns = [200, 400, 800, 1600, 3200, 6400];
    let params = SimulationParams::default();

    for n in ns {
        let bodies = make_bodies(n);

        // Warm up
        let _ = exact_repulsion(&bodies, params.gravity);

        let t0 = Instant::now();
        let _ = exact_repulsion(&bodies, params.gravity);
        let dt_direct = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        let tree = Octree::build(&bodies);
        let _: Vec<NVec3> = (0..n)
            .map(|i| tree.repulsion_on(i, &bodies, params.gravity, params.theta))
            .collect();
        let dt_bh = t1.elapsed().as_secs_f64();

        println!("N = {n:5}, direct = {:8.6} s, BH = {:8.6} s", dt_direct, dt_bh);
    }
}

/// Per-step cost of the full simulator for a range of n.
/// CSV output, paste straight into a spreadsheet.
pub fn bench_step_curve() -> Result<(), GraphError> {
    println!("N,direct_ms,bh_ms");

    for n in (200..=3200).step_by(200) {
        let steps = if n <= 800 { 5 } else { 1 };
        let graph = bench_graph(n)?;

        let mut row = Vec::with_capacity(2);
        for barnes_hut in [false, true] {
            let mut sim = Simulator::with_repulsion(&graph, SimulationParams::default(), barnes_hut)?;
            let t0 = Instant::now();
            sim.run(steps);
            row.push(t0.elapsed().as_secs_f64() * 1000.0 / steps as f64);
        }

        println!("{},{:.6},{:.6}", n, row[0], row[1]);
    }
    Ok(())
}
