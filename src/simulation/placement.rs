//! Starting positions for nodes the caller did not place
//!
//! Nodes with an explicit position keep it. The others are placed in insertion
//! order, one `spacing` away from the average of their already-placed
//! neighbors, heading away from the centroid of everything placed so far, so
//! chains grow outwards instead of folding back. A node with no placed neighbor
//! goes onto a golden-angle spiral whose shells scale with `spacing`.

use crate::graph::{Graph, NodeIndex};
use crate::simulation::forces::jitter_direction;
use crate::simulation::states::NVec3;

/// Weight of the per-node jitter against the outward heading
const JITTER_WEIGHT: f64 = 0.25;

/// Keeps placement seeds apart from the force jitter seeds
const PLACEMENT_SALT: u64 = 0xA076_1D64_78BD_642F;

/// One starting position per node, indexed like the graph.
/// `spacing` is normally the configured spring rest length.
pub fn seed_positions<I, D>(graph: &Graph<I, D>, spacing: f64) -> Vec<NVec3> {
    let mut positions: Vec<NVec3> = Vec::with_capacity(graph.node_count());
    let mut placed: Vec<bool> = Vec::with_capacity(graph.node_count());
    let mut sum = NVec3::zeros();
    let mut count = 0usize;

    for node in graph.nodes() {
        match node.position {
            Some(p) => {
                positions.push(p);
                placed.push(true);
                sum += p;
                count += 1;
            }
            None => {
                positions.push(NVec3::zeros());
                placed.push(false);
            }
        }
    }

    for i in 0..positions.len() {
        if placed[i] {
            continue;
        }

        let mut anchor = NVec3::zeros();
        let mut anchors = 0usize;
        for n in graph.neighbors_of(NodeIndex(i)) {
            if placed[n.0] {
                anchor += positions[n.0];
                anchors += 1;
            }
        }

        let p = if anchors == 0 {
            spiral_position(i, spacing)
        } else {
            anchor /= anchors as f64;
            let jitter = jitter_direction(i as u64 ^ PLACEMENT_SALT);
            let outward = anchor - sum / count as f64;
            let heading = if outward.norm() > spacing * 1e-9 {
                (outward.normalize() + jitter * JITTER_WEIGHT).normalize()
            } else {
                jitter
            };
            anchor + heading * spacing
        };

        positions[i] = p;
        placed[i] = true;
        sum += p;
        count += 1;
    }

    positions
}

/// Golden-angle spiral over shells of radius `spacing * cbrt(i + 1)`.
/// The radius is strictly increasing in `i`, so no two spiral points coincide.
pub fn spiral_position(i: usize, spacing: f64) -> NVec3 {
    let golden_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    let k = i as f64;

    let z = 1.0 - 2.0 * ((k * 0.618_033_988_749_895 + 0.5) % 1.0);
    let ring = (1.0 - z * z).max(0.0).sqrt();
    let angle = k * golden_angle;
    let radius = spacing * (k + 1.0).cbrt();

    NVec3::new(radius * ring * angle.cos(), radius * ring * angle.sin(), radius * z)
}
