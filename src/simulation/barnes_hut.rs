//! # Barnes–Hut Octree (3D)
//!
//! Approximates the all-pairs repulsion between graph nodes. Instead of the
//! naive `O(N²)` sum, distant groups of bodies are treated as one pseudo-body
//! at their center of mass, bringing a full evaluation down to `O(N log N)`.
//!
//! ## Layout
//!
//! - Space is recursively split into 8 octants; each octant is a cell.
//! - Cells live in one arena (`Vec<OctreeCell>`) and refer to their children
//!   by index. [`Octree::rebuild`] clears the arena and refills it, so the
//!   allocation is reused from step to step.
//! - A leaf holds one body. Only at [`MAX_DEPTH`] can a leaf hold several
//!   (bodies sitting on the same point); they are chained through
//!   `next_in_leaf`.
//! - Each cell stores:
//!   - total mass of its subtree
//!   - center of mass (COM)
//!   - cube center and half width
//!
//! ## Opening criterion
//!
//! A cell is approximated when it does not contain the query body and
//! `width / distance(body, COM) < theta`. Otherwise its children are visited.
//! A cell that contains the query body is always opened so the body never
//! feels its own mass.

use crate::simulation::forces::jitter_direction;
use crate::simulation::states::{Body, NVec3};

/// Depth at which cells stop splitting and start chaining bodies
pub const MAX_DEPTH: u32 = 32;

/// Smallest half width of the root cube (all bodies on one point)
const MIN_HALF_WIDTH: f64 = 0.5;

/// Separation assumed for two bodies on the same point
const JITTER_DISTANCE: f64 = 0.5;

const ROOT: usize = 0;

/// One cubic cell of the octree.
///
/// A cell is either:
/// - empty (`mass == 0`, no body, no children),
/// - a leaf (`body = Some(i)`, no children),
/// - internal (children present, `body = None`).
#[derive(Debug, Clone)]
pub struct OctreeCell {
    pub mass: f64,
    pub com: NVec3,
    pub center: NVec3,
    pub half_width: f64,
    pub children: [Option<usize>; 8], // indices into Octree::cells
    pub body: Option<usize>, // head of the leaf chain
    pub depth: u32,
}

impl OctreeCell {
    fn empty(center: NVec3, half_width: f64, depth: u32) -> Self {
        Self {
            mass: 0.0,
            com: NVec3::zeros(),
            center,
            half_width,
            children: [None; 8],
            body: None,
            depth,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(|c| c.is_none())
    }

    pub fn width(&self) -> f64 {
        2.0 * self.half_width
    }

    /// Closed containment test against the cell cube
    pub fn contains(&self, p: &NVec3) -> bool {
        let d = p - self.center;
        d.x.abs() <= self.half_width && d.y.abs() <= self.half_width && d.z.abs() <= self.half_width
    }
}

/// Arena-backed octree over the bodies of one simulation step
#[derive(Debug, Clone, Default)]
pub struct Octree {
    cells: Vec<OctreeCell>,
    next_in_leaf: Vec<Option<usize>>, // per body: next body in the same leaf
}

impl Octree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh tree over `bodies`
    pub fn build(bodies: &[Body]) -> Self {
        let mut tree = Self::new();
        tree.rebuild(bodies);
        tree
    }

    /// Rebuild the tree in place from the current body positions.
    ///
    /// 1. Computes a cube enclosing every body.
    /// 2. Inserts each body, splitting occupied leaves as needed.
    /// 3. Computes mass and center of mass bottom-up.
    ///
    /// Nothing is kept from the previous build except the arena capacity.
    pub fn rebuild(&mut self, bodies: &[Body]) {
        self.cells.clear();
        self.next_in_leaf.clear();
        self.next_in_leaf.resize(bodies.len(), None);

        if bodies.is_empty() {
            return;
        }

        let (center, half_width) = bounding_cube(bodies);
        self.cells.push(OctreeCell::empty(center, half_width, 0));

        for i in 0..bodies.len() {
            self.insert_body(ROOT, i, bodies);
        }

        self.compute_mass_and_com(ROOT, bodies);
    }

    pub fn cells(&self) -> &[OctreeCell] {
        &self.cells
    }

    pub fn root(&self) -> Option<&OctreeCell> {
        self.cells.first()
    }

    /// Approximate net repulsion on body `i` from every other body.
    ///
    /// # Parameters
    /// - `i`       : index of the query body in `bodies`
    /// - `bodies`  : the same slice the tree was built from
    /// - `gravity` : pairwise constant (negative pushes bodies apart)
    /// - `theta`   : opening threshold, smaller is more accurate
    ///
    /// # Returns
    /// The force (not acceleration) acting on body `i`.
    pub fn repulsion_on(&self, i: usize, bodies: &[Body], gravity: f64, theta: f64) -> NVec3 {
        let mut force = NVec3::zeros();
        if !self.cells.is_empty() {
            self.traverse_cell(ROOT, i, bodies, gravity, theta, &mut force);
        }
        force
    }

    // helpers ==============================================================================

    /// Insert body `body_idx` below `cell_idx`.
    ///
    /// - Empty leaf: store the body here.
    /// - Occupied leaf above `MAX_DEPTH`: move the resident body one level down,
    ///   then place the new body as for an internal cell.
    /// - Occupied leaf at `MAX_DEPTH`: chain the new body in front of the resident ones.
    /// - Internal cell: forward into the octant holding the body, creating it lazily.
    fn insert_body(&mut self, cell_idx: usize, body_idx: usize, bodies: &[Body]) {
        if self.cells[cell_idx].is_leaf() {
            let depth = self.cells[cell_idx].depth;
            match self.cells[cell_idx].body {
                None => {
                    self.cells[cell_idx].body = Some(body_idx);
                    return;
                }
                Some(resident) if depth >= MAX_DEPTH => {
                    self.next_in_leaf[body_idx] = Some(resident);
                    self.cells[cell_idx].body = Some(body_idx);
                    return;
                }
                Some(resident) => {
                    self.cells[cell_idx].body = None;
                    self.descend(cell_idx, resident, bodies);
                }
            }
        }

        self.descend(cell_idx, body_idx, bodies);
    }

    fn descend(&mut self, cell_idx: usize, body_idx: usize, bodies: &[Body]) {
        let (center, half_width, depth) = {
            let cell = &self.cells[cell_idx];
            (cell.center, cell.half_width, cell.depth)
        };

        let octant = octant_for_point(&bodies[body_idx].x, &center);
        let child_idx = match self.cells[cell_idx].children[octant] {
            Some(idx) => idx,
            None => {
                let quarter = half_width * 0.5;
                let new_idx = self.cells.len();
                self.cells.push(OctreeCell::empty(
                    octant_center(&center, quarter, octant),
                    quarter,
                    depth + 1,
                ));
                self.cells[cell_idx].children[octant] = Some(new_idx);
                new_idx
            }
        };

        self.insert_body(child_idx, body_idx, bodies);
    }

    /// Bottom-up pass writing every cell's total mass and mass-weighted centroid
    fn compute_mass_and_com(&mut self, cell_idx: usize, bodies: &[Body]) {
        let mut mass = 0.0;
        let mut com = NVec3::zeros();

        let head = self.cells[cell_idx].body;
        let children = self.cells[cell_idx].children;

        let mut current = head;
        while let Some(b) = current {
            mass += bodies[b].m;
            com += bodies[b].x * bodies[b].m;
            current = self.next_in_leaf[b];
        }

        for &child_idx in children.iter().flatten() {
            self.compute_mass_and_com(child_idx, bodies);
            let child = &self.cells[child_idx];
            if child.mass > 0.0 {
                mass += child.mass;
                com += child.com * child.mass;
            }
        }

        if mass > 0.0 {
            com /= mass;
        }

        let cell = &mut self.cells[cell_idx];
        cell.mass = mass;
        cell.com = com;
    }

    /// Accumulate the contribution of the subtree at `cell_idx` into `force`.
    ///
    /// - empty cell: nothing
    /// - leaf: exact pairwise terms, skipping the query body
    /// - internal, far enough: one term for the whole cell at its COM
    /// - internal, too close (or containing the query body): recurse
    fn traverse_cell(&self, cell_idx: usize, body_idx: usize, bodies: &[Body], gravity: f64, theta: f64, force: &mut NVec3) {
        let cell = &self.cells[cell_idx];

        if cell.mass == 0.0 {
            return;
        }

        if cell.is_leaf() {
            let mut current = cell.body;
            while let Some(other) = current {
                if other != body_idx {
                    *force += pairwise_force(bodies, body_idx, other, gravity);
                }
                current = self.next_in_leaf[other];
            }
            return;
        }

        let pos = bodies[body_idx].x;
        let r = cell.com - pos;
        let dist = r.norm();

        if dist > 0.0 && !cell.contains(&pos) && cell.width() / dist < theta {
            *force += gravity * bodies[body_idx].m * cell.mass / (dist * dist * dist) * r;
        } else {
            for &child_idx in cell.children.iter().flatten() {
                self.traverse_cell(child_idx, body_idx, bodies, gravity, theta, force);
            }
        }
    }
}

/// Exact force on body `i` from body `j`: `gravity * mi * mj * r / |r|^3`, `r = xj - xi`.
///
/// Bodies on the same point are separated along a jitter direction seeded by
/// the unordered pair, with opposite signs for `(i, j)` and `(j, i)`, so the
/// pair still pushes apart symmetrically.
pub fn pairwise_force(bodies: &[Body], i: usize, j: usize, gravity: f64) -> NVec3 {
    let (bi, bj) = (&bodies[i], &bodies[j]);
    let mut r = bj.x - bi.x;
    let mut dist2 = r.dot(&r);

    if dist2 == 0.0 {
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let sign = if i < j { 1.0 } else { -1.0 };
        let seed = ((lo as u64) << 32) ^ hi as u64;
        r = jitter_direction(seed) * (JITTER_DISTANCE * sign);
        dist2 = JITTER_DISTANCE * JITTER_DISTANCE;
    }

    let inv_r = dist2.sqrt().recip();
    let inv_r3 = inv_r * inv_r * inv_r;
    gravity * bi.m * bj.m * inv_r3 * r
}

// helpers ===========================================================================

/// Cube enclosing every body: center of the axis-aligned box, half width of
/// its largest side, never below `MIN_HALF_WIDTH`.
fn bounding_cube(bodies: &[Body]) -> (NVec3, f64) {
    let mut min = NVec3::repeat(f64::INFINITY);
    let mut max = NVec3::repeat(f64::NEG_INFINITY);

    for b in bodies {
        min = min.inf(&b.x);
        max = max.sup(&b.x);
    }

    let center = (min + max) * 0.5;
    let half = (max - min) * 0.5;
    let half_width = half.x.max(half.y).max(half.z).max(MIN_HALF_WIDTH);
    (center, half_width)
}

/// Octant index of `p` relative to `center`, 3 bits:
/// - bit 0: x >= center.x
/// - bit 1: y >= center.y
/// - bit 2: z >= center.z
fn octant_for_point(p: &NVec3, center: &NVec3) -> usize {
    let mut idx = 0;
    if p.x >= center.x { idx |= 1; }
    if p.y >= center.y { idx |= 2; }
    if p.z >= center.z { idx |= 4; }
    idx
}

/// Center of the child cube for `octant`, using the same bit layout
fn octant_center(parent_center: &NVec3, quarter: f64, octant: usize) -> NVec3 {
    let offset = |bit: usize| if octant & bit == 0 { -quarter } else { quarter };
    parent_center + NVec3::new(offset(1), offset(2), offset(4))
}
