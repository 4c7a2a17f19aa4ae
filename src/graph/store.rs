//! Graph store: nodes, links and the per-node adjacency index
//!
//! Nodes and links live in insertion-ordered vectors and are addressed by
//! [`NodeIndex`] / [`LinkIndex`]. A `HashMap` resolves caller ids to indices and
//! each node keeps the indices of the links touching it, appended as links are
//! inserted, so `links_of` is O(degree) instead of a scan over every link.
//!
//! There is no removal: indices stay valid for the lifetime of the store.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{finite, GraphError, ParameterError};
use crate::simulation::states::NVec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkIndex(pub usize);

/// A graph node. `data` is opaque to the layout and highlight code.
///
/// `position` is an explicit starting point, if the caller gave one. Nodes
/// without one are seeded by the simulator at spring-length spacing; the live
/// position/velocity are owned by the simulator's bodies.
#[derive(Debug, Clone)]
pub struct Node<I, D> {
    pub id: I,
    pub index: NodeIndex,
    pub data: D,
    pub position: Option<NVec3>,
    pub mass: f64,
}

/// An undirected link between two nodes, with an optional rest length override
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub index: LinkIndex,
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub length: Option<f64>,
}

impl Link {
    /// The endpoint opposite `node` (the node itself for a self-loop)
    pub fn other(&self, node: NodeIndex) -> NodeIndex {
        if self.from == node {
            self.to
        } else {
            self.from
        }
    }

    pub fn touches(&self, node: NodeIndex) -> bool {
        self.from == node || self.to == node
    }
}

#[derive(Debug, Clone)]
pub struct Graph<I, D = ()> {
    nodes: Vec<Node<I, D>>,
    ids: HashMap<I, NodeIndex>,
    links: Vec<Link>,
    adjacency: Vec<Vec<LinkIndex>>,
}

impl<I, D> Default for Graph<I, D> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            ids: HashMap::new(),
            links: Vec::new(),
            adjacency: Vec::new(),
        }
    }
}

impl<I, D> Graph<I, D>
where
    I: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; the simulator picks its starting position
    pub fn add_node(&mut self, id: I, data: D) -> Result<NodeIndex, GraphError> {
        self.insert_node(id, data, None)
    }

    /// Add a node at an explicit starting position
    pub fn add_node_at(&mut self, id: I, data: D, position: NVec3) -> Result<NodeIndex, GraphError> {
        self.insert_node(id, data, Some(position))
    }

    fn insert_node(&mut self, id: I, data: D, position: Option<NVec3>) -> Result<NodeIndex, GraphError> {
        if self.ids.contains_key(&id) {
            return Err(GraphError::DuplicateId(format!("{id:?}")));
        }

        let index = NodeIndex(self.nodes.len());
        self.ids.insert(id.clone(), index);
        self.nodes.push(Node {
            id,
            index,
            data,
            position,
            mass: 1.0,
        });
        self.adjacency.push(Vec::new());
        Ok(index)
    }

    pub fn set_mass(&mut self, id: &I, mass: f64) -> Result<(), GraphError> {
        let mass = finite("mass", mass)?;
        if mass <= 0.0 {
            return Err(ParameterError::new("mass", mass, "must be positive").into());
        }
        let index = self.index_of(id)?;
        self.nodes[index.0].mass = mass;
        Ok(())
    }

    /// Link two existing nodes using the simulator's configured rest length
    pub fn add_link(&mut self, from: &I, to: &I) -> Result<LinkIndex, GraphError> {
        self.insert_link(from, to, None)
    }

    /// Link two existing nodes with a per-link rest length
    pub fn add_link_with_length(&mut self, from: &I, to: &I, length: f64) -> Result<LinkIndex, GraphError> {
        let length = finite("link length", length)?;
        if length <= 0.0 {
            return Err(ParameterError::new("link length", length, "must be positive").into());
        }
        self.insert_link(from, to, Some(length))
    }

    fn insert_link(&mut self, from: &I, to: &I, length: Option<f64>) -> Result<LinkIndex, GraphError> {
        // resolve both ends before touching anything so a failure leaves the store as it was
        let from = self.resolve_endpoint(from)?;
        let to = self.resolve_endpoint(to)?;

        let index = LinkIndex(self.links.len());
        self.links.push(Link { index, from, to, length });
        self.adjacency[from.0].push(index);
        if to != from {
            self.adjacency[to.0].push(index);
        }
        Ok(index)
    }

    fn resolve_endpoint(&self, id: &I) -> Result<NodeIndex, GraphError> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(format!("{id:?}")))
    }

    pub fn index_of(&self, id: &I) -> Result<NodeIndex, GraphError> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::NotFound(format!("{id:?}")))
    }

    pub fn node(&self, id: &I) -> Result<&Node<I, D>, GraphError> {
        let index = self.index_of(id)?;
        Ok(&self.nodes[index.0])
    }

    pub fn contains(&self, id: &I) -> bool {
        self.ids.contains_key(id)
    }

    /// Links touching `id` in insertion order
    pub fn links_of(&self, id: &I) -> Result<Vec<&Link>, GraphError> {
        let index = self.index_of(id)?;
        Ok(self.links_at(index).collect())
    }
}

impl<I, D> Graph<I, D> {
    pub fn node_at(&self, index: NodeIndex) -> Option<&Node<I, D>> {
        self.nodes.get(index.0)
    }

    pub fn link(&self, index: LinkIndex) -> Option<&Link> {
        self.links.get(index.0)
    }

    /// Links touching the node at `index`, in insertion order.
    /// An out-of-range index yields nothing.
    pub fn links_at(&self, index: NodeIndex) -> impl Iterator<Item = &Link> + '_ {
        self.adjacency
            .get(index.0)
            .into_iter()
            .flatten()
            .map(move |l| &self.links[l.0])
    }

    /// Distinct one-hop neighbors of `index`, ordered by first linking link.
    /// The node itself is never its own neighbor.
    pub fn neighbors_of(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = Vec::new();
        for link in self.links_at(index) {
            let other = link.other(index);
            if other != index && !neighbors.contains(&other) {
                neighbors.push(other);
            }
        }
        neighbors
    }

    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node<I, D>> + '_ {
        self.nodes.iter()
    }

    pub fn links(&self) -> impl ExactSizeIterator<Item = &Link> + '_ {
        self.links.iter()
    }

    pub fn for_each_node(&self, mut f: impl FnMut(&Node<I, D>)) {
        self.nodes.iter().for_each(|n| f(n));
    }

    pub fn for_each_link(&self, mut f: impl FnMut(&Link)) {
        self.links.iter().for_each(|l| f(l));
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
