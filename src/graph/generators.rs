//! Synthetic graphs for demos and benchmarks
//!
//! Node ids are `0..node_count` in insertion order. Sizes follow the usual
//! `n`, `m`, `k` parameters; a zero size gives an empty dimension.

use std::fmt;
use std::str::FromStr;

use crate::error::{GraphError, ParameterError};
use crate::graph::Graph;

/// Largest depth accepted by [`balanced_bin_tree`]
pub const MAX_TREE_DEPTH: usize = 24;

/// Size used when a parameter is not given
pub const DEFAULT_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorKind {
    #[default]
    Grid,
    Grid3,
    Path,
    Ladder,
    Complete,
    CompleteBipartite,
    BalancedBinTree,
    NoLinks,
}

impl GeneratorKind {
    /// Build a graph; each kind reads the parameters it needs
    ///
    /// - `Grid`: `n × m`
    /// - `Grid3`: `n × m × k`
    /// - `Path`, `Ladder`, `Complete`, `NoLinks`: `n`
    /// - `CompleteBipartite`: `n` + `m`
    /// - `BalancedBinTree`: depth `n`
    pub fn build(self, n: usize, m: usize, k: usize) -> Result<Graph<usize>, GraphError> {
        match self {
            GeneratorKind::Grid => grid(n, m),
            GeneratorKind::Grid3 => grid3(n, m, k),
            GeneratorKind::Path => path(n),
            GeneratorKind::Ladder => ladder(n),
            GeneratorKind::Complete => complete(n),
            GeneratorKind::CompleteBipartite => complete_bipartite(n, m),
            GeneratorKind::BalancedBinTree => balanced_bin_tree(n),
            GeneratorKind::NoLinks => no_links(n),
        }
    }
}

impl FromStr for GeneratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "grid" => Ok(GeneratorKind::Grid),
            "grid3" => Ok(GeneratorKind::Grid3),
            "path" => Ok(GeneratorKind::Path),
            "ladder" => Ok(GeneratorKind::Ladder),
            "complete" => Ok(GeneratorKind::Complete),
            "completebipartite" => Ok(GeneratorKind::CompleteBipartite),
            "balancedbintree" => Ok(GeneratorKind::BalancedBinTree),
            "nolinks" => Ok(GeneratorKind::NoLinks),
            _ => Err(format!("unknown generator {s:?}")),
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeneratorKind::Grid => "grid",
            GeneratorKind::Grid3 => "grid3",
            GeneratorKind::Path => "path",
            GeneratorKind::Ladder => "ladder",
            GeneratorKind::Complete => "complete",
            GeneratorKind::CompleteBipartite => "complete-bipartite",
            GeneratorKind::BalancedBinTree => "balanced-bin-tree",
            GeneratorKind::NoLinks => "no-links",
        };
        f.write_str(name)
    }
}

fn with_nodes(count: usize) -> Result<Graph<usize>, GraphError> {
    let mut graph = Graph::new();
    for id in 0..count {
        graph.add_node(id, ())?;
    }
    Ok(graph)
}

/// `n` columns by `m` rows, each node linked to its left and upper neighbor.
/// Node `(i, j)` has id `i + j * n`.
pub fn grid(n: usize, m: usize) -> Result<Graph<usize>, GraphError> {
    let mut graph = with_nodes(n * m)?;
    for j in 0..m {
        for i in 0..n {
            let node = i + j * n;
            if i > 0 {
                graph.add_link(&node, &(node - 1))?;
            }
            if j > 0 {
                graph.add_link(&node, &(node - n))?;
            }
        }
    }
    Ok(graph)
}

/// Three-dimensional grid; node `(i, j, l)` has id `i + j * n + l * n * m`
pub fn grid3(n: usize, m: usize, k: usize) -> Result<Graph<usize>, GraphError> {
    let mut graph = with_nodes(n * m * k)?;
    for l in 0..k {
        for j in 0..m {
            for i in 0..n {
                let node = i + j * n + l * n * m;
                if i > 0 {
                    graph.add_link(&node, &(node - 1))?;
                }
                if j > 0 {
                    graph.add_link(&node, &(node - n))?;
                }
                if l > 0 {
                    graph.add_link(&node, &(node - n * m))?;
                }
            }
        }
    }
    Ok(graph)
}

pub fn path(n: usize) -> Result<Graph<usize>, GraphError> {
    let mut graph = with_nodes(n)?;
    for i in 1..n {
        graph.add_link(&(i - 1), &i)?;
    }
    Ok(graph)
}

/// Two paths of `n` nodes (`0..n` and `n..2n`) joined by a rung at every step
pub fn ladder(n: usize) -> Result<Graph<usize>, GraphError> {
    let mut graph = with_nodes(2 * n)?;
    for i in 0..n {
        if i > 0 {
            graph.add_link(&(i - 1), &i)?;
            graph.add_link(&(n + i - 1), &(n + i))?;
        }
        graph.add_link(&i, &(n + i))?;
    }
    Ok(graph)
}

pub fn complete(n: usize) -> Result<Graph<usize>, GraphError> {
    let mut graph = with_nodes(n)?;
    for i in 0..n {
        for j in (i + 1)..n {
            graph.add_link(&i, &j)?;
        }
    }
    Ok(graph)
}

/// Every node of `0..n` linked to every node of `n..n + m`
pub fn complete_bipartite(n: usize, m: usize) -> Result<Graph<usize>, GraphError> {
    let mut graph = with_nodes(n + m)?;
    for i in 0..n {
        for j in n..(n + m) {
            graph.add_link(&i, &j)?;
        }
    }
    Ok(graph)
}

/// Full binary tree with `depth` levels (`2^depth - 1` nodes); node `c` hangs
/// below `(c - 1) / 2`
pub fn balanced_bin_tree(depth: usize) -> Result<Graph<usize>, GraphError> {
    if depth > MAX_TREE_DEPTH {
        return Err(ParameterError::new("tree depth", depth as f64, "too deep").into());
    }
    let count = (1usize << depth) - 1;
    let mut graph = with_nodes(count)?;
    for child in 1..count {
        graph.add_link(&((child - 1) / 2), &child)?;
    }
    Ok(graph)
}

pub fn no_links(n: usize) -> Result<Graph<usize>, GraphError> {
    with_nodes(n)
}
