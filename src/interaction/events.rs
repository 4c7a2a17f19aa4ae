//! Requests into the highlight machine and events out of it

use std::sync::mpsc::Sender;

use tracing::warn;

use crate::graph::{LinkIndex, NodeIndex};

/// Input from a producer (pointer adapter, auto-cycle timer).
/// Producers only ask; the machine decides what changes.
#[derive(Debug, Clone, PartialEq)]
pub enum HighlightRequest<I> {
    Hover(Option<I>),
    ClickOrReset,
    AutoCycleTick,
}

/// Who asked for the current emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    AutoCycle,
}

/// An emphasized node with its neighborhood, as derived from the graph at
/// the moment of emission
#[derive(Debug, Clone, PartialEq)]
pub struct Emphasis {
    pub node: NodeIndex,
    pub origin: Origin,
    /// Distinct one-hop neighbors, in link insertion order
    pub neighbors: Vec<NodeIndex>,
    /// Every link touching `node`, in insertion order
    pub links: Vec<LinkIndex>,
}

impl Emphasis {
    /// Number of links touching the node ("potential connections")
    pub fn connection_count(&self) -> usize {
        self.links.len()
    }

    /// The neighbor across the first link, shown as the top match
    pub fn top_match(&self) -> Option<NodeIndex> {
        self.neighbors.first().copied()
    }

    pub fn is_neighbor(&self, node: NodeIndex) -> bool {
        self.neighbors.contains(&node)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HighlightEvent {
    Changed(Emphasis),
    Cleared,
}

/// Receiver of highlight events (renderer adapter, detail panel, a test log)
pub trait HighlightSink {
    fn emit(&mut self, event: HighlightEvent);
}

impl HighlightSink for Vec<HighlightEvent> {
    fn emit(&mut self, event: HighlightEvent) {
        self.push(event);
    }
}

impl HighlightSink for Sender<HighlightEvent> {
    fn emit(&mut self, event: HighlightEvent) {
        if self.send(event).is_err() {
            warn!("highlight event dropped: receiver is gone");
        }
    }
}
