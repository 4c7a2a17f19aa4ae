//! Highlight state machine
//!
//! The only place that decides which node is emphasized. Hover, click and the
//! auto-cycle timer send [`HighlightRequest`]s; the machine applies them one at
//! a time, in arrival order, and emits at most one event per request.
//!
//! States: `Idle`, `Emphasizing { node, origin }`.
//!
//! Auto-cycle rules:
//! - a tick after any pointer request since the previous tick does nothing
//!   (and clears that mark),
//! - a tick never replaces an emphasis the user asked for,
//! - otherwise the tick emphasizes a uniformly random node; a previous
//!   auto-cycle emphasis is simply replaced.
//!
//! Hovering the node the auto-cycle picked emits a fresh `Changed` carrying
//! `Origin::User`, so consumers always hold the current origin.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::graph::{Graph, NodeIndex};
use crate::interaction::events::{Emphasis, HighlightEvent, HighlightRequest, HighlightSink, Origin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightState {
    Idle,
    Emphasizing { node: NodeIndex, origin: Origin },
}

pub struct HighlightMachine<I, D, S, R = StdRng> {
    graph: Arc<Graph<I, D>>,
    sink: S,
    rng: R,
    state: HighlightState,
    pointer_since_tick: bool,
}

impl<I, D, S> HighlightMachine<I, D, S, StdRng>
where
    I: Eq + Hash + Clone + Debug,
    S: HighlightSink,
{
    pub fn new(graph: Arc<Graph<I, D>>, sink: S) -> Self {
        Self::with_rng(graph, sink, StdRng::from_entropy())
    }
}

impl<I, D, S, R> HighlightMachine<I, D, S, R>
where
    I: Eq + Hash + Clone + Debug,
    S: HighlightSink,
    R: Rng,
{
    /// Use a caller-provided generator for the auto-cycle (seeded in tests)
    pub fn with_rng(graph: Arc<Graph<I, D>>, sink: S, rng: R) -> Self {
        Self {
            graph,
            sink,
            rng,
            state: HighlightState::Idle,
            pointer_since_tick: false,
        }
    }

    pub fn handle(&mut self, request: HighlightRequest<I>) {
        match request {
            HighlightRequest::Hover(node) => self.on_hover(node.as_ref()),
            HighlightRequest::ClickOrReset => self.on_click_or_reset(),
            HighlightRequest::AutoCycleTick => self.on_auto_cycle_tick(),
        }
    }

    /// Consume requests until every producer has hung up, then hand the machine back
    pub fn run(mut self, requests: Receiver<HighlightRequest<I>>) -> Self {
        for request in requests {
            self.handle(request);
        }
        self
    }

    /// Emphasize `node`; a missing or unknown node counts as a reset
    pub fn on_hover(&mut self, node: Option<&I>) {
        self.pointer_since_tick = true;
        match node.and_then(|id| self.graph.index_of(id).ok()) {
            Some(index) => self.emphasize(index, Origin::User),
            None => self.reset(),
        }
    }

    pub fn on_click_or_reset(&mut self) {
        self.pointer_since_tick = true;
        self.reset();
    }

    pub fn on_auto_cycle_tick(&mut self) {
        if std::mem::take(&mut self.pointer_since_tick) {
            debug!("auto-cycle tick skipped: pointer activity since last tick");
            return;
        }
        if let HighlightState::Emphasizing { origin: Origin::User, .. } = self.state {
            debug!("auto-cycle tick skipped: user emphasis active");
            return;
        }

        let count = self.graph.node_count();
        if count == 0 {
            return;
        }
        let pick = NodeIndex(self.rng.gen_range(0..count));
        self.emphasize(pick, Origin::AutoCycle);
    }

    pub fn state(&self) -> HighlightState {
        self.state
    }

    /// Current emphasis, recomputed from the graph
    pub fn emphasis(&self) -> Option<Emphasis> {
        match self.state {
            HighlightState::Idle => None,
            HighlightState::Emphasizing { node, origin } => Some(self.derive(node, origin)),
        }
    }

    pub fn graph(&self) -> &Arc<Graph<I, D>> {
        &self.graph
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    // transitions =======================================================================

    /// Emits only when the node or its origin actually changes
    fn emphasize(&mut self, node: NodeIndex, origin: Origin) {
        let next = HighlightState::Emphasizing { node, origin };
        if self.state == next {
            return;
        }
        self.state = next;

        let emphasis = self.derive(node, origin);
        debug!(node = node.0, neighbors = emphasis.neighbors.len(), ?origin, "highlight changed");
        self.sink.emit(HighlightEvent::Changed(emphasis));
    }

    fn reset(&mut self) {
        self.state = HighlightState::Idle;
        debug!("highlight cleared");
        self.sink.emit(HighlightEvent::Cleared);
    }

    fn derive(&self, node: NodeIndex, origin: Origin) -> Emphasis {
        Emphasis {
            node,
            origin,
            neighbors: self.graph.neighbors_of(node),
            links: self.graph.links_at(node).map(|l| l.index).collect(),
        }
    }
}
