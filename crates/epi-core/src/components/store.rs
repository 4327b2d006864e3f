//! Dual-Network Store
//!
//! Holds the physical and information networks plus the current and next
//! node-state buffers. Systems read `current` and write `next`; only
//! `commit` moves data between them.

use bevy_ecs::prelude::*;

use super::graph::{ContactNetwork, Graph};
use super::node::NodeStates;

/// Resource: both networks and the double-buffered node state
#[derive(Resource, Debug, Clone)]
pub struct NetworkStore {
    physical: ContactNetwork,
    information: Graph,
    current: NodeStates,
    next: NodeStates,
}

/// Borrowed view for one round of transition rules
///
/// `current` is the committed snapshot of the previous tick and is the only
/// state rules may read; `next` is write-only for them.
pub struct TickView<'a> {
    pub physical: &'a ContactNetwork,
    pub information: &'a Graph,
    pub current: &'a NodeStates,
    pub next: &'a mut NodeStates,
}

impl NetworkStore {
    /// Caller guarantees both graphs and `initial` cover the same node count.
    pub fn new(physical: ContactNetwork, information: Graph, initial: NodeStates) -> Self {
        debug_assert_eq!(physical.node_count(), information.node_count());
        debug_assert_eq!(physical.node_count(), initial.len());
        Self {
            physical,
            information,
            next: initial.clone(),
            current: initial,
        }
    }

    pub fn population(&self) -> usize {
        self.current.len()
    }

    pub fn physical(&self) -> &ContactNetwork {
        &self.physical
    }

    pub fn information(&self) -> &Graph {
        &self.information
    }

    /// The committed snapshot.
    pub fn current(&self) -> &NodeStates {
        &self.current
    }

    pub fn stage(&mut self) -> TickView<'_> {
        TickView {
            physical: &self.physical,
            information: &self.information,
            current: &self.current,
            next: &mut self.next,
        }
    }

    /// Mutable information network alongside the committed snapshot.
    pub fn rewire_view(&mut self) -> (&mut Graph, &NodeStates) {
        (&mut self.information, &self.current)
    }

    /// Swaps `next` into `current` for every node, then resets `next` to the
    /// new current values so untouched nodes keep their state next tick.
    pub fn commit(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
        self.next.clone_from(&self.current);
    }
}
