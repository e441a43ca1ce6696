//! Structural policy configuration
//!
//! A [`GraphConfig`] fixes, at construction time, the five structural
//! policies of a graph: edge direction, multi-edge permission, self-loop
//! permission, node-map representation, and neighbor-container
//! representation. Policies are immutable once a graph is built; the only
//! validation they need (set-like containers cannot be paired with
//! allowed multi-edges) happens in [`GraphConfig::validate`].

use crate::error::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Edge direction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Directed,
    Undirected,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Directed => write!(f, "directed"),
            Direction::Undirected => write!(f, "undirected"),
        }
    }
}

/// Whether parallel edges between the same node pair are permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultiEdge {
    Allowed,
    Disallowed,
}

impl fmt::Display for MultiEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultiEdge::Allowed => write!(f, "allowed"),
            MultiEdge::Disallowed => write!(f, "disallowed"),
        }
    }
}

/// Whether an edge may connect a node to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelfLoop {
    Allowed,
    Disallowed,
}

impl fmt::Display for SelfLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelfLoop::Allowed => write!(f, "allowed"),
            SelfLoop::Disallowed => write!(f, "disallowed"),
        }
    }
}

/// Node-map representation.
///
/// `Ordered` iterates nodes in key order; `Hashed` iterates in an
/// unspecified, mutation-sensitive order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapKind {
    Ordered,
    Hashed,
}

/// Neighbor-container representation.
///
/// The first four can represent duplicate entries and may be paired with
/// either multi-edge policy; the two set-like kinds cannot and are limited
/// to [`MultiEdge::Disallowed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    /// Contiguous sequence, insertion order.
    Seq,
    /// Linked sequence, insertion order.
    Linked,
    /// Hash-keyed multiset; per-key insertion order, unspecified key order.
    HashMultiset,
    /// Key-ordered multiset; per-key insertion order.
    OrderedMultiset,
    /// Hash-keyed set, at most one entry per neighbor.
    HashSet,
    /// Key-ordered set, at most one entry per neighbor.
    OrderedSet,
}

impl ContainerKind {
    /// Capability flag consulted by the engine before inserting: whether
    /// this representation can hold more than one entry per neighbor key.
    pub fn supports_duplicates(self) -> bool {
        !matches!(self, ContainerKind::HashSet | ContainerKind::OrderedSet)
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerKind::Seq => "seq",
            ContainerKind::Linked => "linked",
            ContainerKind::HashMultiset => "hash-multiset",
            ContainerKind::OrderedMultiset => "ordered-multiset",
            ContainerKind::HashSet => "hash-set",
            ContainerKind::OrderedSet => "ordered-set",
        };
        write!(f, "{name}")
    }
}

/// Structural policy descriptor, fixed per graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    pub direction: Direction,
    pub multi_edge: MultiEdge,
    pub self_loop: SelfLoop,
    pub map: MapKind,
    pub container: ContainerKind,
}

impl Default for GraphConfig {
    /// Undirected, no multi-edges, no self-loops, hashed node map,
    /// hash-set neighbors.
    fn default() -> Self {
        GraphConfig {
            direction: Direction::Undirected,
            multi_edge: MultiEdge::Disallowed,
            self_loop: SelfLoop::Disallowed,
            map: MapKind::Hashed,
            container: ContainerKind::HashSet,
        }
    }
}

impl GraphConfig {
    /// Default policies with directed edges.
    pub fn directed() -> Self {
        GraphConfig {
            direction: Direction::Directed,
            ..Default::default()
        }
    }

    /// Default policies with undirected edges.
    pub fn undirected() -> Self {
        GraphConfig::default()
    }

    pub fn with_multi_edge(mut self, multi_edge: MultiEdge) -> Self {
        self.multi_edge = multi_edge;
        self
    }

    pub fn with_self_loop(mut self, self_loop: SelfLoop) -> Self {
        self.self_loop = self_loop;
        self
    }

    pub fn with_map(mut self, map: MapKind) -> Self {
        self.map = map;
        self
    }

    pub fn with_container(mut self, container: ContainerKind) -> Self {
        self.container = container;
        self
    }

    /// Checks representation/policy coherence: a container that cannot
    /// represent duplicates cannot back a graph that allows multi-edges.
    pub fn validate(&self) -> GraphResult<()> {
        if self.multi_edge == MultiEdge::Allowed && !self.container.supports_duplicates() {
            return Err(GraphError::IncoherentContainer {
                container: self.container,
            });
        }
        Ok(())
    }

    /// DOT `strict` corresponds to disallowed multi-edges.
    pub fn is_strict(&self) -> bool {
        self.multi_edge == MultiEdge::Disallowed
    }
}
