//! Trellis
//!
//! A generic in-memory graph container with configurable structural
//! policies and DOT persistence adapters.
//!
//! A [`Graph`] is parameterized over its node key type and optional node
//! and edge property types; a [`GraphConfig`] fixes, at construction
//! time, whether edges are directed, whether parallel edges and
//! self-loops are permitted, and which map and neighbor-container
//! representations back the adjacency structure. One engine body serves
//! every combination.
//!
//! The `dot` module adds a [`Deserializer`] that replays flattened DOT
//! statements into a graph and a [`Serializer`] that renders a graph back
//! to DOT text, both driven by a three-way property-resolution strategy
//! (registered converter, direct map conversion, or elision for absent
//! properties).
//!
//! ## Example Usage
//!
//! ```rust
//! use trellis::{Graph, GraphConfig, MultiEdge, ContainerKind};
//!
//! let config = GraphConfig::directed()
//!     .with_multi_edge(MultiEdge::Allowed)
//!     .with_container(ContainerKind::Seq);
//! let mut g: Graph<&str, (), f64> = Graph::with_config(config).unwrap();
//!
//! g.add_nodes(["a", "b", "c"]);
//! g.add_edge_with_prop(&"a", &"b", 1.5);
//! g.add_edge_with_prop(&"a", &"b", 2.5);
//! g.add_edge_with_prop(&"b", &"c", 4.0);
//!
//! assert_eq!(g.count_edges(&"a", &"b"), 2);
//! assert_eq!(g.num_edges(), 3);
//! for nbr in g.out_neighbors(&"a").unwrap() {
//!     assert_eq!(*nbr.key, "b");
//! }
//! ```

#![warn(clippy::all)]

pub mod dot;
pub mod error;
pub mod graph;

pub use dot::{
    AttrBlock, AttrMap, AttrStrategy, Deserializer, DotAttributes, DotName, EdgeStatement,
    FlatDot, NodeStatement, Serializer, Statement,
};
pub use error::{GraphError, GraphResult};
pub use graph::{
    ContainerKind, Direction, EdgeId, Graph, GraphConfig, Key, MapKind, MultiEdge, Neighbor,
    Neighbors, NodeView, SelfLoop,
};

/// Crate version from the manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version() -> &'static str {
    VERSION
}
