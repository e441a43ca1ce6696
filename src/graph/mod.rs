//! In-memory graph engine: policy configuration, neighbor containers,
//! the shared-edge table, and the [`Graph`] type itself.

pub mod config;
pub(crate) mod container;
pub mod store;
pub(crate) mod table;

pub use config::{ContainerKind, Direction, GraphConfig, MapKind, MultiEdge, SelfLoop};
pub use store::{Graph, Iter, Key, Neighbor, Neighbors, NodeView};
pub use table::EdgeId;
