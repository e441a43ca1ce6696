//! Error types shared by the graph engine and the DOT adapters

use crate::graph::config::{ContainerKind, Direction, MultiEdge};
use thiserror::Error;

/// Errors that can occur during graph construction, mutation, or DOT
/// conversion.
///
/// Variants fall into two classes. Configuration errors report an
/// incoherent policy/representation pairing or an unresolvable property
/// conversion; they are raised once, at setup or first use, and are never
/// recovered internally. Not-found errors report navigation into a node or
/// edge that does not exist; callers can recover with an existence
/// pre-check. Lookup-style operations (`add_edge`, `count_edges`,
/// `remove_edge` by value) never produce an error at all; a missing
/// endpoint is an ordinary `0` result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Set-like neighbor containers cannot represent parallel edges.
    #[error("container `{container}` cannot back a graph that allows multi-edges")]
    IncoherentContainer { container: ContainerKind },

    /// The input's `strict` marker disagrees with the multi-edge policy.
    #[error(
        "inconsistent graph strictness: input has strict={is_strict} but multi-edges are {multi_edge}; \
         strict graphs must disallow multi-edges and non-strict graphs must allow them"
    )]
    StrictnessMismatch {
        is_strict: bool,
        multi_edge: MultiEdge,
    },

    /// The input's `graph`/`digraph` tag disagrees with the direction policy.
    #[error("inconsistent edge direction: input is a `{graph_type}` but the configuration is {direction}")]
    DirectionMismatch {
        graph_type: String,
        direction: Direction,
    },

    /// No usable strategy for building a property from parsed attributes.
    #[error("failed to resolve {what} property converter")]
    ConverterUnresolved { what: &'static str },

    /// No usable strategy for rendering a property as DOT attributes.
    #[error("failed to resolve {what} property formatter")]
    Unrenderable { what: &'static str },

    /// A parsed node name could not be converted into the key type.
    #[error("cannot convert node name `{name}`: {reason}")]
    InvalidNodeName { name: String, reason: String },

    /// A property hook was invoked on a type that does not implement it.
    #[error("attribute conversion failed: {0}")]
    AttrConversion(String),

    /// Navigation anchored at a node that is not in the graph.
    #[error("node `{key}` not found")]
    NodeNotFound { key: String },

    /// An edge-property query matched no edge.
    #[error("no edge between `{src}` and `{tgt}`")]
    EdgeNotFound { src: String, tgt: String },
}

impl GraphError {
    /// Whether this is a setup/first-use configuration error.
    pub fn is_configuration(&self) -> bool {
        !self.is_not_found()
    }

    /// Whether this is a recoverable navigation error.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GraphError::NodeNotFound { .. } | GraphError::EdgeNotFound { .. }
        )
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
