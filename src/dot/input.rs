//! Flattened DOT input
//!
//! The deserializer does not parse text. Its input is the output of an
//! upstream parse/resolve/flatten pipeline: the graph-level `strict`
//! marker and `graph`/`digraph` tag plus an ordered sequence of node and
//! edge statements with their attribute pairs. Malformed text is the
//! upstream producer's concern.

use serde::{Deserialize, Serialize};

/// A flattened DOT document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatDot {
    pub is_strict: bool,
    /// `"graph"` or `"digraph"`.
    pub graph_type: String,
    pub statements: Vec<Statement>,
}

impl FlatDot {
    pub fn new(is_strict: bool, graph_type: impl Into<String>) -> Self {
        FlatDot {
            is_strict,
            graph_type: graph_type.into(),
            statements: Vec::new(),
        }
    }

    pub fn with_statement(mut self, statement: impl Into<Statement>) -> Self {
        self.statements.push(statement.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    Node(NodeStatement),
    Edge(EdgeStatement),
}

impl From<NodeStatement> for Statement {
    fn from(stmt: NodeStatement) -> Self {
        Statement::Node(stmt)
    }
}

impl From<EdgeStatement> for Statement {
    fn from(stmt: EdgeStatement) -> Self {
        Statement::Edge(stmt)
    }
}

/// One declared node with its attribute pairs, in parse order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatement {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

impl NodeStatement {
    pub fn new(name: impl Into<String>) -> Self {
        NodeStatement {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }
}

/// One flattened edge statement. A chain like `a -- b -- c` flattens into
/// multiple `(src, tgt)` pairs that all share the statement's attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeStatement {
    pub attrs: Vec<(String, String)>,
    pub endpoints: Vec<(String, String)>,
}

impl EdgeStatement {
    pub fn new() -> Self {
        EdgeStatement {
            attrs: Vec::new(),
            endpoints: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn with_endpoint(mut self, src: impl Into<String>, tgt: impl Into<String>) -> Self {
        self.endpoints.push((src.into(), tgt.into()));
        self
    }
}

impl Default for EdgeStatement {
    fn default() -> Self {
        EdgeStatement::new()
    }
}
