//! Graph to DOT
//!
//! [`Serializer`] borrows a graph and renders it as DOT text: a header
//! carrying the `strict` marker and `graph`/`digraph` tag, one block of
//! node entries, one block of edge entries, and the closing brace. Each
//! logical edge is emitted exactly once: undirected mirrored entries are
//! collapsed by emitting from the smaller endpoint. Formatter strategies
//! resolve eagerly at the top of every call, so an unrenderable property
//! type fails even on an empty graph rather than emitting partial output.

use super::attrs::{AttrBlock, AttrStrategy, DotAttributes, Resolved};
use crate::error::{GraphError, GraphResult};
use crate::graph::{Direction, Graph, Key};
use std::fmt::Display;
use tracing::debug;

type Formatter<P> = Box<dyn Fn(&P) -> AttrBlock>;

/// Renders a graph as DOT text.
///
/// Registered formatters take priority over the property types' own
/// strategies; line-wrap limits apply to subsequent calls only.
pub struct Serializer<'g, K, NP = (), EP = ()> {
    graph: &'g Graph<K, NP, EP>,
    node_fmt: Option<Formatter<NP>>,
    edge_fmt: Option<Formatter<EP>>,
    max_nodes_per_line: Option<usize>,
    max_edges_per_line: Option<usize>,
}

impl<'g, K, NP, EP> Serializer<'g, K, NP, EP> {
    pub fn new(graph: &'g Graph<K, NP, EP>) -> Self {
        Serializer {
            graph,
            node_fmt: None,
            edge_fmt: None,
            max_nodes_per_line: None,
            max_edges_per_line: None,
        }
    }

    /// Registers a node formatter returning either a verbatim attribute
    /// string or a full attribute map.
    pub fn register_node_formatter<B, F>(&mut self, f: F)
    where
        B: Into<AttrBlock>,
        F: Fn(&NP) -> B + 'static,
    {
        self.node_fmt = Some(Box::new(move |prop| f(prop).into()));
    }

    pub fn delete_node_formatter(&mut self) {
        self.node_fmt = None;
    }

    /// Registers an edge formatter returning either a verbatim attribute
    /// string or a full attribute map.
    pub fn register_edge_formatter<B, F>(&mut self, f: F)
    where
        B: Into<AttrBlock>,
        F: Fn(&EP) -> B + 'static,
    {
        self.edge_fmt = Some(Box::new(move |prop| f(prop).into()));
    }

    pub fn delete_edge_formatter(&mut self) {
        self.edge_fmt = None;
    }

    pub fn set_max_nodes_per_line(&mut self, n: usize) {
        self.max_nodes_per_line = Some(n);
    }

    pub fn unset_max_nodes_per_line(&mut self) {
        self.max_nodes_per_line = None;
    }

    pub fn set_max_edges_per_line(&mut self, n: usize) {
        self.max_edges_per_line = Some(n);
    }

    pub fn unset_max_edges_per_line(&mut self) {
        self.max_edges_per_line = None;
    }
}

fn resolve_formatter(
    user_registered: bool,
    strategy: AttrStrategy,
    what: &'static str,
) -> GraphResult<Resolved> {
    if user_registered {
        debug!("using the registered {what} property formatter");
        return Ok(Resolved::UserDefined);
    }
    match strategy {
        AttrStrategy::Direct | AttrStrategy::Labeled => {
            debug!("{what} property renders as an attribute map");
            Ok(Resolved::DirectMap)
        }
        AttrStrategy::Void => {
            debug!("{what} property is absent; emitting no attribute blocks");
            Ok(Resolved::Void)
        }
        AttrStrategy::Unsupported => Err(GraphError::Unrenderable { what }),
    }
}

fn push_block(out: &mut String, entries: &[String], max_per_line: Option<usize>) {
    if entries.is_empty() {
        return;
    }
    let per_line = max_per_line.unwrap_or(entries.len()).max(1);
    for chunk in entries.chunks(per_line) {
        out.push('\t');
        for entry in chunk {
            out.push_str(entry);
        }
        out.push('\n');
    }
}

impl<'g, K, NP, EP> Serializer<'g, K, NP, EP>
where
    K: Key + Display,
    NP: DotAttributes,
    EP: DotAttributes,
{
    fn node_block(&self, resolved: Resolved, prop: &NP) -> GraphResult<AttrBlock> {
        match resolved {
            Resolved::UserDefined => match &self.node_fmt {
                Some(fmt) => Ok(fmt(prop)),
                None => Err(GraphError::Unrenderable { what: "node" }),
            },
            Resolved::DirectMap => Ok(AttrBlock::Pairs(prop.to_attrs()?)),
            Resolved::Void => Ok(AttrBlock::Empty),
        }
    }

    fn edge_block(&self, resolved: Resolved, prop: &EP) -> GraphResult<AttrBlock> {
        match resolved {
            Resolved::UserDefined => match &self.edge_fmt {
                Some(fmt) => Ok(fmt(prop)),
                None => Err(GraphError::Unrenderable { what: "edge" }),
            },
            Resolved::DirectMap => Ok(AttrBlock::Pairs(prop.to_attrs()?)),
            Resolved::Void => Ok(AttrBlock::Empty),
        }
    }

    /// Renders the borrowed graph.
    pub fn to_dot(&self) -> GraphResult<String> {
        let node_resolved = resolve_formatter(self.node_fmt.is_some(), NP::STRATEGY, "node")?;
        let edge_resolved = resolve_formatter(self.edge_fmt.is_some(), EP::STRATEGY, "edge")?;
        let config = self.graph.config();

        let mut out = String::new();
        if config.is_strict() {
            out.push_str("strict ");
        }
        out.push_str(match config.direction {
            Direction::Undirected => "graph",
            Direction::Directed => "digraph",
        });
        out.push_str(" {\n");

        let mut entries = Vec::with_capacity(self.graph.size());
        for (key, view) in self.graph {
            entries.push(match self.node_block(node_resolved, view.prop())?.render() {
                Some(attrs) => format!("{key}[{attrs}]; "),
                None => format!("{key}; "),
            });
        }
        push_block(&mut out, &entries, self.max_nodes_per_line);

        let operator = match config.direction {
            Direction::Undirected => "--",
            Direction::Directed => "->",
        };
        let mut entries = Vec::new();
        for (key, view) in self.graph {
            for neighbor in view.out_neighbors() {
                // a mirrored undirected entry is emitted from the smaller
                // endpoint only; self-loop entries pass as-is
                if config.direction == Direction::Undirected && neighbor.key < key {
                    continue;
                }
                let nbr = neighbor.key;
                entries.push(
                    match self.edge_block(edge_resolved, neighbor.prop)?.render() {
                        Some(attrs) => format!("{key}{operator}{nbr}[{attrs}]; "),
                        None => format!("{key}{operator}{nbr}; "),
                    },
                );
            }
        }
        push_block(&mut out, &entries, self.max_edges_per_line);

        out.push_str("}\n");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_label_attrs;
    use crate::dot::attrs::AttrMap;
    use crate::graph::{ContainerKind, GraphConfig, MapKind, MultiEdge, SelfLoop};
    use std::fmt;

    fn plain_config() -> GraphConfig {
        GraphConfig::undirected()
            .with_map(MapKind::Ordered)
            .with_container(ContainerKind::Seq)
    }

    fn multiset_config(direction: Direction) -> GraphConfig {
        GraphConfig {
            direction,
            multi_edge: MultiEdge::Allowed,
            self_loop: SelfLoop::Allowed,
            map: MapKind::Ordered,
            container: ContainerKind::OrderedMultiset,
        }
    }

    fn prop_config() -> GraphConfig {
        GraphConfig::directed()
            .with_multi_edge(MultiEdge::Allowed)
            .with_map(MapKind::Ordered)
            .with_container(ContainerKind::Seq)
    }

    #[test]
    fn test_empty_graph() {
        let g: Graph<i32> = Graph::with_config(plain_config()).unwrap();
        let s = Serializer::new(&g);
        assert_eq!(s.to_dot().unwrap(), "strict graph {\n}\n");
    }

    #[test]
    fn test_simple_and_wrapped() {
        let mut g: Graph<i32> = Graph::with_config(plain_config()).unwrap();
        g.add_nodes([0, 1, 2, 3]);
        g.add_edge(&0, &1);
        g.add_edge(&1, &2);
        g.add_edge(&2, &3);
        let mut s = Serializer::new(&g);
        let plain = "strict graph {\n\
                     \t0; 1; 2; 3; \n\
                     \t0--1; 1--2; 2--3; \n\
                     }\n";
        assert_eq!(s.to_dot().unwrap(), plain);

        s.set_max_nodes_per_line(2);
        s.set_max_edges_per_line(2);
        assert_eq!(
            s.to_dot().unwrap(),
            "strict graph {\n\
             \t0; 1; \n\
             \t2; 3; \n\
             \t0--1; 1--2; \n\
             \t2--3; \n\
             }\n"
        );

        s.unset_max_nodes_per_line();
        s.unset_max_edges_per_line();
        assert_eq!(s.to_dot().unwrap(), plain);
    }

    fn populate(g: &mut Graph<i32>) {
        g.add_nodes([0, 1, 2, 3, 4]);
        g.add_edge(&0, &0);
        g.add_edge(&4, &4);
        g.add_edge(&4, &4);
        g.add_edge(&0, &1);
        g.add_edge(&0, &2);
        g.add_edge(&0, &3);
        g.add_edge(&1, &4);
        g.add_edge(&2, &4);
        g.add_edge(&3, &4);
        g.add_edge(&1, &2);
        g.add_edge(&1, &2);
        g.add_edge(&2, &3);
        g.add_edge(&2, &3);
    }

    #[test]
    fn test_undirected_multi_edges_and_loops() {
        let mut g: Graph<i32> =
            Graph::with_config(multiset_config(Direction::Undirected)).unwrap();
        populate(&mut g);
        let s = Serializer::new(&g);
        assert_eq!(
            s.to_dot().unwrap(),
            "graph {\n\
             \t0; 1; 2; 3; 4; \n\
             \t0--0; 0--1; 0--2; 0--3; 1--2; 1--2; 1--4; 2--3; 2--3; 2--4; 3--4; 4--4; 4--4; \n\
             }\n"
        );
    }

    #[test]
    fn test_directed_multi_edges_and_loops() {
        let mut g: Graph<i32> = Graph::with_config(multiset_config(Direction::Directed)).unwrap();
        populate(&mut g);
        let s = Serializer::new(&g);
        assert_eq!(
            s.to_dot().unwrap(),
            "digraph {\n\
             \t0; 1; 2; 3; 4; \n\
             \t0->0; 0->1; 0->2; 0->3; 1->2; 1->2; 1->4; 2->3; 2->3; 2->4; 3->4; 4->4; 4->4; \n\
             }\n"
        );
    }

    #[derive(Debug, Clone)]
    struct Noble {
        name: String,
        address: String,
    }

    impl Noble {
        fn new(name: &str, address: &str) -> Self {
            Noble {
                name: name.to_string(),
                address: address.to_string(),
            }
        }
    }

    impl fmt::Display for Noble {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{} de {}", self.name, self.address)
        }
    }

    display_label_attrs!(Noble);

    #[test]
    fn test_display_props_render_as_labels() {
        let mut g: Graph<i32, Noble, Noble> = Graph::with_config(prop_config()).unwrap();
        g.add_node_with_prop(0, Noble::new("Duke", "York"));
        g.add_node_with_prop(1, Noble::new("Lorenzo", "Medici"));
        g.add_edge_with_prop(&0, &1, Noble::new("Otto", "Bismarck"));
        let mut s = Serializer::new(&g);
        assert_eq!(
            s.to_dot().unwrap(),
            "digraph {\n\
             \t0[label=\"Duke de York\"]; 1[label=\"Lorenzo de Medici\"]; \n\
             \t0->1[label=\"Otto de Bismarck\"]; \n\
             }\n"
        );

        // a registered formatter overrides the label rendering
        s.register_node_formatter(|n: &Noble| format!("person={}@{}", n.name, n.address));
        assert_eq!(
            s.to_dot().unwrap(),
            "digraph {\n\
             \t0[person=Duke@York]; 1[person=Lorenzo@Medici]; \n\
             \t0->1[label=\"Otto de Bismarck\"]; \n\
             }\n"
        );
        s.delete_node_formatter();
        s.register_edge_formatter(|n: &Noble| format!("person={}@{}", n.name, n.address));
        assert_eq!(
            s.to_dot().unwrap(),
            "digraph {\n\
             \t0[label=\"Duke de York\"]; 1[label=\"Lorenzo de Medici\"]; \n\
             \t0->1[person=Otto@Bismarck]; \n\
             }\n"
        );
    }

    #[test]
    fn test_map_props_render_directly() {
        let mut g: Graph<i32, AttrMap, AttrMap> = Graph::with_config(prop_config()).unwrap();
        g.add_node_with_prop(0, Noble::new("Duke", "York").to_attrs().unwrap());
        g.add_node_with_prop(1, Noble::new("Lorenzo", "Medici").to_attrs().unwrap());
        g.add_edge_with_prop(&0, &1, Noble::new("Otto", "Bismarck").to_attrs().unwrap());
        let mut s = Serializer::new(&g);
        // label rendering via to_attrs; a Pairs-returning formatter also works
        assert_eq!(
            s.to_dot().unwrap(),
            "digraph {\n\
             \t0[label=\"Duke de York\"]; 1[label=\"Lorenzo de Medici\"]; \n\
             \t0->1[label=\"Otto de Bismarck\"]; \n\
             }\n"
        );
        s.register_edge_formatter(|attrs: &AttrMap| {
            format!("person=\"{} von Bismarck\"", attrs["label"])
        });
        assert!(s
            .to_dot()
            .unwrap()
            .contains("0->1[person=\"Otto de Bismarck von Bismarck\"]; "));
    }

    #[test]
    fn test_pair_map_props() {
        let mut g: Graph<i32, AttrMap, ()> = Graph::with_config(prop_config()).unwrap();
        let mut attrs = AttrMap::new();
        attrs.insert("name".to_string(), "Duke".to_string());
        attrs.insert("address".to_string(), "York".to_string());
        g.add_node_with_prop(0, attrs);
        let s = Serializer::new(&g);
        assert_eq!(
            s.to_dot().unwrap(),
            "digraph {\n\
             \t0[address=\"York\", name=\"Duke\"]; \n\
             }\n"
        );
    }

    #[test]
    fn test_unrenderable_fails_even_when_empty() {
        #[derive(Debug, Default)]
        struct Opaque;
        impl DotAttributes for Opaque {
            const STRATEGY: AttrStrategy = AttrStrategy::Unsupported;
        }

        let empty_node: Graph<i32, Opaque, ()> = Graph::with_config(prop_config()).unwrap();
        let s = Serializer::new(&empty_node);
        assert_eq!(
            s.to_dot().unwrap_err(),
            GraphError::Unrenderable { what: "node" }
        );

        let empty_edge: Graph<i32, (), Opaque> = Graph::with_config(prop_config()).unwrap();
        let mut s = Serializer::new(&empty_edge);
        assert_eq!(
            s.to_dot().unwrap_err(),
            GraphError::Unrenderable { what: "edge" }
        );
        // a registered formatter resolves it
        s.register_edge_formatter(|_: &Opaque| AttrBlock::Empty);
        assert!(s.to_dot().is_ok());
    }
}
