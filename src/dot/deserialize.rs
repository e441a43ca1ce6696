//! DOT to graph
//!
//! [`Deserializer`] replays a [`FlatDot`] statement sequence into a fresh
//! [`Graph`] under a fixed policy configuration. It first checks
//! graph-level coherence (the input's `strict` marker must match the
//! multi-edge policy and its `graph`/`digraph` tag must match the
//! direction policy), then resolves the name converter and the two
//! property strategies once, and only then creates nodes and edges in
//! input order.

use super::attrs::{attr_map, AttrMap, AttrStrategy, DotAttributes, DotName, Resolved};
use super::input::{FlatDot, Statement};
use crate::error::{GraphError, GraphResult};
use crate::graph::{Direction, Graph, GraphConfig, Key};
use tracing::debug;

type PropConverter<P> = Box<dyn Fn(&AttrMap) -> P>;
type NameConverter<K> = Box<dyn Fn(&str) -> K>;

/// Builds graphs from flattened DOT input.
///
/// Converters are optional; when absent, the property types' own
/// [`AttrStrategy`] and the key type's [`DotName`] impl take over.
pub struct Deserializer<K, NP = (), EP = ()> {
    config: GraphConfig,
    name_conv: Option<NameConverter<K>>,
    node_conv: Option<PropConverter<NP>>,
    edge_conv: Option<PropConverter<EP>>,
}

impl<K, NP, EP> Deserializer<K, NP, EP> {
    /// A deserializer producing graphs under the given policies. Fails on
    /// an incoherent configuration.
    pub fn new(config: GraphConfig) -> GraphResult<Self> {
        config.validate()?;
        Ok(Deserializer {
            config,
            name_conv: None,
            node_conv: None,
            edge_conv: None,
        })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Registers a name converter; takes priority over [`DotName`].
    pub fn register_node_name_converter<F>(&mut self, f: F)
    where
        F: Fn(&str) -> K + 'static,
    {
        self.name_conv = Some(Box::new(f));
    }

    pub fn delete_node_name_converter(&mut self) {
        self.name_conv = None;
    }

    /// Registers a node-property converter; takes priority over the
    /// type-level strategy.
    pub fn register_node_prop_converter<F>(&mut self, f: F)
    where
        F: Fn(&AttrMap) -> NP + 'static,
    {
        self.node_conv = Some(Box::new(f));
    }

    pub fn delete_node_prop_converter(&mut self) {
        self.node_conv = None;
    }

    /// Registers an edge-property converter; takes priority over the
    /// type-level strategy.
    pub fn register_edge_prop_converter<F>(&mut self, f: F)
    where
        F: Fn(&AttrMap) -> EP + 'static,
    {
        self.edge_conv = Some(Box::new(f));
    }

    pub fn delete_edge_prop_converter(&mut self) {
        self.edge_conv = None;
    }
}

impl<K, NP, EP> Default for Deserializer<K, NP, EP> {
    fn default() -> Self {
        Deserializer {
            config: GraphConfig::default(),
            name_conv: None,
            node_conv: None,
            edge_conv: None,
        }
    }
}

fn resolve_converter(
    user_registered: bool,
    strategy: AttrStrategy,
    what: &'static str,
) -> GraphResult<Resolved> {
    if user_registered {
        debug!("using the registered {what} property converter");
        return Ok(Resolved::UserDefined);
    }
    match strategy {
        AttrStrategy::Direct => {
            debug!("{what} property converts directly from parsed attributes");
            Ok(Resolved::DirectMap)
        }
        AttrStrategy::Void => {
            debug!("{what} property is absent; ignoring all parsed attributes");
            Ok(Resolved::Void)
        }
        AttrStrategy::Labeled | AttrStrategy::Unsupported => {
            Err(GraphError::ConverterUnresolved { what })
        }
    }
}

fn absent_prop<P: DotAttributes>() -> GraphResult<P> {
    P::absent().ok_or_else(|| {
        GraphError::AttrConversion("void strategy resolved for a type with no absent value".into())
    })
}

impl<K, NP, EP> Deserializer<K, NP, EP>
where
    K: Key + DotName,
    NP: DotAttributes,
    EP: DotAttributes,
{
    fn check_coherence(&self, input: &FlatDot) -> GraphResult<()> {
        if input.is_strict != self.config.is_strict() {
            return Err(GraphError::StrictnessMismatch {
                is_strict: input.is_strict,
                multi_edge: self.config.multi_edge,
            });
        }
        let undirected_input = input.graph_type == "graph";
        if undirected_input != (self.config.direction == Direction::Undirected) {
            return Err(GraphError::DirectionMismatch {
                graph_type: input.graph_type.clone(),
                direction: self.config.direction,
            });
        }
        Ok(())
    }

    fn node_key(&self, name: &str) -> GraphResult<K> {
        match &self.name_conv {
            Some(conv) => Ok(conv(name)),
            None => K::from_name(name),
        }
    }

    fn node_prop(&self, resolved: Resolved, attrs: &AttrMap) -> GraphResult<NP> {
        match resolved {
            Resolved::UserDefined => match &self.node_conv {
                Some(conv) => Ok(conv(attrs)),
                None => Err(GraphError::ConverterUnresolved { what: "node" }),
            },
            Resolved::DirectMap => NP::from_attrs(attrs),
            Resolved::Void => absent_prop(),
        }
    }

    fn edge_prop(&self, resolved: Resolved, attrs: &AttrMap) -> GraphResult<EP> {
        match resolved {
            Resolved::UserDefined => match &self.edge_conv {
                Some(conv) => Ok(conv(attrs)),
                None => Err(GraphError::ConverterUnresolved { what: "edge" }),
            },
            Resolved::DirectMap => EP::from_attrs(attrs),
            Resolved::Void => absent_prop(),
        }
    }

    /// Replays the input into a fresh graph.
    ///
    /// Edge statements silently absorb `add_edge` rejections (an edge
    /// naming an undeclared node, a repeated edge under disallowed
    /// multi-edges, a disallowed self-loop), since rejection is ordinary
    /// `add_edge` behavior, not an error.
    pub fn deserialize(&self, input: &FlatDot) -> GraphResult<Graph<K, NP, EP>> {
        self.check_coherence(input)?;
        let node_resolved = resolve_converter(self.node_conv.is_some(), NP::STRATEGY, "node")?;
        let edge_resolved = resolve_converter(self.edge_conv.is_some(), EP::STRATEGY, "edge")?;

        let mut graph = Graph::with_config(self.config)?;
        for statement in &input.statements {
            match statement {
                Statement::Node(ns) => {
                    let node = self.node_key(&ns.name)?;
                    let attrs = attr_map(&ns.attrs);
                    let prop = self.node_prop(node_resolved, &attrs)?;
                    graph.add_node_with_prop(node, prop);
                }
                Statement::Edge(es) => {
                    // one attribute map shared by every pair the
                    // statement lists
                    let attrs = attr_map(&es.attrs);
                    for (src, tgt) in &es.endpoints {
                        let src = self.node_key(src)?;
                        let tgt = self.node_key(tgt)?;
                        let prop = self.edge_prop(edge_resolved, &attrs)?;
                        graph.add_edge_with_prop(&src, &tgt, prop);
                    }
                }
            }
        }
        Ok(graph)
    }
}
