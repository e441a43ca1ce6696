//! The graph engine
//!
//! [`Graph`] owns a node map from key to property and neighbor
//! container(s), plus a shared-edge table, and enforces the direction,
//! multi-edge, and self-loop policies on every mutation. The engine is
//! written once against the uniform container interface; it consults the
//! capability flags of its [`GraphConfig`] and never branches on
//! representation.
//!
//! Two classes of operations are deliberately distinct. Lookup operations
//! (`add_edge`, `remove_edge` by value, `count_edges`, node add/remove)
//! treat a missing endpoint as a normal negative result and return 0.
//! Navigation operations (`neighbors`, `find_neighbor`, the counts, the
//! property accessors) require a valid anchor and return
//! [`GraphError::NodeNotFound`] otherwise: a neighbor list of a
//! nonexistent node is not representable as "empty".

use super::config::{Direction, GraphConfig, MapKind, MultiEdge, SelfLoop};
use super::container::{ContainerIter, NeighborContainer, RemovedIds};
use super::table::{EdgeId, EdgeRecord, EdgeTable};
use crate::error::{GraphError, GraphResult};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

/// Bounds required of a node key.
///
/// Both map representations must accept the same key type, hence the
/// combined `Hash + Ord` requirement; `Debug` renders keys into error
/// values. Blanket-implemented for every qualifying type.
pub trait Key: Clone + Eq + Hash + Ord + fmt::Debug {}

impl<T: Clone + Eq + Hash + Ord + fmt::Debug> Key for T {}

/// Node map over the two interchangeable representations.
#[derive(Debug, Clone)]
enum NodeMap<K, V> {
    Ordered(BTreeMap<K, V>),
    Hashed(FxHashMap<K, V>),
}

impl<K: Key, V> NodeMap<K, V> {
    fn new(kind: MapKind) -> Self {
        match kind {
            MapKind::Ordered => NodeMap::Ordered(BTreeMap::new()),
            MapKind::Hashed => NodeMap::Hashed(FxHashMap::default()),
        }
    }

    fn get(&self, key: &K) -> Option<&V> {
        match self {
            NodeMap::Ordered(m) => m.get(key),
            NodeMap::Hashed(m) => m.get(key),
        }
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self {
            NodeMap::Ordered(m) => m.get_mut(key),
            NodeMap::Hashed(m) => m.get_mut(key),
        }
    }

    fn contains(&self, key: &K) -> bool {
        match self {
            NodeMap::Ordered(m) => m.contains_key(key),
            NodeMap::Hashed(m) => m.contains_key(key),
        }
    }

    fn insert(&mut self, key: K, value: V) {
        match self {
            NodeMap::Ordered(m) => {
                m.insert(key, value);
            }
            NodeMap::Hashed(m) => {
                m.insert(key, value);
            }
        }
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        match self {
            NodeMap::Ordered(m) => m.remove(key),
            NodeMap::Hashed(m) => m.remove(key),
        }
    }

    fn len(&self) -> usize {
        match self {
            NodeMap::Ordered(m) => m.len(),
            NodeMap::Hashed(m) => m.len(),
        }
    }

    fn clear(&mut self) {
        match self {
            NodeMap::Ordered(m) => m.clear(),
            NodeMap::Hashed(m) => m.clear(),
        }
    }

    fn iter(&self) -> NodeMapIter<'_, K, V> {
        match self {
            NodeMap::Ordered(m) => NodeMapIter::Ordered(m.iter()),
            NodeMap::Hashed(m) => NodeMapIter::Hashed(m.iter()),
        }
    }
}

enum NodeMapIter<'a, K, V> {
    Ordered(std::collections::btree_map::Iter<'a, K, V>),
    Hashed(std::collections::hash_map::Iter<'a, K, V>),
}

impl<'a, K, V> Iterator for NodeMapIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            NodeMapIter::Ordered(it) => it.next(),
            NodeMapIter::Hashed(it) => it.next(),
        }
    }
}

/// Per-node adjacency: one container for undirected graphs, an out/in
/// pair for directed graphs.
#[derive(Debug, Clone)]
enum Adjacency<K> {
    Undirected(NeighborContainer<K>),
    Directed {
        out: NeighborContainer<K>,
        inc: NeighborContainer<K>,
    },
}

impl<K: Key> Adjacency<K> {
    fn new(config: &GraphConfig) -> Self {
        match config.direction {
            Direction::Undirected => {
                Adjacency::Undirected(NeighborContainer::new(config.container))
            }
            Direction::Directed => Adjacency::Directed {
                out: NeighborContainer::new(config.container),
                inc: NeighborContainer::new(config.container),
            },
        }
    }

    /// The container consulted for `neighbors`/`out_neighbors` and for
    /// edge lookups anchored at the source.
    fn primary(&self) -> &NeighborContainer<K> {
        match self {
            Adjacency::Undirected(c) => c,
            Adjacency::Directed { out, .. } => out,
        }
    }

    fn primary_mut(&mut self) -> &mut NeighborContainer<K> {
        match self {
            Adjacency::Undirected(c) => c,
            Adjacency::Directed { out, .. } => out,
        }
    }

    /// The container consulted for `in_neighbors`. On undirected graphs
    /// this is the same single container.
    fn incoming(&self) -> &NeighborContainer<K> {
        match self {
            Adjacency::Undirected(c) => c,
            Adjacency::Directed { inc, .. } => inc,
        }
    }

    fn incoming_mut(&mut self) -> &mut NeighborContainer<K> {
        match self {
            Adjacency::Undirected(c) => c,
            Adjacency::Directed { inc, .. } => inc,
        }
    }
}

#[derive(Debug, Clone)]
struct NodeEntry<K, NP> {
    prop: NP,
    adj: Adjacency<K>,
}

/// Generic in-memory graph under a fixed structural policy.
///
/// `K` is the node key, `NP` the node property, `EP` the edge property;
/// `()` stands for "no property". The policy descriptor is validated at
/// construction and immutable afterwards.
#[derive(Debug)]
pub struct Graph<K, NP = (), EP = ()> {
    config: GraphConfig,
    nodes: NodeMap<K, NodeEntry<K, NP>>,
    edges: EdgeTable<K, EP>,
}

impl<K: Key, NP, EP> Graph<K, NP, EP> {
    /// A graph with the default policies: undirected, no multi-edges, no
    /// self-loops, hashed node map, hash-set neighbors.
    pub fn new() -> Self {
        let config = GraphConfig::default();
        Graph {
            nodes: NodeMap::new(config.map),
            edges: EdgeTable::new(),
            config,
        }
    }

    /// A graph under the given policies. Fails with
    /// [`GraphError::IncoherentContainer`] if a set-like container is
    /// paired with allowed multi-edges.
    pub fn with_config(config: GraphConfig) -> GraphResult<Self> {
        config.validate()?;
        Ok(Graph {
            nodes: NodeMap::new(config.map),
            edges: EdgeTable::new(),
            config,
        })
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Node count.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 0
    }

    /// Count of logical edges. A self-loop counts once; an undirected
    /// edge counts once despite its two mirrored entries.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn has_node(&self, key: &K) -> bool {
        self.nodes.contains(key)
    }

    /// The view of a node, or `None` if absent.
    pub fn get(&self, key: &K) -> Option<NodeView<'_, K, NP, EP>> {
        self.nodes.get(key).map(|entry| NodeView {
            entry,
            table: &self.edges,
        })
    }

    /// Removes all nodes and edges; the policy configuration stays.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Inserts a node with the given property. Returns 1 if inserted, 0
    /// (without touching the existing node) if the key is already present.
    pub fn add_node_with_prop(&mut self, key: K, prop: NP) -> usize {
        if self.nodes.contains(&key) {
            return 0;
        }
        let adj = Adjacency::new(&self.config);
        self.nodes.insert(key, NodeEntry { prop, adj });
        1
    }

    /// Inserts a node with a default property; 1 if inserted, 0 if present.
    pub fn add_node(&mut self, key: K) -> usize
    where
        NP: Default,
    {
        self.add_node_with_prop(key, NP::default())
    }

    /// Inserts many nodes; returns how many were newly inserted.
    pub fn add_nodes(&mut self, keys: impl IntoIterator<Item = K>) -> usize
    where
        NP: Default,
    {
        keys.into_iter().map(|key| self.add_node(key)).sum()
    }

    /// Removes a node and purges every incident edge (for directed
    /// graphs: out-edges and in-edges both). Returns 1 if the node was
    /// present, 0 otherwise.
    pub fn remove_node(&mut self, key: &K) -> usize {
        let incident: RemovedIds = match self.nodes.get(key) {
            Some(entry) => match &entry.adj {
                Adjacency::Undirected(c) => c.edge_ids(),
                Adjacency::Directed { out, inc } => {
                    let mut ids = out.edge_ids();
                    ids.extend(inc.edge_ids());
                    ids
                }
            },
            None => return 0,
        };
        // a directed self-loop shows up in both containers; removal
        // through a stale id is a no-op, so no dedup is needed
        for id in incident {
            self.remove_edge_entry(id);
        }
        self.nodes.remove(key);
        1
    }

    /// Removes many nodes; returns how many were actually present.
    pub fn remove_nodes(&mut self, keys: impl IntoIterator<Item = K>) -> usize {
        keys.into_iter().map(|key| self.remove_node(&key)).sum()
    }

    /// Adds an edge carrying the given property. Returns 1 on creation,
    /// 0 when rejected: a missing endpoint, a self-loop under
    /// [`SelfLoop::Disallowed`], or an existing parallel edge under
    /// [`MultiEdge::Disallowed`]. Rejection is a normal result, not an
    /// error.
    pub fn add_edge_with_prop(&mut self, src: &K, tgt: &K, prop: EP) -> usize {
        if !self.nodes.contains(src) || !self.nodes.contains(tgt) {
            return 0;
        }
        let is_loop = src == tgt;
        if is_loop && self.config.self_loop == SelfLoop::Disallowed {
            return 0;
        }
        if self.config.multi_edge == MultiEdge::Disallowed && self.count_edges(src, tgt) > 0 {
            return 0;
        }
        let id = self.edges.insert(EdgeRecord {
            src: src.clone(),
            tgt: tgt.clone(),
            prop,
        });
        match self.config.direction {
            Direction::Directed => {
                if let Some(entry) = self.nodes.get_mut(src) {
                    entry.adj.primary_mut().insert(tgt.clone(), id);
                }
                if let Some(entry) = self.nodes.get_mut(tgt) {
                    entry.adj.incoming_mut().insert(src.clone(), id);
                }
            }
            Direction::Undirected => {
                if let Some(entry) = self.nodes.get_mut(src) {
                    entry.adj.primary_mut().insert(tgt.clone(), id);
                }
                if !is_loop {
                    if let Some(entry) = self.nodes.get_mut(tgt) {
                        entry.adj.primary_mut().insert(src.clone(), id);
                    }
                }
            }
        }
        1
    }

    /// Adds an edge with a default property; same semantics as
    /// [`Graph::add_edge_with_prop`].
    pub fn add_edge(&mut self, src: &K, tgt: &K) -> usize
    where
        EP: Default,
    {
        self.add_edge_with_prop(src, tgt, EP::default())
    }

    /// Removes **all** edges between the pair (the ordered pair for
    /// directed graphs, the unordered pair otherwise). Returns the count
    /// removed; 0 when either endpoint is missing.
    pub fn remove_edge(&mut self, src: &K, tgt: &K) -> usize {
        if !self.nodes.contains(tgt) {
            return 0;
        }
        let ids: RemovedIds = match self.nodes.get_mut(src) {
            Some(entry) => entry.adj.primary_mut().erase_all(tgt),
            None => return 0,
        };
        // the src-side entries are already erased; remove_edge_entry still
        // drops the table record and the far-side entry for each id
        let mut removed = 0;
        for id in ids {
            removed += self.remove_edge_entry(id);
        }
        removed
    }

    /// Removes exactly the one edge denoted by the handle, including the
    /// mirrored entry at the other endpoint of an undirected edge.
    /// Returns 1, or 0 for a stale handle.
    pub fn remove_edge_entry(&mut self, id: EdgeId) -> usize {
        let record = match self.edges.remove(id) {
            Some(record) => record,
            None => return 0,
        };
        match self.config.direction {
            Direction::Directed => {
                if let Some(entry) = self.nodes.get_mut(&record.src) {
                    entry.adj.primary_mut().erase_entry(&record.tgt, id);
                }
                if let Some(entry) = self.nodes.get_mut(&record.tgt) {
                    entry.adj.incoming_mut().erase_entry(&record.src, id);
                }
            }
            Direction::Undirected => {
                if let Some(entry) = self.nodes.get_mut(&record.src) {
                    entry.adj.primary_mut().erase_entry(&record.tgt, id);
                }
                if record.src != record.tgt {
                    if let Some(entry) = self.nodes.get_mut(&record.tgt) {
                        entry.adj.primary_mut().erase_entry(&record.src, id);
                    }
                }
            }
        }
        1
    }

    /// Multiplicity between the pair; 0 (not an error) when either
    /// endpoint is missing.
    pub fn count_edges(&self, src: &K, tgt: &K) -> usize {
        match self.nodes.get(src) {
            Some(entry) if self.nodes.contains(tgt) => entry.adj.primary().count(tgt),
            _ => 0,
        }
    }

    fn entry(&self, key: &K) -> GraphResult<&NodeEntry<K, NP>> {
        self.nodes.get(key).ok_or_else(|| GraphError::NodeNotFound {
            key: format!("{key:?}"),
        })
    }

    fn entry_mut(&mut self, key: &K) -> GraphResult<&mut NodeEntry<K, NP>> {
        match self.nodes.get_mut(key) {
            Some(entry) => Ok(entry),
            None => Err(GraphError::NodeNotFound {
                key: format!("{key:?}"),
            }),
        }
    }

    /// Neighbor entries of a node. On directed graphs this is the
    /// out-going view. Errors if the node does not exist.
    pub fn neighbors(&self, key: &K) -> GraphResult<Neighbors<'_, K, EP>> {
        let entry = self.entry(key)?;
        Ok(Neighbors {
            iter: entry.adj.primary().iter(),
            table: &self.edges,
        })
    }

    /// Out-going neighbor entries; on undirected graphs, the single
    /// container. Errors if the node does not exist.
    pub fn out_neighbors(&self, key: &K) -> GraphResult<Neighbors<'_, K, EP>> {
        self.neighbors(key)
    }

    /// In-coming neighbor entries; on undirected graphs, the single
    /// container. Errors if the node does not exist.
    pub fn in_neighbors(&self, key: &K) -> GraphResult<Neighbors<'_, K, EP>> {
        let entry = self.entry(key)?;
        Ok(Neighbors {
            iter: entry.adj.incoming().iter(),
            table: &self.edges,
        })
    }

    pub fn count_neighbors(&self, key: &K) -> GraphResult<usize> {
        Ok(self.entry(key)?.adj.primary().len())
    }

    pub fn count_out_neighbors(&self, key: &K) -> GraphResult<usize> {
        self.count_neighbors(key)
    }

    pub fn count_in_neighbors(&self, key: &K) -> GraphResult<usize> {
        Ok(self.entry(key)?.adj.incoming().len())
    }

    /// Looks for `tgt` among the (out-)neighbors of `src`. Errors if
    /// `src` does not exist; yields `Ok(None)` if it exists but `tgt` is
    /// not among its neighbors. The match is the first in container
    /// order and stable for a given container state.
    pub fn find_neighbor(&self, src: &K, tgt: &K) -> GraphResult<Option<Neighbor<'_, K, EP>>> {
        let entry = self.entry(src)?;
        Ok(self.resolve_found(entry.adj.primary().find(tgt)))
    }

    pub fn find_out_neighbor(&self, src: &K, tgt: &K) -> GraphResult<Option<Neighbor<'_, K, EP>>> {
        self.find_neighbor(src, tgt)
    }

    pub fn find_in_neighbor(&self, src: &K, tgt: &K) -> GraphResult<Option<Neighbor<'_, K, EP>>> {
        let entry = self.entry(src)?;
        Ok(self.resolve_found(entry.adj.incoming().find(tgt)))
    }

    fn resolve_found<'g>(
        &'g self,
        found: Option<(&'g K, EdgeId)>,
    ) -> Option<Neighbor<'g, K, EP>> {
        let (key, edge) = found?;
        let prop = self.edges.prop(edge)?;
        Some(Neighbor { key, edge, prop })
    }

    /// Read-only access to a node's property. Errors if the node does
    /// not exist.
    pub fn node_prop(&self, key: &K) -> GraphResult<&NP> {
        Ok(&self.entry(key)?.prop)
    }

    /// Mutable access to a node's property. Errors if the node does not
    /// exist.
    pub fn node_prop_mut(&mut self, key: &K) -> GraphResult<&mut NP> {
        Ok(&mut self.entry_mut(key)?.prop)
    }

    fn find_edge_id(&self, src: &K, tgt: &K) -> Option<EdgeId> {
        self.nodes
            .get(src)
            .filter(|_| self.nodes.contains(tgt))
            .and_then(|entry| entry.adj.primary().find(tgt))
            .map(|(_, edge)| edge)
    }

    fn edge_not_found(src: &K, tgt: &K) -> GraphError {
        GraphError::EdgeNotFound {
            src: format!("{src:?}"),
            tgt: format!("{tgt:?}"),
        }
    }

    /// The property of *a* matching edge between the pair, taking the
    /// first in container order when parallel edges exist. For an undirected
    /// non-self-loop edge the reference is to the single shared value, so
    /// `edge_prop(a, b)` and `edge_prop(b, a)` denote the same instance.
    /// Errors with [`GraphError::EdgeNotFound`] when no edge matches.
    pub fn edge_prop(&self, src: &K, tgt: &K) -> GraphResult<&EP> {
        match self.find_edge_id(src, tgt) {
            Some(id) => self
                .edges
                .prop(id)
                .ok_or_else(|| Self::edge_not_found(src, tgt)),
            None => Err(Self::edge_not_found(src, tgt)),
        }
    }

    /// Mutable twin of [`Graph::edge_prop`].
    pub fn edge_prop_mut(&mut self, src: &K, tgt: &K) -> GraphResult<&mut EP> {
        match self.find_edge_id(src, tgt) {
            Some(id) => match self.edges.get_mut(id) {
                Some(record) => Ok(&mut record.prop),
                None => Err(Self::edge_not_found(src, tgt)),
            },
            None => Err(Self::edge_not_found(src, tgt)),
        }
    }

    /// The property behind a specific edge handle; `None` for a stale
    /// handle.
    pub fn edge_prop_at(&self, id: EdgeId) -> Option<&EP> {
        self.edges.prop(id)
    }

    pub fn edge_prop_at_mut(&mut self, id: EdgeId) -> Option<&mut EP> {
        self.edges.get_mut(id).map(|record| &mut record.prop)
    }

    /// The `(src, tgt)` pair behind a specific edge handle, as inserted.
    pub fn edge_endpoints(&self, id: EdgeId) -> Option<(&K, &K)> {
        self.edges.get(id).map(|record| (&record.src, &record.tgt))
    }

    /// Iterates `(key, node view)` pairs in node-map order.
    pub fn iter(&self) -> Iter<'_, K, NP, EP> {
        Iter {
            inner: self.nodes.iter(),
            table: &self.edges,
        }
    }
}

impl<K: Key, NP, EP> Default for Graph<K, NP, EP> {
    fn default() -> Self {
        Graph::new()
    }
}

impl<'g, K: Key, NP, EP> IntoIterator for &'g Graph<K, NP, EP> {
    type Item = (&'g K, NodeView<'g, K, NP, EP>);
    type IntoIter = Iter<'g, K, NP, EP>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the graph's nodes, in node-map order.
pub struct Iter<'g, K, NP, EP> {
    inner: NodeMapIter<'g, K, NodeEntry<K, NP>>,
    table: &'g EdgeTable<K, EP>,
}

impl<'g, K: Key, NP, EP> Iterator for Iter<'g, K, NP, EP> {
    type Item = (&'g K, NodeView<'g, K, NP, EP>);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, entry) = self.inner.next()?;
        Some((
            key,
            NodeView {
                entry,
                table: self.table,
            },
        ))
    }
}

/// Read-only view of one node: its property and its neighbor views.
pub struct NodeView<'g, K, NP, EP> {
    entry: &'g NodeEntry<K, NP>,
    table: &'g EdgeTable<K, EP>,
}

impl<'g, K: Key, NP, EP> NodeView<'g, K, NP, EP> {
    pub fn prop(&self) -> &'g NP {
        &self.entry.prop
    }

    /// Neighbor entries; the out-going view on directed graphs.
    pub fn neighbors(&self) -> Neighbors<'g, K, EP> {
        Neighbors {
            iter: self.entry.adj.primary().iter(),
            table: self.table,
        }
    }

    pub fn out_neighbors(&self) -> Neighbors<'g, K, EP> {
        self.neighbors()
    }

    pub fn in_neighbors(&self) -> Neighbors<'g, K, EP> {
        Neighbors {
            iter: self.entry.adj.incoming().iter(),
            table: self.table,
        }
    }

    pub fn count_neighbors(&self) -> usize {
        self.entry.adj.primary().len()
    }

    pub fn count_out_neighbors(&self) -> usize {
        self.count_neighbors()
    }

    pub fn count_in_neighbors(&self) -> usize {
        self.entry.adj.incoming().len()
    }
}

/// One neighbor entry: the neighbor's key, the edge handle, and the edge
/// property.
pub struct Neighbor<'g, K, EP> {
    pub key: &'g K,
    pub edge: EdgeId,
    pub prop: &'g EP,
}

impl<K, EP> Clone for Neighbor<'_, K, EP> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, EP> Copy for Neighbor<'_, K, EP> {}

/// Iterator over a node's neighbor entries.
pub struct Neighbors<'g, K, EP> {
    iter: ContainerIter<'g, K>,
    table: &'g EdgeTable<K, EP>,
}

impl<'g, K, EP> Iterator for Neighbors<'g, K, EP> {
    type Item = Neighbor<'g, K, EP>;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, edge) = self.iter.next()?;
        let prop = self.table.prop(edge)?;
        Some(Neighbor { key, edge, prop })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::config::ContainerKind;

    fn legal_containers(multi_edge: MultiEdge) -> Vec<ContainerKind> {
        let mut kinds = vec![
            ContainerKind::Seq,
            ContainerKind::Linked,
            ContainerKind::HashMultiset,
            ContainerKind::OrderedMultiset,
        ];
        if multi_edge == MultiEdge::Disallowed {
            kinds.push(ContainerKind::HashSet);
            kinds.push(ContainerKind::OrderedSet);
        }
        kinds
    }

    fn policy_matrix() -> Vec<GraphConfig> {
        let mut configs = Vec::new();
        for direction in [Direction::Directed, Direction::Undirected] {
            for multi_edge in [MultiEdge::Allowed, MultiEdge::Disallowed] {
                for self_loop in [SelfLoop::Allowed, SelfLoop::Disallowed] {
                    for map in [MapKind::Ordered, MapKind::Hashed] {
                        for container in legal_containers(multi_edge) {
                            configs.push(GraphConfig {
                                direction,
                                multi_edge,
                                self_loop,
                                map,
                                container,
                            });
                        }
                    }
                }
            }
        }
        configs
    }

    #[test]
    fn test_edge_count_across_policies() {
        for config in policy_matrix() {
            let multi = config.multi_edge == MultiEdge::Allowed;
            let loops = config.self_loop == SelfLoop::Allowed;

            let mut g: Graph<i32> = Graph::with_config(config).unwrap();
            assert_eq!(g.num_edges(), 0);
            assert_eq!(g.add_nodes([0, 1, 2]), 3);
            assert_eq!(g.add_edge(&0, &1), 1);
            assert_eq!(g.add_edge(&1, &2), 1);
            assert_eq!(g.add_edge(&2, &0), 1);
            assert_eq!(g.num_edges(), 3, "{config:?}");

            g.add_edge(&0, &1);
            g.add_edge(&0, &1);
            assert_eq!(g.num_edges(), if multi { 5 } else { 3 }, "{config:?}");

            g.add_edge(&1, &1);
            g.add_edge(&1, &1);
            let expected = match (loops, multi) {
                (true, true) => 7,
                (true, false) => 4,
                (false, true) => 5,
                (false, false) => 3,
            };
            assert_eq!(g.num_edges(), expected, "{config:?}");

            assert_eq!(g.add_nodes([3]), 1);
            g.add_edge(&0, &3);
            g.add_edge(&1, &3);
            g.add_edge(&2, &3);
            // removing node 1 purges every 1-incident edge
            assert_eq!(g.remove_nodes([1]), 1);
            assert_eq!(g.num_edges(), 3, "{config:?}");

            g.add_edge(&0, &2);
            if config.direction == Direction::Undirected && !multi {
                // (2, 0) already exists as an unordered pair
                assert_eq!(g.num_edges(), 3, "{config:?}");
            } else {
                assert_eq!(g.num_edges(), 4, "{config:?}");
            }

            assert_eq!(g.remove_nodes([0]), 1);
            assert_eq!(g.num_edges(), 1, "{config:?}");
        }
    }

    #[test]
    fn test_node_add_remove_counts() {
        let mut g: Graph<i32> = Graph::new();
        assert_eq!(g.add_nodes([1, 2, 3]), 3);
        assert_eq!(g.add_nodes([2, 3, 4]), 1);
        assert_eq!(g.size(), 4);
        assert_eq!(g.remove_nodes([3, 4, 5]), 2);
        assert_eq!(g.size(), 2);
        assert!(g.has_node(&1));
        assert!(!g.has_node(&3));
    }

    #[test]
    fn test_lookup_degrades_navigation_raises() {
        let mut g: Graph<i32> = Graph::new();
        g.add_nodes([0, 1]);
        g.add_edge(&0, &1);

        // lookup operations: missing endpoints are ordinary negatives
        assert_eq!(g.add_edge(&0, &7), 0);
        assert_eq!(g.add_edge(&7, &0), 0);
        assert_eq!(g.count_edges(&7, &0), 0);
        assert_eq!(g.count_edges(&0, &7), 0);
        assert_eq!(g.remove_edge(&7, &0), 0);

        // navigation operations: a missing anchor is an error
        assert!(g.neighbors(&7).is_err());
        assert!(g.count_neighbors(&7).is_err());
        assert!(g.find_neighbor(&7, &0).is_err());
        assert!(g.node_prop(&7).is_err());
        assert!(matches!(
            g.neighbors(&7),
            Err(GraphError::NodeNotFound { .. })
        ));

        // existing anchor, missing neighbor: Ok(None), not an error
        g.add_nodes([2]);
        assert!(g.find_neighbor(&0, &2).unwrap().is_none());
    }

    #[test]
    fn test_remove_node_purges_directed_edges() {
        let config = GraphConfig::directed().with_self_loop(SelfLoop::Allowed);
        let mut g: Graph<i32> = Graph::with_config(config).unwrap();
        g.add_nodes([0, 1, 2]);
        g.add_edge(&0, &1);
        g.add_edge(&1, &2);
        g.add_edge(&2, &1);
        g.add_edge(&1, &1);
        assert_eq!(g.num_edges(), 4);
        assert_eq!(g.count_out_neighbors(&1).unwrap(), 2);
        assert_eq!(g.count_in_neighbors(&1).unwrap(), 3);

        assert_eq!(g.remove_node(&1), 1);
        assert!(!g.has_node(&1));
        assert_eq!(g.num_edges(), 0);
        assert_eq!(g.count_edges(&1, &2), 0);
        assert_eq!(g.count_edges(&0, &1), 0);
    }

    #[test]
    fn test_undirected_mirror_entries() {
        let config = GraphConfig::undirected().with_container(ContainerKind::OrderedSet);
        let mut g: Graph<i32, (), f64> = Graph::with_config(config).unwrap();
        g.add_nodes([0, 1]);
        assert_eq!(g.add_edge_with_prop(&0, &1, 0.5), 1);
        assert_eq!(g.num_edges(), 1);
        assert_eq!(g.count_neighbors(&0).unwrap(), 1);
        assert_eq!(g.count_neighbors(&1).unwrap(), 1);

        // both mirrored entries resolve to the same owned property
        let a = g.edge_prop(&0, &1).unwrap();
        let b = g.edge_prop(&1, &0).unwrap();
        assert!(std::ptr::eq(a, b));

        // removing through either endpoint drops both entries
        assert_eq!(g.remove_edge(&1, &0), 1);
        assert_eq!(g.count_neighbors(&0).unwrap(), 0);
        assert_eq!(g.count_neighbors(&1).unwrap(), 0);
        assert_eq!(g.num_edges(), 0);
    }

    #[test]
    fn test_remove_edge_entry_by_handle() {
        let config = GraphConfig::undirected()
            .with_multi_edge(MultiEdge::Allowed)
            .with_self_loop(SelfLoop::Allowed)
            .with_container(ContainerKind::Seq);
        let mut g: Graph<i32, (), i32> = Graph::with_config(config).unwrap();
        g.add_nodes([2]);
        assert_eq!(g.add_edge_with_prop(&2, &2, 0), 1);
        assert_eq!(g.add_edge_with_prop(&2, &2, 1), 1);
        assert_eq!(g.count_edges(&2, &2), 2);

        let first = g.find_neighbor(&2, &2).unwrap().expect("self loop");
        let removed_prop = *first.prop;
        let handle = first.edge;
        assert_eq!(g.remove_edge_entry(handle), 1);
        assert_eq!(g.count_edges(&2, &2), 1);
        let other = g.find_neighbor(&2, &2).unwrap().expect("other loop");
        assert_eq!(*other.prop, 1 - removed_prop);

        // stale handle degrades to 0
        assert_eq!(g.remove_edge_entry(handle), 0);
    }

    #[test]
    fn test_iteration_in_map_order() {
        let config = GraphConfig::directed().with_map(MapKind::Ordered);
        let mut g: Graph<i32, (), ()> = Graph::with_config(config).unwrap();
        g.add_nodes([3, 1, 2]);
        g.add_edge(&1, &3);
        let keys: Vec<i32> = g.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 2, 3]);
        for (k, view) in &g {
            if *k == 1 {
                assert_eq!(view.count_out_neighbors(), 1);
                assert_eq!(view.count_in_neighbors(), 0);
            }
            if *k == 3 {
                assert_eq!(view.count_in_neighbors(), 1);
            }
        }
    }

    #[test]
    fn test_node_prop_access() {
        let mut g: Graph<String, i32> = Graph::new();
        g.add_node_with_prop("Alice".to_string(), 19);
        assert_eq!(g.add_node_with_prop("Alice".to_string(), 100), 0);
        assert_eq!(*g.node_prop(&"Alice".to_string()).unwrap(), 19);
        *g.node_prop_mut(&"Alice".to_string()).unwrap() = 12;
        assert_eq!(*g.node_prop(&"Alice".to_string()).unwrap(), 12);
    }

    #[test]
    fn test_clear_keeps_config() {
        let config = GraphConfig::directed();
        let mut g: Graph<i32> = Graph::with_config(config).unwrap();
        g.add_nodes([0, 1]);
        g.add_edge(&0, &1);
        g.clear();
        assert_eq!(g.size(), 0);
        assert_eq!(g.num_edges(), 0);
        assert_eq!(g.config().direction, Direction::Directed);
    }
}
