//! Neighbor container abstraction
//!
//! One uniform insert/find/erase interface over six interchangeable
//! backing representations. The engine never branches on representation:
//! duplicate policy is enforced one layer up (via
//! [`ContainerKind::supports_duplicates`]) before `insert` is ever called,
//! so `insert` here always succeeds.
//!
//! Entries are `(neighbor key, EdgeId)` pairs; the id points into the
//! shared-edge table. `find` returns the first match in container
//! iteration order, which is stable for a given container state.

use super::config::ContainerKind;
use super::table::EdgeId;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::{BTreeMap, LinkedList};

/// Ids removed by a bulk erase; usually one or two.
pub(crate) type RemovedIds = SmallVec<[EdgeId; 4]>;

#[derive(Debug, Clone)]
pub(crate) enum NeighborContainer<K> {
    Seq(Vec<(K, EdgeId)>),
    Linked(LinkedList<(K, EdgeId)>),
    HashMultiset(FxHashMap<K, Vec<EdgeId>>),
    OrderedMultiset(BTreeMap<K, Vec<EdgeId>>),
    HashSet(FxHashMap<K, EdgeId>),
    OrderedSet(BTreeMap<K, EdgeId>),
}

impl<K: Clone + Eq + std::hash::Hash + Ord> NeighborContainer<K> {
    pub fn new(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Seq => NeighborContainer::Seq(Vec::new()),
            ContainerKind::Linked => NeighborContainer::Linked(LinkedList::new()),
            ContainerKind::HashMultiset => NeighborContainer::HashMultiset(FxHashMap::default()),
            ContainerKind::OrderedMultiset => NeighborContainer::OrderedMultiset(BTreeMap::new()),
            ContainerKind::HashSet => NeighborContainer::HashSet(FxHashMap::default()),
            ContainerKind::OrderedSet => NeighborContainer::OrderedSet(BTreeMap::new()),
        }
    }

    /// Total number of entries (a parallel edge contributes one entry each).
    pub fn len(&self) -> usize {
        match self {
            NeighborContainer::Seq(v) => v.len(),
            NeighborContainer::Linked(l) => l.len(),
            NeighborContainer::HashMultiset(m) => m.values().map(Vec::len).sum(),
            NeighborContainer::OrderedMultiset(m) => m.values().map(Vec::len).sum(),
            NeighborContainer::HashSet(m) => m.len(),
            NeighborContainer::OrderedSet(m) => m.len(),
        }
    }

    /// Appends one entry. Never rejects; the engine has already applied
    /// the duplicate policy.
    pub fn insert(&mut self, key: K, edge: EdgeId) {
        match self {
            NeighborContainer::Seq(v) => v.push((key, edge)),
            NeighborContainer::Linked(l) => l.push_back((key, edge)),
            NeighborContainer::HashMultiset(m) => m.entry(key).or_default().push(edge),
            NeighborContainer::OrderedMultiset(m) => m.entry(key).or_default().push(edge),
            NeighborContainer::HashSet(m) => {
                m.insert(key, edge);
            }
            NeighborContainer::OrderedSet(m) => {
                m.insert(key, edge);
            }
        }
    }

    /// First entry matching `key`, as stored: the key reference and edge id.
    pub fn find(&self, key: &K) -> Option<(&K, EdgeId)> {
        match self {
            NeighborContainer::Seq(v) => {
                v.iter().find(|(k, _)| k == key).map(|(k, e)| (k, *e))
            }
            NeighborContainer::Linked(l) => {
                l.iter().find(|(k, _)| k == key).map(|(k, e)| (k, *e))
            }
            NeighborContainer::HashMultiset(m) => m
                .get_key_value(key)
                .and_then(|(k, ids)| ids.first().map(|e| (k, *e))),
            NeighborContainer::OrderedMultiset(m) => m
                .get_key_value(key)
                .and_then(|(k, ids)| ids.first().map(|e| (k, *e))),
            NeighborContainer::HashSet(m) => m.get_key_value(key).map(|(k, e)| (k, *e)),
            NeighborContainer::OrderedSet(m) => m.get_key_value(key).map(|(k, e)| (k, *e)),
        }
    }

    /// Number of entries matching `key`.
    pub fn count(&self, key: &K) -> usize {
        match self {
            NeighborContainer::Seq(v) => v.iter().filter(|(k, _)| k == key).count(),
            NeighborContainer::Linked(l) => l.iter().filter(|(k, _)| k == key).count(),
            NeighborContainer::HashMultiset(m) => m.get(key).map_or(0, Vec::len),
            NeighborContainer::OrderedMultiset(m) => m.get(key).map_or(0, Vec::len),
            NeighborContainer::HashSet(m) => usize::from(m.contains_key(key)),
            NeighborContainer::OrderedSet(m) => usize::from(m.contains_key(key)),
        }
    }

    /// Removes exactly the entry `(key, edge)`. Returns 1 if removed, 0 if
    /// no such entry exists.
    pub fn erase_entry(&mut self, key: &K, edge: EdgeId) -> usize {
        match self {
            NeighborContainer::Seq(v) => {
                match v.iter().position(|(k, e)| k == key && *e == edge) {
                    Some(i) => {
                        v.remove(i);
                        1
                    }
                    None => 0,
                }
            }
            NeighborContainer::Linked(l) => {
                match l.iter().position(|(k, e)| k == key && *e == edge) {
                    Some(i) => {
                        let mut tail = l.split_off(i);
                        tail.pop_front();
                        l.append(&mut tail);
                        1
                    }
                    None => 0,
                }
            }
            NeighborContainer::HashMultiset(m) => {
                let removed = erase_from_bucket(m.get_mut(key), edge);
                if removed && m.get(key).is_some_and(Vec::is_empty) {
                    m.remove(key);
                }
                usize::from(removed)
            }
            NeighborContainer::OrderedMultiset(m) => {
                let removed = erase_from_bucket(m.get_mut(key), edge);
                if removed && m.get(key).is_some_and(Vec::is_empty) {
                    m.remove(key);
                }
                usize::from(removed)
            }
            NeighborContainer::HashSet(m) => {
                if m.get(key) == Some(&edge) {
                    m.remove(key);
                    1
                } else {
                    0
                }
            }
            NeighborContainer::OrderedSet(m) => {
                if m.get(key) == Some(&edge) {
                    m.remove(key);
                    1
                } else {
                    0
                }
            }
        }
    }

    /// Removes one arbitrary single match for `key` (the first in
    /// container order). Returns the removed id, if any.
    pub fn erase_one(&mut self, key: &K) -> Option<EdgeId> {
        let (_, edge) = self.find(key)?;
        self.erase_entry(key, edge);
        Some(edge)
    }

    /// Removes every entry matching `key`; returns the removed ids.
    pub fn erase_all(&mut self, key: &K) -> RemovedIds {
        let mut removed = RemovedIds::new();
        match self {
            NeighborContainer::Seq(v) => {
                v.retain(|(k, e)| {
                    if k == key {
                        removed.push(*e);
                        false
                    } else {
                        true
                    }
                });
            }
            NeighborContainer::Linked(l) => {
                let old = std::mem::take(l);
                for (k, e) in old {
                    if &k == key {
                        removed.push(e);
                    } else {
                        l.push_back((k, e));
                    }
                }
            }
            NeighborContainer::HashMultiset(m) => {
                if let Some(ids) = m.remove(key) {
                    removed.extend(ids);
                }
            }
            NeighborContainer::OrderedMultiset(m) => {
                if let Some(ids) = m.remove(key) {
                    removed.extend(ids);
                }
            }
            NeighborContainer::HashSet(m) => {
                if let Some(e) = m.remove(key) {
                    removed.push(e);
                }
            }
            NeighborContainer::OrderedSet(m) => {
                if let Some(e) = m.remove(key) {
                    removed.push(e);
                }
            }
        }
        removed
    }

    /// All edge ids held by this container, in iteration order.
    pub fn edge_ids(&self) -> RemovedIds {
        self.iter().map(|(_, e)| e).collect()
    }

    pub fn iter(&self) -> ContainerIter<'_, K> {
        ContainerIter(match self {
            NeighborContainer::Seq(v) => Inner::Seq(v.iter()),
            NeighborContainer::Linked(l) => Inner::Linked(l.iter()),
            NeighborContainer::HashMultiset(m) => Inner::HashMultiset {
                outer: m.iter(),
                current: None,
            },
            NeighborContainer::OrderedMultiset(m) => Inner::OrderedMultiset {
                outer: m.iter(),
                current: None,
            },
            NeighborContainer::HashSet(m) => Inner::HashSet(m.iter()),
            NeighborContainer::OrderedSet(m) => Inner::OrderedSet(m.iter()),
        })
    }
}

fn erase_from_bucket(bucket: Option<&mut Vec<EdgeId>>, edge: EdgeId) -> bool {
    if let Some(ids) = bucket {
        if let Some(i) = ids.iter().position(|e| *e == edge) {
            ids.remove(i);
            return true;
        }
    }
    false
}

/// Iterator over `(neighbor key, edge id)` entries.
pub struct ContainerIter<'a, K>(Inner<'a, K>);

enum Inner<'a, K> {
    Seq(std::slice::Iter<'a, (K, EdgeId)>),
    Linked(std::collections::linked_list::Iter<'a, (K, EdgeId)>),
    HashMultiset {
        outer: std::collections::hash_map::Iter<'a, K, Vec<EdgeId>>,
        current: Option<(&'a K, std::slice::Iter<'a, EdgeId>)>,
    },
    OrderedMultiset {
        outer: std::collections::btree_map::Iter<'a, K, Vec<EdgeId>>,
        current: Option<(&'a K, std::slice::Iter<'a, EdgeId>)>,
    },
    HashSet(std::collections::hash_map::Iter<'a, K, EdgeId>),
    OrderedSet(std::collections::btree_map::Iter<'a, K, EdgeId>),
}

impl<'a, K> Iterator for ContainerIter<'a, K> {
    type Item = (&'a K, EdgeId);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.0 {
            Inner::Seq(it) => it.next().map(|(k, e)| (k, *e)),
            Inner::Linked(it) => it.next().map(|(k, e)| (k, *e)),
            Inner::HashMultiset { outer, current } => next_flattened(outer, current),
            Inner::OrderedMultiset { outer, current } => next_flattened(outer, current),
            Inner::HashSet(it) => it.next().map(|(k, e)| (k, *e)),
            Inner::OrderedSet(it) => it.next().map(|(k, e)| (k, *e)),
        }
    }
}

fn next_flattened<'a, K, O>(
    outer: &mut O,
    current: &mut Option<(&'a K, std::slice::Iter<'a, EdgeId>)>,
) -> Option<(&'a K, EdgeId)>
where
    O: Iterator<Item = (&'a K, &'a Vec<EdgeId>)>,
{
    loop {
        if let Some((k, ids)) = current {
            if let Some(e) = ids.next() {
                return Some((k, *e));
            }
        }
        let (k, ids) = outer.next()?;
        *current = Some((k, ids.iter()));
    }
}
