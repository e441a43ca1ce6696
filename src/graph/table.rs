//! Shared-edge table
//!
//! Every logical edge is stored exactly once in an arena slot, and the
//! neighbor entries at its endpoint(s) hold the slot's [`EdgeId`]. The two
//! mirrored entries of an undirected non-self-loop edge therefore share a
//! single owned property value, and an `EdgeId` is a stable handle that
//! survives unrelated mutation. Slots are recycled through a free list.

use std::fmt;

/// Stable handle to one stored edge.
///
/// Obtained from `find_neighbor` or neighbor iteration; stays valid until
/// the denoted edge is removed, after which lookups through it degrade to
/// `None`/`0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

/// One stored edge: its endpoints as inserted plus the owned property.
#[derive(Debug, Clone)]
pub(crate) struct EdgeRecord<K, EP> {
    pub src: K,
    pub tgt: K,
    pub prop: EP,
}

/// Arena of edge records with slot recycling.
#[derive(Debug, Clone)]
pub(crate) struct EdgeTable<K, EP> {
    slots: Vec<Option<EdgeRecord<K, EP>>>,
    free: Vec<usize>,
    live: usize,
}

impl<K, EP> EdgeTable<K, EP> {
    pub fn new() -> Self {
        EdgeTable {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live edges. This is the graph's logical edge count: a
    /// mirrored undirected edge occupies one slot.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn insert(&mut self, record: EdgeRecord<K, EP>) -> EdgeId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(record);
            EdgeId(index)
        } else {
            self.slots.push(Some(record));
            EdgeId(self.slots.len() - 1)
        }
    }

    pub fn get(&self, id: EdgeId) -> Option<&EdgeRecord<K, EP>> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, id: EdgeId) -> Option<&mut EdgeRecord<K, EP>> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    pub fn prop(&self, id: EdgeId) -> Option<&EP> {
        self.get(id).map(|record| &record.prop)
    }

    pub fn remove(&mut self, id: EdgeId) -> Option<EdgeRecord<K, EP>> {
        let record = self.slots.get_mut(id.0).and_then(|slot| slot.take())?;
        self.free.push(id.0);
        self.live -= 1;
        Some(record)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let mut table: EdgeTable<i32, f64> = EdgeTable::new();
        let id = table.insert(EdgeRecord {
            src: 1,
            tgt: 2,
            prop: 0.5,
        });
        assert_eq!(table.len(), 1);
        assert_eq!(table.prop(id), Some(&0.5));

        let record = table.remove(id).unwrap();
        assert_eq!((record.src, record.tgt), (1, 2));
        assert_eq!(table.len(), 0);
        assert!(table.get(id).is_none());
        // removal through a stale handle is a no-op
        assert!(table.remove(id).is_none());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_slot_recycling() {
        let mut table: EdgeTable<i32, ()> = EdgeTable::new();
        let a = table.insert(EdgeRecord {
            src: 0,
            tgt: 1,
            prop: (),
        });
        table.remove(a);
        let b = table.insert(EdgeRecord {
            src: 2,
            tgt: 3,
            prop: (),
        });
        // the freed slot is reused
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(b).map(|r| r.src), Some(2));
    }
}
