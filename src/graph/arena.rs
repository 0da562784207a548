//! Slot storage behind the graph: node slots with tombstones and an edge
//! arena holding one record per undirected edge.

use std::collections::BTreeSet;

use hashbrown::HashMap;

use crate::index::QueueHandle;
use crate::model::NodeId;

// ============================================================================
// Edge arena
// ============================================================================

/// Index of an edge record in the [`EdgeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EdgeIdx(usize);

/// Both directions of one undirected edge.
///
/// `data[i]` and `handles[i]` belong to the direction `ends[i] -> ends[1 - i]`.
/// The reverse direction of any half is therefore the other half of the same
/// record.
#[derive(Debug, Clone)]
pub(crate) struct EdgeEntry<D> {
    pub(crate) ends: [NodeId; 2],
    pub(crate) data: [D; 2],
    pub(crate) handles: [Option<QueueHandle>; 2],
}

impl<D> EdgeEntry<D> {
    pub(crate) fn new(source: NodeId, target: NodeId, forward: D, backward: D) -> Self {
        Self {
            ends: [source, target],
            data: [forward, backward],
            handles: [None, None],
        }
    }

    /// Half whose source is `source`.
    #[inline]
    pub(crate) fn side_of(&self, source: NodeId) -> usize {
        if self.ends[0] == source { 0 } else { 1 }
    }

    /// Half whose source is the larger id.
    #[inline]
    pub(crate) fn upper_side(&self) -> usize {
        if self.ends[0] > self.ends[1] { 0 } else { 1 }
    }

    /// `(source, target)` of half `side`.
    #[inline]
    pub(crate) fn pair(&self, side: usize) -> (NodeId, NodeId) {
        (self.ends[side], self.ends[1 - side])
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EdgeArena<D> {
    entries: Vec<Option<EdgeEntry<D>>>,
    free: Vec<usize>,
    live: usize,
}

impl<D> Default for EdgeArena<D> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }
}

impl<D> EdgeArena<D> {
    pub(crate) fn insert(&mut self, entry: EdgeEntry<D>) -> EdgeIdx {
        self.live += 1;
        if let Some(i) = self.free.pop() {
            self.entries[i] = Some(entry);
            EdgeIdx(i)
        } else {
            self.entries.push(Some(entry));
            EdgeIdx(self.entries.len() - 1)
        }
    }

    pub(crate) fn remove(&mut self, idx: EdgeIdx) -> Option<EdgeEntry<D>> {
        let entry = self.entries.get_mut(idx.0)?.take()?;
        self.free.push(idx.0);
        self.live -= 1;
        Some(entry)
    }

    #[inline]
    pub(crate) fn get(&self, idx: EdgeIdx) -> Option<&EdgeEntry<D>> {
        self.entries.get(idx.0)?.as_ref()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, idx: EdgeIdx) -> Option<&mut EdgeEntry<D>> {
        self.entries.get_mut(idx.0)?.as_mut()
    }

    /// Live records in arena order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (EdgeIdx, &EdgeEntry<D>)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (EdgeIdx(i), e)))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut EdgeEntry<D>> {
        self.entries.iter_mut().filter_map(Option::as_mut)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.free.clear();
        self.live = 0;
    }
}

// ============================================================================
// Node arena
// ============================================================================

#[derive(Debug, Clone)]
pub(crate) struct NodeSlot<N> {
    pub(crate) data: N,
    /// neighbour id → edge record
    pub(crate) adjacency: HashMap<NodeId, EdgeIdx>,
    live: bool,
    generation: u32,
}

/// Dense node slots. Removed slots are tombstoned and reused.
///
/// `range` is the tight `(first, last)` span of live slots, so every slot
/// outside it is free.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<N> {
    slots: Vec<NodeSlot<N>>,
    free: BTreeSet<usize>,
    range: Option<(usize, usize)>,
    live: usize,
}

impl<N> Default for NodeArena<N> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: BTreeSet::new(),
            range: None,
            live: 0,
        }
    }
}

impl<N: Default> NodeArena<N> {
    /// Place `data` in a free slot, preferring slots next to the live range.
    pub(crate) fn insert(&mut self, data: N) -> NodeId {
        let reuse = match self.range {
            None => self.free.first().copied(),
            Some((first, _)) if first > 0 => Some(first - 1),
            Some((_, last)) if last + 1 < self.slots.len() => Some(last + 1),
            Some(_) => self.free.first().copied(),
        };

        let idx = match reuse {
            Some(idx) => {
                self.free.remove(&idx);
                let slot = &mut self.slots[idx];
                slot.data = data;
                slot.live = true;
                idx
            }
            None => {
                self.slots.push(NodeSlot {
                    data,
                    adjacency: HashMap::new(),
                    live: true,
                    generation: 0,
                });
                self.slots.len() - 1
            }
        };

        self.range = Some(match self.range {
            None => (idx, idx),
            Some((first, last)) => (first.min(idx), last.max(idx)),
        });
        self.live += 1;
        NodeId(idx)
    }

    /// Tombstone a live slot and hand back its data.
    ///
    /// The caller must have removed every incident edge first.
    pub(crate) fn tombstone(&mut self, id: NodeId) -> Option<N> {
        let idx = id.index();
        let slot = self.slots.get_mut(idx).filter(|s| s.live)?;
        debug_assert!(slot.adjacency.is_empty(), "tombstoning node {id} with edges");
        slot.live = false;
        slot.generation = slot.generation.wrapping_add(1);
        slot.adjacency.clear();
        let data = std::mem::take(&mut slot.data);

        self.free.insert(idx);
        self.live -= 1;
        self.shrink_range(idx);
        Some(data)
    }

    /// Tombstone every slot. Slots and generations are kept.
    pub(crate) fn clear(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            slot.adjacency.clear();
            if slot.live {
                slot.live = false;
                slot.generation = slot.generation.wrapping_add(1);
                slot.data = N::default();
                self.free.insert(idx);
            }
        }
        self.range = None;
        self.live = 0;
    }
}

impl<N> NodeArena<N> {
    fn shrink_range(&mut self, removed: usize) {
        let Some((first, last)) = self.range else {
            return;
        };
        if self.live == 0 {
            self.range = None;
            return;
        }
        let mut first = first;
        let mut last = last;
        if removed == first {
            first = (first + 1..=last).find(|&i| self.slots[i].live).unwrap_or(last);
        }
        if removed == last {
            last = (first..last).rev().find(|&i| self.slots[i].live).unwrap_or(first);
        }
        self.range = Some((first, last));
    }

    #[inline]
    pub(crate) fn is_live(&self, id: NodeId) -> bool {
        self.slots.get(id.index()).is_some_and(|s| s.live)
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&NodeSlot<N>> {
        self.slots.get(id.index()).filter(|s| s.live)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeSlot<N>> {
        self.slots.get_mut(id.index()).filter(|s| s.live)
    }

    pub(crate) fn generation(&self, id: NodeId) -> Option<u32> {
        self.get(id).map(|s| s.generation)
    }

    #[inline]
    pub(crate) fn range(&self) -> Option<(usize, usize)> {
        self.range
    }

    #[inline]
    pub(crate) fn live_count(&self) -> usize {
        self.live
    }

    /// Live slots in id order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeId, &NodeSlot<N>)> {
        let span = match self.range {
            Some((first, last)) => &self.slots[first..=last],
            None => &self.slots[..0],
        };
        let offset = self.range.map_or(0, |(first, _)| first);
        span.iter()
            .enumerate()
            .filter(|(_, s)| s.live)
            .map(move |(i, s)| (NodeId(offset + i), s))
    }

    /// Bookkeeping check: tight range, live count and free set agree with
    /// the slots.
    pub(crate) fn is_consistent(&self) -> bool {
        let live: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.live)
            .map(|(i, _)| i)
            .collect();
        let expected_range = live.first().zip(live.last()).map(|(&f, &l)| (f, l));
        let free_ok = self.free.len() + live.len() == self.slots.len()
            && self.free.iter().all(|&i| !self.slots[i].live);
        expected_range == self.range && live.len() == self.live && free_ok
    }
}
