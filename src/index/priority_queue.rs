//! Binary min-heap with stable, generation-checked handles.
//!
//! Each entry lives in a heap position that changes as the heap is
//! rebalanced; the handle instead names a slot whose `pos` field follows the
//! entry around. Releasing a slot bumps its generation, so a handle kept
//! past `erase`/`pop`/`clear` is reported invalid instead of silently
//! pointing at whichever entry reuses the slot.
//!
//! Ties on the key are broken by insertion order (earlier first). `update`
//! keeps the entry's original position in that order.

use std::cmp::Ordering;

const VACANT: usize = usize::MAX;

/// Handle to one queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueHandle {
    slot: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    pos: usize,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Entry<K, P> {
    key: K,
    payload: P,
    slot: u32,
    seq: u64,
}

/// Min-priority queue over keys `K` carrying payloads `P`.
#[derive(Debug, Clone)]
pub struct IndexedMinQueue<K, P> {
    heap: Vec<Entry<K, P>>,
    slots: Vec<Slot>,
    free_slots: Vec<u32>,
    next_seq: u64,
}

impl<K, P> Default for IndexedMinQueue<K, P> {
    fn default() -> Self {
        Self {
            heap: Vec::new(),
            slots: Vec::new(),
            free_slots: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<K, P> IndexedMinQueue<K, P> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn position(&self, handle: QueueHandle) -> Option<usize> {
        let slot = self.slots.get(handle.slot as usize)?;
        (slot.generation == handle.generation && slot.pos != VACANT).then_some(slot.pos)
    }

    /// `true` while the entry behind `handle` is still queued.
    pub fn is_valid(&self, handle: QueueHandle) -> bool {
        self.position(handle).is_some()
    }

    pub fn key(&self, handle: QueueHandle) -> Option<&K> {
        self.position(handle).map(|pos| &self.heap[pos].key)
    }

    pub fn payload(&self, handle: QueueHandle) -> Option<&P> {
        self.position(handle).map(|pos| &self.heap[pos].payload)
    }

    /// Replace the payload without touching the key or the heap order.
    pub fn set_payload(&mut self, handle: QueueHandle, payload: P) -> bool {
        match self.position(handle) {
            Some(pos) => {
                self.heap[pos].payload = payload;
                true
            }
            None => false,
        }
    }

    /// Smallest entry.
    pub fn front(&self) -> Option<(&K, &P)> {
        self.heap.first().map(|e| (&e.key, &e.payload))
    }

    pub fn front_handle(&self) -> Option<QueueHandle> {
        self.heap.first().map(|e| QueueHandle {
            slot: e.slot,
            generation: self.slots[e.slot as usize].generation,
        })
    }

    /// All entries in heap order (not sorted).
    pub fn iter(&self) -> impl Iterator<Item = (QueueHandle, &K, &P)> {
        self.heap.iter().map(|e| {
            let handle = QueueHandle {
                slot: e.slot,
                generation: self.slots[e.slot as usize].generation,
            };
            (handle, &e.key, &e.payload)
        })
    }

    /// Drop every entry. Outstanding handles become invalid.
    pub fn clear(&mut self) {
        for entry in self.heap.drain(..) {
            let slot = &mut self.slots[entry.slot as usize];
            slot.pos = VACANT;
            slot.generation = slot.generation.wrapping_add(1);
            self.free_slots.push(entry.slot);
        }
    }

    fn alloc_slot(&mut self, pos: usize) -> QueueHandle {
        if let Some(slot) = self.free_slots.pop() {
            let s = &mut self.slots[slot as usize];
            s.pos = pos;
            QueueHandle { slot, generation: s.generation }
        } else {
            let slot = self.slots.len() as u32;
            self.slots.push(Slot { pos, generation: 0 });
            QueueHandle { slot, generation: 0 }
        }
    }

    fn release_slot(&mut self, slot: u32) {
        let s = &mut self.slots[slot as usize];
        s.pos = VACANT;
        s.generation = s.generation.wrapping_add(1);
        self.free_slots.push(slot);
    }

    fn push_entry(&mut self, key: K, payload: P) -> QueueHandle {
        let pos = self.heap.len();
        let handle = self.alloc_slot(pos);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { key, payload, slot: handle.slot, seq });
        handle
    }

    #[inline]
    fn swap_entries(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slots[self.heap[a].slot as usize].pos = a;
        self.slots[self.heap[b].slot as usize].pos = b;
    }
}

impl<K: PartialOrd, P> IndexedMinQueue<K, P> {
    #[inline]
    fn precedes(a: &Entry<K, P>, b: &Entry<K, P>) -> bool {
        match a.key.partial_cmp(&b.key) {
            Some(Ordering::Less) => true,
            Some(Ordering::Greater) => false,
            _ => a.seq < b.seq,
        }
    }

    pub fn insert(&mut self, key: K, payload: P) -> QueueHandle {
        let handle = self.push_entry(key, payload);
        self.sift_up(self.heap.len() - 1);
        handle
    }

    /// Remove the entry behind `handle`. Returns `false` for a stale handle.
    pub fn erase(&mut self, handle: QueueHandle) -> bool {
        match self.position(handle) {
            Some(pos) => {
                self.remove_at(pos);
                true
            }
            None => false,
        }
    }

    /// Remove and return the smallest entry.
    pub fn pop(&mut self) -> Option<(K, P)> {
        if self.heap.is_empty() {
            return None;
        }
        let entry = self.remove_at(0);
        Some((entry.key, entry.payload))
    }

    /// Change the key of an entry and restore heap order.
    pub fn update(&mut self, handle: QueueHandle, key: K) -> bool {
        match self.position(handle) {
            Some(pos) => {
                self.heap[pos].key = key;
                self.restore(pos);
                true
            }
            None => false,
        }
    }

    /// Change key and payload at once.
    pub fn update_with(&mut self, handle: QueueHandle, key: K, payload: P) -> bool {
        match self.position(handle) {
            Some(pos) => {
                self.heap[pos].payload = payload;
                self.heap[pos].key = key;
                self.restore(pos);
                true
            }
            None => false,
        }
    }

    /// Replace the whole content with `items` in O(n).
    ///
    /// Returns the handles in the order of `items`. Handles issued before
    /// the call are invalidated.
    pub fn build(&mut self, items: impl IntoIterator<Item = (K, P)>) -> Vec<QueueHandle> {
        self.clear();
        let handles: Vec<QueueHandle> = items
            .into_iter()
            .map(|(key, payload)| self.push_entry(key, payload))
            .collect();
        for pos in (0..self.heap.len() / 2).rev() {
            self.sift_down(pos);
        }
        handles
    }

    /// Verify heap order and slot back-references.
    pub fn check_heap(&self) -> bool {
        for (pos, entry) in self.heap.iter().enumerate() {
            if self.slots[entry.slot as usize].pos != pos {
                return false;
            }
            if pos > 0 && Self::precedes(entry, &self.heap[(pos - 1) / 2]) {
                return false;
            }
        }
        true
    }

    fn remove_at(&mut self, pos: usize) -> Entry<K, P> {
        let entry = self.heap.swap_remove(pos);
        if pos < self.heap.len() {
            self.slots[self.heap[pos].slot as usize].pos = pos;
            self.restore(pos);
        }
        self.release_slot(entry.slot);
        entry
    }

    fn restore(&mut self, pos: usize) {
        let pos = self.sift_up(pos);
        self.sift_down(pos);
    }

    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if Self::precedes(&self.heap[pos], &self.heap[parent]) {
                self.swap_entries(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
        pos
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut best = left;
            if right < len && Self::precedes(&self.heap[right], &self.heap[left]) {
                best = right;
            }
            if Self::precedes(&self.heap[best], &self.heap[pos]) {
                self.swap_entries(pos, best);
                pos = best;
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<K: PartialOrd + Copy, P: Copy>(q: &mut IndexedMinQueue<K, P>) -> Vec<(K, P)> {
        let mut out = Vec::new();
        while let Some(e) = q.pop() {
            out.push(e);
        }
        out
    }

    #[test]
    fn test_front_is_minimum() {
        let mut q = IndexedMinQueue::new();
        q.insert(5.0f32, 'a');
        q.insert(1.0, 'b');
        q.insert(3.0, 'c');
        assert_eq!(q.front(), Some((&1.0, &'b')));
        assert_eq!(q.len(), 3);
        assert_eq!(drain(&mut q), vec![(1.0, 'b'), (3.0, 'c'), (5.0, 'a')]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_ties_follow_insertion_order() {
        let mut q = IndexedMinQueue::new();
        for p in 0..6u32 {
            q.insert(7i32, p);
        }
        let order: Vec<u32> = drain(&mut q).into_iter().map(|(_, p)| p).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_erase_middle_and_stale_handle() {
        let mut q = IndexedMinQueue::new();
        let a = q.insert(1, "a");
        let b = q.insert(2, "b");
        let c = q.insert(3, "c");
        assert!(q.erase(b));
        assert!(!q.is_valid(b));
        assert!(!q.erase(b));
        assert!(q.check_heap());

        // The freed slot is reused, but the old handle stays dead.
        let d = q.insert(0, "d");
        assert!(!q.is_valid(b));
        assert_eq!(q.key(d), Some(&0));
        assert_eq!(q.payload(a), Some(&"a"));
        assert_eq!(q.payload(c), Some(&"c"));
        assert_eq!(drain(&mut q), vec![(0, "d"), (1, "a"), (3, "c")]);
    }

    #[test]
    fn test_update_moves_entry_both_ways() {
        let mut q = IndexedMinQueue::new();
        let a = q.insert(10, 'a');
        let b = q.insert(20, 'b');
        let c = q.insert(30, 'c');

        assert!(q.update(c, 5));
        assert_eq!(q.front(), Some((&5, &'c')));
        assert!(q.update(c, 25));
        assert_eq!(q.front(), Some((&10, &'a')));
        assert!(q.update_with(a, 40, 'z'));
        assert!(q.check_heap());
        assert_eq!(q.key(b), Some(&20));
        assert_eq!(drain(&mut q), vec![(20, 'b'), (25, 'c'), (40, 'z')]);
    }

    #[test]
    fn test_set_payload_keeps_key() {
        let mut q = IndexedMinQueue::new();
        let h = q.insert(4u8, (1usize, 2usize));
        assert!(q.set_payload(h, (2, 1)));
        assert_eq!(q.front(), Some((&4, &(2, 1))));
    }

    #[test]
    fn test_build_heapifies_and_returns_handles_in_order() {
        let mut q = IndexedMinQueue::new();
        let old = q.insert(0, 99);
        let items = vec![(9, 0), (4, 1), (7, 2), (1, 3), (8, 4), (2, 5)];
        let handles = q.build(items.clone());
        assert!(!q.is_valid(old));
        assert_eq!(handles.len(), items.len());
        assert!(q.check_heap());
        for (h, (k, p)) in handles.iter().zip(&items) {
            assert_eq!(q.key(*h), Some(k));
            assert_eq!(q.payload(*h), Some(p));
        }
        let keys: Vec<i32> = drain(&mut q).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![1, 2, 4, 7, 8, 9]);
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut q = IndexedMinQueue::new();
        let h = q.insert(1, ());
        q.clear();
        assert!(q.is_empty());
        assert!(!q.is_valid(h));
        assert_eq!(q.front(), None);
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_front_handle_tracks_minimum() {
        let mut q = IndexedMinQueue::new();
        q.insert(3, 'x');
        let low = q.insert(1, 'y');
        assert_eq!(q.front_handle(), Some(low));
        q.erase(low);
        assert_eq!(q.front(), Some((&3, &'x')));
    }
}
