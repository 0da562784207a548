//! Indexable priority structures.
//!
//! The graph keeps every weighted edge direction in an [`IndexedMinQueue`]
//! and remembers the [`QueueHandle`] of each entry, so an edge's weight can
//! be changed or dropped without searching the heap.

pub mod priority_queue;

pub use priority_queue::{IndexedMinQueue, QueueHandle};
