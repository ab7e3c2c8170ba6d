//! Stable priority queue built on [`MinHeap`].

use std::cmp::Ordering;

use crate::heap::{Compare, MinHeap};

/// Lower values are more urgent. Negative priorities are allowed.
pub type Priority = i64;

/// Heap record wrapping a queued item with its ordering keys.
#[derive(Debug, Clone)]
struct HeapEntry<T> {
    item: T,
    priority: Priority,
    sequence: u64,
}

/// Orders entries by priority, then by arrival sequence (FIFO within a tier).
#[derive(Debug, Clone, Copy, Default)]
struct EntryOrder;

impl<T> Compare<HeapEntry<T>> for EntryOrder {
    fn compare(&self, a: &HeapEntry<T>, b: &HeapEntry<T>) -> Ordering {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.sequence.cmp(&b.sequence))
    }
}

/// Min-priority queue with insertion-order tie-breaking.
///
/// Every enqueue stamps the item with the next value of a monotonically
/// increasing sequence counter. The counter survives [`PriorityQueue::clear`],
/// so sequence numbers are never reused within one queue.
#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    heap: MinHeap<HeapEntry<T>, EntryOrder>,
    next_sequence: u64,
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PriorityQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            heap: MinHeap::new(EntryOrder),
            next_sequence: 0,
        }
    }

    /// Add an item at the back of its priority tier.
    pub fn enqueue(&mut self, item: T, priority: Priority) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(HeapEntry {
            item,
            priority,
            sequence,
        });
    }

    /// Remove the most urgent item (lowest priority, earliest arrival).
    pub fn dequeue(&mut self) -> Option<T> {
        self.heap.pop().map(|entry| entry.item)
    }

    pub fn peek(&self) -> Option<&T> {
        self.heap.peek().map(|entry| &entry.item)
    }

    /// Priority of the item [`PriorityQueue::peek`] would return.
    pub fn peek_priority(&self) -> Option<Priority> {
        self.heap.peek().map(|entry| entry.priority)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every queued item. The sequence counter is kept.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Sequence number the next enqueue will receive.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Iterate over queued items in storage order (not dequeue order).
    pub fn iter_unordered(&self) -> impl Iterator<Item = &T> {
        self.heap.as_slice().iter().map(|entry| &entry.item)
    }
}

impl<T: Clone> PriorityQueue<T> {
    /// All queued items in dequeue order, leaving the queue untouched.
    ///
    /// Drains a clone of the heap, so this is O(n log n); meant for display.
    pub fn to_vec(&self) -> Vec<T> {
        self.heap
            .clone()
            .into_sorted_vec()
            .into_iter()
            .map(|entry| entry.item)
            .collect()
    }
}
