//! Binary min-heap parameterized by an injected comparator.

use std::cmp::Ordering;

/// Three-way ordering used by [`MinHeap`].
///
/// `Ordering::Less` means `a` is strictly more urgent than `b` and must
/// surface first. Implementations should be a strict weak ordering; anything
/// else produces an unspecified (but memory-safe, non-panicking) pop order.
pub trait Compare<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Comparator that defers to `T: Ord` (smallest value first).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Compare<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Array-backed binary min-heap.
///
/// For every non-root index `i`, `compare(data[parent(i)], data[i])` is never
/// `Greater`. The comparator is the sole ordering authority.
#[derive(Debug, Clone)]
pub struct MinHeap<T, C> {
    data: Vec<T>,
    compare: C,
}

impl<T: Ord> Default for MinHeap<T, NaturalOrder> {
    fn default() -> Self {
        Self::new(NaturalOrder)
    }
}

impl<T, C: Compare<T>> MinHeap<T, C> {
    /// Create an empty heap ordered by `compare`.
    pub fn new(compare: C) -> Self {
        Self {
            data: Vec::new(),
            compare,
        }
    }

    /// Create an empty heap with room for `capacity` items.
    pub fn with_capacity(capacity: usize, compare: C) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            compare,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The most urgent item, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Insert an item. O(log n).
    pub fn push(&mut self, item: T) {
        self.data.push(item);
        self.sift_up(self.data.len() - 1);
    }

    /// Remove and return the most urgent item. O(log n).
    pub fn pop(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let top = self.data.swap_remove(0);
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Drain the heap into a vector in pop order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.data.len());
        while let Some(item) = self.pop() {
            sorted.push(item);
        }
        sorted
    }

    /// Items in storage (heap) order, not pop order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.compare.compare(&self.data[i], &self.data[parent]) == Ordering::Less {
                self.data.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;

            // Right only wins when strictly smaller than left.
            if left < len
                && self.compare.compare(&self.data[left], &self.data[smallest]) == Ordering::Less
            {
                smallest = left;
            }
            if right < len
                && self.compare.compare(&self.data[right], &self.data[smallest]) == Ordering::Less
            {
                smallest = right;
            }

            if smallest == i {
                break;
            }
            self.data.swap(i, smallest);
            i = smallest;
        }
    }
}
