use std::{cmp::Ordering, collections::BinaryHeap};

/// Binary min-heap of `(element, priority)` pairs.
///
/// There is no decrease-key: callers push a fresh entry whenever a priority
/// improves and skip stale entries when they come out. Entries with equal
/// priority come out in insertion order.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    heap: BinaryHeap<Entry<T>>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    priority: f64,
    seq: u64,
    element: T,
}

// Implement Ord for Entry to use in BinaryHeap
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by priority (reversed from standard Rust BinaryHeap),
        // then FIFO among equal priorities
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            next_seq: 0,
        }
    }

    pub fn insert(&mut self, element: T, priority: f64) {
        self.heap.push(Entry {
            priority,
            seq: self.next_seq,
            element,
        });
        self.next_seq += 1;
    }

    /// Removes the entry with the smallest priority
    pub fn extract_min(&mut self) -> Option<(T, f64)> {
        self.heap
            .pop()
            .map(|entry| (entry.element, entry.priority))
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_in_priority_order() {
        let mut heap = MinHeap::new();
        for (element, priority) in [('c', 3.0), ('a', 1.0), ('d', 4.5), ('b', 2.0), ('z', 0.0)] {
            heap.insert(element, priority);
        }

        let mut order = Vec::new();
        while let Some((element, _)) = heap.extract_min() {
            order.push(element);
        }
        assert_eq!(order, vec!['z', 'a', 'b', 'c', 'd']);
        assert!(heap.is_empty());
    }

    #[test]
    fn equal_priorities_are_fifo() {
        let mut heap = MinHeap::new();
        heap.insert("first", 1.0);
        heap.insert("second", 1.0);
        heap.insert("zero", 0.0);
        heap.insert("third", 1.0);

        assert_eq!(heap.extract_min(), Some(("zero", 0.0)));
        assert_eq!(heap.extract_min(), Some(("first", 1.0)));
        assert_eq!(heap.extract_min(), Some(("second", 1.0)));
        assert_eq!(heap.extract_min(), Some(("third", 1.0)));
        assert_eq!(heap.extract_min(), None);
    }

    #[test]
    fn duplicate_elements_are_kept() {
        let mut heap = MinHeap::new();
        heap.insert(7, 5.0);
        heap.insert(7, 2.0);
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.extract_min(), Some((7, 2.0)));
        assert_eq!(heap.extract_min(), Some((7, 5.0)));
    }
}
