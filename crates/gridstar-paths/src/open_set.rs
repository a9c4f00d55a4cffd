//! The private frontier of one search direction.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use gridstar_core::Point;

/// A frontier entry: a position with the cost it was pushed at and its
/// estimated total cost `f = g + h`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeRef {
    pub(crate) pos: Point,
    pub(crate) g: f64,
    pub(crate) f: f64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first.
        other.f.total_cmp(&self.f)
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeRef {}

/// Min-priority queue on `f`.
///
/// Entries with equal `f` come out in whatever order the heap yields them.
/// That order is not part of any contract: routes of equal length may
/// differ between runs.
///
/// A position may sit in the queue several times after its cost improved;
/// the search discards the outdated copies when they surface.
#[derive(Debug, Default)]
pub(crate) struct OpenSet {
    heap: BinaryHeap<NodeRef>,
}

impl OpenSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn push(&mut self, node: NodeRef) {
        self.heap.push(node);
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<NodeRef> {
        self.heap.pop()
    }

    /// Lowest `f` in the queue, outdated entries included.
    #[inline]
    pub(crate) fn peek_f(&self) -> Option<f64> {
        self.heap.peek().map(|n| n.f)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }
}
