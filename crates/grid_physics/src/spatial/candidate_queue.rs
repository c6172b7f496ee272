//! Priority queue of collision candidates
//!
//! Snap resolves the deepest contact first, so candidates are ordered by the
//! overlap area of their bounding boxes. Ties fall back to id order to keep
//! resolution deterministic across runs.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::physics::id::Id;
use crate::spatial::Body;

/// A body that overlaps the query profile
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// The overlapping body
    pub body: &'a Body,
    /// Bounding-box overlap area with the query profile
    pub area: f64,
}

impl Candidate<'_> {
    /// Id of the candidate body
    pub fn id(&self) -> Id {
        self.body.id
    }
}

impl PartialEq for Candidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate<'_> {}

impl PartialOrd for Candidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // max-heap: larger area first, then smaller id first
        self.area
            .total_cmp(&other.area)
            .then_with(|| other.body.id.cmp(&self.body.id))
    }
}

/// Max-heap of candidates keyed by overlap area
#[derive(Debug, Default)]
pub struct CandidateQueue<'a> {
    heap: BinaryHeap<Candidate<'a>>,
}

impl<'a> CandidateQueue<'a> {
    /// Empty queue
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    /// Add a candidate
    pub fn push(&mut self, body: &'a Body, area: f64) {
        self.heap.push(Candidate { body, area });
    }

    /// Remove the deepest candidate
    pub fn pop(&mut self) -> Option<Candidate<'a>> {
        self.heap.pop()
    }

    /// Deepest candidate without removing it
    pub fn peek(&self) -> Option<&Candidate<'a>> {
        self.heap.peek()
    }

    /// Number of queued candidates
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Candidate ids, deepest first
    pub fn ids(&self) -> Vec<Id> {
        let mut sorted: Vec<&Candidate<'a>> = self.heap.iter().collect();
        sorted.sort_by(|a, b| b.cmp(a));
        sorted.into_iter().map(Candidate::id).collect()
    }
}

impl<'a> Iterator for CandidateQueue<'a> {
    type Item = Candidate<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

impl<'a> Extend<(&'a Body, f64)> for CandidateQueue<'a> {
    fn extend<T: IntoIterator<Item = (&'a Body, f64)>>(&mut self, iter: T) {
        for (body, area) in iter {
            self.push(body, area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::physics::collision::Profile;
    use crate::physics::id::{Attributes, Space};

    fn wall(n: u32) -> Body {
        Body::new(
            Id::new(Space::Wall, n),
            Profile::rect(Vec2::zeros(), Vec2::new(1.0, 1.0)),
            Attributes::SOLID,
        )
    }

    #[test]
    fn test_pops_largest_area_first() {
        let (a, b, c) = (wall(1), wall(2), wall(3));
        let mut queue = CandidateQueue::new();
        queue.push(&a, 0.1);
        queue.push(&b, 0.9);
        queue.push(&c, 0.5);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.ids(), vec![b.id, c.id, a.id]);
        let order: Vec<Id> = queue.map(|candidate| candidate.id()).collect();
        assert_eq!(order, vec![b.id, c.id, a.id]);
    }

    #[test]
    fn test_ties_break_by_id() {
        let (a, b) = (wall(1), wall(2));
        let mut queue = CandidateQueue::new();
        queue.extend([(&b, 0.5), (&a, 0.5)]);
        assert_eq!(queue.pop().map(|c| c.id()), Some(a.id));
        assert_eq!(queue.pop().map(|c| c.id()), Some(b.id));
        assert!(queue.is_empty());
    }
}
