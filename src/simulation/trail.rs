//! Bounded position history for drawing orbit trails.
//!
//! `Trail` is a fixed-capacity ring buffer: once full, each new sample
//! overwrites the oldest one in place. Reads always come out oldest first.

use std::iter::{Chain, FusedIterator};
use std::slice::Iter;

use super::states::{NVec3, System};

/// Storage reserved up front; longer trails grow as samples arrive
const PREALLOC_POINTS: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    points: Vec<NVec3>, // storage, grows up to `capacity` then stays fixed
    capacity: usize, // max samples kept
    head: usize, // index of the oldest sample once full
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity.min(PREALLOC_POINTS)),
            capacity,
            head: 0,
        }
    }

    /// Append a copy of `p`, dropping the oldest sample if the trail is full.
    /// A zero-capacity trail records nothing.
    pub fn push(&mut self, p: NVec3) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() < self.capacity {
            self.points.push(p);
        } else {
            self.points[self.head] = p;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.points.len() == self.capacity
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<&NVec3> {
        if self.points.is_empty() {
            return None;
        }
        let idx = (self.head + self.points.len() - 1) % self.points.len();
        self.points.get(idx)
    }

    /// Oldest sample still kept
    pub fn oldest(&self) -> Option<&NVec3> {
        self.points.get(self.head)
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.head = 0;
    }

    /// Samples in chronological order. Calling again restarts from the oldest.
    pub fn iter(&self) -> TrailIter<'_> {
        let (newer, older) = self.points.split_at(self.head);
        TrailIter {
            inner: older.iter().chain(newer.iter()),
            remaining: self.points.len(),
        }
    }

    pub fn to_vec(&self) -> Vec<NVec3> {
        self.iter().copied().collect()
    }
}

impl<'a> IntoIterator for &'a Trail {
    type Item = &'a NVec3;
    type IntoIter = TrailIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Oldest-to-newest view over a `Trail`
#[derive(Debug, Clone)]
pub struct TrailIter<'a> {
    inner: Chain<Iter<'a, NVec3>, Iter<'a, NVec3>>,
    remaining: usize,
}

impl<'a> Iterator for TrailIter<'a> {
    type Item = &'a NVec3;

    fn next(&mut self) -> Option<Self::Item> {
        let p = self.inner.next()?;
        self.remaining -= 1;
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for TrailIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let p = self.inner.next_back()?;
        self.remaining -= 1;
        Some(p)
    }
}

impl ExactSizeIterator for TrailIter<'_> {}

impl FusedIterator for TrailIter<'_> {}

/// Append the current position of every dynamic body and satellite to its trail.
/// Called once per physics tick, after satellites have been placed.
pub fn record_trails(sys: &mut System) {
    for b in sys.bodies.iter_mut() {
        b.trail.push(b.x);
    }
    for s in sys.satellites.iter_mut() {
        s.trail.push(s.x);
    }
}
