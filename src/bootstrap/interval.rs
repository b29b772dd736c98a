//! Sorted interval index.
//!
//! Intervals are closed (`start ..= end`) and may overlap. When several
//! intervals contain a point the narrowest one wins; equal widths fall back to
//! the lowest start, then to load order. Lookups never depend on hash order.

use std::ops::Sub;

/// One closed interval pointing at a slot in the owner's value store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval<K> {
    pub start: K,
    pub end: K,
    pub slot: usize,
}

impl<K> Interval<K>
where
    K: Copy + Ord + Sub<Output = K>,
{
    /// Build an interval, swapping reversed bounds
    pub fn new(a: K, b: K, slot: usize) -> Self {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        Self { start, end, slot }
    }

    pub fn contains(&self, point: K) -> bool {
        self.start <= point && point <= self.end
    }

    fn span(&self) -> K {
        self.end - self.start
    }

    fn rank(&self) -> (K, K, usize) {
        (self.span(), self.start, self.slot)
    }
}

/// Immutable index over a set of intervals
#[derive(Debug, Clone)]
pub struct IntervalIndex<K> {
    entries: Vec<Interval<K>>,
    // running maximum of `end` over entries[..=i]
    max_end: Vec<K>,
}

impl<K> IntervalIndex<K>
where
    K: Copy + Ord + Sub<Output = K>,
{
    pub fn new(mut entries: Vec<Interval<K>>) -> Self {
        entries.sort_by(|a, b| (a.start, a.end, a.slot).cmp(&(b.start, b.end, b.slot)));

        let mut max_end = Vec::with_capacity(entries.len());
        let mut running: Option<K> = None;
        for entry in &entries {
            let next = match running {
                Some(current) if current >= entry.end => current,
                _ => entry.end,
            };
            max_end.push(next);
            running = Some(next);
        }

        Self { entries, max_end }
    }

    /// Slot of the best interval containing `point`
    pub fn lookup(&self, point: K) -> Option<usize> {
        let upper = self.entries.partition_point(|e| e.start <= point);
        let mut best: Option<&Interval<K>> = None;

        for i in (0..upper).rev() {
            if self.max_end[i] < point {
                break;
            }
            let entry = &self.entries[i];
            if entry.end < point {
                continue;
            }
            best = match best {
                Some(current) if current.rank() <= entry.rank() => Some(current),
                _ => Some(entry),
            };
        }

        best.map(|e| e.slot)
    }

    /// Intervals in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &Interval<K>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K> Default for IntervalIndex<K>
where
    K: Copy + Ord + Sub<Output = K>,
{
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
