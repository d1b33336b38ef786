//! The free-time pool.
//!
//! The schedule's single shared mutable resource: an ordered set of
//! disjoint hour ranges representing unclaimed time. Every successful
//! placement carves its hours out of the pool; a claim in the interior
//! of a range splits it in two, a claim touching an edge shrinks it.
//! Mutation is always local — the pool is never rebuilt wholesale.

use crate::models::HourWindow;

/// Pool of unclaimed time ranges, sorted and disjoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeTimePool {
    ranges: Vec<HourWindow>,
}

impl FreeTimePool {
    /// Creates a pool covering `[0, total_hours)`.
    pub fn new(total_hours: i64) -> Self {
        let ranges = if total_hours > 0 {
            vec![HourWindow::new(0, total_hours)]
        } else {
            Vec::new()
        };
        Self { ranges }
    }

    /// Creates a pool from explicit ranges (must be sorted and disjoint).
    #[cfg(test)]
    pub fn from_ranges(ranges: Vec<HourWindow>) -> Self {
        let pool = Self { ranges };
        debug_assert!(pool.is_consistent());
        pool
    }

    /// Current free ranges, sorted by start.
    pub fn ranges(&self) -> &[HourWindow] {
        &self.ranges
    }

    /// Total unclaimed hours.
    pub fn total_free(&self) -> i64 {
        self.ranges.iter().map(HourWindow::len).sum()
    }

    /// Free sub-ranges reachable from the given feasible windows.
    ///
    /// Returns the intersection of every feasible window with every free
    /// range, in timeline order. These are the placement candidates for
    /// one goal-instance.
    pub fn candidates(&self, windows: &[HourWindow]) -> Vec<HourWindow> {
        let mut found = Vec::new();
        for window in windows {
            for range in &self.ranges {
                if range.start >= window.end {
                    break;
                }
                if let Some(overlap) = range.intersect(window) {
                    found.push(overlap);
                }
            }
        }
        found.sort();
        found
    }

    /// Removes `claim` from the pool.
    ///
    /// The claim must lie within a single free range — callers claim
    /// sub-ranges of what [`candidates`](Self::candidates) returned.
    pub fn claim(&mut self, claim: HourWindow) {
        debug_assert!(!claim.is_empty());
        let idx = self
            .ranges
            .iter()
            .position(|r| r.start <= claim.start && claim.end <= r.end)
            .expect("claim must come from a candidate sub-range of the pool");

        let range = self.ranges[idx];
        let left = HourWindow::new(range.start, claim.start);
        let right = HourWindow::new(claim.end, range.end);

        match (left.is_empty(), right.is_empty()) {
            (true, true) => {
                self.ranges.remove(idx);
            }
            (false, true) => self.ranges[idx] = left,
            (true, false) => self.ranges[idx] = right,
            (false, false) => {
                // Interior claim: split the range in two
                self.ranges[idx] = left;
                self.ranges.insert(idx + 1, right);
            }
        }
        debug_assert!(self.is_consistent());
    }

    /// Whether ranges are sorted, disjoint, and non-empty.
    fn is_consistent(&self) -> bool {
        self.ranges.windows(2).all(|w| w[0].end <= w[1].start)
            && self.ranges.iter().all(|r| !r.is_empty())
    }
}
