//! Goal-instance model.
//!
//! One concrete occurrence of a goal after recurrence expansion.
//! Instances are created by the expander, consumed by the allocator,
//! and never mutated after creation — each one is replaced by a task
//! (scheduled or impossible) in the result.

use super::HourWindow;

/// A concrete occurrence of a goal, with its feasible placement windows.
///
/// `windows` is sorted and non-overlapping. It normally holds a single
/// `[earliest, latest)` range; daily hour-of-day bounds on a multi-day
/// period slice it into one sub-window per eligible day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalInstance {
    /// Task id this instance will produce (sequential across the run).
    pub task_id: usize,
    /// Owning goal.
    pub goal_id: usize,
    /// Goal title, carried through to the task.
    pub title: String,
    /// Occurrence index within the goal (0-based).
    pub occurrence: usize,
    /// Hours to place.
    pub duration: i64,
    /// Feasible placement windows, sorted, disjoint.
    pub windows: Vec<HourWindow>,
    /// Index of the period (day/week) this occurrence belongs to.
    /// Occurrences of the same goal share a period index when they float
    /// within the same day or week (`x-per-day` / `x-per-week`).
    pub period: usize,
    /// Goals whose tasks must be terminal before this instance is placed.
    pub depends_on: Vec<usize>,
}

impl GoalInstance {
    /// Total feasible hours across all windows.
    pub fn feasible_hours(&self) -> i64 {
        self.windows.iter().map(HourWindow::len).sum()
    }

    /// Slack: feasible hours minus required duration.
    ///
    /// Lower means more constrained; negative means the instance cannot
    /// fit even an empty pool.
    pub fn slack(&self) -> i64 {
        self.feasible_hours() - self.duration
    }

    /// Earliest feasible hour, if any window exists.
    pub fn earliest(&self) -> Option<i64> {
        self.windows.first().map(|w| w.start)
    }

    /// Latest feasible hour (exclusive), if any window exists.
    pub fn latest(&self) -> Option<i64> {
        self.windows.last().map(|w| w.end)
    }

    /// Whether the instance has no feasible hours at all.
    pub fn is_infeasible(&self) -> bool {
        self.feasible_hours() < self.duration
    }
}
