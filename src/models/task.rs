//! Task (output) model.
//!
//! A task is the scheduled (or marked-impossible) unit corresponding to
//! one goal-instance. The structured result pairs a flat task list with
//! a flat slot list referencing task ids, all in hour-offsets relative
//! to the schedule start.

use serde::{Deserialize, Serialize};

use super::HourWindow;

/// Terminal state of a goal-instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Placed on the timeline (one slot, or several when split).
    Scheduled,
    /// No valid placement was found.
    Impossible,
}

/// One placed (or unplaceable) task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Sequential task id, unique within the run.
    pub task_id: usize,
    /// Owning goal.
    pub goal_id: usize,
    /// Goal title.
    pub title: String,
    /// Occurrence index within the goal (0-based).
    pub occurrence: usize,
    /// Hours requested.
    pub duration: i64,
    /// Terminal state.
    pub status: TaskStatus,
}

/// A contiguous hour range assigned to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignment {
    /// The task this slot belongs to.
    pub task_id: usize,
    /// Start hour-offset (inclusive).
    pub start: i64,
    /// End hour-offset (exclusive).
    pub end: i64,
}

impl SlotAssignment {
    /// Creates a slot assignment from a claimed window.
    pub fn new(task_id: usize, window: HourWindow) -> Self {
        Self {
            task_id,
            start: window.start,
            end: window.end,
        }
    }

    /// Slot length in hours.
    #[inline]
    pub fn hours(&self) -> i64 {
        self.end - self.start
    }
}

/// A complete scheduling result.
///
/// Tasks are sorted by task id, slots by (task id, start), so identical
/// input always serializes to identical output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// All tasks derived from the request's goals, placed or impossible.
    pub tasks: Vec<TaskResult>,
    /// Claimed slots for scheduled tasks.
    pub slots: Vec<SlotAssignment>,
}

impl ScheduleResult {
    /// Finds a task by id.
    pub fn task(&self, task_id: usize) -> Option<&TaskResult> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    /// All tasks belonging to a goal, in occurrence order.
    pub fn tasks_for_goal(&self, goal_id: usize) -> Vec<&TaskResult> {
        self.tasks.iter().filter(|t| t.goal_id == goal_id).collect()
    }

    /// All slots claimed by a task, in start order.
    pub fn slots_for_task(&self, task_id: usize) -> Vec<&SlotAssignment> {
        self.slots.iter().filter(|s| s.task_id == task_id).collect()
    }

    /// Total hours actually placed for a task.
    pub fn scheduled_hours(&self, task_id: usize) -> i64 {
        self.slots_for_task(task_id).iter().map(|s| s.hours()).sum()
    }

    /// Number of tasks that reached [`TaskStatus::Impossible`].
    pub fn impossible_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Impossible)
            .count()
    }

    /// Whether every task was placed.
    pub fn is_fully_scheduled(&self) -> bool {
        self.impossible_count() == 0
    }
}
