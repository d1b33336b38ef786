//! Calendar-facing output.
//!
//! The engine's native result speaks in hour offsets relative to the
//! schedule start. Calendar frontends want absolute datetimes and one
//! entry per placed task, so this module flattens a [`ScheduleResult`]
//! back into wall-clock terms. Impossible tasks carry no time span and
//! are omitted.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{ScheduleResult, TaskStatus, Timeline};

/// One placed task in absolute wall-clock terms.
///
/// `start` is the first scheduled hour and `deadline` the end of the
/// last; a split task spans its gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatTask {
    /// Stable external id: `goal_id * 10 + occurrence`.
    pub taskid: usize,
    /// Owning goal.
    pub goalid: usize,
    /// Goal title.
    pub title: String,
    /// Scheduled hours.
    pub duration: i64,
    /// First scheduled instant.
    pub start: NaiveDateTime,
    /// End of the last scheduled slot.
    pub deadline: NaiveDateTime,
}

/// Flattens a schedule result into absolute-time task entries.
///
/// Entries are sorted by `taskid`. Only scheduled tasks appear; slots
/// are assumed sorted by start, as the engine emits them.
pub fn flat_output(result: &ScheduleResult, timeline: &Timeline) -> Vec<FlatTask> {
    let mut flat: Vec<FlatTask> = result
        .tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Scheduled)
        .filter_map(|task| {
            let slots = result.slots_for_task(task.task_id);
            let first = slots.first()?;
            let last = slots.last()?;
            Some(FlatTask {
                taskid: task.goal_id * 10 + task.occurrence,
                goalid: task.goal_id,
                title: task.title.clone(),
                duration: task.duration,
                start: timeline.instant_at(first.start),
                deadline: timeline.instant_at(last.end),
            })
        })
        .collect();
    flat.sort_by_key(|t| t.taskid);
    flat
}
