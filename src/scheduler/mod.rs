//! The scheduling engine.
//!
//! [`GoalScheduler`] turns a [`ScheduleRequest`] into a
//! [`ScheduleResult`]: goals are expanded into instances, partitioned
//! into dependency layers, ranked by flexibility within each layer, and
//! placed one by one against the shared free-time pool.
//!
//! The engine is synchronous and pure: one run owns all its state, and
//! identical input always yields identical output.
//!
//! # Pipeline
//!
//! 1. Parse the schedule range and validate goal structure (fatal).
//! 2. Expand repetitions into goal-instances with feasible windows
//!    (unrecognized repetition keywords are fatal here).
//! 3. Resolve dependency layers; independent goals form the first pass.
//! 4. Within each layer: rank by ascending slack, then allocate.
//! 5. Dependent layers are constrained to start after the referenced
//!    goals' latest scheduled hour; if a referenced goal placed nothing
//!    at all, its dependents are impossible.

mod allocator;
mod pool;
mod ranker;
mod resolver;

pub use allocator::{place, place_with_extras, Placement};
pub use pool::FreeTimePool;
pub use ranker::placement_order;
pub use resolver::{blocking_goals, dependency_layers};

use std::collections::HashMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{SchedulerError, SchedulerResult};
use crate::expansion::expand_goal;
use crate::models::{
    parse_datetime, Goal, GoalInstance, HourWindow, ScheduleResult, SlotAssignment, TaskResult,
    TaskStatus, Timeline,
};
use crate::validation::validate_goals;

/// Input container for one scheduling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Schedule range start (ISO-8601-like, optional trailing `Z`).
    #[serde(rename = "startDate")]
    pub start_date: String,
    /// Schedule range end, exclusive.
    #[serde(rename = "endDate")]
    pub end_date: String,
    /// Goals to place.
    pub goals: Vec<Goal>,
}

impl ScheduleRequest {
    /// Creates a new request.
    pub fn new(
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        goals: Vec<Goal>,
    ) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            goals,
        }
    }

    /// Decodes a request from its JSON payload.
    pub fn from_json(payload: &str) -> SchedulerResult<Self> {
        serde_json::from_str(payload).map_err(|e| SchedulerError::MalformedRequest(e.to_string()))
    }
}

/// Whether occurrences of the same goal within one day/week period
/// compete for hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PeriodPolicy {
    /// Sibling occurrences compete for the shared pool (default):
    /// two `3/day` occurrences can never claim the same hour.
    #[default]
    Exclusive,
    /// Sibling occurrences are placed as if their siblings had not
    /// claimed anything; hours claimed by a sibling remain claimable.
    Independent,
}

/// Goal-to-task scheduler.
///
/// # Example
///
/// ```
/// use goalplan::models::Goal;
/// use goalplan::scheduler::{GoalScheduler, ScheduleRequest};
///
/// let request = ScheduleRequest::new(
///     "2022-01-01T00:00:00Z",
///     "2022-01-02T00:00:00Z",
///     vec![Goal::new(1).with_title("shopping").with_duration(1)],
/// );
/// let result = GoalScheduler::new().schedule(&request).unwrap();
/// assert!(result.is_fully_scheduled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GoalScheduler {
    period_policy: PeriodPolicy,
}

impl GoalScheduler {
    /// Creates a scheduler with the default (exclusive) period policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the period policy for `x-per-day` / `x-per-week` siblings.
    pub fn with_period_policy(mut self, policy: PeriodPolicy) -> Self {
        self.period_policy = policy;
        self
    }

    /// Runs one scheduling pass.
    ///
    /// Returns every task derived from the request's goals, placed or
    /// impossible. Structural problems (malformed dates, unrecognized
    /// repetition keywords, invalid goals) abort the whole call.
    pub fn schedule(&self, request: &ScheduleRequest) -> SchedulerResult<ScheduleResult> {
        let timeline = Timeline::new(
            parse_datetime(&request.start_date)?,
            parse_datetime(&request.end_date)?,
        )?;

        if let Err(errors) = validate_goals(&request.goals) {
            let first = &errors[0];
            return Err(SchedulerError::InvalidGoal {
                goal_id: first.goal_id,
                reason: first.message.clone(),
            });
        }

        let mut counter = 0;
        let mut instances_by_goal: HashMap<usize, Vec<GoalInstance>> = HashMap::new();
        for goal in &request.goals {
            let instances = expand_goal(goal, &timeline, &mut counter)?;
            instances_by_goal.insert(goal.id, instances);
        }
        info!(
            "scheduling {} instance(s) from {} goal(s) over {} hour(s)",
            counter,
            request.goals.len(),
            timeline.total_hours()
        );

        let goals_by_id: HashMap<usize, &Goal> =
            request.goals.iter().map(|g| (g.id, g)).collect();
        let layers = dependency_layers(&request.goals);

        let mut pool = FreeTimePool::new(timeline.total_hours());
        let mut tasks: Vec<TaskResult> = Vec::new();
        let mut slots: Vec<SlotAssignment> = Vec::new();
        // Claims per (goal, period), for sibling reuse and dependents
        let mut claims: HashMap<(usize, usize), Vec<HourWindow>> = HashMap::new();
        let mut latest_end_by_goal: HashMap<usize, i64> = HashMap::new();

        for layer in &layers {
            let mut layer_instances: Vec<GoalInstance> = Vec::new();
            for goal_id in layer {
                let goal = goals_by_id[goal_id];
                let barrier = dependency_barrier(goal, &latest_end_by_goal);
                for mut instance in instances_by_goal.remove(goal_id).unwrap_or_default() {
                    match barrier {
                        Barrier::Blocked => {
                            warn!(
                                "goal {} occurrence {} impossible: a prerequisite goal placed nothing",
                                instance.goal_id, instance.occurrence
                            );
                            tasks.push(to_task(&instance, TaskStatus::Impossible));
                        }
                        Barrier::NotBefore(hour) => {
                            instance.windows = trim_before(&instance.windows, hour);
                            layer_instances.push(instance);
                        }
                        Barrier::None => layer_instances.push(instance),
                    }
                }
            }

            // Empty windows never reach the allocator
            let (feasible, dead): (Vec<_>, Vec<_>) = layer_instances
                .into_iter()
                .partition(|i| !i.windows.is_empty());
            for instance in dead {
                warn!(
                    "goal {} occurrence {} impossible: empty feasible window",
                    instance.goal_id, instance.occurrence
                );
                tasks.push(to_task(&instance, TaskStatus::Impossible));
            }

            for index in placement_order(&feasible) {
                let instance = &feasible[index];
                let extras = match self.period_policy {
                    PeriodPolicy::Exclusive => Vec::new(),
                    PeriodPolicy::Independent => claims
                        .get(&(instance.goal_id, instance.period))
                        .cloned()
                        .unwrap_or_default(),
                };

                match allocator::place_with_extras(instance, &mut pool, &extras) {
                    Placement::Scheduled(placed) => {
                        let claimed = claims
                            .entry((instance.goal_id, instance.period))
                            .or_default();
                        for slot in &placed {
                            slots.push(SlotAssignment::new(instance.task_id, *slot));
                            claimed.push(*slot);
                            let latest =
                                latest_end_by_goal.entry(instance.goal_id).or_insert(slot.end);
                            *latest = (*latest).max(slot.end);
                        }
                        tasks.push(to_task(instance, TaskStatus::Scheduled));
                    }
                    Placement::Impossible => {
                        tasks.push(to_task(instance, TaskStatus::Impossible));
                    }
                }
            }
        }

        tasks.sort_by_key(|t| t.task_id);
        slots.sort_by_key(|s| (s.task_id, s.start));
        debug!(
            "run complete: {} scheduled, {} impossible, {} free hour(s) left",
            tasks.iter().filter(|t| t.status == TaskStatus::Scheduled).count(),
            tasks.iter().filter(|t| t.status == TaskStatus::Impossible).count(),
            pool.total_free()
        );
        Ok(ScheduleResult { tasks, slots })
    }
}

enum Barrier {
    /// No dependencies, or none that constrain placement.
    None,
    /// May not start before this hour.
    NotBefore(i64),
    /// A prerequisite goal placed nothing; dependents are impossible.
    Blocked,
}

fn dependency_barrier(goal: &Goal, latest_end_by_goal: &HashMap<usize, i64>) -> Barrier {
    let blocking = blocking_goals(goal);
    if blocking.is_empty() {
        return Barrier::None;
    }
    let mut barrier = 0;
    for dep in blocking {
        match latest_end_by_goal.get(&dep) {
            Some(&end) => barrier = barrier.max(end),
            None => return Barrier::Blocked,
        }
    }
    Barrier::NotBefore(barrier)
}

/// Drops feasible hours before `hour`, clipping the window it lands in.
fn trim_before(windows: &[HourWindow], hour: i64) -> Vec<HourWindow> {
    windows
        .iter()
        .filter(|w| w.end > hour)
        .map(|w| HourWindow::new(w.start.max(hour), w.end))
        .collect()
}

fn to_task(instance: &GoalInstance, status: TaskStatus) -> TaskResult {
    TaskResult {
        task_id: instance.task_id,
        goal_id: instance.goal_id,
        title: instance.title.clone(),
        occurrence: instance.occurrence,
        duration: instance.duration,
        status,
    }
}
