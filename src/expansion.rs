//! Repetition expansion and feasible-window computation.
//!
//! Turns each [`Goal`] into a sequence of [`GoalInstance`]s, one per
//! concrete occurrence, each carrying its feasible placement windows in
//! hour-offsets. All calendar arithmetic (day stepping, weekday and
//! week-boundary computation) lives here; the allocator never touches a
//! date again.
//!
//! # Algorithm
//!
//! 1. Parse the goal's recurrence keyword and date bounds — both fatal
//!    on failure.
//! 2. Partition the goal's `[start, deadline)` range into periods
//!    according to the recurrence variant (whole range, days, matching
//!    weekdays, weeks ending on Sunday, or fixed hour steps).
//! 3. Within each period, emit one instance per required occurrence and
//!    slice its window by the goal's daily `after_time..before_time`
//!    bounds, reinterpreted for every calendar day the period touches.

use chrono::{Datelike, Days, NaiveDateTime, Weekday};
use log::debug;

use crate::error::SchedulerResult;
use crate::models::{parse_datetime, Goal, GoalInstance, HourWindow, Repetition, Timeline};

/// Expands one goal into its concrete instances.
///
/// `task_counter` numbers instances sequentially across the whole run,
/// matching the order goals appear in the request.
pub fn expand_goal(
    goal: &Goal,
    timeline: &Timeline,
    task_counter: &mut usize,
) -> SchedulerResult<Vec<GoalInstance>> {
    let repetition = goal
        .repeat
        .as_deref()
        .map(str::parse::<Repetition>)
        .transpose()?;

    let start = match &goal.start {
        Some(s) => parse_datetime(s)?.max(timeline.start),
        None => timeline.start,
    };
    let deadline = match &goal.deadline {
        Some(s) => parse_datetime(s)?.min(timeline.end),
        None => timeline.end,
    };

    let after = goal.after_time.unwrap_or(0);
    let before = goal.before_time.unwrap_or(24);
    let duration = goal.committed_hours() as i64;

    let periods = build_periods(repetition, start, deadline, duration, timeline);
    let per_period = repetition.map_or(1, |r| r.per_period());

    let mut instances = Vec::new();
    let mut occurrence = 0;
    for (period_index, period) in periods.iter().enumerate() {
        let windows = slice_by_hour_bounds(*period, after, before, timeline);
        for _ in 0..per_period {
            let task_id = *task_counter;
            *task_counter += 1;
            instances.push(GoalInstance {
                task_id,
                goal_id: goal.id,
                title: goal.title.clone(),
                occurrence,
                duration,
                windows: windows.clone(),
                period: period_index,
                depends_on: goal.dependencies().to_vec(),
            });
            occurrence += 1;
        }
    }

    // A goal whose bounds fall entirely outside the schedule range must
    // still surface as a task (marked impossible downstream), never
    // disappear from the result
    if instances.is_empty() {
        let task_id = *task_counter;
        *task_counter += 1;
        instances.push(GoalInstance {
            task_id,
            goal_id: goal.id,
            title: goal.title.clone(),
            occurrence: 0,
            duration,
            windows: Vec::new(),
            period: 0,
            depends_on: goal.dependencies().to_vec(),
        });
    }

    debug!(
        "goal {} ({:?}) expanded into {} instance(s)",
        goal.id, goal.title, instances.len()
    );
    Ok(instances)
}

/// Partitions `[start, deadline)` into placement periods per variant.
fn build_periods(
    repetition: Option<Repetition>,
    start: NaiveDateTime,
    deadline: NaiveDateTime,
    duration: i64,
    timeline: &Timeline,
) -> Vec<HourWindow> {
    if deadline <= start {
        return Vec::new();
    }

    match repetition {
        None => window_between(start, deadline, timeline).into_iter().collect(),
        Some(Repetition::Daily(_)) | Some(Repetition::FlexDaily(_, _)) => {
            day_periods(start, deadline, timeline, 1, |_| true)
        }
        Some(Repetition::EveryXDays(n)) => day_periods(start, deadline, timeline, n, |_| true),
        Some(Repetition::Weekday(day)) => {
            day_periods(start, deadline, timeline, 1, move |d| d == day)
        }
        Some(Repetition::Weekdays) => day_periods(start, deadline, timeline, 1, |d| {
            !matches!(d, Weekday::Sat | Weekday::Sun)
        }),
        Some(Repetition::Weekends) => day_periods(start, deadline, timeline, 1, |d| {
            matches!(d, Weekday::Sat | Weekday::Sun)
        }),
        Some(Repetition::Weekly(_)) | Some(Repetition::FlexWeekly(_, _)) => {
            week_periods(start, deadline, timeline)
        }
        Some(Repetition::EveryXHours(n)) => hour_periods(start, deadline, timeline, n, duration),
    }
}

fn window_between(
    start: NaiveDateTime,
    end: NaiveDateTime,
    timeline: &Timeline,
) -> Option<HourWindow> {
    timeline.clamp(HourWindow::new(
        timeline.offset_of(start),
        timeline.offset_of(end),
    ))
}

/// Midnight at the start of the day following `dt`.
fn next_midnight(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date()
        .checked_add_days(Days::new(1))
        .expect("date overflow stepping one day")
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time")
}

/// One period per matching day, stepping `step_days` between periods.
///
/// The first period may be partial (it starts at `start` rather than
/// midnight), as may the last one; this matches a goal whose start date
/// falls mid-day.
fn day_periods(
    start: NaiveDateTime,
    deadline: NaiveDateTime,
    timeline: &Timeline,
    step_days: usize,
    matches: impl Fn(Weekday) -> bool,
) -> Vec<HourWindow> {
    let mut periods = Vec::new();
    let mut current = start;
    while current < deadline {
        let day_end = next_midnight(current).min(deadline);
        if matches(current.weekday()) {
            if let Some(w) = window_between(current, day_end, timeline) {
                periods.push(w);
            }
            // A step of N skips N-1 days after each emitted period
            current = if step_days > 1 {
                next_midnight(current)
                    .date()
                    .checked_add_days(Days::new(step_days as u64 - 1))
                    .expect("date overflow stepping days")
                    .and_hms_opt(0, 0, 0)
                    .expect("midnight is always a valid time")
            } else {
                next_midnight(current)
            };
        } else {
            current = next_midnight(current);
        }
    }
    periods
}

/// One period per week, weeks ending on Sunday.
///
/// The first and last periods may be partial weeks.
fn week_periods(
    start: NaiveDateTime,
    deadline: NaiveDateTime,
    timeline: &Timeline,
) -> Vec<HourWindow> {
    let mut periods = Vec::new();
    let mut current = start;
    while current < deadline {
        let mut end = current;
        while end.weekday() != Weekday::Sun && end < deadline {
            end = next_midnight(end);
        }
        if end < deadline {
            end = next_midnight(end); // include the Sunday itself
        } else {
            end = deadline;
        }
        if let Some(w) = window_between(current, end, timeline) {
            periods.push(w);
        }
        current = end;
    }
    periods
}

/// Fixed-width periods every `step_hours`, each `duration` hours wide.
fn hour_periods(
    start: NaiveDateTime,
    deadline: NaiveDateTime,
    timeline: &Timeline,
    step_hours: usize,
    duration: i64,
) -> Vec<HourWindow> {
    let range_start = timeline.offset_of(start);
    let range_end = timeline.offset_of(deadline.min(timeline.end));
    let mut periods = Vec::new();
    let mut at = range_start;
    while at < range_end {
        let end = (at + duration.max(1)).min(range_end);
        if let Some(w) = timeline.clamp(HourWindow::new(at, end)) {
            periods.push(w);
        }
        at += step_hours as i64;
    }
    periods
}

/// Slices a period by daily `after..before` hour-of-day bounds.
///
/// With the default `0..24` bounds the period passes through untouched.
/// Otherwise every calendar day the period overlaps contributes the
/// intersection of `[day@after, day@before)` with the period, so a
/// multi-day period yields one window per eligible day.
fn slice_by_hour_bounds(
    period: HourWindow,
    after: u32,
    before: u32,
    timeline: &Timeline,
) -> Vec<HourWindow> {
    if after == 0 && before >= 24 {
        return vec![period];
    }

    let mut windows = Vec::new();
    let mut day = timeline
        .instant_at(period.start)
        .date()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time");
    let period_end = timeline.instant_at(period.end);
    while day < period_end {
        let day_offset = timeline.offset_of(day);
        let bounded = HourWindow::new(day_offset + after as i64, day_offset + before as i64);
        if let Some(w) = bounded.intersect(&period) {
            windows.push(w);
        }
        day = next_midnight(day);
    }
    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchedulerError;

    fn timeline(start: &str, end: &str) -> Timeline {
        Timeline::new(parse_datetime(start).unwrap(), parse_datetime(end).unwrap()).unwrap()
    }

    fn expand(goal: &Goal, tl: &Timeline) -> Vec<GoalInstance> {
        let mut counter = 0;
        expand_goal(goal, tl, &mut counter).unwrap()
    }

    #[test]
    fn test_single_occurrence_full_range() {
        let tl = timeline("2022-01-01", "2022-01-02");
        let goal = Goal::new(1).with_title("shopping").with_duration(1);
        let instances = expand(&goal, &tl);
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].windows, vec![HourWindow::new(0, 24)]);
        assert_eq!(instances[0].occurrence, 0);
    }

    #[test]
    fn test_single_occurrence_date_bounds() {
        let tl = timeline("2022-01-01", "2022-01-02");
        let goal = Goal::new(2)
            .with_title("dentist")
            .with_duration(1)
            .with_start("2022-01-01T10:00:00Z")
            .with_deadline("2022-01-01T11:00:00Z");
        let instances = expand(&goal, &tl);
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].windows, vec![HourWindow::new(10, 11)]);
        assert_eq!(instances[0].slack(), 0);
    }

    #[test]
    fn test_daily_three_days() {
        let tl = timeline("2022-01-01", "2022-01-04");
        let goal = Goal::new(1).with_duration(1).with_repeat("daily");
        let instances = expand(&goal, &tl);
        assert_eq!(instances.len(), 3);
        assert_eq!(instances[0].windows, vec![HourWindow::new(0, 24)]);
        assert_eq!(instances[1].windows, vec![HourWindow::new(24, 48)]);
        assert_eq!(instances[2].windows, vec![HourWindow::new(48, 72)]);
    }

    #[test]
    fn test_daily_with_hour_bounds() {
        let tl = timeline("2022-01-01", "2022-01-03");
        let goal = Goal::new(1)
            .with_duration(1)
            .with_repeat("daily")
            .with_after_time(10)
            .with_before_time(14);
        let instances = expand(&goal, &tl);
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].windows, vec![HourWindow::new(10, 14)]);
        assert_eq!(instances[1].windows, vec![HourWindow::new(34, 38)]);
    }

    #[test]
    fn test_hour_bounds_on_unrepeated_multiday_goal() {
        // No repetition, hour bounds applied per calendar day
        let tl = timeline("2022-01-01", "2022-01-03");
        let goal = Goal::new(1)
            .with_duration(1)
            .with_after_time(22)
            .with_before_time(24);
        let instances = expand(&goal, &tl);
        assert_eq!(instances.len(), 1);
        assert_eq!(
            instances[0].windows,
            vec![HourWindow::new(22, 24), HourWindow::new(46, 48)]
        );
    }

    #[test]
    fn test_every_x_days() {
        let tl = timeline("2022-01-01", "2022-01-08");
        let goal = Goal::new(1).with_duration(1).with_repeat("every 3 days");
        let instances = expand(&goal, &tl);
        // Jan 1, Jan 4, Jan 7
        assert_eq!(instances.len(), 3);
        assert_eq!(instances[0].windows, vec![HourWindow::new(0, 24)]);
        assert_eq!(instances[1].windows, vec![HourWindow::new(72, 96)]);
        assert_eq!(instances[2].windows, vec![HourWindow::new(144, 168)]);
    }

    #[test]
    fn test_weekday_selector() {
        // 2022-01-01 is a Saturday; Wednesdays are Jan 5 and Jan 12
        let tl = timeline("2022-01-01", "2022-01-14");
        let goal = Goal::new(1).with_duration(2).with_repeat("wednesdays");
        let instances = expand(&goal, &tl);
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].windows, vec![HourWindow::new(96, 120)]);
        assert_eq!(instances[1].windows, vec![HourWindow::new(264, 288)]);
    }

    #[test]
    fn test_weekends() {
        // Sat Jan 1, Sun Jan 2, then Sat Jan 8 is out of range
        let tl = timeline("2022-01-01", "2022-01-08");
        let goal = Goal::new(1).with_duration(1).with_repeat("weekends");
        let instances = expand(&goal, &tl);
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].windows, vec![HourWindow::new(0, 24)]);
        assert_eq!(instances[1].windows, vec![HourWindow::new(24, 48)]);
    }

    #[test]
    fn test_weekdays() {
        let tl = timeline("2022-01-01", "2022-01-08");
        let goal = Goal::new(1).with_duration(1).with_repeat("weekdays");
        let instances = expand(&goal, &tl);
        // Mon Jan 3 .. Fri Jan 7
        assert_eq!(instances.len(), 5);
        assert_eq!(instances[0].windows, vec![HourWindow::new(48, 72)]);
    }

    #[test]
    fn test_every_x_hours_window_width_is_duration() {
        let tl = timeline("2022-01-01", "2022-01-01T12:00:00");
        let goal = Goal::new(1).with_duration(1).with_repeat("every 4 hours");
        let instances = expand(&goal, &tl);
        assert_eq!(instances.len(), 3);
        assert_eq!(instances[0].windows, vec![HourWindow::new(0, 1)]);
        assert_eq!(instances[1].windows, vec![HourWindow::new(4, 5)]);
        assert_eq!(instances[2].windows, vec![HourWindow::new(8, 9)]);
        assert!(instances.iter().all(|i| i.slack() == 0));
    }

    #[test]
    fn test_hourly() {
        let tl = timeline("2022-01-01", "2022-01-01T03:00:00");
        let goal = Goal::new(1).with_duration(1).with_repeat("hourly");
        let instances = expand(&goal, &tl);
        assert_eq!(instances.len(), 3);
        assert_eq!(instances[0].windows, vec![HourWindow::new(0, 1)]);
        assert_eq!(instances[2].windows, vec![HourWindow::new(2, 3)]);
    }

    #[test]
    fn test_x_per_day_floats_within_day() {
        let tl = timeline("2022-01-01", "2022-01-03");
        let goal = Goal::new(1).with_duration(1).with_repeat("2/day");
        let instances = expand(&goal, &tl);
        assert_eq!(instances.len(), 4);
        // Both occurrences of day one share the day's window and period
        assert_eq!(instances[0].windows, instances[1].windows);
        assert_eq!(instances[0].period, instances[1].period);
        assert_ne!(instances[1].period, instances[2].period);
        let occurrences: Vec<usize> = instances.iter().map(|i| i.occurrence).collect();
        assert_eq!(occurrences, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_x_per_week_partial_first_week() {
        // Starts Saturday; first week period is Sat+Sun only
        let tl = timeline("2022-01-01", "2022-01-15");
        let goal = Goal::new(1).with_duration(1).with_repeat("3/week");
        let instances = expand(&goal, &tl);
        // Weeks end on Sunday: [Jan 1, Jan 3), [Jan 3, Jan 10), [Jan 10, Jan 15)
        assert_eq!(instances.len(), 9);
        assert_eq!(instances[0].windows, vec![HourWindow::new(0, 48)]);
        assert_eq!(instances[3].windows, vec![HourWindow::new(48, 216)]);
        assert_eq!(instances[6].windows, vec![HourWindow::new(216, 336)]);
    }

    #[test]
    fn test_flex_forms_expand_at_minimum() {
        let tl = timeline("2022-01-01", "2022-01-02");
        let goal = Goal::new(1).with_duration(1).with_repeat("2-4/day");
        assert_eq!(expand(&goal, &tl).len(), 2);
    }

    #[test]
    fn test_invalid_repetition_is_fatal() {
        let tl = timeline("2022-01-01", "2022-01-02");
        let goal = Goal::new(1).with_duration(1).with_repeat("invalid-value-AAAAAA");
        let mut counter = 0;
        let err = expand_goal(&goal, &tl, &mut counter).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidRepetition { .. }));
    }

    #[test]
    fn test_malformed_date_is_fatal() {
        let tl = timeline("2022-01-01", "2022-01-02");
        let goal = Goal::new(1).with_duration(1).with_start("01/01/2022");
        let mut counter = 0;
        let err = expand_goal(&goal, &tl, &mut counter).unwrap_err();
        assert!(matches!(err, SchedulerError::MalformedDateTime { .. }));
    }

    #[test]
    fn test_bounds_outside_timeline_emit_infeasible_instance() {
        let tl = timeline("2022-01-01", "2022-01-02");
        let goal = Goal::new(1)
            .with_duration(1)
            .with_start("2022-02-01T00:00:00")
            .with_deadline("2022-02-02T00:00:00");
        let instances = expand(&goal, &tl);
        assert_eq!(instances.len(), 1);
        assert!(instances[0].windows.is_empty());
        assert!(instances[0].is_infeasible());
    }

    #[test]
    fn test_task_counter_is_sequential_across_goals() {
        let tl = timeline("2022-01-01", "2022-01-03");
        let mut counter = 0;
        let a = expand_goal(&Goal::new(1).with_duration(1).with_repeat("daily"), &tl, &mut counter)
            .unwrap();
        let b = expand_goal(&Goal::new(2).with_duration(1), &tl, &mut counter).unwrap();
        assert_eq!(a[0].task_id, 0);
        assert_eq!(a[1].task_id, 1);
        assert_eq!(b[0].task_id, 2);
    }
}
