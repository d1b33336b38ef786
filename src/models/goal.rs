//! Goal (input) model.
//!
//! A goal is a user-declared activity template: a recurring or one-off
//! activity with a required duration and optional time bounds. Goals are
//! expanded into concrete [`GoalInstance`](super::GoalInstance)s by the
//! scheduler, which places them on the timeline as tasks.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A goal to be scheduled.
///
/// Wire-facing: this is the shape the front end submits. Date bounds and
/// the repetition keyword arrive as strings and are parsed inside the
/// scheduling call, so malformed values fail the whole request with a
/// typed error rather than being dropped at the serialization boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique goal identifier within one request.
    pub id: usize,
    /// Display label; opaque to scheduling.
    pub title: String,
    /// Hours needed per occurrence (a range for flexible-duration goals).
    pub duration: GoalDuration,
    /// Recurrence keyword, e.g. `"daily"` or `"every 3 days"`.
    #[serde(default)]
    pub repeat: Option<String>,
    /// Earliest date bound for this goal's tasks.
    #[serde(default)]
    pub start: Option<String>,
    /// Latest date bound for this goal's tasks.
    #[serde(default)]
    pub deadline: Option<String>,
    /// Daily hour-of-day (0-24) after which placement may begin.
    #[serde(default)]
    pub after_time: Option<u32>,
    /// Daily hour-of-day (0-24) before which placement must finish.
    #[serde(default)]
    pub before_time: Option<u32>,
    /// Ids of child goals carved out of this goal's time.
    #[serde(default)]
    pub children: Option<Vec<usize>>,
    /// Ids of goals whose tasks must be placed before this goal's.
    #[serde(default)]
    pub after_goals: Option<Vec<usize>>,
}

impl Goal {
    /// Creates a goal with the given id and a one-hour duration.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            duration: GoalDuration::fixed(1),
            ..Default::default()
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets a fixed duration in hours.
    pub fn with_duration(mut self, hours: usize) -> Self {
        self.duration = GoalDuration::fixed(hours);
        self
    }

    /// Sets a flexible duration range in hours.
    pub fn with_flex_duration(mut self, min: usize, max: usize) -> Self {
        self.duration = GoalDuration(min, Some(max));
        self
    }

    /// Sets the recurrence keyword.
    pub fn with_repeat(mut self, repeat: impl Into<String>) -> Self {
        self.repeat = Some(repeat.into());
        self
    }

    /// Sets the earliest date bound.
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// Sets the latest date bound.
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    /// Sets the daily earliest hour-of-day.
    pub fn with_after_time(mut self, hour: u32) -> Self {
        self.after_time = Some(hour);
        self
    }

    /// Sets the daily latest hour-of-day.
    pub fn with_before_time(mut self, hour: u32) -> Self {
        self.before_time = Some(hour);
        self
    }

    /// Declares a dependency: this goal's tasks wait for `goal_id`.
    pub fn with_after_goal(mut self, goal_id: usize) -> Self {
        self.after_goals.get_or_insert_with(Vec::new).push(goal_id);
        self
    }

    /// Declares child goals carved out of this goal's time.
    pub fn with_children(mut self, children: Vec<usize>) -> Self {
        self.children = Some(children);
        self
    }

    /// Goals this goal must wait for (dependencies plus parent links
    /// are resolved by the caller; this is the explicit list).
    pub fn dependencies(&self) -> &[usize] {
        self.after_goals.as_deref().unwrap_or(&[])
    }

    /// Hours the scheduler must place per occurrence (range minimum).
    pub fn committed_hours(&self) -> usize {
        self.duration.0
    }
}

/// Hours required per occurrence.
///
/// The second value, when present, is the upper bound of a flexible
/// duration ("30-40h"); placement commits to the minimum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalDuration(pub usize, pub Option<usize>);

impl GoalDuration {
    /// A fixed duration of `hours`.
    pub fn fixed(hours: usize) -> Self {
        Self(hours, None)
    }
}

impl Serialize for GoalDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.1 {
            Some(max) => serializer.serialize_str(&format!("{}-{}h", self.0, max)),
            None => serializer.serialize_u64(self.0 as u64),
        }
    }
}

struct GoalDurationVisitor;

impl Visitor<'_> for GoalDurationVisitor {
    type Value = GoalDuration;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "an hour count or a flex range like \"35-40h\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(GoalDuration(v as usize, None))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Self::Value, E> {
        let parse = |part: &str| {
            part.parse::<usize>()
                .map_err(|_| E::custom(format!("invalid duration: {s:?}")))
        };
        if let Some((min, max)) = s.split_once('-') {
            // e.g. "35-40h"
            let max = max.strip_suffix('h').unwrap_or(max);
            Ok(GoalDuration(parse(min)?, Some(parse(max)?)))
        } else {
            let s = s.strip_suffix('h').unwrap_or(s);
            Ok(GoalDuration(parse(s)?, None))
        }
    }
}

impl<'de> Deserialize<'de> for GoalDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(GoalDurationVisitor)
    }
}
