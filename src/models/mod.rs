//! Scheduling domain models.
//!
//! Provides the data types for one scheduling run: the wire-facing
//! [`Goal`] input, the recurrence grammar ([`Repetition`]), the
//! hour-offset time frame ([`Timeline`], [`HourWindow`]), the expanded
//! [`GoalInstance`], and the output ([`ScheduleResult`] and friends).
//!
//! # Time Representation
//! All placement arithmetic is in integer hours relative to the
//! schedule's start instant (offset 0). Absolute datetimes appear only
//! at the boundary: request parsing and the flat output encoding.

mod calendar;
mod goal;
mod instance;
mod repetition;
mod task;

pub use calendar::{parse_datetime, HourWindow, Timeline};
pub use goal::{Goal, GoalDuration};
pub use instance::GoalInstance;
pub use repetition::Repetition;
pub use task::{ScheduleResult, SlotAssignment, TaskResult, TaskStatus};
