//! Goal-to-task scheduling engine.
//!
//! Turns a list of goals (durations, repetitions, date and hour-of-day
//! bounds, dependencies) over a schedule range into concrete tasks with
//! hour-level time slots. Goals that cannot fit are reported as
//! impossible rather than failing the run.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Goal`, `Repetition`, `Timeline`,
//!   `GoalInstance`, `TaskResult`, `SlotAssignment`, `ScheduleResult`
//! - **`expansion`**: Repetition expansion into goal-instances with
//!   feasible hour windows
//! - **`validation`**: Input integrity checks (duplicate IDs, dependency
//!   cycles, empty windows)
//! - **`scheduler`**: The engine — flexibility-ranked greedy placement
//!   with split slots over a shared free-time pool
//! - **`output`**: Flattening results back to absolute wall-clock tasks
//!
//! # Algorithm
//!
//! Placement is deterministic and greedy: instances are partitioned into
//! dependency layers, ranked most-constrained-first by slack (feasible
//! hours minus duration) within each layer, and claim the earliest
//! contiguous fit, splitting across free ranges only when no contiguous
//! run remains.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Brucker (2007), "Scheduling Algorithms"

pub mod error;
pub mod expansion;
pub mod models;
pub mod output;
pub mod scheduler;
pub mod validation;

pub use error::{SchedulerError, SchedulerResult};
pub use models::{Goal, GoalDuration, ScheduleResult, TaskStatus};
pub use scheduler::{GoalScheduler, PeriodPolicy, ScheduleRequest};
