//! Error types for the scheduling engine.
//!
//! Structural errors abort the whole call — no partial schedule is
//! returned. Placement infeasibility is not an error: it is reported
//! in-band as a task with [`TaskStatus::Impossible`](crate::models::TaskStatus).

use thiserror::Error;

/// Errors that abort a scheduling call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// An input date/time string could not be parsed.
    #[error("malformed date/time: {value:?}")]
    MalformedDateTime {
        /// The offending input string.
        value: String,
    },

    /// A goal carries an unrecognized repetition keyword.
    ///
    /// Fatal to the whole request even though only one goal is affected:
    /// task id derivation depends on a fully expanded instance set.
    #[error("unrecognized repetition: {value:?}")]
    InvalidRepetition {
        /// The offending keyword.
        value: String,
    },

    /// A goal failed structural validation (duplicate id, zero duration,
    /// inverted bounds, dangling or cyclic dependency reference).
    #[error("invalid goal {goal_id}: {reason}")]
    InvalidGoal {
        /// The goal that failed validation.
        goal_id: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The schedule range is empty (end not after start).
    #[error("schedule end {end} is not after start {start}")]
    EmptyTimeline {
        /// Requested start, as given.
        start: String,
        /// Requested end, as given.
        end: String,
    },

    /// The request payload could not be decoded.
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

/// Result alias used throughout the crate.
pub type SchedulerResult<T> = Result<T, SchedulerError>;
