//! Input validation for scheduling requests.
//!
//! Checks structural integrity of goals before expansion. Detects:
//! - Duplicate goal ids
//! - Zero durations
//! - Inverted hour-of-day or date bounds
//! - References to goals that don't exist
//! - Circular dependency chains (DAG validation)
//!
//! Date strings that fail to parse are not reported here; expansion
//! surfaces those as `MalformedDateTime` with the offending value.

use std::collections::{HashMap, HashSet};

use crate::models::{parse_datetime, Goal};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// The goal the error is attached to.
    pub goal_id: usize,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two goals share the same id.
    DuplicateId,
    /// A goal requires zero hours.
    ZeroDuration,
    /// `after_time >= before_time`, or an hour outside 0-24.
    InvalidHourBounds,
    /// `start` is after `deadline`.
    InvalidDateBounds,
    /// A dependency or child reference points to a goal that doesn't exist.
    UnknownReference,
    /// The dependency graph contains a cycle.
    CyclicDependency,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, goal_id: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            goal_id,
            message: message.into(),
        }
    }
}

/// Validates the goals of a scheduling request.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_goals(goals: &[Goal]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for goal in goals {
        if !ids.insert(goal.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                goal.id,
                format!("duplicate goal id {}", goal.id),
            ));
        }

        if goal.committed_hours() == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroDuration,
                goal.id,
                "duration must be at least one hour",
            ));
        }

        if let (Some(after), Some(before)) = (goal.after_time, goal.before_time) {
            if after >= before {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidHourBounds,
                    goal.id,
                    format!("after_time {after} must be before before_time {before}"),
                ));
            }
        }
        for hour in goal.after_time.iter().chain(goal.before_time.iter()) {
            if *hour > 24 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidHourBounds,
                    goal.id,
                    format!("hour-of-day {hour} outside 0-24"),
                ));
            }
        }

        if let (Some(start), Some(deadline)) = (&goal.start, &goal.deadline) {
            if let (Ok(start), Ok(deadline)) = (parse_datetime(start), parse_datetime(deadline)) {
                if start > deadline {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::InvalidDateBounds,
                        goal.id,
                        format!("start {start} is after deadline {deadline}"),
                    ));
                }
            }
        }
    }

    // References must point at goals in this request
    for goal in goals {
        let referenced = goal
            .dependencies()
            .iter()
            .chain(goal.children.iter().flatten());
        for id in referenced {
            if !ids.contains(id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownReference,
                    goal.id,
                    format!("goal {} references unknown goal {id}", goal.id),
                ));
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(goals) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the blocking graph using DFS.
///
/// The graph covers everything that delays a goal: its `after_goals`
/// plus its `children` (a parent schedules after its children). A
/// back-edge (reaching a goal currently on the recursion stack) means
/// the relation cannot be resolved by topological passes.
fn detect_cycles(goals: &[Goal]) -> Option<ValidationError> {
    let mut adj: HashMap<usize, Vec<usize>> = HashMap::new();
    for goal in goals {
        for &dep in goal.dependencies() {
            adj.entry(dep).or_default().push(goal.id);
        }
        // Child-to-parent edges point the same way as dependencies
        for &child in goal.children.iter().flatten() {
            adj.entry(child).or_default().push(goal.id);
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for goal in goals {
        if !visited.contains(&goal.id)
            && has_cycle_dfs(goal.id, &adj, &mut visited, &mut in_stack)
        {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                goal.id,
                format!("circular dependency involving goal {}", goal.id),
            ));
        }
    }

    None
}

fn has_cycle_dfs(
    node: usize,
    adj: &HashMap<usize, Vec<usize>>,
    visited: &mut HashSet<usize>,
    in_stack: &mut HashSet<usize>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(&node) {
        for &next in neighbors {
            if in_stack.contains(&next) {
                return true; // Back edge → cycle
            }
            if !visited.contains(&next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(&node);
    false
}
