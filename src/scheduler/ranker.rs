//! Flexibility-based placement ordering.
//!
//! Flexibility is slack: feasible hours minus required duration. The
//! most constrained instances place first, which is what lets a
//! tightly bounded goal (a dentist appointment with a one-hour window)
//! claim its only feasible slot before looser goals crowd it out.
//!
//! # Ordering
//! Ascending slack; ties broken by ascending goal id, then by ascending
//! occurrence index. The order is total, so the placement pass is
//! deterministic regardless of input order.

use std::cmp::Ordering;

use crate::models::GoalInstance;

/// Returns indices into `instances` in placement order.
pub fn placement_order(instances: &[GoalInstance]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..instances.len()).collect();
    indices.sort_by(|&a, &b| compare(&instances[a], &instances[b]));
    indices
}

fn compare(a: &GoalInstance, b: &GoalInstance) -> Ordering {
    a.slack()
        .cmp(&b.slack())
        .then_with(|| a.goal_id.cmp(&b.goal_id))
        .then_with(|| a.occurrence.cmp(&b.occurrence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HourWindow;

    fn instance(goal_id: usize, occurrence: usize, window: HourWindow, duration: i64) -> GoalInstance {
        GoalInstance {
            task_id: goal_id * 10 + occurrence,
            goal_id,
            title: format!("goal {goal_id}"),
            occurrence,
            duration,
            windows: vec![window],
            period: 0,
            depends_on: Vec::new(),
        }
    }

    #[test]
    fn test_most_constrained_first() {
        let instances = vec![
            instance(1, 0, HourWindow::new(10, 13), 1), // slack 2
            instance(2, 0, HourWindow::new(10, 11), 1), // slack 0
            instance(3, 0, HourWindow::new(10, 18), 1), // slack 7
        ];
        let order = placement_order(&instances);
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn test_tie_broken_by_goal_id() {
        let instances = vec![
            instance(7, 0, HourWindow::new(0, 4), 2),
            instance(3, 0, HourWindow::new(10, 14), 2),
        ];
        let order = placement_order(&instances);
        assert_eq!(instances[order[0]].goal_id, 3);
    }

    #[test]
    fn test_tie_broken_by_occurrence() {
        let instances = vec![
            instance(1, 1, HourWindow::new(24, 28), 2),
            instance(1, 0, HourWindow::new(0, 4), 2),
        ];
        let order = placement_order(&instances);
        assert_eq!(instances[order[0]].occurrence, 0);
        assert_eq!(instances[order[1]].occurrence, 1);
    }

    #[test]
    fn test_order_is_independent_of_input_order() {
        let a = vec![
            instance(1, 0, HourWindow::new(10, 13), 1),
            instance(2, 0, HourWindow::new(10, 11), 1),
        ];
        let b: Vec<_> = a.iter().rev().cloned().collect();
        let order_a: Vec<usize> = placement_order(&a).iter().map(|&i| a[i].goal_id).collect();
        let order_b: Vec<usize> = placement_order(&b).iter().map(|&i| b[i].goal_id).collect();
        assert_eq!(order_a, order_b);
    }
}
