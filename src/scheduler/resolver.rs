//! Dependency and hierarchy resolution.
//!
//! Goals that reference other goals (`after_goals`, or a parent whose
//! `children` must be carved out first) are excluded from the main
//! ranking pass and scheduled in follow-up passes: the referenced goals
//! must all be terminal before a dependent goal is placed. Independent
//! goals form layer zero and are ranked and allocated together.
//!
//! The relation is a DAG (validation rejects cycles); layers are the
//! topological generations of that DAG, computed Kahn-style over goal
//! ids rather than a recursive goal-object graph.

use std::collections::{HashMap, HashSet};

use crate::models::Goal;

/// Goals a given goal must wait for: explicit dependencies plus its
/// children (a parent schedules only after the time carved out for its
/// children is placed).
pub fn blocking_goals(goal: &Goal) -> Vec<usize> {
    let mut blocking: Vec<usize> = goal.dependencies().to_vec();
    if let Some(children) = &goal.children {
        blocking.extend(children.iter().copied());
    }
    blocking.sort_unstable();
    blocking.dedup();
    blocking
}

/// Partitions goals into ordered layers.
///
/// Layer 0 holds goals with no references; layer k holds goals whose
/// references all live in earlier layers. Within a layer, goal ids keep
/// their request order. References to goals outside the request are
/// ignored here — validation has already rejected them.
pub fn dependency_layers(goals: &[Goal]) -> Vec<Vec<usize>> {
    let known: HashSet<usize> = goals.iter().map(|g| g.id).collect();
    let mut pending: HashMap<usize, Vec<usize>> = goals
        .iter()
        .map(|g| {
            let deps: Vec<usize> = blocking_goals(g)
                .into_iter()
                .filter(|id| known.contains(id) && *id != g.id)
                .collect();
            (g.id, deps)
        })
        .collect();

    let mut layers: Vec<Vec<usize>> = Vec::new();
    let mut placed: HashSet<usize> = HashSet::new();

    while placed.len() < goals.len() {
        let layer: Vec<usize> = goals
            .iter()
            .filter(|g| !placed.contains(&g.id))
            .filter(|g| pending[&g.id].iter().all(|dep| placed.contains(dep)))
            .map(|g| g.id)
            .collect();

        if layer.is_empty() {
            // Only a cyclic relation can stall here, and validation
            // rejects those. Surface the remaining goals in a final
            // layer rather than dropping them from the result.
            let rest: Vec<usize> = goals
                .iter()
                .filter(|g| !placed.contains(&g.id))
                .map(|g| g.id)
                .collect();
            layers.push(rest);
            break;
        }

        placed.extend(layer.iter().copied());
        pending.retain(|id, _| !placed.contains(id));
        layers.push(layer);
    }

    layers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_independent_goals_form_one_layer() {
        let goals = vec![Goal::new(1), Goal::new(2), Goal::new(3)];
        assert_eq!(dependency_layers(&goals), vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_chain_layers() {
        let goals = vec![
            Goal::new(1),
            Goal::new(2).with_after_goal(1),
            Goal::new(3).with_after_goal(2),
        ];
        assert_eq!(
            dependency_layers(&goals),
            vec![vec![1], vec![2], vec![3]]
        );
    }

    #[test]
    fn test_diamond_resolves_in_two_layers() {
        let goals = vec![
            Goal::new(1),
            Goal::new(2).with_after_goal(1),
            Goal::new(3).with_after_goal(1),
            Goal::new(4).with_after_goal(2).with_after_goal(3),
        ];
        assert_eq!(
            dependency_layers(&goals),
            vec![vec![1], vec![2, 3], vec![4]]
        );
    }

    #[test]
    fn test_parent_waits_for_children() {
        let goals = vec![
            Goal::new(1).with_children(vec![2, 3]),
            Goal::new(2),
            Goal::new(3),
        ];
        assert_eq!(dependency_layers(&goals), vec![vec![2, 3], vec![1]]);
    }

    #[test]
    fn test_cyclic_relation_never_drops_goals() {
        // Cycle through a children link; validation rejects this, but
        // the layering itself must still account for every goal
        let goals = vec![
            Goal::new(1).with_children(vec![2]),
            Goal::new(2).with_after_goal(1),
        ];
        let mut all: Vec<usize> = dependency_layers(&goals).into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(all, vec![1, 2]);
    }

    #[test]
    fn test_blocking_goals_deduplicates() {
        let goal = Goal::new(1)
            .with_after_goal(2)
            .with_after_goal(2)
            .with_children(vec![3]);
        assert_eq!(blocking_goals(&goal), vec![2, 3]);
    }
}
