//! The slot allocator.
//!
//! Places one goal-instance at a time against the shared free-time
//! pool. Per instance the state machine is
//! `Pending → { Scheduled, Split-Scheduled, Impossible }`:
//!
//! 1. Intersect the instance's feasible windows with the pool to
//!    collect candidate sub-ranges.
//! 2. If any candidate is long enough, claim the first `duration` hours
//!    of the earliest such candidate (contiguous placement).
//! 3. Otherwise, if the candidates together cover the duration, claim
//!    hours greedily from the earliest candidates until enough are
//!    taken (split placement — one task, several slots).
//! 4. Otherwise the instance is impossible; the pool is not touched.
//!
//! Greedy, single pass, no backtracking: earlier (more constrained)
//! placements can starve later ones, trading optimality for determinism.

use log::{debug, warn};

use crate::models::{GoalInstance, HourWindow};

use super::pool::FreeTimePool;

/// Outcome of placing one instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Claimed slots, in timeline order. One slot means contiguous
    /// placement; several mean the task was split across free ranges.
    Scheduled(Vec<HourWindow>),
    /// No placement fits.
    Impossible,
}

/// Places an instance, claiming hours from the pool on success.
pub fn place(instance: &GoalInstance, pool: &mut FreeTimePool) -> Placement {
    place_with_extras(instance, pool, &[])
}

/// Places an instance, additionally treating `extras` as claimable.
///
/// `extras` are hour ranges outside the pool that this instance may
/// still occupy (sibling claims under the `Independent` period policy).
/// Claimed hours are deducted from the pool only where the pool still
/// holds them.
pub fn place_with_extras(
    instance: &GoalInstance,
    pool: &mut FreeTimePool,
    extras: &[HourWindow],
) -> Placement {
    let mut candidates = pool.candidates(&instance.windows);
    for extra in extras {
        for window in &instance.windows {
            if let Some(overlap) = extra.intersect(window) {
                candidates.push(overlap);
            }
        }
    }
    candidates.sort();
    let candidates = coalesce(candidates);

    let available: i64 = candidates.iter().map(HourWindow::len).sum();
    if available < instance.duration {
        warn!(
            "goal {} occurrence {} impossible: {} free hour(s) in window, {} needed",
            instance.goal_id, instance.occurrence, available, instance.duration
        );
        return Placement::Impossible;
    }

    // Contiguous placement: earliest candidate that fits whole
    if let Some(candidate) = candidates.iter().find(|c| c.len() >= instance.duration) {
        let slot = HourWindow::new(candidate.start, candidate.start + instance.duration);
        claim_from_pool(pool, slot);
        debug!(
            "goal {} occurrence {} scheduled at [{}, {})",
            instance.goal_id, instance.occurrence, slot.start, slot.end
        );
        return Placement::Scheduled(vec![slot]);
    }

    // Split placement: greedily claim from the earliest candidates
    let mut slots = Vec::new();
    let mut remaining = instance.duration;
    for candidate in &candidates {
        if remaining == 0 {
            break;
        }
        let take = candidate.len().min(remaining);
        let slot = HourWindow::new(candidate.start, candidate.start + take);
        claim_from_pool(pool, slot);
        slots.push(slot);
        remaining -= take;
    }
    debug!(
        "goal {} occurrence {} split across {} slot(s)",
        instance.goal_id, instance.occurrence, slots.len()
    );
    Placement::Scheduled(slots)
}

/// Merges touching candidates so a claim can span adjacent free pieces.
fn coalesce(sorted: Vec<HourWindow>) -> Vec<HourWindow> {
    let mut merged: Vec<HourWindow> = Vec::with_capacity(sorted.len());
    for window in sorted {
        match merged.last_mut() {
            Some(last) if window.start <= last.end => last.end = last.end.max(window.end),
            _ => merged.push(window),
        }
    }
    merged
}

/// Removes the parts of `slot` the pool still holds.
fn claim_from_pool(pool: &mut FreeTimePool, slot: HourWindow) {
    for piece in pool.candidates(&[slot]) {
        pool.claim(piece);
    }
}
